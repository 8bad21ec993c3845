//! Tool behaviour hints advertised alongside each tool definition.

use serde::{Deserialize, Serialize};

/// Tool behavior hints.
///
/// Defaults are conservative: a tool is assumed to write and to be destructive
/// until marked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
    pub open_world: bool,
}

impl Default for ToolAnnotations {
    fn default() -> Self {
        Self {
            read_only: false,
            destructive: true,
            idempotent: false,
            open_world: true,
        }
    }
}

impl ToolAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads only; implies non-destructive and idempotent.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            destructive: false,
            idempotent: true,
            open_world: true,
        }
    }

    #[must_use]
    pub fn with_destructive(mut self, v: bool) -> Self {
        self.destructive = v;
        self
    }

    #[must_use]
    pub fn with_idempotent(mut self, v: bool) -> Self {
        self.idempotent = v;
        self
    }
}
