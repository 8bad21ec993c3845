//! Gateway error types.
//!
//! Every condition raised below the tool dispatcher is one of these variants.
//! Upstream failures keep their status, the provider error-type tag and the raw
//! body so the classifier can pick a stable outward code without probing.

use reqwest::StatusCode;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Remediation attached to ambiguous view references.
pub const VIEW_ID_REMEDIATION: &str = "Use the view ID (viw...) instead of name.";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Upstream answered with a non-success status (after retries, if any).
    #[error("Airtable API Error: {}. Response: {body}", reason_phrase(*status))]
    Api {
        status: u16,
        provider_error_type: Option<String>,
        body: String,
        hint: Option<String>,
    },

    /// The request never produced a status (DNS, TLS, connection reset).
    #[error("Airtable request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not JSON or did not match the expected shape.
    #[error("Failed to parse API response: {0}")]
    ResponseShape(String),

    #[error("{0}")]
    NotFound(String),

    /// A table or view a tool names does not exist. Reported without the
    /// tool-name prefix.
    #[error("{0}")]
    LookupMiss(String),

    #[error("Multiple views named {name} in table {table_id}")]
    AmbiguousReference {
        name: String,
        table_id: String,
        remediation: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Build an upstream failure from a non-success response.
    ///
    /// `error.type` is lifted from the JSON body when present; the body is kept
    /// verbatim either way.
    pub fn api(status: u16, body: String, api_key: &str) -> Self {
        let provider_error_type = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("type"))
                    .and_then(|t| t.as_str())
                    .map(str::to_string)
            });
        let hint = hint_for_status(status, api_key);
        GatewayError::Api {
            status,
            provider_error_type,
            body,
            hint,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        GatewayError::NotFound(message.into())
    }

    /// Turn a not-found into a [`GatewayError::LookupMiss`]; anything else is kept.
    pub fn into_lookup_miss(self) -> Self {
        match self {
            GatewayError::NotFound(message) => GatewayError::LookupMiss(message),
            other => other,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    pub fn ambiguous_view(name: impl Into<String>, table_id: impl Into<String>) -> Self {
        GatewayError::AmbiguousReference {
            name: name.into(),
            table_id: table_id.into(),
            remediation: VIEW_ID_REMEDIATION.to_string(),
        }
    }

    /// HTTP status of an upstream failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 429 and 5xx are transient; everything else fails on first sight.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Api { status, .. } if *status == 429 || *status >= 500)
    }
}

fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

/// Operator-facing hint for common upstream failures.
fn hint_for_status(status: u16, api_key: &str) -> Option<String> {
    let hint = match status {
        401 if !api_key.starts_with("pat") => {
            "Authentication failed. Airtable API keys are deprecated; use a personal access token (pat...) in AIRTABLE_API_KEY."
        }
        401 => "Authentication failed. Check that AIRTABLE_API_KEY holds a valid, unexpired personal access token.",
        403 => "The token lacks the required scopes (data.records:read/write, schema.bases:read/write) or has no access to this base.",
        404 => "The base, table, record or view was not found. Check the identifiers.",
        422 => "Airtable rejected the request. Check field names, field types and value formats.",
        429 => "Airtable rate limit exceeded (5 requests per second per base). Retry later.",
        _ => return None,
    };
    Some(hint.to_string())
}
