use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSON_MIME_TYPE: &str = "application/json";

/// One text block of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub mime_type: String,
    pub text: String,
}

/// Uniform tool result: a single JSON text block plus the error flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

impl ToolResult {
    fn new(payload: &Value, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                mime_type: JSON_MIME_TYPE.to_string(),
                text: payload.to_string(),
            }],
            is_error,
        }
    }

    pub fn success(payload: &Value) -> Self {
        Self::new(payload, false)
    }

    pub fn failure(payload: &Value) -> Self {
        Self::new(payload, true)
    }

    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }

    /// Parse the text block back into JSON.
    pub fn payload(&self) -> Value {
        serde_json::from_str(self.text()).unwrap_or(Value::Null)
    }
}
