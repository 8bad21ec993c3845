//! Maps gateway failures to the outward error codes carried in tool results.

use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    ForbiddenOrNotFound,
    ValidationError,
    AmbiguousViewName,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

/// What a failed tool call reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolFailure {
    Structured(StructuredError),
    /// `Error in tool <name>: <message>` for failures with no upstream context,
    /// or the bare message for a lookup miss.
    Plain(String),
}

impl ToolFailure {
    pub fn payload(&self) -> Value {
        match self {
            ToolFailure::Structured(err) => serde_json::to_value(err).unwrap_or(Value::Null),
            ToolFailure::Plain(message) => Value::String(message.clone()),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ToolFailure::Structured(err) => Some(err.code),
            ToolFailure::Plain(_) => None,
        }
    }
}

pub fn error_code(err: &GatewayError) -> ErrorCode {
    match err {
        GatewayError::Api {
            status,
            provider_error_type,
            ..
        } => match (*status, provider_error_type.as_deref()) {
            (401, _) | (_, Some("AUTHENTICATION_REQUIRED")) => ErrorCode::Unauthorized,
            (403, _) | (_, Some("INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND")) => {
                ErrorCode::ForbiddenOrNotFound
            }
            (422, _) => ErrorCode::ValidationError,
            _ => ErrorCode::InternalError,
        },
        GatewayError::Transport(e) => match e.status().map(|s| s.as_u16()) {
            Some(401) => ErrorCode::Unauthorized,
            Some(403) => ErrorCode::ForbiddenOrNotFound,
            Some(422) => ErrorCode::ValidationError,
            _ => ErrorCode::InternalError,
        },
        GatewayError::AmbiguousReference { .. } => ErrorCode::AmbiguousViewName,
        GatewayError::ResponseShape(_)
        | GatewayError::NotFound(_)
        | GatewayError::LookupMiss(_)
        | GatewayError::Validation(_)
        | GatewayError::UnknownTool(_)
        | GatewayError::Config(_) => ErrorCode::InternalError,
    }
}

/// Classify `err` raised while running `tool`.
pub fn classify(tool: &str, err: &GatewayError) -> ToolFailure {
    if let GatewayError::LookupMiss(message) = err {
        return ToolFailure::Plain(message.clone());
    }

    let (hint, remediation) = match err {
        GatewayError::Api { hint, .. } => (hint.clone(), None),
        GatewayError::AmbiguousReference { remediation, .. } => (None, Some(remediation.clone())),
        _ => (None, None),
    };

    if err.status().is_none() && hint.is_none() && remediation.is_none() {
        return ToolFailure::Plain(format!("Error in tool {tool}: {err}"));
    }

    ToolFailure::Structured(StructuredError {
        code: error_code(err),
        message: err.to_string(),
        hint,
        remediation,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (401, ErrorCode::Unauthorized),
            (403, ErrorCode::ForbiddenOrNotFound),
            (422, ErrorCode::ValidationError),
            (404, ErrorCode::InternalError),
            (500, ErrorCode::InternalError),
        ];
        for (status, expected) in cases {
            let err = GatewayError::api(status, String::new(), "patX");
            assert_eq!(error_code(&err), expected, "status {status}");
        }
    }

    #[test]
    fn test_provider_type_wins_over_status() {
        let body = r#"{"error":{"type":"AUTHENTICATION_REQUIRED"}}"#.to_string();
        let err = GatewayError::api(400, body, "patX");
        assert_eq!(error_code(&err), ErrorCode::Unauthorized);

        let body = r#"{"error":{"type":"INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND"}}"#.to_string();
        let err = GatewayError::api(404, body, "patX");
        assert_eq!(error_code(&err), ErrorCode::ForbiddenOrNotFound);
    }

    #[test]
    fn test_structured_payload_for_upstream_errors() {
        let err = GatewayError::api(422, r#"{"error":"bad"}"#.to_string(), "patX");
        let failure = classify("create_record", &err);
        assert_eq!(failure.code(), Some(ErrorCode::ValidationError));

        let payload = failure.payload();
        assert_eq!(payload["code"], "validation_error");
        assert!(payload["message"]
            .as_str()
            .unwrap()
            .starts_with("Airtable API Error: Unprocessable Entity"));
        assert!(payload["hint"].is_string());
        assert!(payload.get("remediation").is_none());
    }

    #[test]
    fn test_ambiguous_view_payload() {
        let failure = classify("delete_view", &GatewayError::ambiguous_view("My View", "tbl1"));
        assert_eq!(
            failure.payload(),
            json!({
                "code": "ambiguous_view_name",
                "message": "Multiple views named My View in table tbl1",
                "remediation": "Use the view ID (viw...) instead of name."
            })
        );
    }

    #[test]
    fn test_plain_fallback() {
        let failure = classify(
            "describe_table",
            &GatewayError::not_found("Table tblX not found in base app1"),
        );
        assert_eq!(
            failure,
            ToolFailure::Plain(
                "Error in tool describe_table: Table tblX not found in base app1".to_string()
            )
        );
        assert_eq!(failure.code(), None);

        let failure = classify("bogus", &GatewayError::UnknownTool("bogus".to_string()));
        assert_eq!(
            failure.payload(),
            json!("Error in tool bogus: Unknown tool: bogus")
        );
    }

    #[test]
    fn test_lookup_miss_is_bare() {
        let err = GatewayError::not_found("Table Projects not found in base app1").into_lookup_miss();
        let failure = classify("describe_table", &err);
        assert_eq!(failure.payload(), json!("Table Projects not found in base app1"));
        assert_eq!(failure.code(), None);

        let kept = GatewayError::validation("bad").into_lookup_miss();
        assert!(matches!(kept, GatewayError::Validation(_)));
    }

    #[test]
    fn test_code_names() {
        assert_eq!(ErrorCode::ForbiddenOrNotFound.as_ref(), "forbidden_or_not_found");
        assert_eq!(ErrorCode::AmbiguousViewName.as_ref(), "ambiguous_view_name");
    }
}
