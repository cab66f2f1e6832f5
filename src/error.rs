// Shared error response shape for the API
// Each module error enum maps its kinds onto this body in one place.

use serde::Serialize;
use utoipa::ToSchema;

/// Consistent error response structure
///
/// `error` is a machine-readable slug, `message` is human-readable text,
/// and `details` carries per-field validation messages when present.
/// Internal error text (driver errors, stack traces) never appears here.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Flatten validator errors into a {field: message} map for the response body
pub fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let message = field_errors
            .first()
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid value".to_string());
        details.insert(field.to_string(), serde_json::Value::String(message));
    }
    serde_json::Value::Object(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
        password: String,
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new("not_found", "Todo not found")).unwrap();
        assert_eq!(body["error"], "not_found");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_validation_details_use_field_messages() {
        let probe = Probe { password: "short".to_string() };
        let errors = probe.validate().unwrap_err();
        let details = validation_details(&errors);
        assert_eq!(
            details["password"],
            "Password must be between 8 and 128 characters"
        );
    }
}
