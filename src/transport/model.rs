use crate::error::AppError;
use serde::Deserialize;

/// Every VK method answers with either `{"response": ...}` or `{"error": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiErrorBody>,
}

/// Error payload of a failed VK method call
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: i64,
    pub error_msg: String,
}

/// Collection wrapper used by list methods (`groups.get`, `photos.getAlbums`, `wall.get`).
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsResponse<T> {
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self, method: &str) -> Result<T, AppError> {
        match (self.response, self.error) {
            (_, Some(error)) => Err(AppError::Api {
                code: error.error_code,
                message: error.error_msg,
            }),
            (Some(response), None) => Ok(response),
            (None, None) => Err(AppError::EmptyResponse(method.to_string())),
        }
    }
}

#[cfg(test)]
mod tests_envelope {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_is_unwrapped() {
        let envelope: ApiEnvelope<i64> = serde_json::from_str(r#"{"response": 1}"#).unwrap();
        assert_eq!(envelope.into_result("wall.delete").unwrap(), 1);
    }

    #[test]
    fn test_error_takes_precedence() {
        let envelope: ApiEnvelope<i64> = serde_json::from_str(
            r#"{"error": {
                "error_code": 5,
                "error_msg": "User authorization failed",
                "request_params": []
            }}"#,
        )
        .unwrap();

        match envelope.into_result("users.get") {
            Err(AppError::Api { code, message }) => {
                assert_eq!(code, 5);
                assert_eq!(message, "User authorization failed");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_body_is_reported_with_method() {
        let envelope: ApiEnvelope<i64> = serde_json::from_str("{}").unwrap();
        let err = envelope.into_result("groups.get").unwrap_err();
        assert_eq!(err.to_string(), "VK Api - groups.get returned no result.");
    }

    #[test]
    fn test_items_default_to_empty() {
        let items: ItemsResponse<i64> = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert_eq!(items.count, 0);
        assert!(items.items.is_empty());
    }
}
