use axum::Json;
use http::StatusCode;
use rasa_auth::CoordinationError;
use serde_json::{Value, json};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Maps CoordinationError variants to status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::MissingCredentials => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                CoordinationError::Conflict(_) => StatusCode::CONFLICT,
                CoordinationError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// `{"error": "<message>"}` body used by every JSON endpoint.
pub(crate) fn json_error((status, message): (StatusCode, String)) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: CoordinationError) -> StatusCode {
        let result: Result<(), CoordinationError> = Err(err);
        match result.into_response_error() {
            Err((status, _)) => status,
            Ok(()) => panic!("Expected an error"),
        }
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            status_of(CoordinationError::MissingCredentials),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(CoordinationError::Conflict("taken".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoordinationError::ResourceNotFound {
                resource_type: "AdminUser".to_string(),
                resource_id: "1".to_string(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_backend_errors_are_internal() {
        assert_eq!(
            status_of(CoordinationError::SessionError(rasa_auth::SessionError::Storage(
                "boom".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_error_display() {
        let result: Result<(), CoordinationError> = Err(CoordinationError::InvalidCredentials);
        let (_, message) = result.into_response_error().unwrap_err();
        assert_eq!(message, "Invalid credentials");
    }

    #[test]
    fn test_success_case() {
        let result: Result<String, CoordinationError> = Ok("Success".to_string());
        assert_eq!(result.into_response_error().unwrap(), "Success");
    }

    #[test]
    fn test_json_error_body() {
        let (status, Json(body)) = json_error((StatusCode::UNAUTHORIZED, "nope".to_string()));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "nope" }));
    }
}
