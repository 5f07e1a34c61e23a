use authkit_session::{CoordinationError, ProviderError};
use http::{Result as HttpResponse, StatusCode};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Maps CoordinationError variants to status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                CoordinationError::Unauthenticated => StatusCode::UNAUTHORIZED,
                CoordinationError::Upstream(ProviderError::Unauthorized(_)) => {
                    StatusCode::UNAUTHORIZED
                }
                CoordinationError::Seal(err) if err.is_invalid_session() => {
                    StatusCode::UNAUTHORIZED
                }
                CoordinationError::OAuth(_) => StatusCode::BAD_REQUEST,
                CoordinationError::MissingCode => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidState(_) => StatusCode::BAD_REQUEST,
                CoordinationError::Upstream(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResponse<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}
