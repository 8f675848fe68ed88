use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Envelope shared by every endpoint, success or failure.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub status_message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful (200 OK) response with data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            status_code: StatusCode::OK.as_u16(),
            status_message: StatusCode::OK
                .canonical_reason()
                .unwrap_or("Success")
                .to_string(),
            data: Some(data),
        }
    }

    /// Creates an error response. `data` carries diagnostics when the caller can act on them.
    pub fn failure(status: StatusCode, message: String, data: Option<T>) -> Self {
        ApiResponse {
            status_code: status.as_u16(),
            status_message: message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
