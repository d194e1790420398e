use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Text recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Text detection failed: {0}")]
    Detection(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    /// The request body overran the limit before the file was fully read
    #[error("Upload too large (max: {max} bytes)")]
    UploadTooLarge { max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptureError {
    /// Stable machine-readable code returned in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            CaptureError::Decode(_) => "DECODE_ERROR",
            CaptureError::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
            CaptureError::Detection(_) => "DETECTION_ERROR",
            CaptureError::ImageTooLarge { .. } | CaptureError::UploadTooLarge { .. } => {
                "IMAGE_TOO_LARGE"
            }
            CaptureError::MissingFile => "MISSING_FILE",
            CaptureError::InvalidRequest(_) => "INVALID_REQUEST",
            CaptureError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CaptureError::Decode(_) => StatusCode::BAD_REQUEST,
            CaptureError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CaptureError::Detection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CaptureError::ImageTooLarge { .. } | CaptureError::UploadTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            CaptureError::MissingFile => StatusCode::BAD_REQUEST,
            CaptureError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CaptureError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
