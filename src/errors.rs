use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Унифицированная структура ответа об ошибке
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Backend error ({status}): {message}")]
    Backend { status: StatusCode, message: String },

    #[error("Invalid request body")]
    InvalidBody,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to save your information. Please try again later.")]
    CaptureFailed,

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ReqwestError(_)
            | AppError::JsonError(_)
            | AppError::Backend { .. }
            | AppError::CaptureFailed
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.public_message(),
            success: if status.is_server_error() {
                Some(false)
            } else {
                None
            },
        };
        HttpResponse::build(status).json(body)
    }
}

impl AppError {
    /// Текст, который уходит клиенту. Детали серверных ошибок остаются в логах.
    pub fn public_message(&self) -> String {
        match self {
            AppError::CaptureFailed => self.to_string(),
            other if other.status_code().is_server_error() => {
                log::error!("{}", other);
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}
