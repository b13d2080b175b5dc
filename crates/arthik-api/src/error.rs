//! Error types for arthik-api

use arthik_core::{CoreError, ErrorCode, ErrorDetails};
use arthik_utils::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e.code() {
                ErrorCode::AccountNotFound | ErrorCode::TransactionNotFound | ErrorCode::RecurrenceNotFound => {
                    StatusCode::NOT_FOUND
                }
                ErrorCode::DuplicateEntry => StatusCode::CONFLICT,
                ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
                ErrorCode::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::IoError
                | ErrorCode::InconsistentState
                | ErrorCode::ConfigError
                | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(e) => e.to_details(),
            ApiError::BadRequest { message } => ErrorDetails::new(ErrorCode::ValidationError, message.clone()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!(target: "arthik::error", "{}", self);
        }
        (status, Json(self.details())).into_response()
    }
}
