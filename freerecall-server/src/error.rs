use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use freerecall_core::CoreError;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Core(CoreError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Core(CoreError::Storage(_)) | AppError::Core(CoreError::Scoring(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}
