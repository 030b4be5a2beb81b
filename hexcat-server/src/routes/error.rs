//! Mapping of engine errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexcat_core::GameError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            GameError::GameNotFound(_) => StatusCode::NOT_FOUND,
            GameError::GameTerminal(_) => StatusCode::CONFLICT,
            GameError::InvalidMove { .. }
            | GameError::InvalidBoardSize(_)
            | GameError::InvalidDifficulty(_)
            | GameError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
