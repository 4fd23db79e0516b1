//! Error responses for the HTTP layer
//!
//! Every failure is a JSON body with an `error` string. Leaving a room with
//! living enemies also reports how many are left.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dungeon_core::{GenerationError, LifecycleError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Cannot leave: enemies are still alive.")]
    EnemiesAlive { enemies_alive: usize },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage(source: impl std::fmt::Display) -> Self {
        Self::Storage(source.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::EnemiesAlive { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::EnemiesAlive { enemies_alive } => Self::EnemiesAlive { enemies_alive },
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    enemies_alive: Option<usize>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
            enemies_alive: match self {
                Self::EnemiesAlive { enemies_alive } => Some(enemies_alive),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}
