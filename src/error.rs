use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    permission::PermissionDenied, policy::RoleAssignmentError, repository::RepositoryError,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authorize required in this request")]
    MissingToken,

    #[error("Unsupported token type")]
    UnsupportedTokenType,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token subject does not exist")]
    UnknownSubject(i64),

    #[error("Forbidden")]
    PermissionDenied(#[from] PermissionDenied),

    #[error("Forbidden")]
    RoleAssignment(#[from] RoleAssignmentError),

    #[error("User with id {0} not found")]
    UserNotFound(i64),

    #[error("Internal Server Error")]
    Repository(#[from] RepositoryError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::MissingToken | Self::UnsupportedTokenType | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::UnknownSubject(user_id) => {
                tracing::info!("Rejected a valid token for missing user {user_id}");
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied(e) => {
                tracing::info!("{e}");
                StatusCode::FORBIDDEN
            }
            Self::RoleAssignment(e) => {
                tracing::info!("Role assignment rejected: {e}");
                StatusCode::FORBIDDEN
            }
            Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(e) => {
                tracing::error!("{e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Internal(e) => {
                tracing::error!("{e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let timestamp = chrono::Utc::now().timestamp();

        (
            status,
            Json(json!({
                "error": self.to_string(),
                "timestamp": timestamp
            })),
        )
            .into_response()
    }
}

pub type Result<T> = core::result::Result<T, AppError>;
