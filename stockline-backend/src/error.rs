use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;

/// Error payload in the API's `{status, message}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Db(stockline_db::DbError),
    Validation(String),
    Auth(AuthError),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Db(db_err) => {
                use stockline_db::DbError;
                let status = match &db_err {
                    DbError::EmptyList(_) | DbError::NotFound(_) | DbError::DeleteNoEffect(_) => {
                        StatusCode::NOT_FOUND
                    }
                    // Update failures surface as 500, the original's convention
                    DbError::NothingToUpdate | DbError::UpdateNoEffect => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    DbError::Sqlite(_) | DbError::Connection(_) => {
                        tracing::error!(?db_err, "database error occurred");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                // The driver message is surfaced to the client, as the
                // original did. Not a hardened system.
                (status, db_err.to_string())
            }
            AppError::Validation(message) => {
                tracing::warn!(validation_error = %message, "validation failed");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Auth(auth_err) => {
                let status = match auth_err {
                    AuthError::BadCredentials => StatusCode::NOT_FOUND,
                    AuthError::SecretMissing | AuthError::Signing => {
                        tracing::error!(?auth_err, "token secret misconfiguration");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, auth_err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => {
                tracing::error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<stockline_db::DbError> for AppError {
    fn from(err: stockline_db::DbError) -> Self {
        AppError::Db(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}
