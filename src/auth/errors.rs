use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::{dto::MessageResponse, repo::StoreError};

/// Failures of the register/login flows, as seen by the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    DuplicateEmail,
    /// Used for both unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("internal failure: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AuthError::DuplicateEmail => "Email is already registered",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            error!(error = %e, "auth request failed");
        }
        let body = MessageResponse {
            message: self.public_message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
