use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure to redeem an authorization code for an access token.
///
/// Every variant is handled the same way by the callback: the visitor is sent back to
/// the landing page without a session.
#[derive(Debug, Error)]
pub enum AuthExchangeError {
    #[error("Provider denied the authorization request: {0}")]
    Denied(String),
    #[error("Callback is missing the authorization code")]
    MissingCode,
    #[error("Callback state does not match the login in progress")]
    StateMismatch,
    #[error("Provider rejected the authorization code: {0}")]
    Rejected(String),
    #[error("Token request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Userinfo request failed: {0}")]
    Transport(String),
    #[error("Userinfo endpoint returned HTTP {0}")]
    Status(StatusCode),
    #[error("Malformed userinfo response: {0}")]
    Malformed(String),
}

/// Failure of a [`UserStore`](crate::auth::UserStore) backend.
///
/// The in-memory store never fails; persistent backends report outages here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that surface to the client as a generic server error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_errors_render_as_server_error() {
        let response = AppError::from(ProfileError::Malformed("missing sub".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::from(StoreError::Unavailable("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn exchange_errors_describe_the_reason() {
        assert_eq!(
            AuthExchangeError::Rejected("invalid_grant".into()).to_string(),
            "Provider rejected the authorization code: invalid_grant"
        );
        assert_eq!(
            AuthExchangeError::StateMismatch.to_string(),
            "Callback state does not match the login in progress"
        );
    }
}
