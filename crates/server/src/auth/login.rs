//! Login flow endpoints.
//!
//! - `GET /login` starts the authorization-code flow
//! - `GET /auth/callback` completes it
//! - `GET /logout` ends the session

use crate::AppResources;
use crate::auth::{AUTH_TAG, Session, UserRecord};
use crate::error::{AppError, AuthExchangeError};
use ::oauth2::{AccessToken, AuthorizationCode};
use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// Authorization code to redeem.
    pub code: Option<String>,
    /// CSRF state issued with the authorization redirect.
    pub state: Option<String>,
    /// Error code when the visitor or provider declined the request.
    pub error: Option<String>,
}

/// Creates the login flow router.
pub fn router() -> OpenApiRouter<AppResources> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(callback))
        .routes(routes!(logout))
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Start the login redirect.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/login",
    tag = AUTH_TAG,
    operation_id = "Login",
    summary = "Redirect to the identity provider",
    description = "Redirects the browser to the provider's authorization endpoint requesting the \
                   configured scopes. The CSRF state is kept in a signed cookie until the callback.",
    responses(
        (status = 302, description = "Redirect to the provider's authorization endpoint"),
    )
)]
pub async fn login(State(resources): State<AppResources>, session: Session) -> Response {
    let (url, state) = resources.provider.authorization_url();
    tracing::debug!(authorization_url = %url.origin().ascii_serialization(), "Starting login");
    (session.begin_login(state.secret()), found(url.as_str())).into_response()
}

/// Handle the provider's redirect back to us.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = AUTH_TAG,
    operation_id = "Login Callback",
    summary = "Complete the login",
    description = "Redeems the authorization code, fetches the visitor's profile, registers the user \
                   on first login and marks the session authenticated.\n\n\
                   If the code cannot be redeemed (denied, missing, state mismatch, rejected or \
                   unreachable provider) the visitor is sent home without a session.",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to the landing page"),
        (status = 500, description = "Profile fetch or user registration failed"),
    )
)]
pub async fn callback(
    State(resources): State<AppResources>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    let expected_state = session.login_state();
    let token = match redeem(&resources, expected_state.as_deref(), params).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to obtain access token");
            return Ok((session.abandon_login(), found("/")).into_response());
        }
    };

    let claims = resources.provider.fetch_profile(&token).await?;
    let user = resources
        .users
        .get_or_create(UserRecord::from(claims))
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((session.authenticate(&user.id), found("/")).into_response())
}

/// Verify the callback belongs to our login and exchange its code.
async fn redeem(
    resources: &AppResources,
    expected_state: Option<&str>,
    params: CallbackParams,
) -> Result<AccessToken, AuthExchangeError> {
    if let Some(error) = params.error {
        return Err(AuthExchangeError::Denied(error));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AuthExchangeError::MissingCode)?;
    match (params.state.as_deref(), expected_state) {
        (Some(got), Some(expected)) if got == expected => {}
        _ => return Err(AuthExchangeError::StateMismatch),
    }
    resources
        .provider
        .exchange_code(AuthorizationCode::new(code))
        .await
}

/// Log out.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/logout",
    tag = AUTH_TAG,
    operation_id = "Logout",
    summary = "End the session",
    description = "Clears the session cookie. Calling it without a session is a no-op.",
    responses(
        (status = 302, description = "Redirect to the landing page"),
    )
)]
pub async fn logout(session: Session) -> Response {
    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id = %user_id, "User logged out");
    }
    (session.logout(), found("/")).into_response()
}
