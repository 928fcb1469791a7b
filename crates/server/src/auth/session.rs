//! Explicit session context.
//!
//! Login state is kept client-side in signed cookies:
//! - `session` holds the authenticated user's id
//! - `oauth_state` holds the CSRF state of a login in progress
//!
//! A cookie with an invalid signature is treated as absent.

use crate::AppResources;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_STATE_COOKIE: &str = "oauth_state";

/// How long a login may take between the redirect and the callback.
const LOGIN_STATE_MAX_AGE: time::Duration = time::Duration::minutes(10);

/// Session state of the current request, passed explicitly to handlers.
///
/// Transitions consume the session and return the cookie jar to attach to the response.
pub struct Session {
    jar: SignedCookieJar,
    secure: bool,
}

impl FromRequestParts<AppResources> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppResources,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            jar: SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone()),
            secure: state.secure_cookies,
        })
    }
}

impl Session {
    /// Id of the authenticated user, if any.
    pub fn user_id(&self) -> Option<String> {
        self.jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|id| !id.is_empty())
    }

    /// CSRF state issued by the login in progress, if any.
    pub fn login_state(&self) -> Option<String> {
        self.jar
            .get(LOGIN_STATE_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|state| !state.is_empty())
    }

    /// Remember the CSRF state of a new login.
    pub fn begin_login(self, state: &str) -> SignedCookieJar {
        let mut cookie = self.cookie(LOGIN_STATE_COOKIE, state.to_string());
        cookie.set_max_age(LOGIN_STATE_MAX_AGE);
        self.jar.add(cookie)
    }

    /// Drop the login in progress, leaving the session as it was.
    pub fn abandon_login(self) -> SignedCookieJar {
        self.jar.remove(removal(LOGIN_STATE_COOKIE))
    }

    /// Mark the session authenticated for `user_id`.
    pub fn authenticate(self, user_id: &str) -> SignedCookieJar {
        let cookie = self.cookie(SESSION_COOKIE, user_id.to_string());
        self.jar
            .remove(removal(LOGIN_STATE_COOKIE))
            .add(cookie)
    }

    /// Clear the authenticated-session marker.
    pub fn logout(self) -> SignedCookieJar {
        self.jar.remove(removal(SESSION_COOKIE))
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}
