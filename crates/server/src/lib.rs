//! A small web service demonstrating login through an OAuth2/OpenID Connect provider.
//!
//! Visitors are sent through the provider's authorization-code flow, their profile is
//! fetched from the userinfo endpoint, and a minimal user record is kept in an
//! injected [`auth::UserStore`]. Login state lives in a signed session cookie.

use std::sync::Arc;

use axum_extra::extract::cookie::Key;

use crate::auth::{IdentityProvider, UserStore};

pub mod api;
pub mod auth;
pub mod config;
pub mod error;

/// Shared resources handed to every request handler.
#[derive(Clone)]
pub struct AppResources {
    pub users: Arc<dyn UserStore>,
    pub provider: Arc<dyn IdentityProvider>,
    /// Key used to sign the session and login-state cookies.
    pub cookie_key: Key,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}
