//! Third-party login.
//!
//! Authenticates visitors through an OAuth2/OpenID Connect provider using the
//! authorization-code grant and keeps the result in a signed session cookie.
//!
//! ## Endpoints
//!
//! - `GET /login` - Redirect to the provider's authorization endpoint
//! - `GET /auth/callback` - Redeem the code, register the user, start the session
//! - `GET /logout` - End the session

pub mod identity;
pub mod login;
pub mod provider;
pub mod session;

pub use identity::{InMemoryUserStore, UserRecord, UserStore};
pub use login::router;
pub use provider::{IdentityProvider, OAuthProvider, ProfileClaims};
pub use session::Session;

/// OpenAPI tag for login endpoints
pub const AUTH_TAG: &str = "Authentication";
