//! OpenAPI/Utoipa configuration.

use crate::api::{health::MISC_TAG, profile::PROFILE_TAG};
use crate::auth::{AUTH_TAG, session::SESSION_COOKIE};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

/// Documents the signed session cookie.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Signed cookie set by `/auth/callback` after a successful login.",
            ))),
        );
    }
}

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "OIDC Login API",
        version = "1.0.0",
        description = "Login through an OAuth2/OpenID Connect provider and query the session's profile."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = AUTH_TAG, description = "Login flow endpoints"),
        (name = PROFILE_TAG, description = "Session profile endpoints")
    )
)]
pub struct ApiDoc;
