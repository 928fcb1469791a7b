//! Identity provider client.
//!
//! Builds the authorization redirect, redeems authorization codes at the token
//! endpoint and fetches the visitor's claims from the OpenID Connect userinfo endpoint.

use crate::config::{AppConfig, ConfigError};
use crate::error::{AuthExchangeError, ProfileError};
use ::oauth2::{
    AccessToken, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Profile claims returned by the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "UserInfo")]
pub struct ProfileClaims {
    /// Subject identifier.
    pub sub: String,
    pub name: String,
    pub email: String,
}

/// Raw userinfo body. OpenID Connect names the subject `sub`; Google's v1 endpoint
/// calls it `id`.
#[derive(Deserialize)]
struct UserInfo {
    sub: Option<String>,
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

impl TryFrom<UserInfo> for ProfileClaims {
    type Error = String;

    fn try_from(info: UserInfo) -> Result<Self, Self::Error> {
        let sub = info
            .sub
            .filter(|s| !s.is_empty())
            .or(info.id.filter(|s| !s.is_empty()))
            .ok_or_else(|| "missing subject identifier".to_string())?;
        let name = info
            .name
            .ok_or_else(|| "missing name claim".to_string())?;
        let email = info
            .email
            .ok_or_else(|| "missing email claim".to_string())?;
        Ok(Self { sub, name, email })
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authorization endpoint URL to redirect the visitor to, and the CSRF state it carries.
    fn authorization_url(&self) -> (Url, CsrfToken);

    /// Redeem an authorization code for an access token.
    async fn exchange_code(&self, code: AuthorizationCode)
    -> Result<AccessToken, AuthExchangeError>;

    /// Fetch the claims of the access token's subject.
    async fn fetch_profile(&self, token: &AccessToken) -> Result<ProfileClaims, ProfileError>;
}

/// [`IdentityProvider`] speaking the authorization-code grant to a configured provider.
pub struct OAuthProvider {
    client: ConfiguredClient,
    http: reqwest::Client,
    userinfo_url: Url,
    scopes: Vec<Scope>,
}

impl OAuthProvider {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let provider = &config.provider;
        let invalid = |name: &str, e: url::ParseError| {
            ConfigError::Validation(format!("{name} is not a valid URL: {e}"))
        };

        let client = BasicClient::new(ClientId::new(provider.client_id.clone()))
            .set_client_secret(ClientSecret::new(provider.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(provider.authorization_url.clone())
                    .map_err(|e| invalid("provider.authorization_url", e))?,
            )
            .set_token_uri(
                TokenUrl::new(provider.token_url.clone())
                    .map_err(|e| invalid("provider.token_url", e))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.callback_url()).map_err(|e| invalid("public_url", e))?,
            );

        // Token endpoints must not be followed across redirects.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(provider.timeout_secs))
            .build()?;

        let userinfo_url = Url::parse(&provider.userinfo_url)
            .map_err(|e| invalid("provider.userinfo_url", e))?;

        Ok(Self {
            client,
            http,
            userinfo_url,
            scopes: provider.scopes.iter().cloned().map(Scope::new).collect(),
        })
    }
}

#[async_trait]
impl IdentityProvider for OAuthProvider {
    fn authorization_url(&self) -> (Url, CsrfToken) {
        self.client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned())
            .url()
    }

    #[tracing::instrument(skip_all)]
    async fn exchange_code(
        &self,
        code: AuthorizationCode,
    ) -> Result<AccessToken, AuthExchangeError> {
        let response = self
            .client
            .exchange_code(code)
            .request_async(&self.http)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(resp) => {
                    AuthExchangeError::Rejected(resp.error().to_string())
                }
                RequestTokenError::Request(e) => AuthExchangeError::Transport(e.to_string()),
                RequestTokenError::Parse(e, _) => {
                    AuthExchangeError::Transport(format!("invalid token response: {e}"))
                }
                RequestTokenError::Other(msg) => AuthExchangeError::Transport(msg),
            })?;

        Ok(response.access_token().clone())
    }

    #[tracing::instrument(skip_all)]
    async fn fetch_profile(&self, token: &AccessToken) -> Result<ProfileClaims, ProfileError> {
        let response = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Status(status));
        }

        response.json::<ProfileClaims>().await.map_err(|e| {
            if e.is_decode() {
                ProfileError::Malformed(e.to_string())
            } else {
                ProfileError::Transport(e.to_string())
            }
        })
    }
}
