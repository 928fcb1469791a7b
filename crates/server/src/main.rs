use rust_oidc_login::AppResources;
use rust_oidc_login::api::start_webserver;
use rust_oidc_login::auth::{InMemoryUserStore, OAuthProvider};
use rust_oidc_login::config::load_config;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "rust_oidc_login=info,tower_http=info,hyper=warn";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    // A missing .env is fine; the environment may already carry the settings.
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    initialize_tracing();

    let config = load_config()?;
    let provider = OAuthProvider::from_config(&config)?;

    let resources = AppResources {
        users: Arc::new(InMemoryUserStore::new()),
        provider: Arc::new(provider),
        cookie_key: config.cookie_key()?,
        secure_cookies: config.secure_cookies,
    };
    tracing::info!(
        public_url = %config.public_url,
        callback_url = %config.callback_url(),
        scopes = ?config.provider.scopes,
        secure_cookies = config.secure_cookies,
        "Login configuration"
    );

    start_webserver(resources, &config.bind_address).await
}
