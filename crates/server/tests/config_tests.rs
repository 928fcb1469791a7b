use config::Config;
use rust_oidc_login::config::{AppConfig, ConfigError, ProviderConfig};

fn build(yaml_content: &str) -> Config {
    Config::builder()
        .add_source(config::File::from_str(
            yaml_content,
            config::FileFormat::Yaml,
        ))
        .build()
        .expect("Failed to build config")
}

#[test]
fn test_provider_config_defaults_to_google() {
    let yaml_content = r#"
client_id: "client.apps.googleusercontent.com"
client_secret: "secret123"
"#;

    let provider: ProviderConfig = build(yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize provider config");
    assert_eq!(provider.client_id, "client.apps.googleusercontent.com");
    assert_eq!(provider.client_secret, "secret123");
    assert_eq!(
        provider.authorization_url,
        "https://accounts.google.com/o/oauth2/auth"
    );
    assert_eq!(provider.token_url, "https://accounts.google.com/o/oauth2/token");
    assert_eq!(
        provider.userinfo_url,
        "https://openidconnect.googleapis.com/v1/userinfo"
    );
    assert_eq!(provider.scopes, vec!["openid", "email", "profile"]);
    assert_eq!(provider.timeout_secs, 10);
}

#[test]
fn test_app_config_deserialization() {
    let yaml_content = r#"
bind_address: "0.0.0.0:8080"
public_url: "https://login.example.com"
session_secret: "0123456789012345678901234567890123456789012345678901234567890123"
secure_cookies: true
provider:
  client_id: "client"
  client_secret: "secret"
  authorization_url: "https://idp.example.com/authorize"
  token_url: "https://idp.example.com/token"
  userinfo_url: "https://idp.example.com/userinfo"
  scopes: ["openid", "email"]
  timeout_secs: 3
"#;

    let app_config: AppConfig = build(yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize app config");
    assert_eq!(app_config.bind_address, "0.0.0.0:8080");
    assert_eq!(
        app_config.callback_url(),
        "https://login.example.com/auth/callback"
    );
    assert!(app_config.secure_cookies);
    assert_eq!(app_config.provider.scopes, vec!["openid", "email"]);
    assert_eq!(app_config.provider.timeout_secs, 3);
    assert!(app_config.validate().is_ok());
}

#[test]
fn test_app_config_defaults() {
    let yaml_content = r#"
session_secret: "0123456789012345678901234567890123456789012345678901234567890123"
provider:
  client_id: "client"
  client_secret: "secret"
"#;

    let app_config: AppConfig = build(yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize app config");
    assert_eq!(app_config.bind_address, "127.0.0.1:5000");
    assert_eq!(
        app_config.callback_url(),
        "http://127.0.0.1:5000/auth/callback"
    );
    assert!(!app_config.secure_cookies);
}

#[test]
fn test_config_with_environment_variables() {
    let yaml_content = r#"
session_secret: "from-file-but-too-short"
provider:
  client_id: "file-client"
  client_secret: "file-secret"
"#;

    unsafe {
        std::env::set_var("OIDCTEST__SESSION_SECRET", "e".repeat(64));
        std::env::set_var("OIDCTEST__PROVIDER__CLIENT_SECRET", "env-secret");

        let config = Config::builder()
            .add_source(config::File::from_str(
                yaml_content,
                config::FileFormat::Yaml,
            ))
            .add_source(
                config::Environment::with_prefix("OIDCTEST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .expect("Failed to build config");

        let app_config: AppConfig = config.try_deserialize().expect("Failed to deserialize");

        // Environment variables override file values
        assert_eq!(app_config.session_secret, "e".repeat(64));
        assert_eq!(app_config.provider.client_secret, "env-secret");
        // Non-overridden values come from the file
        assert_eq!(app_config.provider.client_id, "file-client");
        assert!(app_config.validate().is_ok());

        std::env::remove_var("OIDCTEST__SESSION_SECRET");
        std::env::remove_var("OIDCTEST__PROVIDER__CLIENT_SECRET");
    }
}

#[test]
fn test_config_missing_credentials() {
    let invalid_yaml = r#"
session_secret: "0123456789012345678901234567890123456789012345678901234567890123"
# Missing provider section
"#;

    let result: Result<AppConfig, _> = build(invalid_yaml).try_deserialize();
    assert!(
        result.is_err(),
        "Should fail when required fields are missing"
    );
}

#[test]
fn test_validation_rejects_short_secret() {
    let yaml_content = r#"
session_secret: "short"
provider:
  client_id: "client"
  client_secret: "secret"
"#;

    let app_config: AppConfig = build(yaml_content)
        .try_deserialize()
        .expect("Failed to deserialize app config");
    let err = app_config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("session_secret"));
}

#[test]
fn test_environment_overrides_scopes_and_typed_values() {
    let yaml_content = r#"
session_secret: "0123456789012345678901234567890123456789012345678901234567890123"
provider:
  client_id: "client"
  client_secret: "secret"
"#;

    let mut vars = config::Map::new();
    vars.insert("PROVIDER__SCOPES".to_string(), "openid email".to_string());
    vars.insert("PROVIDER__TIMEOUT_SECS".to_string(), "3".to_string());
    vars.insert("SECURE_COOKIES".to_string(), "true".to_string());
    vars.insert("PROVIDER__CLIENT_ID".to_string(), "env-client".to_string());

    let app_config: AppConfig = Config::builder()
        .add_source(config::File::from_str(
            yaml_content,
            config::FileFormat::Yaml,
        ))
        .add_source(rust_oidc_login::config::environment().source(Some(vars)))
        .build()
        .expect("Failed to build config")
        .try_deserialize()
        .expect("Failed to deserialize");

    assert_eq!(app_config.provider.scopes, vec!["openid", "email"]);
    assert_eq!(app_config.provider.timeout_secs, 3);
    assert!(app_config.secure_cookies);
    assert_eq!(app_config.provider.client_id, "env-client");
    assert!(app_config.validate().is_ok());
}
