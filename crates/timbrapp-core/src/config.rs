use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// Bearer tokens expire after 8 hours, matching what the mobile clients expect.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 8;

/// Top-level config (timbrapp.toml + TIMBRAPP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimbrappConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub webpush: WebPushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding the built SPA bundle. The server falls back to
    /// index.html inside it for any non-/api route.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer tokens. Must be set in production.
    #[serde(default = "default_auth_secret")]
    pub secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_auth_secret(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

/// VAPID key pair handed to browsers subscribing for web push.
///
/// The public key is served verbatim by GET /api/webpush/vapid-public-key;
/// the private key never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebPushConfig {
    pub vapid_public_key: Option<String>,
    pub vapid_private_key: Option<String>,
    /// mailto: contact reported to push services.
    pub contact: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}
fn default_auth_secret() -> String {
    "timbrapp-dev-secret".to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.timbrapp/timbrapp.db", home)
}

impl TimbrappConfig {
    /// Load config from a TOML file with TIMBRAPP_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.timbrapp/timbrapp.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: TimbrappConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("TIMBRAPP_").split("_"))
            .extract()
            .map_err(|e| crate::error::TimbrappError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.timbrapp/timbrapp.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_sections() {
        let config: TimbrappConfig = serde_json::from_value(serde_json::json!({
            "auth": { "secret": "s3cret" }
        }))
        .unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.auth.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
        assert!(config.webpush.vapid_public_key.is_none());
    }
}
