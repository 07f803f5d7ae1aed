// src/config.rs

use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_URL: &str = "https://api.imgur.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ADMIN_PATH: &str = "iamtheowner01-admin";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_DB_NAME: &str = "portfolio";

/// First path segments already taken by the public routes.
const RESERVED_PATHS: &[&str] = &[
    "gallery",
    "contact",
    "about-me",
    "delete-image",
    "add-image",
    "static",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Credentials for the refresh-token grant.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    pub api_url: Url,
    pub account_username: String,
    pub credentials: OAuthCredentials,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub db_name: String,
}

/// Process configuration, built once at startup and shared via `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_path: String,
    pub static_dir: String,
    pub image_host: ImageHostConfig,
    pub mongo: MongoConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let raw_api_url = optional("IMAGE_HOST_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&raw_api_url).map_err(|_| ConfigError::Invalid {
            key: "IMAGE_HOST_API_URL",
            value: raw_api_url.clone(),
        })?;

        let admin_path = optional("ADMIN_PATH", DEFAULT_ADMIN_PATH)
            .trim_matches('/')
            .to_string();
        let well_formed = !admin_path.is_empty()
            && admin_path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed || RESERVED_PATHS.contains(&admin_path.as_str()) {
            return Err(ConfigError::Invalid {
                key: "ADMIN_PATH",
                value: admin_path,
            });
        }

        Ok(Config {
            port,
            admin_path,
            static_dir: optional("STATIC_DIR", DEFAULT_STATIC_DIR),
            image_host: ImageHostConfig {
                api_url,
                account_username: required("ACCOUNT_USERNAME")?,
                credentials: OAuthCredentials {
                    client_id: required("CLIENT_ID")?,
                    client_secret: required("CLIENT_SECRET")?,
                    refresh_token: required("REFRESH_TOKEN")?,
                },
                timeout: Duration::from_secs(timeout_secs),
            },
            mongo: MongoConfig {
                uri: required("MONGODB_URI")?,
                db_name: optional("MONGODB_DB_NAME", DEFAULT_DB_NAME),
            },
        })
    }

    pub fn gallery_edit_path(&self) -> String {
        format!("/{}-gallery-edit", self.admin_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("CLIENT_ID", "client"),
            ("CLIENT_SECRET", "secret"),
            ("REFRESH_TOKEN", "refresh"),
            ("ACCOUNT_USERNAME", "abdur28"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.admin_path, "iamtheowner01-admin");
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.mongo.db_name, "portfolio");
        assert_eq!(config.image_host.timeout, Duration::from_secs(30));
        assert_eq!(config.image_host.api_url.as_str(), "https://api.imgur.com/");
        assert_eq!(config.gallery_edit_path(), "/iamtheowner01-admin-gallery-edit");
    }

    #[test]
    fn missing_required_variable_is_reported() {
        let mut env = base_env();
        env.remove("REFRESH_TOKEN");
        match load(&env) {
            Err(ConfigError::Missing(key)) => assert_eq!(key, "REFRESH_TOKEN"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn blank_required_variable_counts_as_missing() {
        let mut env = base_env();
        env.insert("CLIENT_ID", "   ");
        assert!(matches!(load(&env), Err(ConfigError::Missing("CLIENT_ID"))));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut env = base_env();
        env.insert("PORT", "eighty");
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut env = base_env();
        env.insert("HTTP_TIMEOUT_SECS", "0");
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn admin_path_slashes_are_stripped() {
        let mut env = base_env();
        env.insert("ADMIN_PATH", "/secret-owner/");
        let config = load(&env).unwrap();
        assert_eq!(config.admin_path, "secret-owner");
    }

    #[test]
    fn admin_path_must_be_a_free_plain_segment() {
        for value in ["gallery", "static", "owner/{id}", "owner panel", "/"] {
            let mut env = base_env();
            env.insert("ADMIN_PATH", value);
            assert!(
                matches!(
                    load(&env),
                    Err(ConfigError::Invalid {
                        key: "ADMIN_PATH",
                        ..
                    })
                ),
                "accepted ADMIN_PATH {:?}",
                value
            );
        }
    }
}
