//! Configuration loader for environment variables and `.env` files.
//!
//! Responsibilities:
//! - Load connection and credential settings from `SSRS_*` environment
//!   variables, with explicit builder overrides taking precedence.
//! - Assemble a base URL either from `SSRS_URL` or from server parts
//!   (`SSRS_SERVER`/`SSRS_PORT`/`SSRS_HTTPS`/`SSRS_INSTANCE`).
//!
//! Does NOT handle:
//! - Persisting configuration back to disk.
//! - Credential stores or keyrings; passwords come from the environment.
//!
//! Invariants:
//! - Builder overrides take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` loading.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::constants::{DEFAULT_ROOT_FOLDER, DEFAULT_TIMEOUT_SECS};
use crate::types::{AuthConfig, AuthStrategy, Config, ConnectionConfig, ServerParts};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Report server URL is required (SSRS_URL or SSRS_SERVER)")]
    MissingBaseUrl,

    #[error("Credentials are required (SSRS_USERNAME and SSRS_PASSWORD)")]
    MissingAuth,

    #[error("Failed to load .env file at {path}")]
    DotenvLoad { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loader that builds a [`Config`] from environment variables.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    root_folder: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    domain: Option<String>,
    workstation: Option<String>,
    ntlm: Option<bool>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    use_rs2012: Option<bool>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load environment variables from a `.env` file if present.
    ///
    /// If the `DOTENV_DISABLED` environment variable is set to "true" or
    /// "1", loading is skipped. A missing `.env` file is not an error.
    pub fn load_dotenv(&self) -> Result<(), ConfigError> {
        if let Ok(disabled) = std::env::var("DOTENV_DISABLED")
            && (disabled == "true" || disabled == "1")
        {
            tracing::debug!("dotenv loading disabled via DOTENV_DISABLED");
            return Ok(());
        }
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!("Loaded environment from {}", path.display());
                Ok(())
            }
            Err(err) if err.not_found() => Ok(()),
            Err(_) => Err(ConfigError::DotenvLoad {
                path: PathBuf::from(".env"),
            }),
        }
    }

    /// Override the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the catalog root folder.
    pub fn root_folder(mut self, folder: impl Into<String>) -> Self {
        self.root_folder = Some(folder.into());
        self
    }

    /// Override the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Override the password.
    pub fn password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Override the Windows domain (switches the strategy to NTLM).
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Override TLS verification.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration, reading the environment for unset values.
    pub fn load(self) -> Result<Config, ConfigError> {
        let base_url = match self.base_url.or_else(|| env_string("SSRS_URL")) {
            Some(url) => url,
            None => match env_string("SSRS_SERVER") {
                Some(server) => ServerParts {
                    server,
                    port: env_parse::<u16>("SSRS_PORT")?,
                    https: env_bool("SSRS_HTTPS")?.unwrap_or(false),
                    instance: env_string("SSRS_INSTANCE"),
                }
                .to_base_url(),
                None => return Err(ConfigError::MissingBaseUrl),
            },
        };
        let parsed = url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidValue {
            var: "SSRS_URL".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                var: "SSRS_URL".to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let username = self
            .username
            .or_else(|| env_string("SSRS_USERNAME"))
            .ok_or(ConfigError::MissingAuth)?;
        let password = self
            .password
            .or_else(|| env_string("SSRS_PASSWORD").map(|p| SecretString::new(p.into())))
            .ok_or(ConfigError::MissingAuth)?;
        let domain = self.domain.or_else(|| env_string("SSRS_DOMAIN"));
        let workstation = self.workstation.or_else(|| env_string("SSRS_WORKSTATION"));

        // NTLM is the conventional default for on-prem report servers; an
        // explicit SSRS_AUTH=basic opts out, matching the original client.
        let use_ntlm = match self.ntlm {
            Some(explicit) => explicit,
            None => !matches!(
                env_string("SSRS_AUTH").as_deref(),
                Some("basic") | Some("Basic")
            ),
        };

        let strategy = if use_ntlm {
            AuthStrategy::Ntlm {
                username,
                password,
                domain,
                workstation,
            }
        } else {
            AuthStrategy::Basic { username, password }
        };

        let timeout = match self.timeout {
            Some(t) => t,
            None => Duration::from_secs(
                env_parse::<u64>("SSRS_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        Ok(Config {
            connection: ConnectionConfig {
                base_url,
                root_folder: self
                    .root_folder
                    .or_else(|| env_string("SSRS_ROOT_FOLDER"))
                    .unwrap_or_else(|| DEFAULT_ROOT_FOLDER.to_string()),
                skip_verify: match self.skip_verify {
                    Some(skip) => skip,
                    None => env_bool("SSRS_SKIP_VERIFY")?.unwrap_or(false),
                },
                timeout,
                use_rs2012: match self.use_rs2012 {
                    Some(v) => v,
                    None => env_bool("SSRS_USE_RS2012")?.unwrap_or(false),
                },
            },
            auth: AuthConfig { strategy },
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env_string(key) {
        None => Ok(None),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                var: key.to_string(),
                message: format!("expected boolean, got '{v}'"),
            }),
        },
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env_string(key) {
        None => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|_| ConfigError::InvalidValue {
            var: key.to_string(),
            message: format!("could not parse '{v}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: &[&str] = &[
        "SSRS_URL",
        "SSRS_SERVER",
        "SSRS_PORT",
        "SSRS_HTTPS",
        "SSRS_INSTANCE",
        "SSRS_ROOT_FOLDER",
        "SSRS_USERNAME",
        "SSRS_PASSWORD",
        "SSRS_DOMAIN",
        "SSRS_WORKSTATION",
        "SSRS_AUTH",
        "SSRS_TIMEOUT_SECS",
        "SSRS_SKIP_VERIFY",
        "SSRS_USE_RS2012",
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let mut pairs: Vec<(String, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| ((*k).to_string(), None))
            .collect();
        for (k, v) in vars {
            if let Some(pair) = pairs.iter_mut().find(|(key, _)| key == k) {
                pair.1 = Some((*v).to_string());
            }
        }
        temp_env::with_vars(pairs, f);
    }

    #[test]
    fn test_load_from_url() {
        with_env(
            &[
                ("SSRS_URL", "http://reports/ReportServer"),
                ("SSRS_USERNAME", "admin"),
                ("SSRS_PASSWORD", "pw"),
            ],
            || {
                let config = ConfigLoader::new().load().unwrap();
                assert_eq!(config.connection.base_url, "http://reports/ReportServer");
                assert_eq!(config.connection.root_folder, "/");
                assert!(matches!(
                    config.auth.strategy,
                    AuthStrategy::Ntlm { .. }
                ));
            },
        );
    }

    #[test]
    fn test_load_from_server_parts() {
        with_env(
            &[
                ("SSRS_SERVER", "reports.example.com"),
                ("SSRS_HTTPS", "true"),
                ("SSRS_INSTANCE", "SQL2019"),
                ("SSRS_USERNAME", "admin"),
                ("SSRS_PASSWORD", "pw"),
            ],
            || {
                let config = ConfigLoader::new().load().unwrap();
                assert_eq!(
                    config.connection.base_url,
                    "https://reports.example.com/ReportServer_SQL2019"
                );
            },
        );
    }

    #[test]
    fn test_basic_auth_opt_out() {
        with_env(
            &[
                ("SSRS_URL", "http://reports/ReportServer"),
                ("SSRS_USERNAME", "admin"),
                ("SSRS_PASSWORD", "pw"),
                ("SSRS_AUTH", "basic"),
            ],
            || {
                let config = ConfigLoader::new().load().unwrap();
                assert!(matches!(
                    config.auth.strategy,
                    AuthStrategy::Basic { .. }
                ));
            },
        );
    }

    #[test]
    fn test_missing_url_is_an_error() {
        with_env(&[("SSRS_USERNAME", "admin"), ("SSRS_PASSWORD", "pw")], || {
            assert!(matches!(
                ConfigLoader::new().load(),
                Err(ConfigError::MissingBaseUrl)
            ));
        });
    }

    #[test]
    fn test_missing_credentials_is_an_error() {
        with_env(&[("SSRS_URL", "http://reports/ReportServer")], || {
            assert!(matches!(
                ConfigLoader::new().load(),
                Err(ConfigError::MissingAuth)
            ));
        });
    }

    #[test]
    fn test_non_http_scheme_is_an_error() {
        with_env(
            &[
                ("SSRS_URL", "ftp://reports/ReportServer"),
                ("SSRS_USERNAME", "admin"),
                ("SSRS_PASSWORD", "pw"),
            ],
            || {
                assert!(matches!(
                    ConfigLoader::new().load(),
                    Err(ConfigError::InvalidValue { .. })
                ));
            },
        );
    }

    #[test]
    fn test_builder_overrides_beat_env() {
        with_env(
            &[
                ("SSRS_URL", "http://other/ReportServer"),
                ("SSRS_USERNAME", "env-user"),
                ("SSRS_PASSWORD", "pw"),
            ],
            || {
                let config = ConfigLoader::new()
                    .base_url("http://reports/ReportServer")
                    .username("cli-user")
                    .root_folder("/Operations")
                    .load()
                    .unwrap();
                assert_eq!(config.connection.base_url, "http://reports/ReportServer");
                assert_eq!(config.connection.root_folder, "/Operations");
                match config.auth.strategy {
                    AuthStrategy::Ntlm { username, .. } => assert_eq!(username, "cli-user"),
                    other => panic!("unexpected strategy: {other:?}"),
                }
            },
        );
    }

    #[test]
    fn test_invalid_bool_rejected() {
        with_env(
            &[
                ("SSRS_URL", "http://reports/ReportServer"),
                ("SSRS_USERNAME", "admin"),
                ("SSRS_PASSWORD", "pw"),
                ("SSRS_SKIP_VERIFY", "maybe"),
            ],
            || {
                assert!(matches!(
                    ConfigLoader::new().load(),
                    Err(ConfigError::InvalidValue { .. })
                ));
            },
        );
    }
}
