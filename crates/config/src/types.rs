//! Configuration types for the SSRS client.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROOT_FOLDER, DEFAULT_TIMEOUT_SECS};

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Strategy for authenticating with the report server.
///
/// The NTLM variant carries the full Windows credential shape
/// (domain and workstation); the message-level negotiation itself is a
/// transport concern and is not implemented here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// HTTP Basic authentication.
    #[serde(rename = "basic")]
    Basic {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
    /// Windows credentials. The username is sent domain-qualified
    /// (`DOMAIN\user`) on the authorization header.
    #[serde(rename = "ntlm")]
    Ntlm {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
        #[serde(default)]
        domain: Option<String>,
        #[serde(default)]
        workstation: Option<String>,
    },
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The authentication strategy to use.
    #[serde(flatten)]
    pub strategy: AuthStrategy,
}

/// Server address given as parts instead of a full URL.
///
/// Expands to `http(s)://server[:port]/ReportServer[_instance]`, matching
/// how report server virtual directories are conventionally laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerParts {
    pub server: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub https: bool,
    /// Named instance suffix, e.g. `SQL2019` for `/ReportServer_SQL2019`.
    #[serde(default)]
    pub instance: Option<String>,
}

impl ServerParts {
    /// Assemble the report server base URL from the parts.
    pub fn to_base_url(&self) -> String {
        let scheme = if self.https { "https" } else { "http" };
        let port = self.port.map(|p| format!(":{p}")).unwrap_or_default();
        let instance = self
            .instance
            .as_deref()
            .map(|i| format!("_{i}"))
            .unwrap_or_default();
        format!("{scheme}://{}{port}/ReportServer{instance}", self.server)
    }
}

impl fmt::Display for ServerParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base_url())
    }
}

/// Connection configuration for the report server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the report server virtual directory,
    /// e.g. `http://reports.example.com/ReportServer`.
    pub base_url: String,
    /// Root folder of the catalog that report paths are resolved against.
    pub root_folder: String,
    /// Whether to skip TLS verification (for self-signed certificates).
    pub skip_verify: bool,
    /// Connection timeout (serialized as seconds).
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Use the `ReportService2012` contract endpoint instead of 2010.
    pub use_rs2012: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_rs2012: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings.
    pub connection: ConnectionConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
}

impl Config {
    /// Create a config with basic credentials; useful in tests.
    pub fn with_basic_auth(base_url: String, username: String, password: SecretString) -> Self {
        Self {
            connection: ConnectionConfig {
                base_url,
                ..ConnectionConfig::default()
            },
            auth: AuthConfig {
                strategy: AuthStrategy::Basic { username, password },
            },
        }
    }
}
