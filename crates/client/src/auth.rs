//! Authentication strategies for the report server.
//!
//! SSRS correlates execution state through the execution header, not a
//! bearer session, so credentials are applied per request and there is no
//! login round-trip or token lifecycle here.
//!
//! The NTLM variant carries the full Windows credential shape (domain and
//! workstation). The NTLM message exchange itself is a transport concern
//! left to whatever sits in front of the server; domain credentials are
//! sent as `DOMAIN\user` on the authorization header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};

/// Strategy for authenticating with the report server.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// HTTP Basic authentication.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Windows credentials (domain-qualified basic on the wire).
    Ntlm {
        username: String,
        password: SecretString,
        domain: Option<String>,
        workstation: Option<String>,
    },
}

impl AuthStrategy {
    /// The username as sent on the wire (domain-qualified for NTLM).
    pub fn wire_username(&self) -> String {
        match self {
            Self::Basic { username, .. } => username.clone(),
            Self::Ntlm {
                username, domain, ..
            } => match domain.as_deref().filter(|d| !d.is_empty()) {
                Some(domain) => format!("{domain}\\{username}"),
                None => username.clone(),
            },
        }
    }

    /// Value of the `Authorization` header for a request.
    pub(crate) fn authorization_value(&self) -> String {
        let password = match self {
            Self::Basic { password, .. } | Self::Ntlm { password, .. } => password.expose_secret(),
        };
        let credentials = format!("{}:{}", self.wire_username(), password);
        format!("Basic {}", BASE64.encode(credentials))
    }
}

impl From<&ssrs_config::AuthStrategy> for AuthStrategy {
    fn from(strategy: &ssrs_config::AuthStrategy) -> Self {
        match strategy {
            ssrs_config::AuthStrategy::Basic { username, password } => Self::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            ssrs_config::AuthStrategy::Ntlm {
                username,
                password,
                domain,
                workstation,
            } => Self::Ntlm {
                username: username.clone(),
                password: password.clone(),
                domain: domain.clone(),
                workstation: workstation.clone(),
            },
        }
    }
}
