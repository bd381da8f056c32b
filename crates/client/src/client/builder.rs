//! Client construction.

use std::time::Duration;

use ssrs_config::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_REDIRECTS, DEFAULT_ROOT_FOLDER, DEFAULT_TIMEOUT_SECS,
    REPORT_EXECUTION_PATH, REPORT_SERVICE_2010_PATH, REPORT_SERVICE_2012_PATH,
};
use ssrs_config::Config;

use crate::auth::AuthStrategy;
use crate::client::cache::CatalogCache;
use crate::client::SsrsClient;
use crate::error::{ClientError, Result};

/// Builder for [`SsrsClient`].
#[derive(Debug, Clone)]
pub struct SsrsClientBuilder {
    base_url: Option<String>,
    auth: Option<AuthStrategy>,
    root_folder: String,
    timeout: Duration,
    skip_verify: bool,
    use_rs2012: bool,
    cache_capacity: u64,
}

impl Default for SsrsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: None,
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            skip_verify: false,
            use_rs2012: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SsrsClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: Some(config.connection.base_url.clone()),
            auth: Some(AuthStrategy::from(&config.auth.strategy)),
            root_folder: config.connection.root_folder.clone(),
            timeout: config.connection.timeout,
            skip_verify: config.connection.skip_verify,
            use_rs2012: config.connection.use_rs2012,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Report server base URL, e.g. `http://reports.corp:80/ReportServer`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Folder that unqualified item paths are resolved against.
    pub fn root_folder(mut self, folder: impl Into<String>) -> Self {
        self.root_folder = folder.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates. Only for servers with self-signed
    /// certificates on trusted networks.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Target the 2012 catalog endpoint path instead of 2010.
    pub fn use_rs2012(mut self, use_rs2012: bool) -> Self {
        self.use_rs2012 = use_rs2012;
        self
    }

    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<SsrsClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidArgument("base URL is required".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(base_url));
        }
        let auth = self
            .auth
            .ok_or_else(|| ClientError::InvalidArgument("credentials are required".to_string()))?;

        let service_path = if self.use_rs2012 {
            REPORT_SERVICE_2012_PATH
        } else {
            REPORT_SERVICE_2010_PATH
        };

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .danger_accept_invalid_certs(self.skip_verify)
            .build()?;

        let root_folder = if self.root_folder.is_empty() {
            DEFAULT_ROOT_FOLDER.to_string()
        } else {
            self.root_folder
        };

        Ok(SsrsClient {
            http,
            service_url: format!("{base_url}{service_path}"),
            execution_url: format!("{base_url}{REPORT_EXECUTION_PATH}"),
            base_url,
            auth,
            root_folder,
            cache: CatalogCache::new(self.cache_capacity),
        })
    }
}
