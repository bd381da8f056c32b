//! High-level report server client.
//!
//! [`SsrsClient`] binds the two service endpoints, the credentials and the
//! catalog cache together. Operation groups live in submodules: catalog
//! management, report execution, URL-based rendering, job control and the
//! folder sync engine.

mod builder;
mod cache;
mod catalog;
mod execution;
mod jobs;
mod sync;
mod url;

pub use builder::SsrsClientBuilder;
pub use sync::{ProgressSink, TracingProgress, UploadOptions};
pub use url::render_url;

use ssrs_config::Config;

use crate::auth::AuthStrategy;
use crate::client::cache::CatalogCache;
use crate::error::Result;

/// Client for one report server.
///
/// Cheap to clone is not a goal here; share it behind an `Arc` when
/// several tasks need it. All operations take `&self`, including report
/// execution, whose per-call session state lives in
/// [`crate::models::ExecutionSession`] values rather than in the client.
pub struct SsrsClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) service_url: String,
    pub(crate) execution_url: String,
    pub(crate) auth: AuthStrategy,
    pub(crate) root_folder: String,
    pub(crate) cache: CatalogCache,
}

impl SsrsClient {
    pub fn builder() -> SsrsClientBuilder {
        SsrsClientBuilder::new()
    }

    /// Build a client straight from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        SsrsClientBuilder::from_config(config).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn execution_url(&self) -> &str {
        &self.execution_url
    }

    pub fn root_folder(&self) -> &str {
        &self.root_folder
    }

    /// Resolve a possibly relative item path against the root folder.
    ///
    /// Paths already under the root pass through unchanged, so qualified
    /// paths can be fed back in safely.
    pub fn qualify(&self, path: &str) -> String {
        let root = self.root_folder.trim_end_matches('/');
        if path.starts_with(&self.root_folder) && !self.root_folder.is_empty() {
            return path.to_string();
        }
        format!("{root}/{}", path.trim_start_matches('/'))
    }

    /// Drop every cached catalog listing.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl std::fmt::Debug for SsrsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsrsClient")
            .field("base_url", &self.base_url)
            .field("root_folder", &self.root_folder)
            .finish_non_exhaustive()
    }
}
