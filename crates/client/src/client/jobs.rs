//! Server job control.

use crate::client::SsrsClient;
use crate::endpoints::catalog;
use crate::error::{ClientError, Result};
use crate::models::Job;

impl SsrsClient {
    /// List the jobs currently known to the server.
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        catalog::list_jobs(&self.http, &self.service_url, &self.auth).await
    }

    /// Cancel a running job. Returns whether the server actually cancelled
    /// it (`false` when it had already finished).
    pub async fn cancel_job(&self, job_id: &str) -> Result<bool> {
        if job_id.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "job id must not be empty".to_string(),
            ));
        }
        catalog::cancel_job(&self.http, &self.service_url, &self.auth, job_id).await
    }
}
