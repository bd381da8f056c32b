//! Jobs command implementation.

use anyhow::Result;
use ssrs_client::SsrsClient;

pub async fn run(client: &SsrsClient, cancel: Option<&str>) -> Result<()> {
    if let Some(job_id) = cancel {
        let cancelled = client.cancel_job(job_id).await?;
        if cancelled {
            println!("Job {job_id} cancelled");
        } else {
            println!("Job {job_id} had already finished");
        }
        return Ok(());
    }

    let jobs = client.list_jobs().await?;
    println!("Found {} jobs:\n", jobs.len());
    for job in jobs {
        println!("  {} {}", job.job_id, job.path);
        if let Some(status) = &job.status {
            println!("    Status: {status}");
        }
        if let Some(user) = &job.user {
            println!("    User: {user}");
        }
        if let Some(started) = &job.start_date_time {
            println!("    Started: {started}");
        }
    }
    Ok(())
}
