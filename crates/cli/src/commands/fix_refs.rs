//! Fix-refs command implementation.

use anyhow::Result;
use ssrs_client::{SsrsClient, TracingProgress};
use tracing::info;

pub async fn run(client: &SsrsClient, folder: &str) -> Result<()> {
    info!(folder, "fixing data source references");

    let warnings = client
        .fix_data_source_reference(folder, &TracingProgress)
        .await?;

    if warnings.is_empty() {
        println!("References fixed without warnings");
    } else {
        println!("Finished with {} warnings:", warnings.len());
        for warning in &warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}
