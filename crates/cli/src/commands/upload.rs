//! Upload command implementation.

use std::path::Path;

use anyhow::Result;
use ssrs_client::{SsrsClient, TracingProgress, UploadOptions};
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    client: &SsrsClient,
    source: &Path,
    target: &str,
    overwrite: bool,
    delete_existing: bool,
    keep_data_sources: bool,
    fix_references: bool,
    exclude: &[String],
) -> Result<()> {
    info!(source = %source.display(), target, "uploading folder tree");

    let options = UploadOptions {
        overwrite,
        delete_existing_items: delete_existing,
        keep_data_source: keep_data_sources,
        fix_data_source_reference: fix_references,
        exclude: exclude.to_vec(),
        ..Default::default()
    };

    let warnings = client
        .upload(source, target, &options, &TracingProgress)
        .await?;

    if warnings.is_empty() {
        println!("Upload finished without warnings");
    } else {
        println!("Upload finished with {} warnings:", warnings.len());
        for warning in &warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}
