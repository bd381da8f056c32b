//! List command implementation.

use anyhow::Result;
use ssrs_client::SsrsClient;
use tracing::info;

pub async fn run(client: &SsrsClient, folder: &str, recursive: bool, all: bool) -> Result<()> {
    info!(folder, recursive, "listing catalog items");

    if all {
        let items = client.list_children(folder, recursive).await?;
        println!("Found {} items:\n", items.len());
        for item in items {
            let hidden = if item.hidden { " (hidden)" } else { "" };
            println!("  [{}] {}{}", item.item_type.as_str(), item.path, hidden);
        }
    } else {
        let reports = client.get_report_list(folder, false).await?;
        println!("Found {} reports:\n", reports.len());
        for report in reports {
            println!("  {}", report.path);
        }
    }

    Ok(())
}
