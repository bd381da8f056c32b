//! Extensions command implementation.

use anyhow::Result;
use ssrs_client::SsrsClient;

pub async fn run(client: &SsrsClient) -> Result<()> {
    let extensions = client.list_rendering_extensions().await?;
    println!("Found {} rendering extensions:\n", extensions.len());
    for extension in extensions {
        let visible = if extension.visible { "" } else { " (hidden)" };
        let label = extension.localized_name.unwrap_or_default();
        println!("  {:<16} {label}{visible}", extension.name);
    }
    Ok(())
}
