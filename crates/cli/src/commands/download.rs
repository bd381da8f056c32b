//! Download command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ssrs_client::{ManifestFile, SsrsClient};
use tracing::info;

pub async fn run(client: &SsrsClient, folders: &[String], target: &Path) -> Result<()> {
    info!(?folders, target = %target.display(), "downloading catalog subtrees");

    let roots: Vec<&str> = folders.iter().map(String::as_str).collect();
    let manifest = client.download(&roots).await?;

    fs::create_dir_all(target).with_context(|| format!("creating {}", target.display()))?;
    for dir in &manifest.folders {
        let path = join(target, dir);
        fs::create_dir_all(&path).with_context(|| format!("creating {}", path.display()))?;
    }
    for file in &manifest.reports {
        write_definition(target, file, Some("rdl"))?;
    }
    for file in &manifest.data_sources {
        write_definition(target, file, Some("rds"))?;
    }
    for file in &manifest.other {
        write_definition(target, file, None)?;
    }

    println!(
        "Downloaded {} reports, {} data sources and {} other items to {}",
        manifest.reports.len(),
        manifest.data_sources.len(),
        manifest.other.len(),
        target.display()
    );
    Ok(())
}

fn write_definition(target: &Path, file: &ManifestFile, extension: Option<&str>) -> Result<()> {
    let rel = match extension {
        Some(ext) => format!("{}.{ext}", file.path),
        None => file.path.clone(),
    };
    let path = join(target, &rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let definition = file.definition.as_deref().unwrap_or_default();
    fs::write(&path, definition).with_context(|| format!("writing {}", path.display()))
}

fn join(target: &Path, rel: &str) -> std::path::PathBuf {
    target.join(rel.trim_start_matches('/'))
}
