//! Folder synchronization: bulk upload, bulk download and data source
//! reference repair.
//!
//! Upload is best-effort: one unpublishable report must not abort a
//! deployment of two hundred. Per-item failures are collected as
//! [`Warning`]s and returned; only failures that make the whole run
//! meaningless (an unreadable local tree, a dead server) surface as
//! errors.
//!
//! # Invariants
//! - Upload order is fixed: target folder, deletions, folders, data
//!   sources, reports, reference repair. Later stages depend on the
//!   earlier ones existing on the server.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::client::SsrsClient;
use crate::client::catalog::split_path;
use crate::error::{ClientError, Result, Warning};
use crate::models::{
    DataSourceDefinition, DataSourceOverride, FileManifest, ItemReference, ItemType, ManifestFile,
};

/// Receiver for per-item progress during bulk operations.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, current: usize, total: usize, message: &str);
}

/// Default sink that reports progress through the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn progress(&self, current: usize, total: usize, message: &str) {
        info!("[{current}/{total}] {message}");
    }
}

/// Options for [`SsrsClient::upload`].
#[derive(Default)]
pub struct UploadOptions {
    /// Overwrite items that already exist.
    pub overwrite: bool,
    /// Delete everything under the target folder first.
    pub delete_existing_items: bool,
    /// When deleting, keep existing shared data sources.
    pub keep_data_source: bool,
    /// Rebind uploaded reports to the uploaded data sources afterwards.
    pub fix_data_source_reference: bool,
    /// Relative paths to skip; a folder entry skips its subtree.
    pub exclude: Vec<String>,
    /// Per-data-source overrides, keyed by data source name.
    pub data_source_options: HashMap<String, DataSourceOverride>,
    /// Extra in-memory items uploaded alongside the local tree.
    pub include: FileManifest,
}

impl SsrsClient {
    /// Upload a local folder tree into a catalog folder.
    ///
    /// Returns the warnings collected along the way; an empty vector
    /// means a clean run.
    pub async fn upload(
        &self,
        local_root: &Path,
        target_folder: &str,
        options: &UploadOptions,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Warning>> {
        let mut manifest = FileManifest::read_dir(local_root, &options.exclude, false)?;
        merge_manifest(&mut manifest, &options.include);
        self.upload_manifest(manifest, target_folder, options, progress)
            .await
    }

    /// Upload an already-assembled manifest into a catalog folder.
    pub async fn upload_manifest(
        &self,
        manifest: FileManifest,
        target_folder: &str,
        options: &UploadOptions,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Warning>> {
        let target = self.qualify(target_folder);
        let total = manifest.len() + 1;
        let mut current = 0usize;
        let mut warnings = Vec::new();

        // Stage 1: the target folder itself. Creation failing because the
        // folder already exists is the common case, not a problem.
        current += 1;
        progress.progress(current, total, &format!("ensure folder {target}"));
        let (parent, name) = split_path(&target);
        if let Err(e) = self.create_folder(name, parent).await {
            warnings.push(Warning::new(format!("create folder {target}"), &e));
        }

        // Stage 2: optional clean slate.
        if options.delete_existing_items {
            self.delete_children(&target, options.keep_data_source, &mut warnings)
                .await?;
        }

        // Stage 3: subfolders, shallowest first so parents exist.
        for folder in &manifest.folders {
            current += 1;
            let remote = remote_join(&target, folder);
            progress.progress(current, total, &format!("create folder {remote}"));
            let (parent, name) = split_path(&remote);
            if let Err(e) = self.create_folder(name, parent).await {
                warnings.push(Warning::new(format!("create folder {remote}"), &e));
            }
        }

        // Stage 4: shared data sources, recording name -> remote path for
        // the reference fixup.
        let mut reference_map: HashMap<String, String> = HashMap::new();
        for file in &manifest.data_sources {
            current += 1;
            let remote = remote_join(&target, &file.path);
            progress.progress(current, total, &format!("create data source {remote}"));
            match self
                .upload_data_source(&target, file, options)
                .await
            {
                Ok(path) => {
                    let name = path.rsplit('/').next().unwrap_or(&path).to_lowercase();
                    reference_map.insert(name, path);
                }
                Err(e) => warnings.push(Warning::new(format!("create data source {remote}"), &e)),
            }
        }
        // Data sources declared only in the options have no backing file;
        // they are created from the override at the target root and join
        // the reference map.
        for (name, overrides) in &options.data_source_options {
            let key = name.to_lowercase();
            if reference_map.contains_key(&key) {
                continue;
            }
            let remote = remote_join(&target, &format!("/{name}"));
            info!("create additional data source {remote}");
            match self
                .create_data_source(name, &target, true, &overrides.to_definition(), false)
                .await
            {
                Ok(info) => {
                    reference_map.insert(key, info.path);
                }
                Err(e) => warnings.push(Warning::new(format!("create data source {remote}"), &e)),
            }
        }

        // Stage 5: reports.
        let mut report_paths = Vec::new();
        for file in &manifest.reports {
            current += 1;
            let remote = remote_join(&target, &file.path);
            progress.progress(current, total, &format!("create report {remote}"));
            let overwrite = file.overwrite || options.overwrite;
            match self.upload_report(&target, file, overwrite).await {
                Ok(path) => report_paths.push(path),
                Err(e) => warnings.push(Warning::new(format!("create report {remote}"), &e)),
            }
        }

        // Stage 6: other files go up as plain resources.
        for file in &manifest.other {
            current += 1;
            let remote = remote_join(&target, &file.path);
            progress.progress(current, total, &format!("create resource {remote}"));
            let overwrite = file.overwrite || options.overwrite;
            if let Err(e) = self.upload_resource(&target, file, overwrite).await {
                warnings.push(Warning::new(format!("create resource {remote}"), &e));
            }
        }

        if options.fix_data_source_reference {
            let mut fixes = self
                .set_references(&report_paths, &reference_map, progress)
                .await;
            warnings.append(&mut fixes);
        }

        self.clear_cache();
        Ok(warnings)
    }

    async fn delete_children(
        &self,
        folder: &str,
        keep_data_source: bool,
        warnings: &mut Vec<Warning>,
    ) -> Result<()> {
        let children = self.list_children(folder, true).await?;
        for child in children {
            if keep_data_source && child.item_type == ItemType::DataSource {
                continue;
            }
            if let Err(e) = self.delete_item(&child.path).await {
                warnings.push(Warning::new(format!("delete {}", child.path), &e));
            }
        }
        Ok(())
    }

    async fn upload_data_source(
        &self,
        target: &str,
        file: &ManifestFile,
        options: &UploadOptions,
    ) -> Result<String> {
        let rds = file.read_definition()?;
        let overrides = options
            .data_source_options
            .get(&file.name)
            .cloned()
            .unwrap_or_default();
        let (name, definition) = DataSourceDefinition::from_rds(&rds, &file.name, &overrides);

        let remote = remote_join(target, &file.path);
        let (parent, _) = split_path(&remote);
        let overwrite = file.overwrite || options.overwrite;
        let info = self
            .create_data_source(&name, parent, overwrite, &definition, false)
            .await?;
        Ok(info.path)
    }

    async fn upload_report(
        &self,
        target: &str,
        file: &ManifestFile,
        overwrite: bool,
    ) -> Result<String> {
        let definition = file.read_definition()?;
        let remote = remote_join(target, &file.path);
        let (parent, name) = split_path(&remote);
        let info = self
            .create_report(name, parent, overwrite, definition.as_bytes(), false)
            .await?;
        Ok(info.path)
    }

    async fn upload_resource(
        &self,
        target: &str,
        file: &ManifestFile,
        overwrite: bool,
    ) -> Result<String> {
        let content = file.read_definition()?;
        let remote = remote_join(target, &file.path);
        let (parent, name) = split_path(&remote);
        let info = self
            .create_resource(name, parent, overwrite, content.as_bytes(), None)
            .await?;
        Ok(info.path)
    }

    /// Download catalog subtrees into one manifest, definitions included.
    ///
    /// Unlike upload, a failed definition fetch aborts the download; a
    /// partial tree on disk is worse than no tree.
    pub async fn download(&self, folders: &[&str]) -> Result<FileManifest> {
        let mut manifest = FileManifest::default();
        for folder in folders {
            let folder = self.qualify(folder);
            let items = self.list_children(&folder, true).await?;

            for item in items {
                let rel = relative_to(&folder, &item.path);
                if item.item_type == ItemType::Folder {
                    manifest.folders.push(rel);
                    continue;
                }
                let definition = self.get_item_definition(&item.path).await?;
                let file = ManifestFile {
                    name: item.name,
                    path: rel,
                    definition: Some(definition),
                    file_path: None,
                    overwrite: false,
                };
                match item.item_type {
                    ItemType::Report | ItemType::ReportItem => manifest.reports.push(file),
                    ItemType::DataSource => manifest.data_sources.push(file),
                    _ => manifest.other.push(file),
                }
            }
        }
        Ok(manifest)
    }

    /// Rebind every report under a folder to the shared data sources
    /// found in the same subtree.
    pub async fn fix_data_source_reference(
        &self,
        folder: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Warning>> {
        let folder = self.qualify(folder);
        let items = self.list_children(&folder, true).await?;

        let mut reference_map = HashMap::new();
        let mut report_paths = Vec::new();
        for item in &items {
            match item.item_type {
                ItemType::DataSource => {
                    reference_map.insert(item.name.to_lowercase(), item.path.clone());
                }
                ItemType::Report | ItemType::ReportItem => report_paths.push(item.path.clone()),
                _ => {}
            }
        }

        Ok(self
            .set_references(&report_paths, &reference_map, progress)
            .await)
    }

    /// Rebind a list of reports against a name -> remote path map,
    /// collecting per-report failures.
    pub async fn set_references(
        &self,
        report_paths: &[String],
        reference_map: &HashMap<String, String>,
        progress: &dyn ProgressSink,
    ) -> Vec<Warning> {
        let total = report_paths.len();
        let mut warnings = Vec::new();

        for (index, path) in report_paths.iter().enumerate() {
            progress.progress(index + 1, total, &format!("fix references for {path}"));
            match self.set_data_source_reference(path, reference_map).await {
                Ok(None) => {}
                Ok(Some(notice)) => info!("{notice}"),
                Err(e) => {
                    warn!(path, error = %e, "reference fixup failed");
                    warnings.push(Warning::new(format!("fix references for {path}"), &e));
                }
            }
        }
        warnings
    }

    /// Rebind one report's data sources by name.
    ///
    /// Returns `Ok(Some(notice))` when the report has bindings but none
    /// match the map; that is informational, not a failure.
    pub async fn set_data_source_reference(
        &self,
        report_path: &str,
        reference_map: &HashMap<String, String>,
    ) -> Result<Option<String>> {
        let path = self.qualify(report_path);
        let bindings = self.get_item_data_sources(&path).await?;
        if bindings.is_empty() {
            return Ok(None);
        }

        let references: Vec<ItemReference> = bindings
            .iter()
            .filter_map(|binding| {
                reference_map
                    .get(&strip_ext_ci(&binding.name).to_lowercase())
                    .map(|remote| ItemReference {
                        name: binding.name.clone(),
                        reference: strip_ext_ci(remote),
                    })
            })
            .collect();

        if references.is_empty() {
            return Ok(Some(format!("No compatible datasources found for {path}")));
        }
        self.set_item_data_sources(&path, &references).await?;
        Ok(None)
    }
}

fn merge_manifest(manifest: &mut FileManifest, include: &FileManifest) {
    manifest.folders.extend(include.folders.iter().cloned());
    manifest.reports.extend(include.reports.iter().cloned());
    manifest
        .data_sources
        .extend(include.data_sources.iter().cloned());
    manifest.other.extend(include.other.iter().cloned());
}

/// Join a catalog folder and a `/`-prefixed relative path.
fn remote_join(folder: &str, rel: &str) -> String {
    format!(
        "{}/{}",
        folder.trim_end_matches('/'),
        rel.trim_start_matches('/')
    )
}

/// Catalog path relative to a folder, keeping the leading `/`.
fn relative_to(folder: &str, path: &str) -> String {
    match path.strip_prefix(folder.trim_end_matches('/')) {
        Some(rel) if !rel.is_empty() => rel.to_string(),
        _ => path.to_string(),
    }
}

/// Strip a trailing `.rds`/`.rdl` regardless of case.
fn strip_ext_ci(path: &str) -> String {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".rds") || lower.ends_with(".rdl") {
        path[..path.len() - 4].to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_join() {
        assert_eq!(remote_join("/Reports", "/Sales/Revenue"), "/Reports/Sales/Revenue");
        assert_eq!(remote_join("/", "/Revenue"), "/Revenue");
        assert_eq!(remote_join("/Reports/", "Revenue"), "/Reports/Revenue");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/Reports", "/Reports/Sales/Revenue"), "/Sales/Revenue");
        assert_eq!(relative_to("/", "/Revenue"), "/Revenue");
    }

    #[test]
    fn test_strip_ext_ci() {
        assert_eq!(strip_ext_ci("/Data/Warehouse.rds"), "/Data/Warehouse");
        assert_eq!(strip_ext_ci("/Data/Warehouse.RDS"), "/Data/Warehouse");
        assert_eq!(strip_ext_ci("/Data/Warehouse"), "/Data/Warehouse");
    }

    #[test]
    fn test_merge_manifest() {
        let mut base = FileManifest::default();
        base.folders.push("/A".to_string());
        let mut extra = FileManifest::default();
        extra.reports.push(ManifestFile {
            name: "Inline".to_string(),
            path: "/Inline".to_string(),
            definition: Some("<Report/>".to_string()),
            file_path: None,
            overwrite: true,
        });
        merge_manifest(&mut base, &extra);
        assert_eq!(base.len(), 2);
    }
}
