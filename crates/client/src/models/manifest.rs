//! Local file manifests for upload and download.
//!
//! A [`FileManifest`] mirrors a catalog subtree on disk: folders, `.rdl`
//! report definitions and `.rds` shared data sources, each addressed by a
//! catalog-style path with a leading `/` relative to the manifest root.
//!
//! # What this module does NOT handle
//! - Talking to the server. Upload/download live on the client.
//! - Parsing definition contents; blobs are carried as-is.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ClientError, Result};

/// One file or folder discovered under a manifest root.
#[derive(Debug, Clone, Default)]
pub struct ManifestFile {
    /// Item name without extension.
    pub name: String,
    /// Catalog-style path relative to the root, leading `/`, no extension.
    pub path: String,
    /// Definition content, if already read (or produced by a download).
    pub definition: Option<String>,
    /// On-disk location for lazy reads.
    pub file_path: Option<PathBuf>,
    pub overwrite: bool,
}

impl ManifestFile {
    /// Definition content, reading from disk when it was not loaded up
    /// front.
    pub fn read_definition(&self) -> Result<String> {
        if let Some(def) = &self.definition {
            return Ok(def.clone());
        }
        let path = self.file_path.as_ref().ok_or_else(|| {
            ClientError::InvalidArgument(format!("no definition or file path for '{}'", self.path))
        })?;
        fs::read_to_string(path).map_err(ClientError::Io)
    }
}

/// Collected folders and definition files under one root.
#[derive(Debug, Clone, Default)]
pub struct FileManifest {
    /// Relative folder paths, shallowest first.
    pub folders: Vec<String>,
    pub reports: Vec<ManifestFile>,
    pub data_sources: Vec<ManifestFile>,
    /// Files with other extensions, uploaded as resources.
    pub other: Vec<ManifestFile>,
}

impl FileManifest {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
            && self.reports.is_empty()
            && self.data_sources.is_empty()
            && self.other.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.reports.len() + self.data_sources.len() + self.other.len()
    }

    /// Walk `root` and classify everything beneath it.
    ///
    /// `exclude` entries are matched against the relative catalog-style
    /// path; an excluded folder drops its whole subtree. With `lazy` set,
    /// definition contents are not read here and files carry their disk
    /// path instead.
    pub fn read_dir(root: &Path, exclude: &[String], lazy: bool) -> Result<Self> {
        let mut manifest = Self::default();

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                ClientError::InvalidArgument(format!("walking '{}': {e}", root.display()))
            })?;
            let rel = relative_path(root, entry.path())?;
            if is_excluded(&rel, exclude) {
                continue;
            }

            if entry.file_type().is_dir() {
                manifest.folders.push(rel);
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let (name, bucket) = classify(&file_name);
            let path = strip_known_ext(&rel);
            let definition = if lazy {
                None
            } else {
                Some(fs::read_to_string(entry.path()).map_err(ClientError::Io)?)
            };
            let file = ManifestFile {
                name,
                path,
                definition,
                file_path: Some(entry.path().to_path_buf()),
                overwrite: false,
            };
            match bucket {
                Bucket::Report => manifest.reports.push(file),
                Bucket::DataSource => manifest.data_sources.push(file),
                Bucket::Other => manifest.other.push(file),
            }
        }

        Ok(manifest)
    }
}

enum Bucket {
    Report,
    DataSource,
    Other,
}

fn classify(file_name: &str) -> (String, Bucket) {
    let lower = file_name.to_ascii_lowercase();
    if let Some(stem) = lower.strip_suffix(".rdl") {
        (file_name[..stem.len()].to_string(), Bucket::Report)
    } else if let Some(stem) = lower.strip_suffix(".rds") {
        (file_name[..stem.len()].to_string(), Bucket::DataSource)
    } else {
        (file_name.to_string(), Bucket::Other)
    }
}

fn strip_known_ext(rel: &str) -> String {
    let lower = rel.to_ascii_lowercase();
    if lower.ends_with(".rdl") || lower.ends_with(".rds") {
        rel[..rel.len() - 4].to_string()
    } else {
        rel.to_string()
    }
}

fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        ClientError::InvalidArgument(format!(
            "'{}' is not under '{}'",
            path.display(),
            root.display()
        ))
    })?;
    let mut out = String::new();
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(out)
}

fn is_excluded(rel: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|ex| {
        let ex = if ex.starts_with('/') {
            ex.clone()
        } else {
            format!("/{ex}")
        };
        rel == ex || rel.starts_with(&format!("{ex}/"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sales/Archive")).unwrap();
        fs::write(dir.path().join("Sales/Revenue.rdl"), "<Report/>").unwrap();
        fs::write(dir.path().join("Warehouse.rds"), "<DataSource/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        dir
    }

    #[test]
    fn test_read_dir_classifies_by_extension() {
        let dir = scaffold();
        let manifest = FileManifest::read_dir(dir.path(), &[], false).unwrap();

        assert_eq!(manifest.folders, vec!["/Sales", "/Sales/Archive"]);
        assert_eq!(manifest.reports.len(), 1);
        assert_eq!(manifest.reports[0].name, "Revenue");
        assert_eq!(manifest.reports[0].path, "/Sales/Revenue");
        assert_eq!(
            manifest.reports[0].definition.as_deref(),
            Some("<Report/>")
        );
        assert_eq!(manifest.data_sources.len(), 1);
        assert_eq!(manifest.data_sources[0].path, "/Warehouse");
        assert_eq!(manifest.other.len(), 1);
        assert_eq!(manifest.other[0].name, "notes.txt");
    }

    #[test]
    fn test_read_dir_lazy_defers_reading() {
        let dir = scaffold();
        let manifest = FileManifest::read_dir(dir.path(), &[], true).unwrap();
        let report = &manifest.reports[0];
        assert!(report.definition.is_none());
        assert_eq!(report.read_definition().unwrap(), "<Report/>");
    }

    #[test]
    fn test_read_dir_excludes_subtrees() {
        let dir = scaffold();
        let manifest =
            FileManifest::read_dir(dir.path(), &["/Sales".to_string()], false).unwrap();
        assert!(manifest.folders.is_empty());
        assert!(manifest.reports.is_empty());
        assert_eq!(manifest.data_sources.len(), 1);
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Upper.RDL"), "<Report/>").unwrap();
        let manifest = FileManifest::read_dir(dir.path(), &[], false).unwrap();
        assert_eq!(manifest.reports.len(), 1);
        assert_eq!(manifest.reports[0].path, "/Upper");
    }
}
