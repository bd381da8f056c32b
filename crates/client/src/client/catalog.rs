//! Catalog management methods.

use chrono::Local;
use tracing::debug;

use crate::client::SsrsClient;
use crate::endpoints::catalog;
use crate::endpoints::url_encoding::encode_component;
use crate::error::Result;
use crate::models::{
    CatalogItem, ConnectionTest, DataSourceDefinition, ItemInfo, ItemReference, ItemReferenceData,
    Job, Property, ReportParameter,
};

impl SsrsClient {
    /// List the items under a folder.
    pub async fn list_children(&self, folder: &str, recursive: bool) -> Result<Vec<CatalogItem>> {
        let folder = self.qualify(folder);
        catalog::list_children(&self.http, &self.service_url, &self.auth, &folder, recursive).await
    }

    /// List the visible reports under a folder, served from cache when
    /// possible.
    ///
    /// Visibility follows the `Hidden` item property: only items whose
    /// property value is exactly `False` are listed. A missing or
    /// unreadable property hides the item.
    pub async fn get_report_list(
        &self,
        folder: &str,
        force_refresh: bool,
    ) -> Result<Vec<CatalogItem>> {
        let folder = self.qualify(folder);
        if !force_refresh
            && let Some(cached) = self.cache.get(&folder).await
        {
            debug!(folder, "report list served from cache");
            return Ok(cached.as_ref().clone());
        }

        let children =
            catalog::list_children(&self.http, &self.service_url, &self.auth, &folder, false)
                .await?;
        let mut reports = Vec::new();
        for child in children {
            if !child.item_type.is_report() {
                continue;
            }
            let properties = catalog::get_properties(
                &self.http,
                &self.service_url,
                &self.auth,
                &child.path,
                &["Hidden"],
            )
            .await?;
            let visible = properties
                .iter()
                .any(|p| p.name == "Hidden" && p.value == "False");
            if visible {
                reports.push(child);
            }
        }

        self.cache.insert(folder, reports.clone()).await;
        Ok(reports)
    }

    pub async fn get_properties(&self, path: &str, names: &[&str]) -> Result<Vec<Property>> {
        let path = self.qualify(path);
        catalog::get_properties(&self.http, &self.service_url, &self.auth, &path, names).await
    }

    pub async fn set_properties(&self, path: &str, properties: &[Property]) -> Result<()> {
        let path = self.qualify(path);
        catalog::set_properties(&self.http, &self.service_url, &self.auth, &path, properties)
            .await?;
        self.cache.clear();
        Ok(())
    }

    /// Fetch an item's definition (RDL for reports, the data source XML
    /// for shared data sources).
    pub async fn get_item_definition(&self, path: &str) -> Result<String> {
        let path = self.qualify(path);
        catalog::get_item_definition(&self.http, &self.service_url, &self.auth, &path).await
    }

    pub async fn delete_item(&self, path: &str) -> Result<()> {
        let path = self.qualify(path);
        catalog::delete_item(&self.http, &self.service_url, &self.auth, &path).await?;
        self.cache.clear();
        Ok(())
    }

    pub async fn create_folder(&self, name: &str, parent: &str) -> Result<ItemInfo> {
        let parent = self.qualify(parent);
        let info =
            catalog::create_folder(&self.http, &self.service_url, &self.auth, name, &parent)
                .await?;
        self.cache.clear();
        Ok(info)
    }

    pub async fn create_data_source(
        &self,
        name: &str,
        parent: &str,
        overwrite: bool,
        definition: &DataSourceDefinition,
        hidden: bool,
    ) -> Result<ItemInfo> {
        let parent = self.qualify(parent);
        let info = catalog::create_data_source(
            &self.http,
            &self.service_url,
            &self.auth,
            name,
            &parent,
            overwrite,
            definition,
            hidden,
        )
        .await?;
        self.cache.clear();
        Ok(info)
    }

    pub async fn create_report(
        &self,
        name: &str,
        parent: &str,
        overwrite: bool,
        definition: &[u8],
        hidden: bool,
    ) -> Result<ItemInfo> {
        let parent = self.qualify(parent);
        let info = catalog::create_report(
            &self.http,
            &self.service_url,
            &self.auth,
            name,
            &parent,
            overwrite,
            definition,
            hidden,
        )
        .await?;
        self.cache.clear();
        Ok(info)
    }

    pub async fn create_resource(
        &self,
        name: &str,
        parent: &str,
        overwrite: bool,
        content: &[u8],
        mime_type: Option<&str>,
    ) -> Result<ItemInfo> {
        let parent = self.qualify(parent);
        let info = catalog::create_resource(
            &self.http,
            &self.service_url,
            &self.auth,
            name,
            &parent,
            overwrite,
            content,
            mime_type,
        )
        .await?;
        self.cache.clear();
        Ok(info)
    }

    /// Duplicate a report next to itself under a timestamped name, for
    /// ad-hoc editing without touching the published report.
    ///
    /// The copy is named `{name}_custom_{DDMMYYTHHMM}` and created hidden.
    pub async fn create_report_copy(&self, report_path: &str) -> Result<ItemInfo> {
        let path = self.qualify(report_path);
        let definition = self.get_item_definition(&path).await?;

        let (parent, name) = split_path(&path);
        let stamp = Local::now().format("%d%m%yT%H%M").to_string();
        let copy_name = timestamped_copy_name(name, &stamp);

        let info = catalog::create_report(
            &self.http,
            &self.service_url,
            &self.auth,
            &copy_name,
            parent,
            true,
            definition.as_bytes(),
            true,
        )
        .await?;
        self.cache.clear();
        Ok(info)
    }

    /// URL that opens a report in the server's Report Builder click-once
    /// application.
    pub fn report_builder_url(&self, report_path: &str) -> String {
        let path = self.qualify(report_path);
        format!(
            "{}/ReportBuilder/ReportBuilder_3_0_0_0.application?{}",
            self.base_url,
            encode_component(&path)
        )
    }

    pub async fn get_item_references(
        &self,
        path: &str,
        reference_item_type: &str,
    ) -> Result<Vec<ItemReferenceData>> {
        let path = self.qualify(path);
        catalog::get_item_references(
            &self.http,
            &self.service_url,
            &self.auth,
            &path,
            reference_item_type,
        )
        .await
    }

    pub async fn set_item_references(
        &self,
        path: &str,
        references: &[ItemReference],
    ) -> Result<()> {
        let path = self.qualify(path);
        catalog::set_item_references(&self.http, &self.service_url, &self.auth, &path, references)
            .await
    }

    pub async fn get_item_data_sources(&self, path: &str) -> Result<Vec<ItemReferenceData>> {
        let path = self.qualify(path);
        catalog::get_item_data_sources(&self.http, &self.service_url, &self.auth, &path).await
    }

    pub async fn set_item_data_sources(
        &self,
        path: &str,
        references: &[ItemReference],
    ) -> Result<()> {
        let path = self.qualify(path);
        catalog::set_item_data_sources(&self.http, &self.service_url, &self.auth, &path, references)
            .await
    }

    /// Read a report's declared parameters with their metadata, ready to
    /// be given values and submitted.
    pub async fn get_item_parameters(&self, path: &str) -> Result<Vec<ReportParameter>> {
        let path = self.qualify(path);
        catalog::get_item_parameters(&self.http, &self.service_url, &self.auth, &path, true).await
    }

    pub async fn test_data_source_connection(
        &self,
        definition: &DataSourceDefinition,
        user_name: Option<&str>,
        password: Option<&str>,
    ) -> Result<ConnectionTest> {
        catalog::test_data_source_connection(
            &self.http,
            &self.service_url,
            &self.auth,
            definition,
            user_name,
            password,
        )
        .await
    }
}

/// Name for a timestamped report copy. Copying a copy replaces the old
/// timestamp instead of stacking another suffix.
fn timestamped_copy_name(name: &str, stamp: &str) -> String {
    let base = match name.find("_custom_") {
        Some(idx) => &name[..idx],
        None => name,
    };
    format!("{base}_custom_{stamp}")
}

/// Split a qualified path into parent folder and leaf name.
pub(crate) fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(0) => ("/", &path[1..]),
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("/", path),
    }
}
