//! Catalog data model: items, properties, references, jobs.
//!
//! A [`CatalogItem`] mirrors one node of the server's hierarchical
//! namespace. Paths are `/`-delimited absolute strings; path uniqueness is
//! enforced by the server, not this client.

use serde::{Deserialize, Serialize};

/// Kind of a catalog item, as reported by the server's `TypeName` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Folder,
    Report,
    DataSource,
    /// Linked report item (the 2005 contract's name for reports).
    ReportItem,
    Resource,
    /// Any type name this client does not model specially.
    Other(String),
}

impl ItemType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Folder" => Self::Folder,
            "Report" => Self::Report,
            "DataSource" => Self::DataSource,
            "ReportItem" => Self::ReportItem,
            "Resource" => Self::Resource,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Folder => "Folder",
            Self::Report => "Report",
            Self::DataSource => "DataSource",
            Self::ReportItem => "ReportItem",
            Self::Resource => "Resource",
            Self::Other(name) => name,
        }
    }

    /// True for the item types that render as reports.
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report | Self::ReportItem)
    }
}

/// One node of the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub path: String,
    pub item_type: ItemType,
    pub hidden: bool,
}

/// A named item property (`Hidden`, `Description`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Item info returned by the create operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInfo {
    pub name: String,
    pub path: String,
}

/// A reference read back from the server (`GetItemReferences`); the
/// binding may be dangling, in which case `reference` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReferenceData {
    pub name: String,
    pub reference: Option<String>,
}

/// A reference to push to the server (`SetItemReferences`).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReference {
    pub name: String,
    pub reference: String,
}

/// A server-side job (running report execution or subscription delivery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub name: String,
    pub path: String,
    pub machine: Option<String>,
    pub user: Option<String>,
    pub start_date_time: Option<String>,
    pub status: Option<String>,
}

/// Result of `TestConnectForDataSourceDefinition`.
#[derive(Debug, Clone)]
pub struct ConnectionTest {
    pub successful: bool,
    /// Connection error detail reported by the server when the test failed.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_round_trip() {
        for name in ["Folder", "Report", "DataSource", "ReportItem", "Resource"] {
            assert_eq!(ItemType::from_type_name(name).as_str(), name);
        }
        let other = ItemType::from_type_name("Model");
        assert_eq!(other, ItemType::Other("Model".to_string()));
        assert_eq!(other.as_str(), "Model");
    }

    #[test]
    fn test_is_report_covers_both_contracts() {
        assert!(ItemType::Report.is_report());
        assert!(ItemType::ReportItem.is_report());
        assert!(!ItemType::Folder.is_report());
    }
}
