//! Data models for catalog items, parameters, data sources and execution.

pub mod catalog;
pub mod datasource;
pub mod execution;
pub mod manifest;
pub mod parameters;

pub use catalog::{
    CatalogItem, ConnectionTest, ItemInfo, ItemReference, ItemReferenceData, ItemType, Job,
    Property,
};
pub use datasource::{CredentialRetrieval, DataSourceDefinition, DataSourceOverride};
pub use execution::{normalize_render_format, ExecutionSession, RenderedReport, RenderingExtension};
pub use manifest::{FileManifest, ManifestFile};
pub use parameters::{
    ParamValue, ParameterValue, ReportParameter, ReportParameters, ValidValue, ALL_VALID_VALUES,
};
