//! SQL Server Reporting Services client.
//!
//! This crate provides a typed client for the report server's SOAP
//! surfaces: catalog management through `ReportService2010` and report
//! execution through `ReportExecution2005`, plus the URL render surface
//! and a folder sync engine for bulk deployments.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod params;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::AuthStrategy;
pub use client::SsrsClient;
pub use client::SsrsClientBuilder;
pub use client::render_url;
pub use client::{ProgressSink, TracingProgress, UploadOptions};
pub use error::{ClientError, Result, Warning};
pub use models::{
    ALL_VALID_VALUES, CatalogItem, ConnectionTest, CredentialRetrieval, DataSourceDefinition,
    DataSourceOverride, ExecutionSession, FileManifest, ItemInfo, ItemReference, ItemReferenceData,
    ItemType, Job, ManifestFile, ParamValue, ParameterValue, Property, RenderedReport,
    RenderingExtension, ReportParameter, ReportParameters, ValidValue, normalize_render_format,
};
pub use params::{format_parameters, format_parameters_strict};
