//! Centralized constants for the SSRS workspace.
//!
//! Default values used across crates to avoid magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
///
/// Report rendering can be slow; this is deliberately generous compared to
/// typical REST defaults.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default root folder of the report catalog.
pub const DEFAULT_ROOT_FOLDER: &str = "/";

// =============================================================================
// Service Endpoints
// =============================================================================

/// Path of the catalog-management SOAP endpoint (2010 contract).
pub const REPORT_SERVICE_2010_PATH: &str = "/ReportService2010.asmx";

/// Path of the catalog-management SOAP endpoint (2012 contract).
pub const REPORT_SERVICE_2012_PATH: &str = "/ReportService2012.asmx";

/// Path of the report-execution SOAP endpoint.
pub const REPORT_EXECUTION_PATH: &str = "/ReportExecution2005.asmx";

// =============================================================================
// Catalog Cache Defaults
// =============================================================================

/// Default capacity (folders) of the optional catalog listing cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;
