//! Report execution session and render output models.

use serde::{Deserialize, Serialize};

use crate::endpoints::soap::NS_EXECUTION;

/// Handle for one server-side report execution.
///
/// Every `LoadReport` call produces a fresh session, and all follow-up
/// calls (`SetExecutionParameters`, `Render`, `RenderStream`) carry the
/// session's execution id in the SOAP header. Because the id lives in the
/// session value rather than in shared client state, concurrent renders on
/// one client never interleave their headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSession {
    execution_id: String,
}

impl ExecutionSession {
    pub(crate) fn new(execution_id: String) -> Self {
        Self { execution_id }
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// SOAP header content carrying the execution id.
    pub(crate) fn header_xml(&self) -> String {
        format!(
            "<ExecutionHeader xmlns=\"{NS_EXECUTION}\"><ExecutionID>{}</ExecutionID></ExecutionHeader>",
            quick_xml::escape::escape(self.execution_id.as_str())
        )
    }
}

/// Output of a `Render` call.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Decoded report bytes.
    pub data: Vec<u8>,
    /// File extension suggested by the server, e.g. `pdf`.
    pub extension: String,
    /// MIME type of `data`.
    pub mime_type: String,
    /// Stream ids for secondary streams (HTML images and the like).
    pub stream_ids: Vec<String>,
}

/// One rendering extension advertised by the execution endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingExtension {
    pub name: String,
    pub localized_name: Option<String>,
    pub visible: bool,
}

/// Normalize a requested render format to a server format name.
///
/// Office aliases map to the OpenXML renderers. Anything else is
/// uppercased and passed through; a missing format defaults to PDF.
pub fn normalize_render_format(format: Option<&str>) -> String {
    let format = match format {
        Some(f) if !f.trim().is_empty() => f.trim().to_ascii_uppercase(),
        _ => return "PDF".to_string(),
    };
    match format.as_str() {
        "EXCEL" | "XLS" | "XLSX" => "EXCELOPENXML".to_string(),
        "WORD" | "DOC" | "DOCX" => "WORDOPENXML".to_string(),
        other => other.to_string(),
    }
}
