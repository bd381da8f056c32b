//! SOAP 1.1 transport shim.
//!
//! The report server exposes two document/literal SOAP endpoints. This
//! module owns the envelope format, the `SOAPAction` convention, and fault
//! extraction; the per-operation body XML is built by the sibling endpoint
//! modules.
//!
//! # What this module does NOT handle:
//! - Operation semantics and response parsing (in the endpoint modules)
//! - Credential selection (in [`crate::auth`])
//!
//! # Invariants
//! - A non-success response carrying a `<faultstring>` is always surfaced
//!   as [`ClientError::SoapFault`] with that message; other failures keep
//!   the raw status and body.

use quick_xml::escape::escape;
use tracing::debug;

use crate::auth::AuthStrategy;
use crate::endpoints::parsing::first_text;
use crate::error::{ClientError, Result};

/// Namespace of the catalog-management contract (ReportService2010).
pub(crate) const NS_SERVICE: &str =
    "http://schemas.microsoft.com/sqlserver/reporting/2010/03/01/ReportServer";

/// Namespace of the execution contract (ReportExecution2005); also the
/// namespace of the execution correlation header.
pub(crate) const NS_EXECUTION: &str =
    "http://schemas.microsoft.com/sqlserver/2005/06/30/reporting/reportingservices";

/// One remote operation invocation.
pub(crate) struct SoapCall<'a> {
    /// Contract namespace ([`NS_SERVICE`] or [`NS_EXECUTION`]).
    pub namespace: &'a str,
    /// Operation element name, e.g. `ListChildren`.
    pub operation: &'a str,
    /// Inner XML of the operation element; values must already be escaped.
    pub body: String,
    /// Inner XML of the `soap:Header` element, if any.
    pub header: Option<String>,
}

/// Invoke a remote operation and return the raw response envelope.
pub(crate) async fn call(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    call: SoapCall<'_>,
) -> Result<String> {
    let action = format!("{}/{}", call.namespace, call.operation);
    let envelope = build_envelope(&call);

    debug!(operation = call.operation, url, "SOAP call");

    let response = http
        .post(url)
        .header("Content-Type", "text/xml; charset=utf-8")
        .header("SOAPAction", format!("\"{action}\""))
        .header("Authorization", auth.authorization_value())
        .body(envelope)
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    // Faults arrive as HTTP 500 with a fault envelope; prefer the fault
    // string over the raw status whenever one is present.
    if let Some(fault) = first_text(&body, "faultstring") {
        return Err(ClientError::SoapFault {
            url: url.to_string(),
            message: fault,
        });
    }
    if !(200..300).contains(&status) {
        return Err(ClientError::ApiError {
            status,
            url: url.to_string(),
            message: truncate_body(&body),
        });
    }

    Ok(body)
}

fn build_envelope(call: &SoapCall<'_>) -> String {
    let header = call
        .header
        .as_deref()
        .map(|h| format!("<soap:Header>{h}</soap:Header>"))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">\
         {header}\
         <soap:Body><{op} xmlns=\"{ns}\">{body}</{op}></soap:Body>\
         </soap:Envelope>",
        op = call.operation,
        ns = call.namespace,
        body = call.body,
    )
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

/// Build `<tag>escaped text</tag>`.
pub(crate) fn elem(tag: &str, text: &str) -> String {
    format!("<{tag}>{}</{tag}>", escape(text))
}

/// Build `<tag>true|false</tag>` (xsd:boolean literals).
pub(crate) fn bool_elem(tag: &str, value: bool) -> String {
    format!("<{tag}>{}</{tag}>", if value { "true" } else { "false" })
}

/// Build `<tag>..</tag>` when the value is present, nothing otherwise.
pub(crate) fn opt_elem(tag: &str, text: Option<&str>) -> String {
    text.map(|t| elem(tag, t)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let envelope = build_envelope(&SoapCall {
            namespace: NS_SERVICE,
            operation: "ListChildren",
            body: elem("ItemPath", "/Reports") + &bool_elem("Recursive", true),
            header: None,
        });

        assert!(envelope.starts_with("<?xml"));
        assert!(envelope.contains(&format!("<ListChildren xmlns=\"{NS_SERVICE}\">")));
        assert!(envelope.contains("<ItemPath>/Reports</ItemPath>"));
        assert!(envelope.contains("<Recursive>true</Recursive>"));
        assert!(!envelope.contains("<soap:Header>"));
    }

    #[test]
    fn test_envelope_with_header() {
        let envelope = build_envelope(&SoapCall {
            namespace: NS_EXECUTION,
            operation: "Render",
            body: elem("Format", "PDF"),
            header: Some(format!(
                "<ExecutionHeader xmlns=\"{NS_EXECUTION}\"><ExecutionID>abc</ExecutionID></ExecutionHeader>"
            )),
        });

        assert!(envelope.contains("<soap:Header><ExecutionHeader"));
        assert!(envelope.contains("<ExecutionID>abc</ExecutionID>"));
    }

    #[test]
    fn test_elem_escapes_values() {
        assert_eq!(
            elem("ConnectString", "Data Source=db;Initial Catalog=<X&Y>"),
            "<ConnectString>Data Source=db;Initial Catalog=&lt;X&amp;Y&gt;</ConnectString>"
        );
    }

    #[test]
    fn test_truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(600);
        assert!(truncate_body(&long).ends_with("..."));
    }
}
