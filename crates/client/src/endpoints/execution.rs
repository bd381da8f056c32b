//! Report execution operations (ReportExecution2005 contract).
//!
//! Every operation after [`load_report`] carries the session's execution id
//! in the SOAP header; the session value is the only place that id lives.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, SecondsFormat};

use crate::auth::AuthStrategy;
use crate::endpoints::parsing::{all_texts, element_blocks, first_text, xsd_bool};
use crate::endpoints::soap::{self, NS_EXECUTION, SoapCall, elem, opt_elem};
use crate::error::{ClientError, Result};
use crate::models::{ExecutionSession, ParameterValue, RenderedReport, RenderingExtension};

async fn invoke(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    operation: &'static str,
    body: String,
    session: Option<&ExecutionSession>,
) -> Result<String> {
    soap::call(
        http,
        url,
        auth,
        SoapCall {
            namespace: NS_EXECUTION,
            operation,
            body,
            header: session.map(|s| s.header_xml()),
        },
    )
    .await
}

/// Start a new execution of a report and return its session handle.
pub async fn load_report(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    report_path: &str,
    history_id: Option<&str>,
) -> Result<ExecutionSession> {
    let body = elem("Report", report_path) + &opt_elem("HistoryID", history_id);
    let response = invoke(http, url, auth, "LoadReport", body, None).await?;

    let execution_id = first_text(&response, "ExecutionID").ok_or_else(|| {
        ClientError::InvalidResponse("LoadReport response missing ExecutionID".to_string())
    })?;
    Ok(ExecutionSession::new(execution_id))
}

/// Submit formatted parameter values for the session's execution,
/// stamping the execution start time.
///
/// An entry with no value omits its `<Value>` element entirely, which the
/// server reads as "use the parameter default".
pub async fn set_execution_parameters(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    session: &ExecutionSession,
    parameters: &[ParameterValue],
    language: &str,
) -> Result<()> {
    let mut body = String::from("<Parameters>");
    for parameter in parameters {
        body.push_str(&format!(
            "<ParameterValue>{}{}</ParameterValue>",
            elem("Name", &parameter.name),
            opt_elem("Value", parameter.value.as_deref())
        ));
    }
    body.push_str("</Parameters>");
    body.push_str(&elem("ParameterLanguage", language));
    body.push_str(&elem(
        "ExecutionDateTime",
        &Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    ));

    invoke(http, url, auth, "SetExecutionParameters", body, Some(session)).await?;
    Ok(())
}

/// Render the session's execution in the given server format.
pub async fn render(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    session: &ExecutionSession,
    format: &str,
    device_info: Option<&str>,
) -> Result<RenderedReport> {
    let body = elem("Format", format)
        + &device_info
            .map(|d| format!("<DeviceInfo>{d}</DeviceInfo>"))
            .unwrap_or_default();
    let response = invoke(http, url, auth, "Render", body, Some(session)).await?;

    let data = decode_result(&response, "Render")?;
    let extension = first_text(&response, "Extension").unwrap_or_default();
    let mime_type = first_text(&response, "MimeType").unwrap_or_default();
    let stream_ids = element_blocks(&response, "StreamIds")
        .first()
        .map(|block| all_texts(block, "string"))
        .unwrap_or_default();

    Ok(RenderedReport {
        data,
        extension,
        mime_type,
        stream_ids,
    })
}

/// Fetch one secondary stream of the last render (an HTML image, for
/// instance).
pub async fn render_stream(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    session: &ExecutionSession,
    format: &str,
    stream_id: &str,
    device_info: Option<&str>,
) -> Result<Vec<u8>> {
    let body = elem("Format", format)
        + &elem("StreamID", stream_id)
        + &device_info
            .map(|d| format!("<DeviceInfo>{d}</DeviceInfo>"))
            .unwrap_or_default();
    let response = invoke(http, url, auth, "RenderStream", body, Some(session)).await?;
    decode_result(&response, "RenderStream")
}

/// List the rendering extensions the execution endpoint advertises.
pub async fn list_rendering_extensions(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
) -> Result<Vec<RenderingExtension>> {
    let response =
        invoke(http, url, auth, "ListRenderingExtensions", String::new(), None).await?;

    let extensions = element_blocks(&response, "Extension")
        .iter()
        .filter_map(|block| {
            Some(RenderingExtension {
                name: first_text(block, "Name")?,
                localized_name: first_text(block, "LocalizedName"),
                visible: first_text(block, "Visible")
                    .map(|v| xsd_bool(&v))
                    .unwrap_or(true),
            })
        })
        .collect();
    Ok(extensions)
}

fn decode_result(response: &str, operation: &str) -> Result<Vec<u8>> {
    let encoded = first_text(response, "Result").ok_or_else(|| {
        ClientError::InvalidResponse(format!("{operation} response missing Result"))
    })?;
    // The payload may be chunked with whitespace by some servers.
    let compact: String = encoded.split_whitespace().collect();
    BASE64
        .decode(compact)
        .map_err(|e| ClientError::InvalidResponse(format!("{operation} result is not valid base64: {e}")))
}
