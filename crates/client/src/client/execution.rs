//! Report rendering through the execution endpoint.
//!
//! `get_report` runs the full load, parameterize, render sequence. Each
//! call creates its own [`ExecutionSession`], so renders started
//! concurrently on one client cannot cross their execution headers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use tracing::{debug, warn};

use crate::client::SsrsClient;
use crate::endpoints::execution;
use crate::error::Result;
use crate::models::{
    ExecutionSession, RenderedReport, RenderingExtension, ReportParameters, normalize_render_format,
};
use crate::params::{format_parameters, format_parameters_strict};

const PARAMETER_LANGUAGE: &str = "en-us";
const HTML_DEVICE_INFO: &str = "<HTMLFragment>true</HTMLFragment>";

impl SsrsClient {
    /// Render a report. Required parameters without values are left to
    /// the server to reject.
    pub async fn get_report(
        &self,
        report_path: &str,
        format: Option<&str>,
        parameters: &ReportParameters,
    ) -> Result<RenderedReport> {
        let wire = format_parameters(parameters)?;
        self.render_report(report_path, format, wire).await
    }

    /// Render a report, failing before any remote call when a required
    /// parameter descriptor carries no value.
    pub async fn get_report_strict(
        &self,
        report_path: &str,
        format: Option<&str>,
        parameters: &ReportParameters,
    ) -> Result<RenderedReport> {
        let wire = format_parameters_strict(parameters)?;
        self.render_report(report_path, format, wire).await
    }

    async fn render_report(
        &self,
        report_path: &str,
        format: Option<&str>,
        wire: Vec<crate::models::ParameterValue>,
    ) -> Result<RenderedReport> {
        let path = self.qualify(report_path);
        let format = normalize_render_format(format);
        let is_html = format.starts_with("HTML");
        let device_info = is_html.then_some(HTML_DEVICE_INFO);

        let session =
            execution::load_report(&self.http, &self.execution_url, &self.auth, &path, None)
                .await?;
        debug!(path, format, execution_id = session.execution_id(), "report loaded");

        // Always sent; this call stamps the execution start time.
        execution::set_execution_parameters(
            &self.http,
            &self.execution_url,
            &self.auth,
            &session,
            &wire,
            PARAMETER_LANGUAGE,
        )
        .await?;

        let mut rendered = execution::render(
            &self.http,
            &self.execution_url,
            &self.auth,
            &session,
            &format,
            device_info,
        )
        .await?;

        if is_html && !rendered.stream_ids.is_empty() {
            rendered.data = self
                .inline_html_images(&session, &format, &rendered)
                .await?;
        }
        Ok(rendered)
    }

    /// Replace server image references in rendered HTML with embedded
    /// `data:` URIs, one secondary stream per image.
    async fn inline_html_images(
        &self,
        session: &ExecutionSession,
        format: &str,
        rendered: &RenderedReport,
    ) -> Result<Vec<u8>> {
        let mut html = String::from_utf8_lossy(&rendered.data).into_owned();

        for stream_id in &rendered.stream_ids {
            let image = execution::render_stream(
                &self.http,
                &self.execution_url,
                &self.auth,
                session,
                format,
                stream_id,
                None,
            )
            .await?;
            let uri = format!("src=\"data:image/png;base64,{}\"", BASE64.encode(&image));

            let pattern = format!("src=\"[^\"]*ImageID={}\"", regex::escape(stream_id));
            match Regex::new(&pattern) {
                Ok(re) => html = re.replace_all(&html, uri.as_str()).into_owned(),
                Err(e) => warn!(stream_id, error = %e, "skipping image stream"),
            }
        }
        Ok(html.into_bytes())
    }

    /// List the rendering extensions the server offers.
    pub async fn list_rendering_extensions(&self) -> Result<Vec<RenderingExtension>> {
        execution::list_rendering_extensions(&self.http, &self.execution_url, &self.auth).await
    }
}
