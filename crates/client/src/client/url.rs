//! URL-based rendering (`rs:Command=Render`).
//!
//! The URL access surface is the fallback for renderers the execution
//! endpoint does not expose and for handing a link to a browser. Nulls,
//! booleans, dates and multivalues follow the server's query conventions,
//! which differ from the SOAP wire shape.

use crate::client::SsrsClient;
use crate::endpoints::url_encoding::encode_component;
use crate::error::{ClientError, Result};
use crate::models::{ParamValue, ReportParameters, normalize_render_format};

/// Build a direct render URL for a report.
///
/// Query conventions:
/// - a null value becomes `{name}:IsNull=True`
/// - booleans render as `True`/`False`, dates as `MM/DD/YYYY`
/// - a multivalue joins its elements with a comma in a single pair
/// - valueless descriptors are omitted and fall back to server defaults
pub fn render_url(
    base_url: &str,
    report_path: &str,
    format: Option<&str>,
    parameters: &ReportParameters,
) -> Result<String> {
    if report_path.trim().is_empty() {
        return Err(ClientError::InvalidArgument(
            "report path must not be empty".to_string(),
        ));
    }
    let format = normalize_render_format(format);
    // The URL surface wants '+' for spaces in the item path.
    let path = encode_component(&report_path.replace(' ', "+"));

    let mut url = format!("{base_url}?{path}&rs:Command=Render&rs:Format={format}");
    for (name, value) in pairs(parameters) {
        match value {
            None => {
                url.push_str(&format!("&{}:IsNull=True", encode_component(&name)));
            }
            Some(value) => {
                url.push_str(&format!(
                    "&{}={}",
                    encode_component(&name),
                    encode_component(&value)
                ));
            }
        }
    }
    Ok(url)
}

/// Logical query pairs; `None` marks an explicit null.
fn pairs(parameters: &ReportParameters) -> Vec<(String, Option<String>)> {
    let mut out = Vec::new();
    let mut push = |name: &str, value: &ParamValue| match value {
        ParamValue::Null => out.push((name.to_string(), None)),
        ParamValue::Multi(elements) => {
            let joined = elements
                .iter()
                .map(|e| e.to_wire().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",");
            out.push((name.to_string(), Some(joined)));
        }
        scalar => out.push((name.to_string(), scalar.to_wire())),
    };

    match parameters {
        ReportParameters::Values(values) => {
            for (name, value) in values {
                push(name, value);
            }
        }
        ReportParameters::Descriptors(descriptors) => {
            for descriptor in descriptors {
                if let Some(value) = &descriptor.value {
                    push(&descriptor.name, value);
                }
            }
        }
    }
    out
}

impl SsrsClient {
    /// Render a report through the URL surface and return the raw bytes.
    pub async fn get_report_by_url(
        &self,
        report_path: &str,
        format: Option<&str>,
        parameters: &ReportParameters,
    ) -> Result<Vec<u8>> {
        let path = self.qualify(report_path);
        let url = render_url(&self.base_url, &path, format, parameters)?;

        let response = self
            .http
            .get(&url)
            .header("Authorization", self.auth.authorization_value())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                url,
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BASE: &str = "http://reports/ReportServer";

    #[test]
    fn test_render_url_basic_shape() {
        let params: ReportParameters =
            [("Region", ParamValue::from("East"))].into_iter().collect();
        let url = render_url(BASE, "/Sales/Revenue", None, &params).unwrap();
        assert_eq!(
            url,
            "http://reports/ReportServer?%2FSales%2FRevenue&rs:Command=Render&rs:Format=PDF&Region=East"
        );
    }

    #[test]
    fn test_render_url_null_and_bool() {
        let params: ReportParameters = [
            ("Region", ParamValue::Null),
            ("Active", ParamValue::from(true)),
        ]
        .into_iter()
        .collect();
        let url = render_url(BASE, "/R", None, &params).unwrap();
        assert!(url.contains("&Region:IsNull=True"));
        assert!(url.contains("&Active=True"));
    }

    #[test]
    fn test_render_url_multivalue_joins_with_encoded_comma() {
        let params: ReportParameters =
            [("Cities", ParamValue::from(vec!["Rome", "Oslo"]))].into_iter().collect();
        let url = render_url(BASE, "/R", None, &params).unwrap();
        assert!(url.contains("&Cities=Rome%2COslo"));
    }

    #[test]
    fn test_render_url_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let params: ReportParameters = [("AsOf", ParamValue::from(date))].into_iter().collect();
        let url = render_url(BASE, "/R", None, &params).unwrap();
        assert!(url.contains("&AsOf=01%2F05%2F2024"));
    }

    #[test]
    fn test_render_url_spaces_in_path_become_plus() {
        let url = render_url(BASE, "/Sales Reports/Q1", Some("excel"), &ReportParameters::none())
            .unwrap();
        assert!(url.contains("%2FSales%2BReports%2FQ1"));
        assert!(url.ends_with("&rs:Format=EXCELOPENXML"));
    }

    #[test]
    fn test_render_url_rejects_empty_path() {
        let err = render_url(BASE, "  ", None, &ReportParameters::none()).unwrap_err();
        assert!(err.is_validation());
    }
}
