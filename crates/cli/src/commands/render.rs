//! Render command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ssrs_client::{ParamValue, ReportParameters, SsrsClient};
use tracing::info;

pub async fn run(
    client: &SsrsClient,
    report: &str,
    format: Option<&str>,
    params: &[String],
    output: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let parameters = parse_params(params)?;

    info!(report, "rendering report");
    let rendered = if strict {
        client.get_report_strict(report, format, &parameters).await?
    } else {
        client.get_report(report, format, &parameters).await?
    };

    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(report, &rendered.extension));
    std::fs::write(&output, &rendered.data)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Wrote {} ({} bytes, {})",
        output.display(),
        rendered.data.len(),
        rendered.mime_type
    );
    Ok(())
}

/// Parse repeated `NAME=VALUE` pairs. A bare `NAME` submits an explicit
/// null; a repeated name becomes a multivalue parameter.
fn parse_params(params: &[String]) -> Result<ReportParameters> {
    let mut pairs: Vec<(String, ParamValue)> = Vec::new();

    for param in params {
        let (name, value) = match param.split_once('=') {
            Some((name, value)) => (name.to_string(), ParamValue::from(value)),
            None => (param.clone(), ParamValue::Null),
        };
        if name.is_empty() {
            anyhow::bail!("parameter '{param}' has no name");
        }

        match pairs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => match existing {
                ParamValue::Multi(values) => values.push(value),
                single => *single = ParamValue::Multi(vec![single.clone(), value]),
            },
            None => pairs.push((name, value)),
        }
    }

    Ok(ReportParameters::Values(pairs))
}

fn default_output(report: &str, extension: &str) -> PathBuf {
    let name = report.rsplit('/').next().unwrap_or(report);
    let extension = if extension.is_empty() { "bin" } else { extension };
    PathBuf::from(format!("{name}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params_scalar_null_and_multi() {
        let params = vec![
            "Region=East".to_string(),
            "Comment".to_string(),
            "City=Rome".to_string(),
            "City=Oslo".to_string(),
        ];
        let parsed = parse_params(&params).unwrap();
        match parsed {
            ReportParameters::Values(pairs) => {
                assert_eq!(pairs.len(), 3);
                assert_eq!(pairs[0].1, ParamValue::from("East"));
                assert_eq!(pairs[1].1, ParamValue::Null);
                assert_eq!(
                    pairs[2].1,
                    ParamValue::Multi(vec![ParamValue::from("Rome"), ParamValue::from("Oslo")])
                );
            }
            _ => panic!("expected values shape"),
        }
    }

    #[test]
    fn test_parse_params_rejects_empty_name() {
        assert!(parse_params(&["=oops".to_string()]).is_err());
    }

    #[test]
    fn test_default_output_uses_report_name() {
        assert_eq!(
            default_output("/Reports/Revenue", "pdf"),
            PathBuf::from("Revenue.pdf")
        );
    }
}
