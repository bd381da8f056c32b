//! Formatting of caller-supplied parameters into wire entries.
//!
//! The rules differ by input shape. Descriptors carry server metadata, so
//! date coercion, null checking and select-all expansion apply; the plain
//! mapping shape has no metadata and formats values verbatim.
//!
//! # Invariants
//! - Every logical parameter yields at least one wire entry; parameters
//!   are never silently dropped.
//! - A multivalue parameter becomes consecutive entries sharing one name.

use chrono::Local;

use crate::error::{ClientError, Result};
use crate::models::parameters::{
    ParamValue, ParameterValue, ReportParameter, ReportParameters, format_date,
};

/// Format parameters for submission, leaving missing required values to
/// the server's own validation.
pub fn format_parameters(parameters: &ReportParameters) -> Result<Vec<ParameterValue>> {
    format_with_mode(parameters, false)
}

/// Format parameters, rejecting any required descriptor without a value
/// before anything is sent.
pub fn format_parameters_strict(parameters: &ReportParameters) -> Result<Vec<ParameterValue>> {
    format_with_mode(parameters, true)
}

fn format_with_mode(parameters: &ReportParameters, check_nulls: bool) -> Result<Vec<ParameterValue>> {
    match parameters {
        ReportParameters::Values(pairs) => Ok(values_to_wire(pairs)),
        ReportParameters::Descriptors(descriptors) => descriptors_to_wire(descriptors, check_nulls),
    }
}

fn values_to_wire(pairs: &[(String, ParamValue)]) -> Vec<ParameterValue> {
    let mut wire = Vec::new();
    for (name, value) in pairs {
        match value {
            ParamValue::Multi(elements) if elements.is_empty() => {
                wire.push(ParameterValue::new(name, None));
            }
            ParamValue::Multi(elements) => {
                for element in elements {
                    wire.push(ParameterValue::new(name, element.to_wire()));
                }
            }
            scalar => wire.push(ParameterValue::new(name, scalar.to_wire())),
        }
    }
    wire
}

fn descriptors_to_wire(
    descriptors: &[ReportParameter],
    check_nulls: bool,
) -> Result<Vec<ParameterValue>> {
    let mut wire = Vec::new();
    for descriptor in descriptors {
        // Date coercion comes before the null check: a dateless DateTime
        // parameter submits today's date rather than falling through.
        if descriptor.is_date_time() {
            let value = match &descriptor.value {
                Some(ParamValue::Date(date)) => format_date(*date),
                Some(ParamValue::Null) | None => format_date(Local::now().date_naive()),
                Some(other) => other
                    .to_wire()
                    .unwrap_or_else(|| format_date(Local::now().date_naive())),
            };
            wire.push(ParameterValue::new(&descriptor.name, Some(value)));
            continue;
        }

        let value = match &descriptor.value {
            None | Some(ParamValue::Null) => {
                if descriptor.nullable || descriptor.allow_blank || !check_nulls {
                    wire.push(ParameterValue::new(&descriptor.name, None));
                    continue;
                }
                return Err(ClientError::MissingParameter(descriptor.name.clone()));
            }
            Some(value) => value,
        };

        match value {
            ParamValue::Multi(elements) if elements.is_empty() => {
                wire.push(ParameterValue::new(&descriptor.name, None));
            }
            multi if multi.is_all_sentinel() => {
                for valid in &descriptor.valid_values {
                    wire.push(ParameterValue::new(&descriptor.name, Some(valid.value.clone())));
                }
            }
            ParamValue::Multi(elements) => {
                for element in elements {
                    wire.push(ParameterValue::new(&descriptor.name, element.to_wire()));
                }
            }
            scalar => wire.push(ParameterValue::new(&descriptor.name, scalar.to_wire())),
        }
    }
    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parameters::{ReportParameter, ValidValue};
    use chrono::NaiveDate;

    fn descriptor(name: &str) -> ReportParameter {
        ReportParameter::named(name)
    }

    #[test]
    fn test_values_shape_scalars() {
        let params: ReportParameters = [
            ("Region", ParamValue::from("East")),
            ("Top", ParamValue::from(10i64)),
            ("Active", ParamValue::from(true)),
        ]
        .into_iter()
        .collect();
        let wire = format_parameters(&params).unwrap();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[1], ParameterValue::new("Top", Some("10".to_string())));
        assert_eq!(wire[2], ParameterValue::new("Active", Some("True".to_string())));
    }

    #[test]
    fn test_values_shape_multivalue_expands_by_name() {
        let params: ReportParameters =
            [("Cities", ParamValue::from(vec!["Rome", "Oslo"]))].into_iter().collect();
        let wire = format_parameters(&params).unwrap();
        assert_eq!(
            wire,
            vec![
                ParameterValue::new("Cities", Some("Rome".to_string())),
                ParameterValue::new("Cities", Some("Oslo".to_string())),
            ]
        );
    }

    #[test]
    fn test_empty_list_yields_single_valueless_entry() {
        let params: ReportParameters =
            [("Cities", ParamValue::Multi(vec![]))].into_iter().collect();
        let wire = format_parameters(&params).unwrap();
        assert_eq!(wire, vec![ParameterValue::new("Cities", None)]);
    }

    #[test]
    fn test_values_shape_does_not_expand_sentinel() {
        let params: ReportParameters =
            [("Cities", ParamValue::all_valid_values())].into_iter().collect();
        let wire = format_parameters(&params).unwrap();
        assert_eq!(
            wire,
            vec![ParameterValue::new("Cities", Some("all validValues".to_string()))]
        );
    }

    #[test]
    fn test_descriptor_sentinel_expands_valid_values() {
        let mut param = descriptor("City").with_value(ParamValue::all_valid_values());
        param.valid_values = vec![
            ValidValue { label: None, value: "Rome".to_string() },
            ValidValue { label: None, value: "Oslo".to_string() },
        ];
        let wire = format_parameters(&ReportParameters::Descriptors(vec![param])).unwrap();
        assert_eq!(
            wire,
            vec![
                ParameterValue::new("City", Some("Rome".to_string())),
                ParameterValue::new("City", Some("Oslo".to_string())),
            ]
        );
    }

    #[test]
    fn test_date_descriptor_formats_mm_dd_yyyy() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let mut param = descriptor("AsOf").with_value(date);
        param.parameter_type = Some("DateTime".to_string());
        let wire = format_parameters(&ReportParameters::Descriptors(vec![param])).unwrap();
        assert_eq!(wire, vec![ParameterValue::new("AsOf", Some("03/07/2024".to_string()))]);
    }

    #[test]
    fn test_valueless_date_descriptor_defaults_to_today() {
        let mut param = descriptor("AsOf");
        param.parameter_type = Some("DateTime".to_string());
        let wire = format_parameters(&ReportParameters::Descriptors(vec![param])).unwrap();
        let expected = format_date(Local::now().date_naive());
        assert_eq!(wire, vec![ParameterValue::new("AsOf", Some(expected))]);
    }

    #[test]
    fn test_strict_rejects_missing_required_value() {
        let mut param = descriptor("Region");
        param.nullable = false;
        let err =
            format_parameters_strict(&ReportParameters::Descriptors(vec![param])).unwrap_err();
        match err {
            ClientError::MissingParameter(name) => {
                assert_eq!(name, "Region");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_allows_nullable_without_value() {
        let mut param = descriptor("Region");
        param.nullable = true;
        let wire =
            format_parameters_strict(&ReportParameters::Descriptors(vec![param])).unwrap();
        assert_eq!(wire, vec![ParameterValue::new("Region", None)]);
    }

    #[test]
    fn test_lenient_passes_missing_required_value_through() {
        let param = descriptor("Region");
        let wire = format_parameters(&ReportParameters::Descriptors(vec![param])).unwrap();
        assert_eq!(wire, vec![ParameterValue::new("Region", None)]);
    }
}
