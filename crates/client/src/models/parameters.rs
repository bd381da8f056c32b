//! Report parameter model.
//!
//! Callers supply parameters in one of two shapes: a plain name→value
//! mapping, or a list of descriptors carrying the server-declared metadata
//! (type name, nullability, valid values) obtained from
//! `GetItemParameters`. The tagged [`ReportParameters`] union resolves the
//! shape once at the formatter's entry point.
//!
//! On the wire a logical multivalue parameter becomes multiple
//! [`ParameterValue`] entries sharing one `Name`; there are no nested
//! arrays in the protocol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The sentinel single-element list meaning "all valid values".
///
/// `Multi(vec![Text(ALL_VALID_VALUES)])` expands to one entry per
/// enumerated valid value of the parameter (descriptor shape only; the
/// mapping shape carries no valid-value enumeration to expand from).
pub const ALL_VALID_VALUES: &str = "all validValues";

/// A caller-supplied parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit null; the server falls back to the parameter default.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    /// Multivalue; expanded to one wire entry per element.
    Multi(Vec<ParamValue>),
}

impl ParamValue {
    /// Scalar wire rendering. `None` for `Null`; `Multi` has no scalar
    /// rendering and must be expanded by the formatter first.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Date(d) => Some(format_date(*d)),
            Self::Multi(_) => None,
        }
    }

    /// The select-all sentinel list.
    pub fn all_valid_values() -> Self {
        Self::Multi(vec![Self::Text(ALL_VALID_VALUES.to_string())])
    }

    pub(crate) fn is_all_sentinel(&self) -> bool {
        match self {
            Self::Multi(values) => {
                values.len() == 1 && values[0] == Self::Text(ALL_VALID_VALUES.to_string())
            }
            _ => false,
        }
    }
}

/// Report parameter dates always travel as `MM/DD/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }
}

/// One formatted wire entry of `SetExecutionParameters`.
///
/// `value: None` means the `<Value>` element is omitted entirely,
/// signalling "use the parameter default" to the server; a parameter is
/// never silently dropped from the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValue {
    /// Case-sensitive; must match the server-declared parameter name.
    pub name: String,
    pub value: Option<String>,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One enumerated valid value of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidValue {
    pub label: Option<String>,
    pub value: String,
}

/// Server-declared parameter descriptor, optionally carrying a
/// caller-supplied value.
#[derive(Debug, Clone, Default)]
pub struct ReportParameter {
    pub name: String,
    /// Server type name, e.g. `DateTime`, `String`, `Boolean`.
    pub parameter_type: Option<String>,
    pub nullable: bool,
    pub allow_blank: bool,
    pub multi_value: bool,
    pub prompt: Option<String>,
    pub valid_values: Vec<ValidValue>,
    pub default_values: Vec<String>,
    /// Value to submit for this parameter, if any.
    pub value: Option<ParamValue>,
}

impl ReportParameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub(crate) fn is_date_time(&self) -> bool {
        self.parameter_type.as_deref() == Some("DateTime")
            || matches!(self.value, Some(ParamValue::Date(_)))
    }
}

/// Tagged union over the two caller-supplied parameter shapes.
#[derive(Debug, Clone)]
pub enum ReportParameters {
    /// Plain name→value mapping; insertion order is preserved.
    Values(Vec<(String, ParamValue)>),
    /// Descriptor list with server metadata.
    Descriptors(Vec<ReportParameter>),
}

impl ReportParameters {
    /// An empty mapping.
    pub fn none() -> Self {
        Self::Values(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Values(pairs) => pairs.is_empty(),
            Self::Descriptors(descriptors) => descriptors.is_empty(),
        }
    }
}

impl<N: Into<String>, V: Into<ParamValue>> FromIterator<(N, V)> for ReportParameters {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self::Values(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_wire_values() {
        assert_eq!(ParamValue::from("x").to_wire().as_deref(), Some("x"));
        assert_eq!(ParamValue::from(42i64).to_wire().as_deref(), Some("42"));
        assert_eq!(ParamValue::from(true).to_wire().as_deref(), Some("True"));
        assert_eq!(ParamValue::from(false).to_wire().as_deref(), Some("False"));
        assert_eq!(ParamValue::Null.to_wire(), None);
    }

    #[test]
    fn test_date_wire_format() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(ParamValue::from(date).to_wire().as_deref(), Some("01/15/2024"));
    }

    #[test]
    fn test_all_sentinel_detection() {
        assert!(ParamValue::all_valid_values().is_all_sentinel());
        assert!(!ParamValue::from(vec!["all validValues", "more"]).is_all_sentinel());
        assert!(!ParamValue::from("all validValues").is_all_sentinel());
    }

    #[test]
    fn test_parameters_from_iterator() {
        let params: ReportParameters = [("Region", ParamValue::from("East"))].into_iter().collect();
        match params {
            ReportParameters::Values(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].0, "Region");
            }
            _ => panic!("expected values shape"),
        }
    }
}
