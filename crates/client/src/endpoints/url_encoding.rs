//! Percent-encoding sets for the URL-based render path.
//!
//! The URL access interface of the report server is picky about its query
//! string: the report path and every parameter value are encoded
//! individually, while multivalue parameters are joined with a literal,
//! pre-encoded `%2C` that must not be re-encoded.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Component encoding, matching what JavaScript's `encodeURIComponent`
/// leaves untouched: alphanumerics plus `- _ . ! ~ * ' ( )`.
pub const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query-string component.
pub fn encode_component(value: &str) -> String {
    percent_encode(value.as_bytes(), COMPONENT_ENCODE_SET).to_string()
}
