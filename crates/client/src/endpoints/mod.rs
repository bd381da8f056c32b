//! Remote operation implementations, one module per server contract, plus
//! the shared SOAP transport and response-parsing helpers.

pub mod catalog;
pub mod execution;
pub(crate) mod parsing;
pub(crate) mod soap;
pub mod url_encoding;
