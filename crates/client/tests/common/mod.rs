//! Common test utilities for integration tests.
//!
//! Shared helpers for mounting SOAP mocks and building clients against a
//! wiremock server. All integration tests go through these to keep the
//! setup in one place.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the
//!   crate root and are complete SOAP envelopes.

use secrecy::SecretString;

#[allow(unused_imports)]
pub use ssrs_client::testing::load_fixture;

#[allow(unused_imports)]
pub use wiremock::matchers::{body_string_contains, header, method, path};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use ssrs_client::{AuthStrategy, SsrsClient};

pub const SERVICE_PATH: &str = "/ReportService2010.asmx";
pub const EXECUTION_PATH: &str = "/ReportExecution2005.asmx";

/// Client wired against a mock server, root folder `/`.
pub fn test_client(server: &MockServer) -> SsrsClient {
    test_client_with_root(server, "/")
}

#[allow(dead_code)]
pub fn test_client_with_root(server: &MockServer, root: &str) -> SsrsClient {
    SsrsClient::builder()
        .base_url(server.uri())
        .auth(AuthStrategy::Basic {
            username: "admin".to_string(),
            password: SecretString::new("pw".to_string().into()),
        })
        .root_folder(root)
        .build()
        .expect("test client")
}

/// Mount a catalog-endpoint mock answering a single operation.
#[allow(dead_code)]
pub async fn mount_service(server: &MockServer, operation: &str, fixture: &str) {
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("SOAPAction", soap_action_service(operation)))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
        .mount(server)
        .await;
}

/// Mount an execution-endpoint mock answering a single operation.
#[allow(dead_code)]
pub async fn mount_execution(server: &MockServer, operation: &str, fixture: &str) {
    Mock::given(method("POST"))
        .and(path(EXECUTION_PATH))
        .and(header("SOAPAction", soap_action_execution(operation)))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn soap_action_service(operation: &str) -> String {
    format!(
        "\"http://schemas.microsoft.com/sqlserver/reporting/2010/03/01/ReportServer/{operation}\""
    )
}

#[allow(dead_code)]
pub fn soap_action_execution(operation: &str) -> String {
    format!(
        "\"http://schemas.microsoft.com/sqlserver/2005/06/30/reporting/reportingservices/{operation}\""
    )
}
