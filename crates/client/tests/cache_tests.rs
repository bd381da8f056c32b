//! Report list caching tests.
//!
//! The report list is the hot path for pickers, so repeated calls for the
//! same folder must not refetch; mutations and explicit clears must.

mod common;

use common::*;

async fn mount_report_list_mocks(mock_server: &MockServer, expected_listings: u64) {
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("SOAPAction", soap_action_service("ListChildren")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("catalog/list_children.xml")),
        )
        .expect(expected_listings)
        .mount(mock_server)
        .await;

    // The listing fixture has two reports; Revenue answers Hidden=False,
    // Archive answers Hidden=True.
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("SOAPAction", soap_action_service("GetProperties")))
        .and(body_string_contains("/Reports/Revenue"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("catalog/get_properties_hidden_false.xml")),
        )
        .mount(mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(header("SOAPAction", soap_action_service("GetProperties")))
        .and(body_string_contains("/Reports/Archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("catalog/get_properties_hidden_true.xml")),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_report_list_filters_hidden_and_non_reports() {
    let mock_server = MockServer::start().await;
    mount_report_list_mocks(&mock_server, 1).await;

    let client = test_client(&mock_server);
    let reports = client.get_report_list("/Reports", false).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].path, "/Reports/Revenue");
}

#[tokio::test]
async fn test_second_listing_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    mount_report_list_mocks(&mock_server, 1).await;

    let client = test_client(&mock_server);
    let first = client.get_report_list("/Reports", false).await.unwrap();
    let second = client.get_report_list("/Reports", false).await.unwrap();

    assert_eq!(first.len(), second.len());
    // The expect(1) on the listing mock verifies no refetch happened.
}

#[tokio::test]
async fn test_force_refresh_bypasses_cache() {
    let mock_server = MockServer::start().await;
    mount_report_list_mocks(&mock_server, 2).await;

    let client = test_client(&mock_server);
    client.get_report_list("/Reports", false).await.unwrap();
    client.get_report_list("/Reports", true).await.unwrap();
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let mock_server = MockServer::start().await;
    mount_report_list_mocks(&mock_server, 2).await;

    let client = test_client(&mock_server);
    client.get_report_list("/Reports", false).await.unwrap();
    client.clear_cache();
    client.get_report_list("/Reports", false).await.unwrap();
}

#[tokio::test]
async fn test_mutation_invalidates_cached_listings() {
    let mock_server = MockServer::start().await;
    mount_report_list_mocks(&mock_server, 2).await;
    mount_service(&mock_server, "CreateFolder", "catalog/create_folder.xml").await;

    let client = test_client(&mock_server);
    client.get_report_list("/Reports", false).await.unwrap();
    client.create_folder("Demo", "/Reports").await.unwrap();
    client.get_report_list("/Reports", false).await.unwrap();
}
