//! Paging through a local Graph-shaped user collection

use directory_cli::api::{
    AccessToken, DirectoryEntry, GraphDirectory, PageErrorPolicy, build_http_client, list_entries,
};
use directory_cli::{Error, Result};
use mockito::{Matcher, Server};

fn directory(server: &Server) -> GraphDirectory {
    GraphDirectory::with_custom_client(
        &format!("{}/v1.0", server.url()),
        build_http_client(Some("none")).unwrap(),
    )
    .unwrap()
}

fn first_page_query() -> Matcher {
    Matcher::UrlEncoded("$select".into(), "id,userPrincipalName".into())
}

#[test]
fn test_follows_next_links_until_exhausted() {
    let mut server = Server::new();
    let page1 = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"value":[{{"id":"1","userPrincipalName":"a@x"}},{{"id":"2","userPrincipalName":"b@x"}}],
                "@odata.nextLink":"{}/v1.0/users?$skiptoken=page2"}}"#,
            server.url()
        ))
        .expect(1)
        .create();
    let page2 = server
        .mock("GET", "/v1.0/users")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "page2".into()))
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"value":[{{"id":"3","userPrincipalName":"c@x"}}],
                "@odata.nextLink":"{}/v1.0/users?$skiptoken=page3"}}"#,
            server.url()
        ))
        .expect(1)
        .create();
    let page3 = server
        .mock("GET", "/v1.0/users")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "page3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"value":[{"id":"4","userPrincipalName":"d@x"}]}"#)
        .expect(1)
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let entries: Vec<DirectoryEntry> = list_entries(&directory, &token, PageErrorPolicy::Degrade)
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(
        entries,
        vec![
            DirectoryEntry::new("1", "a@x"),
            DirectoryEntry::new("2", "b@x"),
            DirectoryEntry::new("3", "c@x"),
            DirectoryEntry::new("4", "d@x"),
        ]
    );
    page1.assert();
    page2.assert();
    page3.assert();
}

#[test]
fn test_forbidden_first_page_degrades_to_empty() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .with_status(403)
        .with_body(r#"{"error":{"code":"Authorization_RequestDenied","message":"Insufficient privileges to complete the operation."}}"#)
        .expect(1)
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let entries: Vec<_> = list_entries(&directory, &token, PageErrorPolicy::Degrade).collect();

    assert!(entries.is_empty());
    mock.assert();
}

#[test]
fn test_forbidden_first_page_fails_fast() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .with_status(403)
        .with_body("denied")
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let mut entries = list_entries(&directory, &token, PageErrorPolicy::FailFast);

    match entries.next() {
        Some(Err(Error::Status { status, body, .. })) => {
            assert_eq!(status, 403);
            assert_eq!(body, "denied");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert!(entries.next().is_none());
}

#[test]
fn test_failing_second_page_keeps_first_page() {
    let mut server = Server::new();
    let _page1 = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"value":[{{"id":"1","userPrincipalName":"a@x"}}],
                "@odata.nextLink":"{}/v1.0/users?$skiptoken=page2"}}"#,
            server.url()
        ))
        .create();
    let _page2 = server
        .mock("GET", "/v1.0/users")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "page2".into()))
        .with_status(500)
        .with_body("boom")
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let entries: Vec<_> = list_entries(&directory, &token, PageErrorPolicy::Degrade)
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(entries, vec![DirectoryEntry::new("1", "a@x")]);
}

#[test]
fn test_malformed_body_is_transport_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("<html>not json</html>")
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let mut entries = list_entries(&directory, &token, PageErrorPolicy::Degrade);

    assert!(matches!(entries.next(), Some(Err(Error::Transport { .. }))));
    assert!(entries.next().is_none());
}

#[test]
fn test_unreachable_next_page_is_transport_error_under_degrade() {
    let mut server = Server::new();
    let _page1 = server
        .mock("GET", "/v1.0/users")
        .match_query(first_page_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"value":[{"id":"1","userPrincipalName":"a@x"}],
                "@odata.nextLink":"http://127.0.0.1:1/v1.0/users?$skiptoken=page2"}"#,
        )
        .create();

    let directory = directory(&server);
    let token = AccessToken::new("tok-123");
    let mut entries = list_entries(&directory, &token, PageErrorPolicy::Degrade);

    assert_eq!(entries.next().unwrap().unwrap(), DirectoryEntry::new("1", "a@x"));
    assert!(matches!(entries.next(), Some(Err(Error::Transport { .. }))));
    assert!(entries.next().is_none());
}
