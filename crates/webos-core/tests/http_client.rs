use std::time::Duration;

use serde_json::json;
use webos_core::api::{NewFolder, NewLink, PullRequest, PushRequest, RemoteSettingsUpdate};
use webos_core::models::{ConflictStrategy, IconData, IconKind, IconUpdate};
use webos_core::{
    ApiError, CategoryId, DesktopApi, FolderRef, HttpApi, IconId, Scope, SyncApi, TenantApi,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpApi {
    HttpApi::with_options(
        &format!("{}/api", server.uri()),
        Some("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn list_icons_sends_auth_and_tenant_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/desktop/"))
        .and(query_param("parent_id", "root"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-tenant-id", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "results": [
                {"id": 1, "title": "Docs", "type": "category", "data": {"name": "Docs"}},
                {"id": 2, "title": "Mail", "type": "resource", "x": 80, "y": 0,
                 "data": {"link": "https://mail.example.com", "open_mode": "tab"}}
            ]
        })))
        .mount(&server)
        .await;

    let icons = client(&server)
        .list_icons(&Scope::new("acme", "1"), FolderRef::Root)
        .await
        .unwrap();

    assert_eq!(icons.len(), 2);
    assert!(icons[0].is_folder());
    assert!(matches!(icons[1].data, Some(IconData::Link(_))));
    assert_eq!(icons[1].x, 80);
}

#[tokio::test]
async fn list_icons_accepts_plain_array_and_omits_default_tenant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/desktop/"))
        .and(query_param("parent_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 30, "title": "Report.pdf", "type": "resource", "data": {"file": "/media/r.pdf"}}
        ])))
        .mount(&server)
        .await;

    let icons = client(&server)
        .list_icons(&Scope::default(), FolderRef::Category(CategoryId::new(12)))
        .await
        .unwrap();
    assert_eq!(icons.len(), 1);
    assert_eq!(icons[0].id, IconId::new(30));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("x-tenant-id").is_none());
}

#[tokio::test]
async fn move_and_position_share_endpoint_with_different_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/desktop/5/move/"))
        .and(body_json(json!({"parent_id": 9})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/desktop/5/move/"))
        .and(body_json(json!({"x": 120, "y": 40})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let scope = Scope::new("acme", "1");
    api.move_icon(&scope, IconId::new(5), FolderRef::Category(CategoryId::new(9)))
        .await
        .unwrap();
    api.update_position(&scope, IconId::new(5), 120, 40)
        .await
        .unwrap();
}

#[tokio::test]
async fn list_smart_folder_sends_its_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/desktop/"))
        .and(query_param("parent_id", "recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 41, "title": "notes.txt", "type": "resource", "x": 0, "y": 0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let icons = client(&server)
        .list_icons(&Scope::new("acme", "1"), FolderRef::Recent)
        .await
        .unwrap();
    assert_eq!(icons.len(), 1);
    assert!(icons[0].data.is_none());
}

#[tokio::test]
async fn move_to_desktop_sends_root() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/desktop/5/move/"))
        .and(body_json(json!({"parent_id": "root"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "moved"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .move_icon(&Scope::new("acme", "1"), IconId::new(5), FolderRef::Root)
        .await
        .unwrap();
}

#[tokio::test]
async fn rename_and_uninstall_hit_icon_actions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/desktop/5/rename/"))
        .and(body_json(json!({"name": "Reports"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "renamed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/desktop/5/uninstall/"))
        .and(header("x-tenant-id", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let scope = Scope::new("acme", "1");
    api.rename_icon(&scope, IconId::new(5), "Reports")
        .await
        .unwrap();
    api.uninstall_icon(&scope, IconId::new(5)).await.unwrap();
}

#[tokio::test]
async fn create_folder_and_link_return_new_icons() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/desktop/create_folder/"))
        .and(body_json(json!({"name": "Projects", "x": 10, "y": 20, "parent_id": "root"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 60, "title": "Projects", "type": "category", "x": 10, "y": 20,
            "object_id": 8, "data": {"id": 8, "name": "Projects"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/desktop/create_link/"))
        .and(body_json(json!({
            "title": "Mail", "link": "https://mail.example.com",
            "x": 0, "y": 0, "parent_id": 8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 61, "title": "Mail", "type": "resource", "x": 0, "y": 0,
            "data": {"link": "https://mail.example.com"}
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let scope = Scope::new("acme", "1");
    let folder = api
        .create_folder(
            &scope,
            &NewFolder {
                name: "Projects".to_string(),
                x: 10,
                y: 20,
                parent_id: FolderRef::Root,
            },
        )
        .await
        .unwrap();
    assert_eq!(folder.kind, Some(IconKind::Category));
    assert_eq!(folder.folder_id(), Some(CategoryId::new(8)));

    let link = api
        .create_link(
            &scope,
            &NewLink {
                title: "Mail".to_string(),
                link: "https://mail.example.com".to_string(),
                icon_class: None,
                x: 0,
                y: 0,
                parent_id: FolderRef::Category(CategoryId::new(8)),
            },
        )
        .await
        .unwrap();
    assert!(matches!(link.data, Some(IconData::Link(_))));
}

#[tokio::test]
async fn tenant_discovery_never_sends_tenant_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/memberships/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "role": "owner", "is_default": true,
             "tenant": {"id": 2, "name": "Acme", "slug": "acme", "is_active": true}},
            {"id": 3, "role": "member", "is_default": false,
             "tenant": {"id": 7, "name": "Globex", "slug": "globex", "is_active": true}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tenants/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 2, "name": "Acme", "slug": "acme", "owner": 1}]
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let memberships = api.list_memberships().await.unwrap();
    assert_eq!(memberships.len(), 2);
    assert!(memberships[0].is_default);
    assert_eq!(memberships[1].tenant.scope_id(), "7");

    let tenants = api.list_tenants().await.unwrap();
    assert_eq!(tenants[0].slug, "acme");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.headers.get("x-tenant-id").is_none());
        assert_eq!(
            request.headers.get("authorization").unwrap(),
            "Bearer test-token"
        );
    }
}

#[tokio::test]
async fn push_posts_batch_and_reads_report() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sync/push/"))
        .and(body_json(json!({
            "conflict_strategy": "server_wins",
            "icons": [{"id": 7, "x": 10, "y": 20, "updated_at": "2024-01-01T00:00:00Z"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"updated": 1, "skipped": 0, "server_time": "2024-01-01T00:00:01Z"}
        })))
        .mount(&server)
        .await;

    let report = client(&server)
        .push(
            &Scope::new("acme", "1"),
            &PushRequest {
                conflict_strategy: ConflictStrategy::ServerWins,
                icons: vec![IconUpdate {
                    id: IconId::new(7),
                    x: 10,
                    y: 20,
                    updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 0);
    assert!(report.server_time.is_some());
}

#[tokio::test]
async fn pull_reads_dataset_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sync/pull/"))
        .and(body_json(json!({"since": "2023-12-31T00:00:00Z"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "icons": [{"id": 7, "title": "Notes", "x": 10, "y": 20}],
                "resources": [{"id": 100}],
                "server_time": "2024-01-01T00:00:00Z"
            }
        })))
        .mount(&server)
        .await;

    let dataset = client(&server)
        .pull(
            &Scope::new("acme", "1"),
            &PullRequest {
                since: Some("2023-12-31T00:00:00Z".parse().unwrap()),
            },
        )
        .await
        .unwrap();

    assert_eq!(dataset.icons.map(|icons| icons.len()), Some(1));
    assert_eq!(dataset.resources.len(), 1);
    assert!(dataset.categories.is_empty());
    assert_eq!(
        dataset.server_time.map(|at| at.to_rfc3339()),
        Some("2024-01-01T00:00:00+00:00".to_string())
    );
}

#[tokio::test]
async fn settings_get_and_patch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sync/settings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"upload_enabled": true, "conflict_strategy": "client_wins", "last_sync_at": null}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/sync/settings/"))
        .and(body_json(json!({"upload_enabled": false, "conflict_strategy": "server_wins"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"upload_enabled": false, "conflict_strategy": "server_wins"}
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let scope = Scope::new("acme", "1");
    let remote = api.get_settings(&scope).await.unwrap();
    assert!(remote.upload_enabled);
    assert_eq!(remote.conflict_strategy, ConflictStrategy::ClientWins);

    let updated = api
        .update_settings(
            &scope,
            &RemoteSettingsUpdate {
                upload_enabled: false,
                conflict_strategy: ConflictStrategy::ServerWins,
            },
        )
        .await
        .unwrap();
    assert!(!updated.upload_enabled);
}

#[tokio::test]
async fn http_errors_carry_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/desktop/5/move/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"msg": "Target is not a folder"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sync/pull/"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "Not a member of tenant"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sync/push/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let api = client(&server);
    let scope = Scope::new("acme", "1");

    let move_error = api
        .move_icon(&scope, IconId::new(5), FolderRef::Category(CategoryId::new(6)))
        .await
        .unwrap_err();
    assert!(matches!(move_error, ApiError::Http { status: 400, .. }));
    assert_eq!(move_error.user_message(), "Target is not a folder");

    let pull_error = api
        .pull(&scope, &PullRequest { since: None })
        .await
        .unwrap_err();
    assert_eq!(pull_error.user_message(), "Not a member of tenant");

    let push_error = api
        .push(
            &scope,
            &PushRequest {
                conflict_strategy: ConflictStrategy::ServerWins,
                icons: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(push_error.user_message(), "request failed");
}

#[tokio::test]
async fn undecodable_body_is_client_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/desktop/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client(&server)
        .list_icons(&Scope::default(), FolderRef::Root)
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Client(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let api = HttpApi::with_options(&base, None, Duration::from_secs(2)).unwrap();
    let error = api
        .pull(&Scope::default(), &PullRequest { since: None })
        .await
        .unwrap_err();

    assert!(error.is_network());
    assert_eq!(error.user_message(), "network connection failed");
}
