#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_api::models::{MoveTaskBody, StoreBody};
use opsdeck_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn envelope(status_code: u16, data: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": status_code, "message": "ok", "data": data })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!({
                "id": "u_1",
                "username": "admin",
                "displayName": "Administrator",
                "roleId": "r_1",
                "permissions": ["users:read", "users:write"]
            }),
        )))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    let info = client.login("admin", &secret).await.unwrap();

    assert_eq!(info.id, "u_1");
    assert_eq!(info.username, "admin");
    assert_eq!(info.permissions.len(), 2);
}

#[tokio::test]
async fn test_login_rejected_envelope() {
    let (server, client) = setup().await;

    // The server answers HTTP 200 but the envelope carries the rejection.
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 403,
            "message": "invalid credentials"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "invalid credentials"),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_http_401_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.list_users().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_user_info() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!({ "id": "u_1", "username": "admin", "permissions": [] }),
        )))
        .mount(&server)
        .await;

    let info = client.user_info().await.unwrap();
    assert_eq!(info.username, "admin");
}

#[tokio::test]
async fn test_logout_is_acknowledged() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "statusCode": 200, "message": "bye" })),
        )
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Envelope tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_users() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!([
                {
                    "id": "u_1",
                    "username": "amy",
                    "displayName": "Amy",
                    "email": "amy@example.com",
                    "roleId": "r_2",
                    "storeId": "s_9",
                    "enabled": true
                },
                { "id": "u_2", "username": "bo" }
            ]),
        )))
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "amy");
    assert_eq!(users[0].store_id.as_deref(), Some("s_9"));
    // Missing fields fall back to defaults
    assert!(users[1].enabled);
    assert!(users[1].email.is_none());
}

#[tokio::test]
async fn test_envelope_error_on_http_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 500,
            "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let result = client.list_stores().await;

    match result {
        Err(Error::Api {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_created_201_is_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            201,
            json!({
                "id": "s_1",
                "name": "Downtown",
                "regionId": "rg_1",
                "enabled": true
            }),
        )))
        .mount(&server)
        .await;

    let body = StoreBody {
        name: "Downtown".into(),
        region_id: Some("rg_1".into()),
        address: None,
        phone: None,
        enabled: true,
    };
    let store = client.create_store(&body).await.unwrap();
    assert_eq!(store.id, "s_1");
    assert_eq!(store.name, "Downtown");
}

#[tokio::test]
async fn test_garbled_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.list_regions().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Ticket tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_complete_ticket() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tickets/t_7/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!({
                "id": "t_7",
                "title": "Cracked screen",
                "status": "completed"
            }),
        )))
        .mount(&server)
        .await;

    let ticket = client.complete_ticket("t_7").await.unwrap();
    assert_eq!(ticket.status, "completed");
}

#[tokio::test]
async fn test_ticket_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tickets/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!({ "open": 4, "repairing": 2, "completed": 11, "closed": 30 }),
        )))
        .mount(&server)
        .await;

    let summary = client.ticket_summary().await.unwrap();
    assert_eq!(summary.open, 4);
    assert_eq!(summary.closed, 30);
}

// ── Board tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_project_board() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/projects/p_1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!({
                "sections": [
                    { "id": "sec_1", "projectId": "p_1", "name": "TODO", "rank": "a" },
                    { "id": "sec_2", "projectId": "p_1", "name": "Doing", "rank": "b" }
                ],
                "tasks": [
                    {
                        "id": "task_1",
                        "sectionId": "sec_1",
                        "name": "Setup CI",
                        "status": "todo",
                        "rank": "a0",
                        "subtasks": [{ "id": "st_1", "name": "pick runner", "done": false }]
                    }
                ]
            }),
        )))
        .mount(&server)
        .await;

    let board = client.project_board("p_1").await.unwrap();
    assert_eq!(board.sections.len(), 2);
    assert_eq!(board.tasks.len(), 1);
    assert_eq!(board.tasks[0].subtasks.len(), 1);
    assert_eq!(board.tasks[0].rank, "a0");
}

#[tokio::test]
async fn test_move_task_request_shape() {
    let (server, client) = setup().await;

    // The move body must carry the item plus its persisted neighbors;
    // `null` marks a list boundary.
    Mock::given(method("PUT"))
        .and(path("/api/projects/p_1/tasks/task_b/move"))
        .and(body_json(json!({
            "itemId": "task_b",
            "sectionId": "sec_1",
            "beforeId": "task_a",
            "afterId": null
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "statusCode": 202, "message": "accepted" })),
        )
        .mount(&server)
        .await;

    let body = MoveTaskBody {
        item_id: "task_b".into(),
        section_id: "sec_1".into(),
        before_id: Some("task_a".into()),
        after_id: None,
    };
    client.move_task("p_1", "task_b", &body).await.unwrap();
}

#[tokio::test]
async fn test_move_task_failure_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/projects/p_1/tasks/task_b/move"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 409,
            "message": "task was moved by another session"
        })))
        .mount(&server)
        .await;

    let body = MoveTaskBody {
        item_id: "task_b".into(),
        section_id: "sec_1".into(),
        before_id: None,
        after_id: Some("task_c".into()),
    };
    let result = client.move_task("p_1", "task_b", &body).await;

    assert!(
        matches!(result, Err(Error::Api { status_code: 409, .. })),
        "expected 409 Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_task_returns_persisted_row() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/projects/p_1/tasks"))
        .and(body_json(json!({ "sectionId": "sec_1", "name": "Setup CI" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            201,
            json!({
                "id": "t_123",
                "sectionId": "sec_1",
                "name": "Setup CI",
                "status": "todo",
                "rank": "c3"
            }),
        )))
        .mount(&server)
        .await;

    let body = opsdeck_api::models::TaskCreateBody {
        section_id: "sec_1".into(),
        name: "Setup CI".into(),
    };
    let task = client.create_task("p_1", &body).await.unwrap();
    assert_eq!(task.id, "t_123");
    assert_eq!(task.name, "Setup CI");
}
