mod common;

use axum::http::{Method, StatusCode};
use common::{role_id, sample_role, Ports, TestApp};
use role_service::dtos::*;
use role_service::handlers::role::*;
use role_service::utils::{Search, SearchFilter, Sort, SortDirection, SortField};
use serde_json::json;

#[tokio::test]
async fn create_forwards_body_once_and_returns_output_verbatim() {
    let role = sample_role();
    let app = TestApp::new(Ports::returning(role.clone()));

    let response = app
        .send_as(
            ROLE_CREATE,
            Method::POST,
            "/v1/roles",
            Some(json!({ "name": "BACKOFFICE", "permissions": ["user:create"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, serde_json::to_value(&role).unwrap());

    let calls = app.ports.create.calls();
    assert_eq!(
        calls,
        vec![RoleCreateInput {
            name: "BACKOFFICE".to_string(),
            permissions: vec!["user:create".to_string()],
        }]
    );
    assert_eq!(app.ports.total_calls(), 1);
}

#[tokio::test]
async fn update_merges_path_id_over_body_id() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(
            ROLE_UPDATE,
            Method::PUT,
            "/v1/roles/role-42",
            Some(json!({ "id": "smuggled", "name": "USER" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        app.ports.update.calls(),
        vec![RoleUpdateInput {
            id: role_id("role-42"),
            name: Some("USER".to_string()),
            permissions: None,
        }]
    );
}

#[tokio::test]
async fn get_by_id_forwards_path_id() {
    let role = sample_role();
    let app = TestApp::new(Ports::returning(role.clone()));

    let response = app
        .send_as(ROLE_GET_BY_ID, Method::GET, "/v1/roles/role-7", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], role.id.to_string());
    assert_eq!(
        app.ports.get_by_id.calls(),
        vec![RoleGetByIdInput {
            id: role_id("role-7")
        }]
    );
}

#[tokio::test]
async fn delete_forwards_path_id() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(ROLE_DELETE, Method::DELETE, "/v1/roles/role-9", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        app.ports.delete.calls(),
        vec![RoleDeleteInput {
            id: role_id("role-9")
        }]
    );
}

#[tokio::test]
async fn add_permissions_merges_path_id() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(
            ROLE_ADD_PERMISSION,
            Method::PUT,
            "/v1/roles/add-permissions/role-3",
            Some(json!({ "id": "other", "permissions": ["user:update", "user:delete"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        app.ports.add_permission.calls(),
        vec![RoleAddPermissionInput {
            id: role_id("role-3"),
            permissions: vec!["user:update".to_string(), "user:delete".to_string()],
        }]
    );
    assert!(app.ports.delete_permission.calls().is_empty());
}

#[tokio::test]
async fn remove_permissions_merges_path_id_and_answers_200() {
    let role = sample_role();
    let app = TestApp::new(Ports::returning(role.clone()));

    let response = app
        .send_as(
            ROLE_DELETE_PERMISSION,
            Method::PUT,
            "/v1/roles/remove-permissions/role-3",
            Some(json!({ "permissions": ["user:list"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, serde_json::to_value(&role).unwrap());
    assert_eq!(
        app.ports.delete_permission.calls(),
        vec![RoleDeletePermissionInput {
            id: role_id("role-3"),
            permissions: vec!["user:list".to_string()],
        }]
    );
    assert!(app.ports.add_permission.calls().is_empty());
}

#[tokio::test]
async fn list_parses_sort_and_search_and_coerces_paging() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(
            ROLE_LIST,
            Method::GET,
            "/v1/roles?limit=5&page=2&sort=name:asc&search=name:USER%7CBACKOFFICE",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 1);

    let calls = app.ports.list.calls();
    assert_eq!(calls.len(), 1);
    let input = &calls[0];
    assert_eq!(input.limit, 5.0);
    assert_eq!(input.page, 2.0);
    assert_eq!(
        input.sort,
        Sort(vec![SortField {
            field: "name".to_string(),
            direction: SortDirection::Asc,
        }])
    );
    assert_eq!(
        input.search,
        Some(Search(vec![SearchFilter {
            field: "name".to_string(),
            values: vec!["USER".to_string(), "BACKOFFICE".to_string()],
        }]))
    );
}

#[tokio::test]
async fn list_forwards_non_numeric_paging_as_nan() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(ROLE_LIST, Method::GET, "/v1/roles?limit=ten&page=", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);

    let calls = app.ports.list.calls();
    assert!(calls[0].limit.is_nan());
    assert_eq!(calls[0].page, 0.0);
    assert_eq!(calls[0].sort, Sort::default());
    assert_eq!(calls[0].search, None);
}

#[tokio::test]
async fn list_rejects_malformed_sort_before_calling_port() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(ROLE_LIST, Method::GET, "/v1/roles?sort=name:sideways", None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.ports.list.calls().is_empty());
}

#[tokio::test]
async fn port_errors_pass_through_unchanged() {
    let app = TestApp::new(Ports::not_found());

    let cases = [
        (ROLE_UPDATE, Method::PUT, "/v1/roles/missing", Some(json!({ "name": "X" }))),
        (ROLE_GET_BY_ID, Method::GET, "/v1/roles/missing", None),
        (ROLE_DELETE, Method::DELETE, "/v1/roles/missing", None),
        (
            ROLE_ADD_PERMISSION,
            Method::PUT,
            "/v1/roles/add-permissions/missing",
            Some(json!({ "permissions": ["a:b"] })),
        ),
        (
            ROLE_DELETE_PERMISSION,
            Method::PUT,
            "/v1/roles/remove-permissions/missing",
            Some(json!({ "permissions": ["a:b"] })),
        ),
    ];

    for (permission, method, uri, body) in cases {
        let response = app.send_as(permission, method, uri, body).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.body["error"], "Role not found", "{uri}");
    }
}

#[tokio::test]
async fn malformed_body_never_reaches_port() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(
            ROLE_ADD_PERMISSION,
            Method::PUT,
            "/v1/roles/add-permissions/role-1",
            Some(json!({ "permissions": "user:create" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Json parse error")));
    assert!(app.ports.add_permission.calls().is_empty());
}

#[tokio::test]
async fn blank_path_id_is_rejected_with_error_body() {
    let app = TestApp::new(Ports::returning(sample_role()));

    let response = app
        .send_as(ROLE_GET_BY_ID, Method::GET, "/v1/roles/%20", None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Invalid path")));
    assert!(app.ports.get_by_id.calls().is_empty());
}
