mod common;

use common::spawn_app;
use estate_admin::models::{RoleAssignment, RoleInput, UserUpdate};
use estate_admin::navigation;
use estate_admin::services::MasterTable;
use estate_core::ApiError;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_master_table_crud_paths() {
    let app = spawn_app(Some("a1"), Some("r1")).await;
    let row = json!({"name": "Freehold"});

    Mock::given(method("POST"))
        .and(path("/ownership-types/"))
        .and(body_json(row.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "Freehold"})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/ownership-types/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "Leasehold"})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/ownership-types/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let table = app.state.master_data.table(MasterTable::OwnershipTypes);

    let created: Value = table.create(&row).await.unwrap();
    assert_eq!(created["id"], 3);

    let updated: Value = table.update(3, &json!({"name": "Leasehold"})).await.unwrap();
    assert_eq!(updated["name"], "Leasehold");

    table.delete(3).await.unwrap();
}

#[tokio::test]
async fn test_properties_accept_paginated_list() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/properties/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 25,
            "next": "http://backend/properties/?page=2",
            "previous": null,
            "results": [{"id": 1, "title": "Lake View"}]
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let page = app.state.properties.list().await.unwrap();
    assert_eq!(page.count, 25);
    assert_eq!(page.results[0]["title"], "Lake View");
}

#[tokio::test]
async fn test_role_create_and_update() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("POST"))
        .and(path("/create-role/"))
        .and(body_json(json!({"name": "Editor", "permissions": [1, 2]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 4,
            "name": "Editor",
            "permissions": [1, 2]
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/edit-role/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "name": "Senior Editor"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let role = app
        .state
        .roles
        .create(&RoleInput {
            name: "Editor".into(),
            permissions: vec![1, 2],
        })
        .await
        .unwrap();
    assert_eq!(role.id, 4);
    assert_eq!(role.permissions, vec![1, 2]);

    let role = app
        .state
        .roles
        .update(
            4,
            &RoleInput {
                name: "Senior Editor".into(),
                permissions: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(role.name, "Senior Editor");
    assert!(role.permissions.is_empty());
}

#[tokio::test]
async fn test_role_without_name_is_rejected_locally() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    let err = app
        .state
        .roles
        .create(&RoleInput {
            name: String::new(),
            permissions: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn test_role_list_and_delete() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/get-roles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Admin", "permissions": [1, 2, 3]},
            {"id": 2, "name": "Viewer"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/delete-role/2/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let roles = app.state.roles.list().await.unwrap();
    assert_eq!(roles.len(), 2);
    assert!(roles[1].permissions.is_empty());

    app.state.roles.delete(2).await.unwrap();
}

#[tokio::test]
async fn test_permission_matrix_and_assignment() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/get-permissions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Can add group", "codename": "add_group", "content_type__model": "group"},
            {"id": 4, "name": "Can view group", "codename": "view_group", "content_type__model": "group"},
            {"id": 9, "name": "Can view city", "codename": "view_city", "content_type__model": "city"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/roles/4/assign-permissions/"))
        .and(body_json(json!({"permissions": [1, 4]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let matrix = app.state.permissions.matrix().await.unwrap();
    assert_eq!(matrix.models().collect::<Vec<_>>(), vec!["city", "group"]);
    assert_eq!(matrix.ids_for_model("group"), vec![1, 4]);

    let ids = matrix.ids_for_model("group");
    let result = app.state.permissions.assign_to_role(4, &ids).await.unwrap();
    assert_eq!(result["status"], "ok");
}

#[tokio::test]
async fn test_assign_roles_payload_shape() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("PATCH"))
        .and(path("/assign-role/5/"))
        .and(body_json(json!({"role_id": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": "single"})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/assign-role/5/"))
        .and(body_json(json!({"role_ids": [2, 3]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": "many"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let single = app.state.users.assign_roles(5, 2_i64).await.unwrap();
    assert_eq!(single["ok"], "single");

    let many = app
        .state
        .users
        .assign_roles(5, RoleAssignment::from(vec![2_i64, 3]))
        .await
        .unwrap();
    assert_eq!(many["ok"], "many");
}

#[tokio::test]
async fn test_user_update_without_password() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("PUT"))
        .and(path("/users/5/"))
        .and(body_json(json!({
            "username": "ravi",
            "email": "ravi@example.com",
            "first_name": "Ravi",
            "last_name": "K",
            "is_active": true,
            "is_superuser": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&app.server)
        .await;

    let update = UserUpdate {
        username: "ravi".into(),
        email: "ravi@example.com".into(),
        first_name: "Ravi".into(),
        last_name: "K".into(),
        phone_number: None,
        password: Some(String::new()),
        is_active: true,
        is_superuser: false,
    };
    let result = app.state.users.update(5, &update).await.unwrap();
    assert_eq!(result["id"], 5);
}

#[tokio::test]
async fn test_user_role_endpoints() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/user-role/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": ["Admin", "Viewer"]})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user-role-update/5/"))
        .and(body_json(json!({"groups": [1]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": ["Admin"]})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/user-role-delete/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Roles removed"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let roles = app.state.users.roles(5).await.unwrap();
    assert_eq!(roles.groups, vec!["Admin", "Viewer"]);

    let updated = app
        .state
        .users
        .update_roles(5, &json!({"groups": [1]}))
        .await
        .unwrap();
    assert_eq!(updated["groups"][0], "Admin");

    let removed = app.state.users.delete_roles(5).await.unwrap();
    assert_eq!(removed["message"], "Roles removed");
}

#[tokio::test]
async fn test_menu_from_user_permissions() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path("/user-permissions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "permissions": ["view_customuser", "view_group"]
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let permissions = app.state.users.permissions().await.unwrap();
    let menu = navigation::navigation_for(&permissions);

    let ids: Vec<_> = menu.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec!["dashboard", "master-tables", "user", "role-group"]);
}
