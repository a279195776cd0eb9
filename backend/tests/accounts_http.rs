//! Account and role behaviour through the public HTTP surface.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use support::{PASSWORD, init_api, memory_ports, register, register_admin, send};

#[rstest]
#[actix_web::test]
async fn role_changes_apply_to_existing_tokens() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let alice = register(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(&app, TestRequest::get().uri("/api/users/stats"), Some(&alice.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/users/{}/role", alice.id))
            .set_json(json!({"role": "admin"})),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = send(&app, TestRequest::get().uri("/api/users/stats"), Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalAdmins"], 2);
}

#[rstest]
#[actix_web::test]
async fn deleted_users_lose_access() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let alice = register(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        TestRequest::delete().uri(&format!("/api/users/{}", alice.id)),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, TestRequest::get().uri("/api/auth/me"), Some(&alice.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn admins_cannot_remove_themselves() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/users/{}/role", admin.id))
            .set_json(json!({"role": "applicant"})),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Admins cannot demote themselves");

    let (status, body) = send(
        &app,
        TestRequest::delete().uri(&format!("/api/users/{}", admin.id)),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Admins cannot delete themselves");
}

#[rstest]
#[actix_web::test]
async fn admin_invite_reports_the_current_code() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let expected = ports.invites.generate().expect("invite");

    let (status, body) = send(&app, TestRequest::get().uri("/api/auth/admin-invite"), Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inviteCode"], expected.code);
}

#[rstest]
#[actix_web::test]
async fn login_matches_email_case_insensitively() {
    let app = init_api(memory_ports().http_state()).await;
    let alice = register(&app, "Alice", "Alice@Example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice@example.com", "password": PASSWORD})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["id"], alice.id.as_str());
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[rstest]
#[actix_web::test]
async fn profile_email_must_stay_unique() {
    let app = init_api(memory_ports().http_state()).await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    register(&app, "Bob", "bob@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri("/api/users/profile")
            .set_json(json!({"email": "bob@example.com"})),
        Some(&alice.token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already in use");
}
