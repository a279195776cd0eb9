//! Job ownership, listing and aggregate views through the HTTP surface.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use support::{create_job, init_api, memory_ports, register, register_admin, send};

fn companies(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("job list")
        .iter()
        .map(|job| job["company"].as_str().expect("company").to_owned())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn admins_see_every_job_and_applicants_their_own() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    create_job(&app, &alice.token, "Acme", "Applied").await;
    let bobs = create_job(&app, &bob.token, "Globex", "Offer").await;

    let (_, body) = send(&app, TestRequest::get().uri("/api/jobs"), Some(&alice.token)).await;
    assert_eq!(companies(&body), vec!["Acme"]);

    let (_, body) = send(&app, TestRequest::get().uri("/api/jobs"), Some(&admin.token)).await;
    assert_eq!(body["total"], 2);

    let uri = format!("/api/jobs/{}", bobs["id"].as_str().expect("id"));
    let (status, body) = send(&app, TestRequest::get().uri(&uri), Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["company"], "Globex");
}

#[rstest]
#[case("status=Offer", vec!["Initech"])]
#[case("status=all", vec!["Initech", "Globex", "Acme"])]
#[case("status=bogus", vec!["Initech", "Globex", "Acme"])]
#[actix_web::test]
async fn list_filters_by_status(#[case] query: &str, #[case] expected: Vec<&str>) {
    let app = init_api(memory_ports().http_state()).await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    create_job(&app, &alice.token, "Acme", "Applied").await;
    create_job(&app, &alice.token, "Globex", "Interview").await;
    create_job(&app, &alice.token, "Initech", "Offer").await;

    let uri = format!("/api/jobs?{query}");
    let (status, body) = send(&app, TestRequest::get().uri(&uri), Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    let mut listed = companies(&body);
    listed.sort();
    let mut expected: Vec<String> = expected.into_iter().map(str::to_owned).collect();
    expected.sort();
    assert_eq!(listed, expected);
}

#[rstest]
#[actix_web::test]
async fn stats_and_dashboard_count_by_status() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    create_job(&app, &alice.token, "Acme", "Interview").await;
    create_job(&app, &alice.token, "Globex", "Interview").await;
    create_job(&app, &alice.token, "Initech", "Rejected").await;

    let (status, body) = send(&app, TestRequest::get().uri("/api/users/dashboard"), Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalJobs"], 3);
    assert_eq!(body["data"]["statusCounts"], json!({"Interview": 2, "Rejected": 1}));
    assert_eq!(
        body["data"]["upcomingInterviews"].as_array().map(Vec::len),
        Some(2)
    );

    let (status, body) = send(&app, TestRequest::get().uri("/api/users/stats"), Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalUsers"], 2);
    assert_eq!(body["data"]["totalJobs"], 3);
}

#[rstest]
#[actix_web::test]
async fn deleting_a_user_removes_their_jobs() {
    let ports = memory_ports();
    let app = init_api(ports.http_state()).await;
    let admin = register_admin(&app, &ports, "Root", "root@example.com").await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    create_job(&app, &alice.token, "Acme", "Applied").await;

    let (status, _) = send(
        &app,
        TestRequest::delete().uri(&format!("/api/users/{}", alice.id)),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, TestRequest::get().uri("/api/jobs"), Some(&admin.token)).await;
    assert_eq!(body["total"], 0);
}

#[rstest]
#[actix_web::test]
async fn foreign_jobs_cannot_be_changed() {
    let app = init_api(memory_ports().http_state()).await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;
    let job = create_job(&app, &alice.token, "Acme", "Applied").await;
    let uri = format!("/api/jobs/{}", job["id"].as_str().expect("id"));

    let (status, body) = send(
        &app,
        TestRequest::put().uri(&uri).set_json(json!({"status": "Offer"})),
        Some(&bob.token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to update this job");

    let (status, body) = send(&app, TestRequest::delete().uri(&uri), Some(&bob.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to delete this job");

    let (_, body) = send(&app, TestRequest::get().uri(&uri), Some(&alice.token)).await;
    assert_eq!(body["data"]["status"], "Applied");
}
