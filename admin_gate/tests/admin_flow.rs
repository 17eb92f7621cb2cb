mod support;

use serde_json::{Value, json};

fn new_scope() -> String {
    format!("tab-{}", uuid::Uuid::new_v4())
}

#[tokio::test]
async fn test_admin_login_then_session_is_valid() {
    let base_url = support::ensure_gate();
    let client = reqwest::Client::new();
    support::wait_until_backend_ready(&client, base_url).await;
    let scope = new_scope();

    let res = client
        .post(format!("{base_url}/admin/login"))
        .header("x-session-scope", &scope)
        .json(&json!({ "username": "admin", "password": support::ADMIN_PASSWORD }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let session: Value = client
        .get(format!("{base_url}/admin/session"))
        .header("x-session-scope", &scope)
        .send()
        .await
        .expect("request should succeed")
        .json()
        .await
        .expect("expected json body");

    assert_eq!(session["state"], "valid");
    assert_eq!(session["authenticated"], true);
}

#[tokio::test]
async fn test_admin_login_with_wrong_password_is_rejected() {
    let base_url = support::ensure_gate();
    let client = reqwest::Client::new();
    support::wait_until_backend_ready(&client, base_url).await;

    let res = client
        .post(format!("{base_url}/admin/login"))
        .header("x-session-scope", new_scope())
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.expect("expected json body");
    assert_eq!(
        body["message"],
        "Invalid username or password. Please check your credentials and try again."
    );
}
