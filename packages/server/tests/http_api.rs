//! HTTP API integration tests.
//!
//! Tests for the conversation store endpoints (health check, history, create).

mod fixtures;
use fixtures::{TestServer, token_for};
use venturechat_server::domain::Role;

async fn post_message(
    client: &reqwest::Client,
    server: &TestServer,
    token: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/conversations", server.base_url()))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start(19080).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_conversation_requires_token() {
    // テスト項目: トークンなし・不正トークンの履歴取得は 401
    // given (前提条件):
    let server = TestServer::start(19081).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/conversations/founder-1", server.base_url());

    // when (操作):
    let missing = client.get(&url).send().await.expect("Failed to send request");
    let invalid = client
        .get(&url)
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(missing.status(), 401);
    assert_eq!(invalid.status(), 401);
    let body: serde_json::Value = invalid.json().await.expect("Failed to parse JSON");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_create_message_returns_created() {
    // テスト項目: メッセージ作成は 201 と永続化されたメッセージを返す
    // given (前提条件):
    let server = TestServer::start(19082).await;
    let client = reqwest::Client::new();
    let token = token_for("investor-1", Role::Investor);

    // when (操作):
    let response = post_message(
        &client,
        &server,
        &token,
        serde_json::json!({"receiverId": "founder-1", "body": "  Hello there  "}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["senderId"], "investor-1");
    assert_eq!(body["receiverId"], "founder-1");
    assert_eq!(body["body"], "Hello there");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["sentAt"].is_string());
}

#[tokio::test]
async fn test_create_message_accepts_legacy_message_field() {
    // テスト項目: 旧フィールド名 "message" でも本文として受け付ける
    let server = TestServer::start(19083).await;
    let client = reqwest::Client::new();
    let token = token_for("investor-1", Role::Investor);

    let response = post_message(
        &client,
        &server,
        &token,
        serde_json::json!({"receiverId": "founder-1", "message": "legacy"}),
    )
    .await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["body"], "legacy");
}

#[tokio::test]
async fn test_create_message_rejects_invalid_input() {
    // テスト項目: 不足フィールド・空白のみ本文・自分宛ては 400
    // given (前提条件):
    let server = TestServer::start(19084).await;
    let client = reqwest::Client::new();
    let token = token_for("investor-1", Role::Investor);

    let cases = [
        serde_json::json!({"body": "no receiver"}),
        serde_json::json!({"receiverId": "founder-1"}),
        serde_json::json!({"receiverId": "founder-1", "body": "   "}),
        serde_json::json!({"receiverId": "investor-1", "body": "note to self"}),
    ];

    for case in cases {
        // when (操作):
        let response = post_message(&client, &server, &token, case.clone()).await;

        // then (期待する結果):
        assert_eq!(response.status(), 400, "payload: {case}");
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_create_message_missing_fields_message() {
    // テスト項目: 必須フィールド欠落時のエラーメッセージ
    let server = TestServer::start(19085).await;
    let client = reqwest::Client::new();
    let token = token_for("investor-1", Role::Investor);

    let response = post_message(&client, &server, &token, serde_json::json!({})).await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Receiver ID and message are required");
}

#[tokio::test]
async fn test_create_message_requires_token() {
    // テスト項目: トークンなしのメッセージ作成は 401 で、何も保存されない
    // given (前提条件):
    let server = TestServer::start(19086).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/conversations", server.base_url()))
        .json(&serde_json::json!({"receiverId": "founder-1", "body": "hi"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 401);
    let history: serde_json::Value = client
        .get(format!("{}/api/conversations/investor-1", server.base_url()))
        .bearer_auth(token_for("founder-1", Role::Entrepreneur))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(history, serde_json::json!([]));
}

#[tokio::test]
async fn test_conversation_history_is_ordered_and_symmetric() {
    // テスト項目: 履歴は送信時刻の昇順で、双方から同じ内容が見える
    // given (前提条件):
    let server = TestServer::start(19087).await;
    let client = reqwest::Client::new();
    let investor = token_for("investor-1", Role::Investor);
    let founder = token_for("founder-1", Role::Entrepreneur);

    post_message(
        &client,
        &server,
        &investor,
        serde_json::json!({"receiverId": "founder-1", "body": "first"}),
    )
    .await;
    post_message(
        &client,
        &server,
        &founder,
        serde_json::json!({"receiverId": "investor-1", "body": "second"}),
    )
    .await;
    post_message(
        &client,
        &server,
        &investor,
        serde_json::json!({"receiverId": "founder-2", "body": "elsewhere"}),
    )
    .await;

    // when (操作):
    let from_investor: Vec<serde_json::Value> = client
        .get(format!("{}/api/conversations/founder-1", server.base_url()))
        .bearer_auth(&investor)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let from_founder: Vec<serde_json::Value> = client
        .get(format!("{}/api/conversations/investor-1", server.base_url()))
        .bearer_auth(&founder)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    let bodies: Vec<_> = from_investor.iter().map(|m| m["body"].clone()).collect();
    assert_eq!(bodies, vec!["first", "second"]);
    assert_eq!(from_investor, from_founder);
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_is_accepted() {
    // テスト項目: Authorization ヘッダーのスキーム名が小文字でも認証される
    // given (前提条件):
    let server = TestServer::start(19088).await;
    let client = reqwest::Client::new();
    let token = token_for("investor-1", Role::Investor);

    // when (操作):
    let response = client
        .get(format!("{}/api/conversations/founder-1", server.base_url()))
        .header("authorization", format!("bearer {token}"))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
}
