//! HTTP tests for wishlists, items and bookings

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wili::{
    Result,
    auth::TokenIssuer,
    bot::{Bot, BotLinks},
    handlers::{AppState, create_router},
    store::{MemoryUserStore, MemoryWishlistStore, UserStore},
    telegram::{
        BotApi,
        local::StoreWishlistApi,
        types::{AnswerInlineQuery, SendMessage},
    },
    types::User,
};

const WEBHOOK_SECRET: &str = "hook-secret";

#[derive(Default)]
struct RecordingApi {
    answers: Mutex<Vec<AnswerInlineQuery>>,
}

#[async_trait]
impl BotApi for RecordingApi {
    async fn send_message(&self, _message: &SendMessage) -> Result<()> {
        Ok(())
    }

    async fn answer_inline_query(&self, answer: &AnswerInlineQuery) -> Result<()> {
        self.answers.lock().unwrap().push(answer.clone());
        Ok(())
    }
}

struct TestApp {
    server: TestServer,
    users: Arc<MemoryUserStore>,
    tokens: TokenIssuer,
    api: Arc<RecordingApi>,
}

/// The bot reads wishlists straight from the store the HTTP API writes to.
fn create_test_app() -> TestApp {
    let users = Arc::new(MemoryUserStore::new());
    let wishlists = Arc::new(MemoryWishlistStore::new());
    let tokens = TokenIssuer::new(b"test-jwt-secret", Duration::from_secs(3600));
    let api = Arc::new(RecordingApi::default());

    let bot = Bot::new(
        BotLinks {
            webapp_url: "https://app.wili.me".to_string(),
            web_fallback_url: "https://wili.me".to_string(),
            frontend_url: "https://wili.me".to_string(),
            miniapp_bot: None,
            miniapp_name: None,
        },
        api.clone(),
        Arc::new(StoreWishlistApi::new(wishlists.clone(), tokens.clone())),
        users.clone(),
        tokens.clone(),
    );

    let state = AppState {
        users: users.clone(),
        wishlists,
        tokens: tokens.clone(),
        telegram_bot_token: Some("123:ABC".to_string()),
        init_data_max_age: Duration::from_secs(86400),
        bot: Some(Arc::new(bot)),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        webhook_route: "/webhook".to_string(),
    };

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        users,
        tokens,
        api,
    }
}

/// Register a user and return the Authorization header value for them.
async fn sign_up(app: &TestApp, name: &str) -> (User, HeaderValue) {
    let user = User::new(name);
    app.users.upsert(&user).await.unwrap();
    let token = app.tokens.issue(user.id).unwrap().token;
    let header = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();
    (user, header)
}

async fn create_wishlist(app: &TestApp, auth: &HeaderValue, title: &str) -> Value {
    let response = app
        .server
        .post("/wishlists")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "title": title }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn add_item(app: &TestApp, auth: &HeaderValue, list_id: &str, name: &str) -> Value {
    let response = app
        .server
        .post(&format!("/wishlists/{}/items", list_id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "type": "text", "data": { "name": name } }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_wishlist_crud() {
    let app = create_test_app();
    let (user, auth) = sign_up(&app, "Ada").await;

    let created = create_wishlist(&app, &auth, "Birthday").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["userId"], user.id.to_string());
    assert_eq!(created["items"], json!([]));

    let listed: Value = app
        .server
        .get("/wishlists")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(listed["wishlists"].as_array().unwrap().len(), 1);

    // public read, no token
    let fetched = app.server.get(&format!("/wishlists/{}", id)).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["title"], "Birthday");

    let updated = app
        .server
        .put(&format!("/wishlists/{}", id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "description": "June" }))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["title"], "Birthday");
    assert_eq!(updated["description"], "June");

    app.server
        .delete(&format!("/wishlists/{}", id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/wishlists/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wishlist_validation_lists_fields() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;

    let response = app
        .server
        .post("/wishlists")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "title": "  ", "description": "a".repeat(2001) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "ValidationFailed");
    assert_eq!(body["details"][0]["field"], "title");
    assert_eq!(body["details"][0]["message"], "field is required and cannot be empty");
    assert_eq!(body["details"][1]["field"], "description");
}

#[tokio::test]
async fn test_wishlist_requires_token() {
    let app = create_test_app();

    app.server
        .post("/wishlists")
        .json(&json!({ "title": "Birthday" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // token for an account that does not exist
    let ghost = app.tokens.issue(uuid::Uuid::new_v4()).unwrap().token;
    app.server
        .get("/wishlists")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", ghost)).unwrap(),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_owner_is_rejected() {
    let app = create_test_app();
    let (_, owner) = sign_up(&app, "Ada").await;
    let (_, stranger) = sign_up(&app, "Eve").await;

    let list = create_wishlist(&app, &owner, "Birthday").await;
    let id = list["id"].as_str().unwrap();

    let response = app
        .server
        .put(&format!("/wishlists/{}", id))
        .add_header(AUTHORIZATION, stranger.clone())
        .json(&json!({ "title": "Mine now" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "PermissionDenied");

    app.server
        .post(&format!("/wishlists/{}/items", id))
        .add_header(AUTHORIZATION, stranger.clone())
        .json(&json!({ "type": "text", "data": { "name": "Spoon" } }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // deleting someone else's list looks like deleting a missing one
    app.server
        .delete(&format!("/wishlists/{}", id))
        .add_header(AUTHORIZATION, stranger.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let listed: Value = app
        .server
        .get("/wishlists")
        .add_header(AUTHORIZATION, stranger)
        .await
        .json();
    assert_eq!(listed["wishlists"], json!([]));
}

#[tokio::test]
async fn test_item_lifecycle() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;
    let list = create_wishlist(&app, &auth, "Birthday").await;
    let id = list["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/wishlists/{}/items", id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({
            "type": "link",
            "data": { "name": "Kettle", "url": "https://shop.example/kettle", "price": 42 }
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let item: Value = response.json();
    let item_id = item["id"].as_str().unwrap();
    assert_eq!(item["type"], "link");
    assert_eq!(item["data"]["price"], 42);

    let response = app
        .server
        .put(&format!("/wishlists/{}/items/{}", id, item_id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "data": { "name": "Electric kettle" } }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["type"], "link");
    assert_eq!(updated["data"]["name"], "Electric kettle");
    assert!(updated["data"].get("url").is_none());

    let fetched: Value = app.server.get(&format!("/wishlists/{}", id)).await.json();
    assert_eq!(fetched["items"][0]["data"]["name"], "Electric kettle");

    app.server
        .delete(&format!("/wishlists/{}/items/{}", id, item_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .delete(&format!("/wishlists/{}/items/{}", id, item_id))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_item_validation() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;
    let list = create_wishlist(&app, &auth, "Birthday").await;
    let id = list["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/wishlists/{}/items", id))
        .add_header(AUTHORIZATION, auth)
        .json(&json!({ "type": "link", "data": { "name": "", "url": "shop.example" } }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let fields: Vec<String> = response.json::<Value>()["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["data.name", "data.url"]);
}

#[tokio::test]
async fn test_guest_booking_and_cancellation() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;
    let list = create_wishlist(&app, &auth, "Birthday").await;
    let id = list["id"].as_str().unwrap();
    let item = add_item(&app, &auth, id, "Kettle").await;
    let booking_path = format!("/wishlists/{}/items/{}/booking", id, item["id"].as_str().unwrap());

    let response = app
        .server
        .post(&booking_path)
        .json(&json!({ "bookerName": "Bob", "message": "   " }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let receipt: Value = response.json();
    let token = receipt["cancellationToken"].as_str().unwrap().to_string();
    assert_eq!(receipt["bookerName"], "Bob");
    assert!(receipt.get("message").is_none());

    // the public view shows the booking but never the token
    let fetched: Value = app.server.get(&format!("/wishlists/{}", id)).await.json();
    let booking = &fetched["items"][0]["booking"];
    assert_eq!(booking["bookingId"], receipt["bookingId"]);
    assert!(booking.get("cancellationToken").is_none());

    let response = app.server.post(&booking_path).json(&json!({})).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Conflict");

    app.server
        .delete(&booking_path)
        .json(&json!({ "cancellationToken": "not-the-token" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&booking_path)
        .json(&json!({ "cancellationToken": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .delete(&booking_path)
        .json(&json!({ "cancellationToken": token }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let fetched: Value = app.server.get(&format!("/wishlists/{}", id)).await.json();
    assert!(fetched["items"][0].get("booking").is_none());
}

#[tokio::test]
async fn test_owner_removes_booking_by_id() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;
    let (_, stranger) = sign_up(&app, "Eve").await;
    let list = create_wishlist(&app, &auth, "Birthday").await;
    let id = list["id"].as_str().unwrap();
    let item = add_item(&app, &auth, id, "Kettle").await;
    let booking_path = format!("/wishlists/{}/items/{}/booking", id, item["id"].as_str().unwrap());

    let receipt: Value = app.server.post(&booking_path).json(&json!({})).await.json();
    let by_id = format!("{}/{}", booking_path, receipt["bookingId"].as_str().unwrap());

    app.server
        .delete(&by_id)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .delete(&by_id)
        .add_header(AUTHORIZATION, stranger)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.server
        .delete(&by_id)
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // item can be booked again
    app.server
        .post(&booking_path)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_missing_item() {
    let app = create_test_app();
    let (_, auth) = sign_up(&app, "Ada").await;
    let list = create_wishlist(&app, &auth, "Birthday").await;

    let path = format!(
        "/wishlists/{}/items/{}/booking",
        list["id"].as_str().unwrap(),
        uuid::Uuid::new_v4()
    );
    app.server
        .post(&path)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inline_my_wishlists_reads_local_store() {
    let app = create_test_app();
    let user = User::new("tg:77");
    app.users.upsert_with_telegram_id(&user, 77).await.unwrap();
    let token = app.tokens.issue(user.id).unwrap().token;
    let auth = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();

    let list = create_wishlist(&app, &auth, "Birthday").await;

    let update = json!({
        "update_id": 9,
        "inline_query": {"id": "q9", "from": {"id": 77}, "query": ""}
    });
    app.server
        .post("/webhook")
        .add_header(
            HeaderName::from_static("x-telegram-bot-api-secret-token"),
            HeaderValue::from_static(WEBHOOK_SECRET),
        )
        .json(&update)
        .await
        .assert_status_ok();

    let answers = app.api.answers.lock().unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].results.len(), 1);
    assert_eq!(
        answers[0].results[0].id,
        format!("my_{}", list["id"].as_str().unwrap())
    );
}
