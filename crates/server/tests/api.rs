use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> (Router, tempfile::TempDir) {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let router = server::router(
        engine,
        db,
        server::ServerConfig {
            jwt_secret: "test-secret".to_string(),
            receipts_dir: dir.path().to_path_buf(),
        },
    );
    (router, dir)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn multipart_request(
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"receipt\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn register(router: &Router, username: &str, email: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "username": username, "email": email, "password": "Str0ng!pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn food_category_id(router: &Router, token: &str) -> i64 {
    let (status, body) = send(router, get_request("/categories", token)).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Food")
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

fn lunch_body(category_id: i64) -> Value {
    json!({
        "amount": 250.0,
        "description": "Lunch",
        "category_id": category_id,
        "payment_method": "card",
        "expense_date": "2026-08-20",
        "tags": "food, lunch",
    })
}

#[tokio::test]
async fn register_rejects_weak_and_duplicate_accounts() {
    let (router, _dir) = app().await;
    register(&router, "alice", "alice@example.com").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "username": "alice2", "email": "ALICE@example.com", "password": "Str0ng!pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMAIL_EXISTS");

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "username": "bob", "email": "bob@example.com", "password": "alllowercase" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "WEAK_PASSWORD");

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "username": "bob", "email": "bob@mailinator.com", "password": "Str0ng!pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DISPOSABLE_EMAIL");

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({ "username": "b", "email": "b@example.com", "password": "Str0ng!pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_and_profile_flow() {
    let (router, _dir) = app().await;
    register(&router, "alice", "alice@example.com").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": "alice@example.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "email": "Alice@Example.com", "password": "Str0ng!pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(&router, get_request("/user/profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["full_name"], Value::Null);

    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            "/user/profile",
            Some(&token),
            &json!({ "full_name": "Alice Smith" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Alice Smith");

    let request = Request::builder()
        .method("GET")
        .uri("/user/profile")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, body) = send(&router, get_request("/user/profile", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn expense_crud_over_http() {
    let (router, _dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;
    let food = food_category_id(&router, &token).await;

    let (status, body) = send(
        &router,
        json_request("POST", "/expenses", Some(&token), &lunch_body(food)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["amount"], 250.0);
    assert_eq!(body["data"]["tags"], "food,lunch");
    let first_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        json_request("POST", "/expenses", Some(&token), &lunch_body(food)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "POSSIBLE_DUPLICATE");
    assert_eq!(body["error"]["details"]["id"].as_i64().unwrap(), first_id);

    let (status, body) = send(
        &router,
        json_request("POST", "/expenses?force=true", Some(&token), &lunch_body(food)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&router, get_request("/expenses?limit=1", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            &format!("/expenses/{first_id}"),
            Some(&token),
            &json!({ "amount": 300.5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 300.5);
    assert_eq!(body["data"]["description"], "Lunch");

    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            "/expenses/999999",
            Some(&token),
            &json!({ "amount": 1.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/expenses/{first_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/expenses/bulk-delete",
            Some(&token),
            &json!({ "ids": [second_id] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);
}

#[tokio::test]
async fn invalid_input_is_enveloped() {
    let (router, _dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;
    let food = food_category_id(&router, &token).await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/expenses",
            Some(&token),
            &json!({ "description": "No amount", "category_id": food }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let mut bad_category = lunch_body(999_999);
    bad_category["description"] = json!("Unknown category");
    let (status, body) = send(
        &router,
        json_request("POST", "/expenses", Some(&token), &bad_category),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_CATEGORY");
}

#[tokio::test]
async fn csv_export_streams_rows() {
    let (router, _dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;

    let (status, body) = send(&router, get_request("/expenses/export", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_DATA");

    let food = food_category_id(&router, &token).await;
    let (status, _) = send(
        &router,
        json_request("POST", "/expenses", Some(&token), &lunch_body(food)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get_request("/expenses/export", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("id,category_id,amount,description,payment_method"));
    assert!(text.contains("Lunch"));
    assert!(text.contains("250.00"));
}

#[tokio::test]
async fn multipart_create_stores_the_receipt() {
    let (router, dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;
    let food = food_category_id(&router, &token).await;
    let category_id = food.to_string();
    let today = Utc::now().date_naive().to_string();

    let fields = [
        ("amount", "42.00"),
        ("description", "Printer ink"),
        ("category_id", category_id.as_str()),
        ("payment_method", "cash"),
        ("expense_date", today.as_str()),
    ];

    let (status, body) = send(
        &router,
        multipart_request(
            "/expenses",
            &token,
            &fields,
            Some(("bill.png", "image/png", b"png bytes")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let receipt_path = body["data"]["receipt_path"].as_str().unwrap();
    assert!(receipt_path.contains("bill.png"));
    assert!(std::path::Path::new(receipt_path).exists());
    assert!(receipt_path.starts_with(dir.path().to_str().unwrap()));

    let (status, body) = send(
        &router,
        multipart_request(
            "/expenses",
            &token,
            &fields,
            Some(("notes.txt", "text/plain", b"not a receipt")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");
}

#[tokio::test]
async fn analytics_endpoints_summarize_spending() {
    let (router, _dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;
    let food = food_category_id(&router, &token).await;
    let today = Utc::now().date_naive().to_string();

    for (amount, description) in [(10.0, "Breakfast"), (20.0, "Dinner")] {
        let (status, _) = send(
            &router,
            json_request(
                "POST",
                "/expenses",
                Some(&token),
                &json!({
                    "amount": amount,
                    "description": description,
                    "category_id": food,
                    "payment_method": "cash",
                    "expense_date": today,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, get_request("/analytics/overview", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_month_total"], 30.0);
    assert_eq!(body["data"]["previous_month_total"], 0.0);
    assert_eq!(body["data"]["top_categories"][0]["name"], "Food");
    assert_eq!(body["data"]["recent_expenses"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &router,
        get_request("/analytics/charts/spending-by-category", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Food");
    assert_eq!(body["data"][0]["total"], 30.0);

    let (status, body) = send(
        &router,
        get_request("/analytics/charts/monthly-trends", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trends = body["data"].as_array().unwrap();
    assert_eq!(trends.last().unwrap()["total"], 30.0);

    let (status, body) = send(
        &router,
        get_request("/analytics/predictions/forecast", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["avg_daily"], 30.0);
    assert!(body["data"]["projected_month_total"].as_f64().unwrap() >= 30.0);
}

#[tokio::test]
async fn category_routes_roundtrip() {
    let (router, _dir) = app().await;
    let token = register(&router, "alice", "alice@example.com").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/categories",
            Some(&token),
            &json!({ "name": "Games" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["color_code"], "#3498db");
    let games_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/categories",
            Some(&token),
            &json!({ "name": "games" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DUPLICATE_CATEGORY");

    let (status, body) = send(
        &router,
        json_request(
            "PUT",
            &format!("/categories/{games_id}"),
            Some(&token),
            &json!({ "name": "Video games", "color_code": "#000000" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Video games");

    let system_id = {
        let (_, body) = send(&router, get_request("/categories", &token)).await;
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["is_system"] == true)
            .unwrap()["id"]
            .as_i64()
            .unwrap()
    };
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/categories/{system_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SYSTEM_CATEGORY");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/categories/{games_id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
