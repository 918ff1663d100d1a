//! End-to-end authorization tests
//!
//! Drive the full axum application (middleware stack included) over an
//! in-memory database: session gate outcomes, permission gating, ownership
//! checks and the account-lock flow as seen from the HTTP boundary.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use rust_decimal::Decimal;
use tower::ServiceExt;

use verdant_server::api;
use verdant_server::db::models::{ProductCreate, UserCreate, WeightUnit};
use verdant_server::db::repository::{ProductRepository, StoreSettingsRepository, UserRepository};
use verdant_server::db::{DbService, seed};
use verdant_server::{Config, ServerState};

async fn test_state() -> ServerState {
    let db = DbService::open_in_memory().await.expect("in-memory db");
    seed::ensure_seed_data(&db).await.expect("seed");
    ServerState::with_db(Config::for_tests(), db)
}

fn app(state: &ServerState) -> Router {
    api::build_app(state).with_state(state.clone())
}

async fn create_user(state: &ServerState, name: &str, email: &str, role: Option<&str>) -> String {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: name.to_string(),
            email: email.to_string(),
            password: "a-strong-password".to_string(),
            role: role.map(|r| r.to_string()),
            is_admin: false,
        })
        .await
        .expect("create user");
    user.id.expect("id").to_string()
}

fn token_for(state: &ServerState, user_id: &str) -> String {
    state
        .get_jwt_service()
        .generate_token(user_id)
        .expect("token")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let state = test_state().await;

    let response = app(&state).oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(get("/api/products", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_request_to_gated_endpoint_is_401() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(get("/api/admin/orders", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(get("/api/orders/mine", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_401() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(get("/api/orders/mine", Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_manager_permissions_end_to_end() {
    let state = test_state().await;
    let manager_id = create_user(&state, "Morgan", "morgan@example.com", Some("store-manager")).await;
    let token = token_for(&state, &manager_id);

    // orders.read is in the store-manager seed set
    let response = app(&state)
        .oneshot(get("/api/admin/orders", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // users.delete is not
    let customer_id = create_user(&state, "Casey", "casey@example.com", None).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/admin/users/{}", customer_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_cannot_reach_admin_console() {
    let state = test_state().await;
    let customer_id = create_user(&state, "Casey", "casey@example.com", None).await;
    let token = token_for(&state, &customer_id);

    let response = app(&state)
        .oneshot(get("/api/admin/orders", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_lockout_flow() {
    let state = test_state().await;
    create_user(&state, "Morgan", "morgan@example.com", Some("store-manager")).await;

    // Five wrong passwords trip the lock
    for _ in 0..5 {
        let response = app(&state)
            .oneshot(post_json(
                "/api/auth/login",
                None,
                serde_json::json!({
                    "email": "morgan@example.com",
                    "password": "wrong-password"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Even the correct password now yields 423 with a retry hint
    let response = app(&state)
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({
                "email": "morgan@example.com",
                "password": "a-strong-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn test_successful_login_returns_token_and_permissions() {
    let state = test_state().await;
    create_user(&state, "Morgan", "morgan@example.com", Some("store-manager")).await;

    let response = app(&state)
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({
                "email": "morgan@example.com",
                "password": "a-strong-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token");
    assert!(!token.is_empty());
    assert_eq!(body["user"]["role"]["slug"], "store-manager");
    let permissions = body["user"]["permissions"].as_array().expect("permissions");
    assert!(permissions.iter().any(|p| p == "orders.read"));
    assert!(!permissions.iter().any(|p| p == "users.delete"));

    // The token works against the session gate
    let response = app(&state)
        .oneshot(get("/api/auth/me", Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_order_ownership_checks() {
    let state = test_state().await;
    let products = ProductRepository::new(state.get_db());
    let product = products
        .create(ProductCreate {
            name: "Organic Almonds".to_string(),
            description: "Raw almonds".to_string(),
            image: String::new(),
            category: None,
            brand: None,
            product_type: "Dry Fruits".to_string(),
            certifications: vec![],
            weight: 500.0,
            unit: WeightUnit::G,
            price: Decimal::new(1250, 2),
            price_per_unit: None,
            count_in_stock: 10,
            is_organic: true,
            is_vegan: true,
            is_gluten_free: true,
            is_fair_trade: false,
            is_featured: false,
            is_new_arrival: false,
            sku: None,
            tags: vec![],
        })
        .await
        .expect("product");
    let product_id = product.id.expect("id").to_string();

    let owner_id = create_user(&state, "Casey", "casey@example.com", None).await;
    let other_id = create_user(&state, "Robin", "robin@example.com", None).await;
    let manager_id = create_user(&state, "Morgan", "morgan@example.com", Some("store-manager")).await;

    // Owner places an order
    let response = app(&state)
        .oneshot(post_json(
            "/api/orders",
            Some(&token_for(&state, &owner_id)),
            serde_json::json!({
                "items": [{ "product": product_id, "qty": 2 }],
                "shipping_address": {
                    "street": "1 Main St", "city": "Springfield",
                    "state": "IL", "country": "US", "zip": "62701"
                },
                "payment_method": "cod"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await;
    let order_id = order["id"].as_str().expect("order id").to_string();
    assert_eq!(order["items_price"], serde_json::json!("25.00"));

    let uri = format!("/api/orders/{}", order_id);

    // Owner reads it back
    let response = app(&state)
        .oneshot(get(&uri, Some(&token_for(&state, &owner_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A different customer is denied
    let response = app(&state)
        .oneshot(get(&uri, Some(&token_for(&state, &other_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin tier bypasses ownership
    let response = app(&state)
        .oneshot(get(&uri, Some(&token_for(&state, &manager_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_registration_honors_store_setting() {
    let state = test_state().await;

    let response = app(&state)
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "New Customer",
                "email": "new@example.com",
                "password": "a-strong-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Flip the switch and try again
    StoreSettingsRepository::new(state.get_db())
        .update(verdant_server::db::models::StoreSettingsUpdate {
            allow_registration: Some(false),
            ..Default::default()
        })
        .await
        .expect("settings");

    let response = app(&state)
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "Too Late",
                "email": "late@example.com",
                "password": "a-strong-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivated_user_is_403_with_valid_token() {
    let state = test_state().await;
    let user_id = create_user(&state, "Casey", "casey@example.com", None).await;
    let token = token_for(&state, &user_id);

    UserRepository::new(state.get_db())
        .update(
            &user_id,
            verdant_server::db::models::UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("deactivate");

    let response = app(&state)
        .oneshot(get("/api/orders/mine", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_management_requires_permission() {
    let state = test_state().await;

    // Store manager lacks settings.roles.manage
    let manager_id = create_user(&state, "Morgan", "morgan@example.com", Some("store-manager")).await;
    let response = app(&state)
        .oneshot(get("/api/admin/roles", Some(&token_for(&state, &manager_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Super admin passes without an explicit grant
    let admin_id = create_user(&state, "Alex", "alex@example.com", Some("super-admin")).await;
    let response = app(&state)
        .oneshot(get("/api/admin/roles", Some(&token_for(&state, &admin_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
