use actix_web::{
    body::to_bytes,
    http::{header::AUTHORIZATION, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{DateTime, Days, TimeZone, Utc};
use log::debug;
use order_engine::db_types::{Bag, BagId, CustomerId, Money, Order, OrderId, OrderItem, OrderItemId, OrderStatusType, Product, ProductId};

use crate::{
    auth::{TokenAuthority, BEARER_PREFIX},
    config::AuthConfig,
    middleware::JwtAuthMiddlewareFactory,
    routes::health,
    server::configure_extractors,
};

// DO NOT re-use this secret anywhere.
const TEST_JWT_SECRET: &str = "f3c1a2b0-endpoint-tests-only-9d8e7f6a";

pub const CUSTOMER: &str = "6f1c3a4e-2b7d-4c1e-9a8f-0d2e5b6c7a81";
pub const OTHER_CUSTOMER: &str = "0b9e8d7c-6a5f-4e3d-8c2b-1a0f9e8d7c6b";
pub const BAG: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";
pub const ORDER: &str = "11111111-2222-4333-8444-555555555555";
pub const ITEM_A: &str = "aaaaaaaa-0000-4000-8000-000000000001";
pub const ITEM_B: &str = "bbbbbbbb-0000-4000-8000-000000000002";
pub const PRODUCT_A: &str = "c0ffee00-0000-4000-8000-00000000000a";
pub const PRODUCT_B: &str = "c0ffee00-0000-4000-8000-00000000000b";

pub fn id<T: std::str::FromStr>(s: &str) -> T
where T::Err: std::fmt::Debug {
    s.parse().unwrap()
}

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET)
}

pub fn issue_token(customer_id: CustomerId, expiry: DateTime<Utc>) -> String {
    let authority = TokenAuthority::new(&get_auth_config());
    authority.issue_token(customer_id, expiry).expect("Failed to sign token")
}

pub fn valid_token() -> String {
    issue_token(id(CUSTOMER), Utc::now() + Days::new(1))
}

/// Sends `req` through an app that mounts the routes in `configure` under `scope`, behind the authentication
/// middleware.
///
/// Errors raised by the middleware never reach a handler, so they are rendered into a response here the same way the
/// HTTP server would render them.
pub async fn send_request<F>(scope: &str, req: TestRequest, token: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let req = if token.is_empty() {
        req
    } else {
        req.insert_header((AUTHORIZATION, format!("{BEARER_PREFIX}{token}")))
    };
    let authority = TokenAuthority::new(&get_auth_config());
    let app = App::new().configure(configure_extractors).service(health).service(
        web::scope(scope).wrap(JwtAuthMiddlewareFactory::new(authority)).configure(configure),
    );
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = to_bytes(res.into_body()).await.unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 16, 12, 30, 0).unwrap()
}

pub fn bag(products: &[&str]) -> Bag {
    Bag {
        id: id(BAG),
        customer_id: id(CUSTOMER),
        products: products.iter().map(|p| id::<ProductId>(p)).collect(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn product(product_id: &str, price: i64) -> Product {
    Product {
        id: id(product_id),
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: Money::from(price),
        is_active: true,
        created_at: timestamp(),
    }
}

pub fn order(owner: &str, status: OrderStatusType) -> Order {
    Order {
        id: id(ORDER),
        customer_id: id(owner),
        total_price: Money::from(2_899),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn order_items() -> Vec<OrderItem> {
    vec![
        OrderItem { id: id(ITEM_A), order_id: id(ORDER), product_id: id(PRODUCT_A), quantity: 2 },
        OrderItem { id: id(ITEM_B), order_id: id(ORDER), product_id: id(PRODUCT_B), quantity: 1 },
    ]
}

pub fn bag_id() -> BagId {
    id(BAG)
}

pub fn order_id() -> OrderId {
    id(ORDER)
}

pub fn item_id() -> OrderItemId {
    id(ITEM_A)
}
