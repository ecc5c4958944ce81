use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{Duration, Utc};
use order_engine::{db_types::CustomerId, BagApi, CheckoutApi, OrderFlowApi};

use super::{helpers::*, mocks::MockShopBackend};
use crate::{
    auth::TokenAuthority,
    middleware::JwtAuthMiddlewareFactory,
    routes::{health, CartRoute, CART_SCOPE, ORDER_SCOPE},
    server::{configure_cart_routes, configure_order_routes},
};

fn configure(backend: MockShopBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CartRoute::<MockShopBackend>::new()).app_data(web::Data::new(BagApi::new(backend)));
    }
}

/// A backend that must never be reached, because authentication fails first.
fn untouched_backend() -> MockShopBackend {
    let mut backend = MockShopBackend::new();
    backend.expect_fetch_bag_id_for_customer().never();
    backend
}

#[actix_web::test]
async fn health_check_needs_no_token() {
    let req = TestRequest::get().uri("/health");
    let (status, body) = send_request(CART_SCOPE, req, "", configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn expired_token() {
    let token = issue_token(id(CUSTOMER), Utc::now() - Duration::minutes(10));
    let req = TestRequest::get().uri("/cart");
    let (status, body) = send_request(CART_SCOPE, req, &token, configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Access token has expired."}"#);
}

#[actix_web::test]
async fn invalid_signature() {
    let mut token = valid_token();
    let n = token.len();
    // The last character of a 32-byte signature only carries 4 bits, so stick to characters whose low bits are zero
    let replacement = if token.ends_with("AAAAA") { "QQQQQ" } else { "AAAAA" };
    token.replace_range(n - 5..n, replacement);
    let req = TestRequest::get().uri("/cart");
    let (status, body) = send_request(CART_SCOPE, req, &token, configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Access token signature is invalid."}"#);
}

#[actix_web::test]
async fn garbage_token() {
    let req = TestRequest::get().uri("/cart");
    let (status, body) = send_request(CART_SCOPE, req, "not-a-token", configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.starts_with(r#"{"error":"Authentication Error. Access token is not in the correct format."#), "{body}");
}

#[actix_web::test]
async fn wrong_authorization_scheme() {
    let req = TestRequest::get().uri("/cart").insert_header(("Authorization", format!("Basic {}", valid_token())));
    let (status, body) = send_request(CART_SCOPE, req, "", configure(untouched_backend())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. No bearer token was provided."}"#);
}

#[actix_web::test]
async fn principal_comes_from_the_token() {
    let customer = CustomerId::random();
    let mut backend = MockShopBackend::new();
    backend.expect_fetch_bag_id_for_customer().withf(move |c| *c == customer).times(1).returning(|_| Ok(None));
    let token = issue_token(customer, Utc::now() + Duration::hours(1));
    let req = TestRequest::get().uri("/cart");
    let (status, _) = send_request(CART_SCOPE, req, &token, configure(backend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Lays the routes out the way the server does, and returns the status of `req`.
async fn status_with_server_layout(req: TestRequest) -> StatusCode {
    let authority = TokenAuthority::new(&get_auth_config());
    let app = App::new()
        .app_data(web::Data::new(BagApi::new(untouched_backend())))
        .app_data(web::Data::new(CheckoutApi::new(MockShopBackend::new())))
        .app_data(web::Data::new(OrderFlowApi::new(MockShopBackend::new())))
        .service(health)
        .service(
            web::scope(CART_SCOPE)
                .wrap(JwtAuthMiddlewareFactory::new(authority.clone()))
                .configure(configure_cart_routes::<MockShopBackend>),
        )
        .service(
            web::scope(ORDER_SCOPE)
                .wrap(JwtAuthMiddlewareFactory::new(authority))
                .configure(configure_order_routes::<MockShopBackend>),
        );
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.status(),
        Err(e) => e.error_response().status(),
    }
}

#[actix_web::test]
async fn unknown_paths_are_not_found_without_a_token() {
    let status = status_with_server_layout(TestRequest::get().uri("/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let status = status_with_server_layout(TestRequest::post().uri("/checkout")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn every_scope_requires_a_token() {
    let status = status_with_server_layout(TestRequest::get().uri("/cart")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let status = status_with_server_layout(TestRequest::get().uri("/order/info?status=Created")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let status = status_with_server_layout(TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
}
