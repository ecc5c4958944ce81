use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use order_engine::{
    db_types::{NewOrderItem, OrderStatusType, ProductId},
    order_objects::OrderWithItems,
    CheckoutApi,
    OrderFlowApi,
    OrderStoreError,
};
use serde_json::{json, Value};

use super::{helpers::*, mocks::MockShopBackend};
use crate::routes::{
    CreateOrderFromCartRoute,
    CreateOrderRoute,
    DeleteOrderRoute,
    MarkReadyRoute,
    MarkReceivedRoute,
    OrderByIdRoute,
    OrderInfoRoute,
    UpdateItemQuantityRoute,
    ORDER_SCOPE,
};

/// The checkout routes and the order routes use different APIs, so each gets its own backend.
fn configure(checkout: MockShopBackend, orders: MockShopBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CreateOrderFromCartRoute::<MockShopBackend>::new())
            .service(CreateOrderRoute::<MockShopBackend>::new())
            .service(OrderInfoRoute::<MockShopBackend>::new())
            .service(OrderByIdRoute::<MockShopBackend>::new())
            .service(MarkReadyRoute::<MockShopBackend>::new())
            .service(MarkReceivedRoute::<MockShopBackend>::new())
            .service(UpdateItemQuantityRoute::<MockShopBackend>::new())
            .service(DeleteOrderRoute::<MockShopBackend>::new())
            .app_data(web::Data::new(CheckoutApi::new(checkout)))
            .app_data(web::Data::new(OrderFlowApi::new(orders)));
    }
}

fn orders_backend(owner: &'static str, status: OrderStatusType) -> MockShopBackend {
    let mut backend = MockShopBackend::new();
    backend.expect_fetch_order().returning(move |_| Ok(Some(order(owner, status))));
    backend
}

fn placed_order() -> OrderWithItems {
    OrderWithItems { order: order(CUSTOMER, OrderStatusType::Created), items: order_items() }
}

#[actix_web::test]
async fn create_order_from_cart() {
    let mut checkout = MockShopBackend::new();
    checkout.expect_fetch_bag_id_for_customer().returning(|_| Ok(Some(bag_id())));
    checkout
        .expect_checkout_bag()
        .withf(|bag, customer| *bag == bag_id() && customer.to_string() == CUSTOMER)
        .times(1)
        .returning(|_, _| Ok(placed_order()));
    let req = TestRequest::post().uri("/order/create-from-cart");
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(checkout, MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, format!(r#"{{"order_id":"{ORDER}"}}"#));
}

#[actix_web::test]
async fn create_order_from_empty_cart() {
    let mut checkout = MockShopBackend::new();
    checkout.expect_fetch_bag_id_for_customer().returning(|_| Ok(Some(bag_id())));
    checkout.expect_checkout_bag().returning(|_, _| Err(OrderStoreError::EmptyBag));
    let req = TestRequest::post().uri("/order/create-from-cart");
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(checkout, MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"The bag is empty"}"#);
}

#[actix_web::test]
async fn create_order_directly() {
    let mut checkout = MockShopBackend::new();
    checkout
        .expect_insert_order()
        .withf(|_, items| {
            items == [NewOrderItem::new(id::<ProductId>(PRODUCT_A), 2), NewOrderItem::new(id::<ProductId>(PRODUCT_B), 1)]
        })
        .times(1)
        .returning(|_, _| Ok(placed_order()));
    let payload = json!({ "items": [
        { "product": PRODUCT_A, "quantity": 2 },
        { "product": PRODUCT_B, "quantity": 1 },
    ]});
    let req = TestRequest::post().uri("/order/create").set_json(payload);
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(checkout, MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, format!(r#"{{"id":"{ORDER}"}}"#));
}

#[actix_web::test]
async fn create_order_without_items() {
    let mut checkout = MockShopBackend::new();
    checkout.expect_insert_order().returning(|_, _| Err(OrderStoreError::NoOrderItems));
    let req = TestRequest::post().uri("/order/create").set_json(json!({ "items": [] }));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(checkout, MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid input. An order must contain at least one item"}"#);
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::Created);
    orders.expect_fetch_order_items().returning(|_| Ok(order_items()));
    let req = TestRequest::get().uri(&format!("/order/get/{ORDER}"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "order": {
                "id": ORDER,
                "customer_id": CUSTOMER,
                "total_price": 2899,
                "status": "Created",
                "created_at": "2024-10-16T12:30:00Z",
                "updated_at": "2024-10-16T12:30:00Z"
            },
            "goods": [
                { "id": ITEM_A, "order_id": ORDER, "product_id": PRODUCT_A, "quantity": 2 },
                { "id": ITEM_B, "order_id": ORDER, "product_id": PRODUCT_B, "quantity": 1 }
            ]
        })
    );
}

#[actix_web::test]
async fn fetch_another_customers_order() {
    let orders = orders_backend(OTHER_CUSTOMER, OrderStatusType::Created);
    let req = TestRequest::get().uri(&format!("/order/get/{ORDER}"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Insufficient Permissions. The requester does not own this resource"}"#);
}

#[actix_web::test]
async fn fetch_missing_order() {
    let mut orders = MockShopBackend::new();
    orders.expect_fetch_order().returning(|_| Ok(None));
    let req = TestRequest::get().uri(&format!("/order/get/{ORDER}"));
    let (status, _) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn fetch_order_with_malformed_id() {
    let req = TestRequest::get().uri("/order/get/12345");
    let (status, body) =
        send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request path: "#), "{body}");
}

#[actix_web::test]
async fn list_orders_by_status() {
    let mut orders = MockShopBackend::new();
    orders
        .expect_fetch_orders_for_customer()
        .withf(|customer, query| {
            customer.to_string() == CUSTOMER &&
                query.status == OrderStatusType::ReadyForPickup &&
                query.limit() == 5 &&
                query.offset() == 10
        })
        .times(1)
        .returning(|_, _| Ok(vec![order(CUSTOMER, OrderStatusType::ReadyForPickup)]));
    let req = TestRequest::get().uri("/order/info?status=ReadyForPickup&limit=5&offset=10");
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["status"], "ReadyForPickup");
}

#[actix_web::test]
async fn list_orders_requires_a_valid_status() {
    let req = TestRequest::get().uri("/order/info?status=Shipped");
    let (status, body) =
        send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request query: "#), "{body}");
}

#[actix_web::test]
async fn mark_order_ready() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::Created);
    orders
        .expect_transition_order_status()
        .withf(|_, from, to| *from == OrderStatusType::Created && *to == OrderStatusType::ReadyForPickup)
        .times(1)
        .returning(|_, _, to| Ok(Some(order(CUSTOMER, to))));
    let req = TestRequest::post().uri(&format!("/order/{ORDER}/ready"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ReadyForPickup");
}

#[actix_web::test]
async fn mark_received_before_ready() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::Created);
    orders.expect_transition_order_status().never();
    let req = TestRequest::post().uri(&format!("/order/{ORDER}/received"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        r#"{"error":"Invalid order status. The operation is not allowed while the order is Created. It requires the order to be ReadyForPickup."}"#
    );
}

#[actix_web::test]
async fn lost_status_race_is_reported_as_invalid_status() {
    let mut orders = MockShopBackend::new();
    let mut calls = 0;
    // The first read sees `Created`, but another request moves the order on before the update runs
    orders.expect_fetch_order().returning(move |_| {
        calls += 1;
        let status = if calls == 1 { OrderStatusType::Created } else { OrderStatusType::ReadyForPickup };
        Ok(Some(order(CUSTOMER, status)))
    });
    orders.expect_transition_order_status().returning(|_, _, _| Ok(None));
    let req = TestRequest::post().uri(&format!("/order/{ORDER}/ready"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("while the order is ReadyForPickup"), "{body}");
}

#[actix_web::test]
async fn update_item_quantity() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::Created);
    orders.expect_fetch_order_item().returning(|_| Ok(order_items().into_iter().next()));
    orders.expect_update_item_quantity().withf(|item, qty| *item == item_id() && *qty == 7).times(1).returning(
        |_, qty| {
            let mut item = order_items().remove(0);
            item.quantity = qty;
            Ok(Some(item))
        },
    );
    let req = TestRequest::patch().uri(&format!("/order/item/{ITEM_A}")).set_json(json!({ "quantity": 7 }));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], ITEM_A);
    assert_eq!(body["quantity"], 7);
}

#[actix_web::test]
async fn update_item_quantity_after_pickup_is_ready() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::ReadyForPickup);
    orders.expect_fetch_order_item().returning(|_| Ok(order_items().into_iter().next()));
    orders.expect_update_item_quantity().never();
    let req = TestRequest::patch().uri(&format!("/order/item/{ITEM_A}")).set_json(json!({ "quantity": 7 }));
    let (status, _) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_item_quantity_must_be_positive() {
    let req = TestRequest::patch().uri(&format!("/order/item/{ITEM_A}")).set_json(json!({ "quantity": 0 }));
    let (status, body) =
        send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), MockShopBackend::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid input. Invalid quantity 0. Quantities must be positive, and small enough for the order total to be priced."}"#);
}

#[actix_web::test]
async fn delete_order() {
    let mut orders = orders_backend(CUSTOMER, OrderStatusType::Received);
    orders.expect_delete_order().withf(|id| *id == order_id()).times(1).returning(|_| Ok(true));
    let req = TestRequest::delete().uri(&format!("/order/{ORDER}"));
    let (status, body) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!(r#"{{"success":true,"message":"Order {ORDER} deleted."}}"#));
}

#[actix_web::test]
async fn delete_another_customers_order() {
    let mut orders = orders_backend(OTHER_CUSTOMER, OrderStatusType::Created);
    orders.expect_delete_order().never();
    let req = TestRequest::delete().uri(&format!("/order/{ORDER}"));
    let (status, _) = send_request(ORDER_SCOPE, req, &valid_token(), configure(MockShopBackend::new(), orders)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
