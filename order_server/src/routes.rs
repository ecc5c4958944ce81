//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a few lines MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every handler except `health` takes a [`Principal`], which the authentication middleware supplies. A route that is
//! registered without that middleware will answer every request with a 401.
//!
//! Route paths are relative to the scope they are registered in: the cart routes live under [`CART_SCOPE`] and the
//! order routes under [`ORDER_SCOPE`].
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. All the database calls made here are asynchronous, and must stay
//! that way.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_engine::{
    db_types::{OrderId, OrderItemId},
    order_objects::OrderQuery,
    traits::{BagManagement, CatalogLookup, OrderManagement},
    BagApi,
    CheckoutApi,
    OrderFlowApi,
};

use crate::{
    auth::Principal,
    data_objects::{
        CheckoutResponse,
        CreateOrderRequest,
        JsonResponse,
        OrderCreatedResponse,
        OrderResponse,
        ProductRequest,
        QuantityUpdate,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

pub const CART_SCOPE: &str = "/cart";
pub const ORDER_SCOPE: &str = "/order";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(cart => Get "" impl BagManagement, CatalogLookup);
/// Returns the caller's bag, with one entry in `products` for every unit.
pub async fn cart<B>(principal: Principal, api: web::Data<BagApi<B>>) -> Result<HttpResponse, ServerError>
where B: BagManagement + CatalogLookup {
    trace!("💻️ GET cart for {}", principal.customer_id());
    let bag = api.bag_for_customer(principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(bag))
}

route!(add_to_cart => Post "/add" impl BagManagement, CatalogLookup);
pub async fn add_to_cart<B>(
    principal: Principal,
    body: web::Json<ProductRequest>,
    api: web::Data<BagApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: BagManagement + CatalogLookup,
{
    let customer_id = principal.customer_id();
    trace!("💻️ Customer {customer_id} is adding {} to their bag", body.product);
    let bag_id = api.resolve_bag_id(customer_id).await?;
    api.add(&bag_id, &body.product, customer_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product added to the bag.")))
}

route!(remove_from_cart => Post "/remove" impl BagManagement, CatalogLookup);
pub async fn remove_from_cart<B>(
    principal: Principal,
    body: web::Json<ProductRequest>,
    api: web::Data<BagApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: BagManagement + CatalogLookup,
{
    let customer_id = principal.customer_id();
    trace!("💻️ Customer {customer_id} is removing {} from their bag", body.product);
    let bag_id = api.resolve_bag_id(customer_id).await?;
    api.remove(&bag_id, &body.product, customer_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product removed from the bag.")))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order_from_cart => Post "/create-from-cart" impl BagManagement, OrderManagement);
pub async fn create_order_from_cart<B>(
    principal: Principal,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: BagManagement + OrderManagement,
{
    let result = api.checkout_customer_bag(principal.customer_id()).await?;
    debug!("💻️ Order {} created from the bag of {}", result.order.id, principal.customer_id());
    Ok(HttpResponse::Created().json(CheckoutResponse { order_id: result.order.id }))
}

route!(create_order => Post "/create" impl OrderManagement);
pub async fn create_order<B: OrderManagement>(
    principal: Principal,
    body: web::Json<CreateOrderRequest>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let result = api.create_order(principal.customer_id(), &body.items).await?;
    debug!("💻️ Order {} created for {}", result.order.id, principal.customer_id());
    Ok(HttpResponse::Created().json(OrderCreatedResponse { id: result.order.id }))
}

route!(order_by_id => Get "/get/{id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    principal: Principal,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    trace!("💻️ GET order {order_id} for {}", principal.customer_id());
    let result = api.order_with_items(&order_id, principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(result)))
}

route!(order_info => Get "/info" impl OrderManagement);
/// Lists the caller's orders with the status given in the query string, e.g. `?status=Created&limit=10&offset=20`.
pub async fn order_info<B: OrderManagement>(
    principal: Principal,
    query: web::Query<OrderQuery>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.list(principal.customer_id(), &query).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(mark_ready => Post "/{id}/ready" impl OrderManagement);
pub async fn mark_ready<B: OrderManagement>(
    principal: Principal,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = api.mark_ready(&path.into_inner(), principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(mark_received => Post "/{id}/received" impl OrderManagement);
pub async fn mark_received<B: OrderManagement>(
    principal: Principal,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = api.mark_received(&path.into_inner(), principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_item_quantity => Patch "/item/{id}" impl OrderManagement);
/// Changes the quantity of one line of a `Created` order. The order total is left as it was at checkout.
pub async fn update_item_quantity<B: OrderManagement>(
    principal: Principal,
    path: web::Path<OrderItemId>,
    body: web::Json<QuantityUpdate>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let item = api.update_item_quantity(&path.into_inner(), body.quantity, principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(delete_order => Delete "/{id}" impl OrderManagement);
pub async fn delete_order<B: OrderManagement>(
    principal: Principal,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    api.delete(&order_id, principal.customer_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order {order_id} deleted."))))
}
