use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_engine::{BagApi, BagManagement, CatalogLookup, CheckoutApi, OrderFlowApi, OrderManagement, SqliteDatabase};

use crate::{
    auth::TokenAuthority,
    config::ServerConfig,
    errors::ServerError,
    middleware::JwtAuthMiddlewareFactory,
    routes::{
        health,
        AddToCartRoute,
        CART_SCOPE,
        ORDER_SCOPE,
        CartRoute,
        CreateOrderFromCartRoute,
        CreateOrderRoute,
        DeleteOrderRoute,
        MarkReadyRoute,
        MarkReceivedRoute,
        OrderByIdRoute,
        OrderInfoRoute,
        RemoveFromCartRoute,
        UpdateItemQuantityRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let srv = create_server_instance(config, db.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let bag_api = BagApi::new(db.clone());
        let checkout_api = CheckoutApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone());
        let authority = TokenAuthority::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shop::access_log"))
            .app_data(web::Data::new(bag_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(orders_api))
            .configure(configure_extractors)
            .service(health)
            .service(
                web::scope(CART_SCOPE)
                    .wrap(JwtAuthMiddlewareFactory::new(authority.clone()))
                    .configure(configure_cart_routes::<SqliteDatabase>),
            )
            .service(
                web::scope(ORDER_SCOPE)
                    .wrap(JwtAuthMiddlewareFactory::new(authority))
                    .configure(configure_order_routes::<SqliteDatabase>),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    info!("🚀️ Server instance created");
    Ok(srv)
}

/// Registers the cart routes, backed by `B`. Mount inside the authenticated [`CART_SCOPE`].
pub fn configure_cart_routes<B>(cfg: &mut web::ServiceConfig)
where B: BagManagement + CatalogLookup + 'static {
    cfg.service(CartRoute::<B>::new())
        .service(AddToCartRoute::<B>::new())
        .service(RemoveFromCartRoute::<B>::new());
}

/// Registers the order routes, backed by `B`. Mount inside the authenticated [`ORDER_SCOPE`].
pub fn configure_order_routes<B>(cfg: &mut web::ServiceConfig)
where B: BagManagement + OrderManagement + 'static {
    cfg.service(CreateOrderFromCartRoute::<B>::new())
        .service(CreateOrderRoute::<B>::new())
        .service(OrderInfoRoute::<B>::new())
        .service(OrderByIdRoute::<B>::new())
        .service(MarkReadyRoute::<B>::new())
        .service(MarkReceivedRoute::<B>::new())
        .service(UpdateItemQuantityRoute::<B>::new())
        .service(DeleteOrderRoute::<B>::new());
}

/// Makes extractor failures (bad JSON, bad ids in the path or query) produce the same JSON error body as every other
/// failure.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ServerError::InvalidRequestQuery(err.to_string()).into()),
    );
}
