//! Bearer token authentication middleware.
//!
//! Wrap any scope or resource with [`JwtAuthMiddlewareFactory`] to require a valid `Authorization: Bearer <token>`
//! header. On success, the authenticated [`Principal`] is placed in the request extensions, where handlers can
//! extract it. Requests with a missing, malformed, badly signed or expired token are rejected with a 401 before any
//! handler runs.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};

use crate::{
    auth::{Principal, TokenAuthority, BEARER_PREFIX},
    errors::{AuthError, ServerError},
};

pub struct JwtAuthMiddlewareFactory {
    authority: Rc<TokenAuthority>,
}

impl JwtAuthMiddlewareFactory {
    pub fn new(authority: TokenAuthority) -> Self {
        JwtAuthMiddlewareFactory { authority: Rc::new(authority) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { authority: Rc::clone(&self.authority), service: Rc::new(service) }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    authority: Rc<TokenAuthority>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authority = Rc::clone(&self.authority);
        Box::pin(async move {
            trace!("🔐️ Checking bearer token for {}", req.path());
            let token = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix(BEARER_PREFIX))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or(AuthError::MissingToken)
                .map_err(ServerError::from)?;
            let customer_id = authority.authenticate(token).map_err(|e| {
                debug!("🔐️ Rejected bearer token for {}. {e}", req.path());
                ServerError::from(e)
            })?;
            trace!("🔐️ Request authenticated for customer {customer_id}");
            req.extensions_mut().insert(Principal(customer_id));
            service.call(req).await
        })
    }
}
