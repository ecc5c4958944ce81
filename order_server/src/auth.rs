//! Bearer token authentication.
//!
//! Access tokens are compact HS256 JSON web tokens. The custom claims carry the customer id, and the standard `exp`
//! claim is mandatory. Tokens are issued by the account service; this server only verifies them.
//! [`TokenAuthority::issue_token`] exists so that the same secret can mint tokens for tooling and tests.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    Token,
    UntrustedToken,
    ValidationError,
};
use log::*;
use order_engine::db_types::CustomerId;
use serde::{Deserialize, Serialize};
use shop_common::Secret;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: CustomerId,
}

/// Verifies (and mints) access tokens with the configured shared secret.
#[derive(Clone, Debug)]
pub struct TokenAuthority {
    secret: Secret<String>,
}

impl TokenAuthority {
    pub fn new(config: &AuthConfig) -> Self {
        Self { secret: config.jwt_secret.clone() }
    }

    fn key(&self) -> Hs256Key {
        Hs256Key::new(self.secret.reveal().as_bytes())
    }

    pub fn issue_token(&self, customer_id: CustomerId, expiry: DateTime<Utc>) -> Result<String, AuthError> {
        let header = Header::empty().with_token_type("JWT");
        let mut claims = Claims::new(JwtClaims { user_id: customer_id });
        claims.expiration = Some(expiry);
        Hs256.token(&header, &claims, &self.key()).map_err(|e| AuthError::SigningError(e.to_string()))
    }

    /// Validates the token and returns the id of the customer it was issued to.
    pub fn authenticate(&self, token: &str) -> Result<CustomerId, AuthError> {
        let claims = self.validate(token)?;
        Ok(claims.custom.user_id)
    }

    /// Checks the signature and the expiry time of the token, and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims<JwtClaims>, AuthError> {
        let untrusted_token =
            UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let token: Token<JwtClaims> =
            Hs256.validator(&self.key()).validate(&untrusted_token).map_err(validation_error)?;
        let (_, claims) = token.into_parts();
        claims.validate_expiration(&TimeOptions::default()).map_err(|e| {
            debug!("🔐️ Token for {} rejected. {e}", claims.custom.user_id);
            validation_error(e)
        })?;
        Ok(claims)
    }
}

fn validation_error(e: ValidationError) -> AuthError {
    match e {
        ValidationError::InvalidSignature => AuthError::InvalidSignature,
        ValidationError::Expired => AuthError::TokenExpired,
        e => AuthError::PoorlyFormattedToken(e.to_string()),
    }
}

/// The authenticated customer making the request.
///
/// The authentication middleware places this in the request extensions. Handlers take it as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal(pub CustomerId);

impl Principal {
    pub fn customer_id(&self) -> &CustomerId {
        &self.0
    }
}

impl FromRequest for Principal {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().copied().ok_or_else(|| {
            warn!("🔐️ No principal found in request extensions. Is the route behind the auth middleware?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        });
        ready(principal)
    }
}
