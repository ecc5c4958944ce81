use std::env;

use log::*;
use rand::RngCore;
use shop_common::{helpers::parse_boolean_flag, Secret};

use crate::errors::ServerError;

const DEFAULT_SHOP_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_PORT: u16 = 8083;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    /// If true, outstanding database migrations are applied before the server starts listening.
    pub run_migrations: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOP_HOST.to_string(),
            port: DEFAULT_SHOP_PORT,
            database_url: String::default(),
            max_db_connections: DEFAULT_DB_MAX_CONNECTIONS,
            run_migrations: false,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOP_HOST").ok().unwrap_or_else(|| DEFAULT_SHOP_HOST.into());
        let port = env::var("SHOP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SHOP_PORT. {e} Using the default, {DEFAULT_SHOP_PORT}, instead."
                    );
                    DEFAULT_SHOP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SHOP_PORT);
        let database_url = env::var("SHOP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SHOP_DATABASE_URL is not set. Please set it to the URL for the shop database.");
            String::default()
        });
        let max_db_connections = env::var("SHOP_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .or_else(|| {
                        warn!("🪛️ Invalid configuration value for SHOP_DB_MAX_CONNECTIONS: {s}");
                        None
                    })
            })
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("SHOP_RUN_MIGRATIONS").ok(), false);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, max_db_connections, run_migrations, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to verify HS256 bearer tokens. The same secret is used by the service that issues them.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. No externally issued \
             token will be accepted. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self { jwt_secret: Secret::new(base64::encode(key)) }
    }
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("SHOP_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [SHOP_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("SHOP_JWT_SECRET is empty".to_string()));
        }
        Ok(Self::new(&secret))
    }
}
