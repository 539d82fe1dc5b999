//! Server configuration from the environment

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use auth::{AuthConfig, HashCost};
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug)]
pub struct ServerConfig {
    /// `None` runs on the in-memory store
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&get, "AUTH_ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&get, "AUTH_ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&get, "AUTH_ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        let mut auth = AuthConfig::default().with_hash_cost(hash_cost);
        if let Some(pepper_b64) = get("AUTH_PASSWORD_PEPPER") {
            let pepper = general_purpose::STANDARD
                .decode(pepper_b64.trim())
                .context("AUTH_PASSWORD_PEPPER must be base64")?;
            auth = auth.with_pepper(pepper);
        }

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: get("DATABASE_URL"),
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            bind_addr: get("BIND_ADDR")
                .as_deref()
                .unwrap_or(DEFAULT_BIND_ADDR)
                .parse()
                .context("BIND_ADDR must be host:port")?,
            frontend_origins,
            auth,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
