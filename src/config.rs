use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;

use crate::benchmark::benchmark_constants::DEFAULT_POINTS_PER_LOT;
use crate::benchmark::parsing::parse_constant;
use crate::error::AdminError;

const DEFAULT_TRADE_QUERY_LIMIT: i64 = 1000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Only needed by commands that touch the database
    pub database_url: Option<String>,
    pub mode: String,
    pub ipo_constant: Decimal,
    pub trade_query_limit: i64,
    pub db_max_connections: u32,
}

impl Config {
    pub fn load() -> Result<Self, AdminError> {
        dotenv().ok();

        let mode = env::var("MODE").unwrap_or_else(|_| "test".to_string());
        if mode != "test" && mode != "prod" {
            return Err(AdminError::InvalidEnv { name: "MODE", value: mode });
        }

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        // Unset means the default constant; set-but-garbage means zero
        let ipo_constant = env::var("IPO_CONSTANT")
            .map(|raw| parse_constant(&raw))
            .unwrap_or(DEFAULT_POINTS_PER_LOT);

        let trade_query_limit = parse_env_or("TRADE_QUERY_LIMIT", DEFAULT_TRADE_QUERY_LIMIT)?;
        let db_max_connections = parse_env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;

        Ok(Config {
            database_url,
            mode,
            ipo_constant,
            trade_query_limit,
            db_max_connections,
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, AdminError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AdminError::InvalidEnv { name, value: raw }),
        Err(_) => Ok(default),
    }
}
