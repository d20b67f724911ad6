pub mod benchmark;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod trade_period;
pub mod user_stats;
