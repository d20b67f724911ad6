use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::benchmark::types::TradeRecord;

/// Row of `trade_history` joined with its owner and the owner's symbols
#[derive(Debug, Clone, FromRow)]
pub struct TradeHistoryModel {
    pub id: i64,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
    pub opportunity_type: Option<String>,
    pub lot_size: Option<Decimal>,
    pub hfm_entry_price: Option<Decimal>,
    pub equiti_entry_price: Option<Decimal>,
    pub hfm_exit_price: Option<Decimal>,
    pub equiti_exit_price: Option<Decimal>,
    pub net_profit: Option<Decimal>,
    pub entry_gap: Option<Decimal>,
    pub exit_gap: Option<Decimal>,
    pub status: Option<String>,
    pub username: Option<String>,
    pub hfm_symbol: Option<String>,
    pub equiti_symbol: Option<String>,
}

impl From<TradeHistoryModel> for TradeRecord {
    fn from(row: TradeHistoryModel) -> Self {
        TradeRecord {
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            lot_size: row.lot_size,
            hfm_entry_price: row.hfm_entry_price,
            hfm_exit_price: row.hfm_exit_price,
            equiti_entry_price: row.equiti_entry_price,
            equiti_exit_price: row.equiti_exit_price,
            entry_gap: row.entry_gap,
            exit_gap: row.exit_gap,
            net_profit: row.net_profit,
            opportunity_type: row.opportunity_type,
            username: row.username,
            symbol: row.hfm_symbol.or(row.equiti_symbol),
        }
    }
}
