use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::FromRow;

use super::system_settings::SystemSettings;

/// Platform-wide headline numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewModel {
    pub total_users: i64,
    pub active_users: i64,
    pub total_trades: i64,
    pub total_profit: Decimal,
    pub open_trades: i64,
    pub today_trades: i64,
    pub today_profit: Decimal,
    pub system_settings: SystemSettings,
}

impl OverviewModel {
    pub fn avg_profit_per_trade(&self) -> Decimal {
        if self.total_trades > 0 {
            self.total_profit / Decimal::from(self.total_trades)
        } else {
            Decimal::ZERO
        }
    }

    /// Share of accounts that are not banned, as a whole percentage
    pub fn active_user_rate(&self) -> Decimal {
        if self.total_users > 0 {
            (Decimal::from(self.active_users) * Decimal::ONE_HUNDRED / Decimal::from(self.total_users))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyProfitModel {
    pub date: NaiveDate,
    pub profit: Option<Decimal>,
    pub trades: i64,
}

/// User with an OPEN trade
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActiveBotModel {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub opportunity_type: Option<String>,
    pub lot_size: Option<Decimal>,
    pub hfm_entry_price: Option<Decimal>,
    pub equiti_entry_price: Option<Decimal>,
    pub entry_time: Option<DateTime<Utc>>,
    pub entry_gap: Option<Decimal>,
}

/// Recently CLOSED trade for the live PnL feed
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LivePnlModel {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub opportunity_type: Option<String>,
    pub lot_size: Option<Decimal>,
    pub net_profit: Option<Decimal>,
    pub hold_duration: Option<String>,
    pub exit_time: Option<DateTime<Utc>>,
    pub entry_gap: Option<Decimal>,
    pub exit_gap: Option<Decimal>,
}
