use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use super::connection;
use super::schema;
use super::queries::{
    analytics as analytics_queries,
    system_settings as system_settings_queries,
    trades as trades_queries,
    users as users_queries,
};
use super::models::{
    analytics::{ActiveBotModel, DailyProfitModel, LivePnlModel, OverviewModel},
    system_settings::{self as system_settings_models, BlockedTime, SystemSettings},
    users::{SettingsUpdate, UserDetailModel, UserSummaryModel},
};
use crate::benchmark::types::TradeRecord;
use crate::config::Config;
use crate::error::AdminError;
use crate::trade_period::TradePeriod;

pub const USER_DETAIL_TRADE_LIMIT: i64 = 50;
pub const LIVE_PNL_LIMIT: i64 = 50;

pub struct DbManager {
    pub pool: PgPool,
    pub trade_query_limit: i64,
}

impl DbManager {
    /// Creates a new database connection and initializes the console's own schema
    pub async fn init(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;

        // Ensure system_settings exists with its singleton row
        schema::init_schema(&pool).await?;

        Ok(Self {
            pool,
            trade_query_limit: config.trade_query_limit,
        })
    }

    // --- Trade Query Service ---

    /// Trades entered during `period`, capped at the configured query limit
    pub async fn get_trades_for_period(&self, period: &TradePeriod, now: DateTime<Utc>) -> Result<Vec<TradeRecord>, sqlx::Error> {
        let rows = trades_queries::get_trades_for_period(&self.pool, period, now, self.trade_query_limit).await?;
        if rows.len() as i64 >= self.trade_query_limit {
            warn!(limit = self.trade_query_limit, period = %period, "Trade query hit its row limit, older trades were left out");
        }
        Ok(rows.into_iter().map(TradeRecord::from).collect())
    }

    // --- Users ---

    pub async fn get_all_users(&self) -> Result<Vec<UserSummaryModel>, sqlx::Error> {
        users_queries::get_all_users(&self.pool).await
    }

    /// User row plus their most recent trades
    pub async fn get_user_detail(&self, user_id: i64) -> Result<(UserDetailModel, Vec<TradeRecord>), AdminError> {
        let user = users_queries::get_user(&self.pool, user_id)
            .await?
            .ok_or(AdminError::UserNotFound(user_id))?;
        let trades = trades_queries::get_user_trades(&self.pool, user_id, USER_DETAIL_TRADE_LIMIT)
            .await?
            .into_iter()
            .map(TradeRecord::from)
            .collect();
        Ok((user, trades))
    }

    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<(), AdminError> {
        if !users_queries::set_user_active(&self.pool, user_id, is_active).await? {
            return Err(AdminError::UserNotFound(user_id));
        }
        info!(user_id, is_active, "{}", if is_active { "User activated" } else { "User banned" });
        Ok(())
    }

    pub async fn update_user_settings(&self, user_id: i64, update: &SettingsUpdate) -> Result<(), AdminError> {
        let changed = users_queries::update_user_settings(&self.pool, user_id, update).await?;
        if !changed {
            warn!(user_id, "No settings row for user, nothing updated");
            return Err(AdminError::UserNotFound(user_id));
        }
        let fields: Vec<&str> = update.changes.iter().map(|(field, _)| field.column()).collect();
        info!(user_id, fields = ?fields, "Settings updated");
        Ok(())
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), AdminError> {
        if !users_queries::delete_user(&self.pool, user_id).await? {
            return Err(AdminError::UserNotFound(user_id));
        }
        warn!(user_id, "User deleted");
        Ok(())
    }

    // --- Analytics ---

    pub async fn get_overview(&self) -> Result<OverviewModel, sqlx::Error> {
        analytics_queries::get_overview(&self.pool).await
    }

    pub async fn get_profit_history(&self) -> Result<Vec<DailyProfitModel>, sqlx::Error> {
        analytics_queries::get_profit_history(&self.pool).await
    }

    pub async fn get_active_bots(&self) -> Result<Vec<ActiveBotModel>, sqlx::Error> {
        analytics_queries::get_active_bots(&self.pool).await
    }

    pub async fn get_live_pnl(&self) -> Result<Vec<LivePnlModel>, sqlx::Error> {
        analytics_queries::get_live_pnl(&self.pool, LIVE_PNL_LIMIT).await
    }

    // --- System control ---

    pub async fn get_system_settings(&self) -> Result<SystemSettings, sqlx::Error> {
        system_settings_queries::get_system_settings(&self.pool).await
    }

    pub async fn set_kill_switch(&self, enabled: bool) -> Result<(), sqlx::Error> {
        system_settings_queries::set_kill_switch(&self.pool, enabled).await?;
        if enabled {
            warn!("KILL SWITCH ACTIVATED - all bots will stop");
        } else {
            info!("Kill switch deactivated");
        }
        Ok(())
    }

    pub async fn add_blocked_time(&self, start: &str, end: &str, reason: Option<&str>) -> Result<Vec<BlockedTime>, AdminError> {
        let current = self.get_system_settings().await?.stored_blocked_times;
        let id = Utc::now().timestamp_millis();
        let updated = system_settings_models::add_blocked_time(&current, start, end, reason, id)?;
        system_settings_queries::set_blocked_times(&self.pool, &updated).await?;
        info!(id, start, end, "Blocked time added");
        Ok(system_settings_models::decode_blocked_times(&updated))
    }

    /// Returns the remaining schedule and whether the id was found
    pub async fn remove_blocked_time(&self, id: i64) -> Result<(Vec<BlockedTime>, bool), sqlx::Error> {
        let current = self.get_system_settings().await?.stored_blocked_times;
        let (updated, removed) = system_settings_models::remove_blocked_time(&current, id);
        if removed {
            system_settings_queries::set_blocked_times(&self.pool, &updated).await?;
            info!(id, "Blocked time removed");
        } else {
            warn!(id, "No blocked time with that id");
        }
        Ok((system_settings_models::decode_blocked_times(&updated), removed))
    }
}
