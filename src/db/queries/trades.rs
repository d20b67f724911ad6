use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::trades::TradeHistoryModel;
use crate::trade_period::TradePeriod;

// Casts keep decoding stable whether the platform stores floats or NUMERIC, TIMESTAMP or TIMESTAMPTZ
const TRADE_COLUMNS: &str = r#"
    SELECT
        th.id::int8 AS id,
        th.entry_time::timestamptz AS entry_time,
        th.exit_time::timestamptz AS exit_time,
        th.opportunity_type::text AS opportunity_type,
        th.lot_size::numeric AS lot_size,
        th.hfm_entry_price::numeric AS hfm_entry_price,
        th.equiti_entry_price::numeric AS equiti_entry_price,
        th.hfm_exit_price::numeric AS hfm_exit_price,
        th.equiti_exit_price::numeric AS equiti_exit_price,
        th.net_profit::numeric AS net_profit,
        th.entry_gap::numeric AS entry_gap,
        th.exit_gap::numeric AS exit_gap,
        th.status::text AS status,
        u.username,
        us.hfm_symbol,
        us.equiti_symbol
    FROM trade_history th
    INNER JOIN users u ON th.user_id = u.id
    LEFT JOIN user_settings us ON th.user_id = us.user_id
"#;

/// Fetch trades whose entry time falls in `period` (evaluated at `now`), newest first
pub async fn get_trades_for_period(
    pool: &PgPool,
    period: &TradePeriod,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<TradeHistoryModel>, sqlx::Error> {
    let (start, end) = period.bounds(now);

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(TRADE_COLUMNS);
    builder.push(" WHERE 1=1");
    if let Some(start) = start {
        builder.push(" AND th.entry_time >= ").push_bind(start);
    }
    if let Some(end) = end {
        builder.push(" AND th.entry_time <= ").push_bind(end);
    }
    builder.push(" ORDER BY th.entry_time DESC LIMIT ").push_bind(limit);

    builder
        .build_query_as::<TradeHistoryModel>()
        .fetch_all(pool)
        .await
}

/// Most recent trades of a single user
pub async fn get_user_trades(pool: &PgPool, user_id: i64, limit: i64) -> Result<Vec<TradeHistoryModel>, sqlx::Error> {
    let sql = format!("{} WHERE th.user_id = $1 ORDER BY th.entry_time DESC LIMIT $2", TRADE_COLUMNS);
    sqlx::query_as::<_, TradeHistoryModel>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
