use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::models::analytics::{ActiveBotModel, DailyProfitModel, LivePnlModel, OverviewModel};
use crate::db::queries::system_settings;

/// Platform totals plus today's activity and the current system settings
pub async fn get_overview(pool: &PgPool) -> Result<OverviewModel, sqlx::Error> {
    let (total_users, active_users): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*)::int8,
            COALESCE(SUM(CASE WHEN is_active = true THEN 1 ELSE 0 END), 0)::int8
        FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (total_trades, total_profit, open_trades): (i64, Decimal, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*)::int8,
            COALESCE(SUM(net_profit), 0)::numeric,
            COALESCE(SUM(CASE WHEN status = 'OPEN' THEN 1 ELSE 0 END), 0)::int8
        FROM trade_history
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (today_trades, today_profit): (i64, Decimal) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*)::int8,
            COALESCE(SUM(net_profit), 0)::numeric
        FROM trade_history
        WHERE DATE(entry_time) = CURRENT_DATE
        "#,
    )
    .fetch_one(pool)
    .await?;

    let system_settings = system_settings::get_system_settings(pool).await?;

    Ok(OverviewModel {
        total_users,
        active_users,
        total_trades,
        total_profit,
        open_trades,
        today_trades,
        today_profit,
        system_settings,
    })
}

/// Daily profit and trade count over the last 30 days, oldest first
pub async fn get_profit_history(pool: &PgPool) -> Result<Vec<DailyProfitModel>, sqlx::Error> {
    sqlx::query_as::<_, DailyProfitModel>(
        r#"
        SELECT
            DATE(entry_time) AS date,
            SUM(net_profit)::numeric AS profit,
            COUNT(*)::int8 AS trades
        FROM trade_history
        WHERE entry_time >= NOW() - INTERVAL '30 days'
        GROUP BY DATE(entry_time)
        ORDER BY date ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Users currently holding an OPEN trade
pub async fn get_active_bots(pool: &PgPool) -> Result<Vec<ActiveBotModel>, sqlx::Error> {
    sqlx::query_as::<_, ActiveBotModel>(
        r#"
        SELECT
            u.id::int8 AS id,
            u.username,
            u.email,
            th.opportunity_type::text AS opportunity_type,
            th.lot_size::numeric AS lot_size,
            th.hfm_entry_price::numeric AS hfm_entry_price,
            th.equiti_entry_price::numeric AS equiti_entry_price,
            th.entry_time::timestamptz AS entry_time,
            th.entry_gap::numeric AS entry_gap
        FROM users u
        INNER JOIN trade_history th ON u.id = th.user_id
        WHERE th.status = 'OPEN'
        ORDER BY th.entry_time DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Most recently closed trades
pub async fn get_live_pnl(pool: &PgPool, limit: i64) -> Result<Vec<LivePnlModel>, sqlx::Error> {
    sqlx::query_as::<_, LivePnlModel>(
        r#"
        SELECT
            th.id::int8 AS id,
            u.username,
            u.email,
            th.opportunity_type::text AS opportunity_type,
            th.lot_size::numeric AS lot_size,
            th.net_profit::numeric AS net_profit,
            th.hold_duration::text AS hold_duration,
            th.exit_time::timestamptz AS exit_time,
            th.entry_gap::numeric AS entry_gap,
            th.exit_gap::numeric AS exit_gap
        FROM trade_history th
        INNER JOIN users u ON th.user_id = u.id
        WHERE th.status = 'CLOSED' AND th.exit_time IS NOT NULL
        ORDER BY th.exit_time DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
