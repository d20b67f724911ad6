use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::users::{SettingValue, SettingsUpdate, UserDetailModel, UserSummaryModel};

/// All users with headline settings and trade stats, newest account first
pub async fn get_all_users(pool: &PgPool) -> Result<Vec<UserSummaryModel>, sqlx::Error> {
    sqlx::query_as::<_, UserSummaryModel>(
        r#"
        SELECT
            u.id::int8 AS id,
            u.email,
            u.username,
            u.is_active,
            u.created_at::timestamptz AS created_at,
            us.hfm_terminal_path,
            us.equiti_terminal_path,
            us.lot_per_base::numeric AS lot_per_base,
            us.max_lot::numeric AS max_lot,
            us.min_entry_gap::numeric AS min_entry_gap,
            us.max_spread::numeric AS max_spread,
            COALESCE(stats.total_trades, 0)::int8 AS total_trades,
            COALESCE(stats.total_profit, 0)::numeric AS total_profit,
            COALESCE(stats.open_trades, 0)::int8 AS open_trades
        FROM users u
        LEFT JOIN user_settings us ON u.id = us.user_id
        LEFT JOIN (
            SELECT
                user_id,
                COUNT(*) AS total_trades,
                SUM(net_profit) AS total_profit,
                SUM(CASE WHEN status = 'OPEN' THEN 1 ELSE 0 END) AS open_trades
            FROM trade_history
            GROUP BY user_id
        ) stats ON u.id = stats.user_id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// One user joined with the full settings row
pub async fn get_user(pool: &PgPool, user_id: i64) -> Result<Option<UserDetailModel>, sqlx::Error> {
    sqlx::query_as::<_, UserDetailModel>(
        r#"
        SELECT
            u.id::int8 AS id,
            u.email,
            u.username,
            u.is_active,
            u.created_at::timestamptz AS created_at,
            us.lot_per_base::numeric AS lot_per_base,
            us.lot_base_amount::numeric AS lot_base_amount,
            us.max_lot::numeric AS max_lot,
            us.min_entry_gap::numeric AS min_entry_gap,
            us.max_spread::numeric AS max_spread,
            us.exit_reversal_gap::numeric AS exit_reversal_gap,
            us.min_hold_time::numeric AS min_hold_time,
            us.slippage::numeric AS slippage,
            us.hfm_terminal_path,
            us.equiti_terminal_path,
            us.hfm_symbol,
            us.equiti_symbol
        FROM users u
        LEFT JOIN user_settings us ON u.id = us.user_id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Ban (`false`) or unban (`true`) a user. Returns whether the user exists.
pub async fn set_user_active(pool: &PgPool, user_id: i64, is_active: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
        .bind(is_active)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Apply a validated settings update. Returns whether a settings row was changed.
pub async fn update_user_settings(pool: &PgPool, user_id: i64, update: &SettingsUpdate) -> Result<bool, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE user_settings SET ");
    {
        let mut assignments = builder.separated(", ");
        for (field, value) in &update.changes {
            assignments.push(format!("{} = ", field.column()));
            match value {
                SettingValue::Number(number) => assignments.push_bind_unseparated(*number),
                SettingValue::Text(text) => assignments.push_bind_unseparated(text.clone()),
            };
        }
    }
    builder.push(", updated_at = NOW() WHERE user_id = ").push_bind(user_id);

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a user and everything hanging off the account, in foreign-key order
pub async fn delete_user(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in [
        "DELETE FROM bot_logs WHERE user_id = $1",
        "DELETE FROM blocked_times WHERE user_id = $1",
        "DELETE FROM trade_history WHERE user_id = $1",
        "DELETE FROM user_settings WHERE user_id = $1",
    ] {
        sqlx::query(statement).bind(user_id).execute(&mut *tx).await?;
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
