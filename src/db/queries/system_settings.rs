use serde_json::Value;
use sqlx::PgPool;

use crate::db::models::system_settings::{encode_blocked_times, SystemSettings, SystemSettingsModel};

/// Current system settings. A missing row means the kill switch is off and nothing is blocked.
pub async fn get_system_settings(pool: &PgPool) -> Result<SystemSettings, sqlx::Error> {
    let row = sqlx::query_as::<_, SystemSettingsModel>(
        r#"
        SELECT id, global_kill_switch, blocked_times, updated_at::timestamptz AS updated_at
        FROM system_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(SystemSettings::from).unwrap_or_default())
}

pub async fn set_kill_switch(pool: &PgPool, enabled: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE system_settings SET global_kill_switch = $1, updated_at = NOW() WHERE id = 1")
        .bind(enabled)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the whole blocked-times schedule
pub async fn set_blocked_times(pool: &PgPool, entries: &[Value]) -> Result<(), sqlx::Error> {
    let encoded = encode_blocked_times(entries);
    sqlx::query("UPDATE system_settings SET blocked_times = $1, updated_at = NOW() WHERE id = 1")
        .bind(encoded)
        .execute(pool)
        .await?;
    Ok(())
}
