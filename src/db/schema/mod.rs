use sqlx::{
    Executor,
    postgres::PgPool,
};

// Users, settings and trade history belong to the bot platform; the console only owns system_settings
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("system_settings.sql")).await?;

    // Singleton row read by every bot
    sqlx::query(
        r#"
        INSERT INTO system_settings (id, global_kill_switch, blocked_times)
        VALUES (1, FALSE, '[]')
        ON CONFLICT (id) DO NOTHING
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
