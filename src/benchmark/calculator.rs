use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, info_span, warn};

use super::{
    engine,
    types::{BenchmarkResult, TradeRecord},
};
use crate::db::db_manager::DbManager;
use crate::trade_period::TradePeriod;

/// Fetch the trades for `period` and score them. Run on every data refresh or constant edit
pub async fn run_ipo_calculator(
    db_manager: &DbManager,
    period: &TradePeriod,
    constant: Decimal,
) -> Result<BenchmarkResult, sqlx::Error> {
    info!(period = %period, constant = %constant, "Starting IPO calculation...");

    let trades = db_manager.get_trades_for_period(period, Utc::now()).await?;
    if trades.is_empty() {
        warn!(period = %period, "No trades in period");
    }

    let result = score_trades(&trades, constant);
    log_benchmark_result(&result, &period.to_string(), constant);
    Ok(result)
}

/// Score trades inside a timed span
pub fn score_trades(trades: &[TradeRecord], constant: Decimal) -> BenchmarkResult {
    let span = info_span!("ipo_calculation", trades = trades.len(), on_close = true);
    let _guard = span.enter();
    engine::compute_benchmark(trades, constant)
}

/// Log the score summary and one line per incomplete pair. `source` names where the trades came from.
pub fn log_benchmark_result(result: &BenchmarkResult, source: &str, constant: Decimal) {
    let skipped_summary = result
        .skipped_trades
        .iter()
        .map(|trade| {
            format!(
                "{} {} [{}] entry={} HFM={} Equiti={}",
                trade.username.as_deref().unwrap_or("-"),
                trade.symbol.as_deref().unwrap_or("-"),
                trade.opportunity_type.as_deref().unwrap_or("-"),
                trade.entry_time.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string()),
                display_price(trade.hfm_entry_price),
                display_price(trade.equiti_entry_price),
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    info!(
        "IPO Score ({}, constant {}): {}\n  Lot x Points: {}\n  Total Lots: {}\n  Valid Trades: {}\n  Skipped Trades: {}",
        source,
        constant,
        result.score,
        result.total_lot_points_product,
        result.total_lots,
        result.valid_count,
        result.skipped_count,
    );

    if !result.skipped_trades.is_empty() {
        warn!(
            "Skipped {} trade(s) with an incomplete broker pair:\n  {}",
            result.skipped_trades.len(),
            skipped_summary
        );
    }
}

fn display_price(price: Option<Decimal>) -> String {
    price.map(|p| p.to_string()).unwrap_or_else(|| "missing".to_string())
}
