use dotenvy::dotenv;
use eyre::{Result, WrapErr, eyre};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use ipo_admin_console::benchmark::{
    calculator, engine,
    parsing::{parse_constant, parse_decimal_str},
    types::BenchmarkResult,
};
use ipo_admin_console::config;
use ipo_admin_console::db::db_manager::DbManager;
use ipo_admin_console::logging;
use ipo_admin_console::trade_period::TradePeriod;

const USAGE: &str = "usage: ipo_calculator [--json] [--input FILE] [day|week|month|all | START END] [CONSTANT]
  a lone number is taken as the constant over all trades";

struct Args {
    json: bool,
    input: Option<String>,
    period: TradePeriod,
    constant: Option<Decimal>,
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut json = false;
    let mut input = None;
    let mut positional = Vec::new();

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--input" => input = Some(iter.next().ok_or_else(|| eyre!("--input needs a file path\n{}", USAGE))?),
            "-h" | "--help" => return Err(eyre!(USAGE)),
            _ => positional.push(arg),
        }
    }

    // A lone number is the constant. Otherwise a leading date means a custom range and needs both ends
    let (period, rest) = match positional.first() {
        Some(only) if positional.len() == 1 && parse_decimal_str(only).is_some() => (TradePeriod::All, &positional[..]),
        Some(first) if first.starts_with(|c: char| c.is_ascii_digit()) => {
            let end = positional.get(1).ok_or_else(|| eyre!("custom range needs START and END\n{}", USAGE))?;
            (TradePeriod::from_range(first, end)?, &positional[2..])
        }
        Some(name) => (TradePeriod::from_name(name), &positional[1..]),
        None => (TradePeriod::All, &positional[..]),
    };

    Ok(Args {
        json,
        input,
        period,
        constant: rest.first().map(|raw| parse_constant(raw)),
    })
}

/// Trade list from an exported file. Accepts a bare array or the `{ "trades": [...] }` envelope.
fn score_file(path: &str, constant: Decimal) -> Result<BenchmarkResult> {
    let contents = std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path))?;
    let value: Value = serde_json::from_str(&contents).wrap_err_with(|| format!("{} is not valid JSON", path))?;
    let trades = match value {
        Value::Object(mut envelope) if envelope.contains_key("trades") => envelope.remove("trades").unwrap_or(Value::Null),
        other => other,
    };
    let result = engine::compute_benchmark_from_json(&trades, constant)?;
    calculator::log_benchmark_result(&result, path, constant);
    Ok(result)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let args = parse_args(std::env::args().skip(1).collect())?;

    // Load configuration
    let cfg = config::Config::load()?;
    info!(mode = %cfg.mode, "Configuration loaded and logging initialized");

    let constant = args.constant.unwrap_or(cfg.ipo_constant);

    let result = match &args.input {
        Some(path) => score_file(path, constant)?,
        None => {
            let db = DbManager::init(&cfg).await?;
            info!("Database manager initialized");
            calculator::run_ipo_calculator(&db, &args.period, constant).await?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    tokio::time::sleep(std::time::Duration::from_millis(500)).await; // Allow time for logging to flush
    Ok(())
}
