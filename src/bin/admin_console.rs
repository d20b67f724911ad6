use chrono::Utc;
use dotenvy::dotenv;
use eyre::{Result, eyre};
use tracing::{info, warn};

use ipo_admin_console::config;
use ipo_admin_console::db::db_manager::DbManager;
use ipo_admin_console::db::models::users::SettingsUpdate;
use ipo_admin_console::logging;
use ipo_admin_console::user_stats::user_trade_stats;

const USAGE: &str = "usage: admin_console <command>
  overview | profit-history | active-bots | live-pnl
  users | user <id> | ban <id> | unban <id> | delete <id>
  settings <id> key=value [key=value ...]
  kill-switch on|off
  blocked-times [list | add START END [REASON] | remove ID]";

fn parse_id(raw: Option<&String>) -> Result<i64> {
    let raw = raw.ok_or_else(|| eyre!("missing id\n{}", USAGE))?;
    raw.parse::<i64>().map_err(|_| eyre!("invalid id {:?}", raw))
}

/// A validated command line. Built before any database connection is made.
#[derive(Debug, PartialEq)]
enum Command {
    Overview,
    ProfitHistory,
    ActiveBots,
    LivePnl,
    Users,
    User(i64),
    SetActive { user_id: i64, active: bool },
    Delete(i64),
    Settings { user_id: i64, update: SettingsUpdate },
    KillSwitch(bool),
    ListBlockedTimes,
    AddBlockedTime { start: String, end: String, reason: Option<String> },
    RemoveBlockedTime(i64),
}

fn parse_command(args: &[String]) -> Result<Command> {
    let command = args.first().map(String::as_str).ok_or_else(|| eyre!(USAGE))?;

    let parsed = match command {
        "overview" => Command::Overview,
        "profit-history" => Command::ProfitHistory,
        "active-bots" => Command::ActiveBots,
        "live-pnl" => Command::LivePnl,
        "users" => Command::Users,
        "user" => Command::User(parse_id(args.get(1))?),
        "ban" => Command::SetActive { user_id: parse_id(args.get(1))?, active: false },
        "unban" => Command::SetActive { user_id: parse_id(args.get(1))?, active: true },
        "delete" => Command::Delete(parse_id(args.get(1))?),
        "settings" => {
            let user_id = parse_id(args.get(1))?;
            let pairs = args[2..]
                .iter()
                .filter_map(|pair| match pair.split_once('=') {
                    Some(kv) => Some(kv),
                    None => {
                        warn!(arg = %pair, "Ignoring argument without '='");
                        None
                    }
                });
            Command::Settings { user_id, update: SettingsUpdate::from_pairs(pairs)? }
        }
        "kill-switch" => match args.get(1).map(String::as_str) {
            Some("on") => Command::KillSwitch(true),
            Some("off") => Command::KillSwitch(false),
            _ => return Err(eyre!("kill-switch needs on or off")),
        },
        "blocked-times" => match args.get(1).map(String::as_str) {
            None | Some("list") => Command::ListBlockedTimes,
            Some("add") => {
                let start = args.get(2).ok_or_else(|| eyre!("blocked-times add needs START and END"))?;
                let end = args.get(3).ok_or_else(|| eyre!("blocked-times add needs START and END"))?;
                Command::AddBlockedTime {
                    start: start.clone(),
                    end: end.clone(),
                    reason: args.get(4).cloned(),
                }
            }
            Some("remove") => Command::RemoveBlockedTime(parse_id(args.get(2))?),
            Some(other) => return Err(eyre!("unknown blocked-times action {:?}", other)),
        },
        "-h" | "--help" | "help" => return Err(eyre!(USAGE)),
        other => return Err(eyre!("unknown command {:?}\n{}", other, USAGE)),
    };

    Ok(parsed)
}

async fn run(db: &DbManager, command: Command) -> Result<()> {
    match command {
        Command::Overview => {
            let overview = db.get_overview().await?;
            info!(
                "Overview:\n  Users: {} ({} active, {}%)\n  Trades: {} ({} open)\n  Net Profit: {}\n  Avg Profit/Trade: {}\n  Today: {} trades, {} profit\n  Kill Switch: {}",
                overview.total_users,
                overview.active_users,
                overview.active_user_rate(),
                overview.total_trades,
                overview.open_trades,
                overview.total_profit,
                overview.avg_profit_per_trade().round_dp(2),
                overview.today_trades,
                overview.today_profit,
                if overview.system_settings.global_kill_switch { "ACTIVE" } else { "off" },
            );
        }
        Command::ProfitHistory => {
            let history = db.get_profit_history().await?;
            if history.is_empty() {
                info!("No trades in the last 30 days");
            }
            for day in history {
                info!(date = %day.date, profit = ?day.profit, trades = day.trades, "Daily profit");
            }
        }
        Command::ActiveBots => {
            for bot in db.get_active_bots().await? {
                info!(
                    user_id = bot.id,
                    username = ?bot.username,
                    opportunity = ?bot.opportunity_type,
                    lot_size = ?bot.lot_size,
                    entry_gap = ?bot.entry_gap,
                    entry_time = ?bot.entry_time,
                    "Open trade"
                );
            }
        }
        Command::LivePnl => {
            for trade in db.get_live_pnl().await? {
                info!(
                    trade_id = trade.id,
                    username = ?trade.username,
                    net_profit = ?trade.net_profit,
                    lot_size = ?trade.lot_size,
                    hold = ?trade.hold_duration,
                    exit_time = ?trade.exit_time,
                    "Closed trade"
                );
            }
        }
        Command::Users => {
            for user in db.get_all_users().await? {
                info!(
                    user_id = user.id,
                    email = ?user.email,
                    username = ?user.username,
                    active = user.is_active.unwrap_or(false),
                    lot_per_base = %user.lot_per_base_or_default(),
                    max_lot = %user.max_lot_or_default(),
                    min_entry_gap = %user.min_entry_gap_or_default(),
                    max_spread = %user.max_spread_or_default(),
                    trades = user.total_trades,
                    open_trades = user.open_trades,
                    profit = %user.total_profit,
                    "User"
                );
            }
        }
        Command::User(user_id) => {
            let (user, trades) = db.get_user_detail(user_id).await?;
            let stats = user_trade_stats(&trades, Utc::now());
            info!(user = ?user, "User detail");
            info!(
                "Recent trades for user {}:\n  Trades: {}\n  Net Profit: {}\n  Win Rate: {}%\n  Today: {} trades, {} profit",
                user_id,
                stats.total_trades,
                stats.total_profit,
                stats.win_rate,
                stats.today_trades,
                stats.today_profit,
            );
        }
        Command::SetActive { user_id, active } => db.set_user_active(user_id, active).await?,
        Command::Delete(user_id) => db.delete_user(user_id).await?,
        Command::Settings { user_id, update } => db.update_user_settings(user_id, &update).await?,
        Command::KillSwitch(enabled) => db.set_kill_switch(enabled).await?,
        Command::ListBlockedTimes => {
            let settings = db.get_system_settings().await?;
            if settings.blocked_times.is_empty() {
                info!("No blocked times");
            }
            for window in settings.blocked_times {
                info!(id = window.id, start = %window.start, end = %window.end, reason = %window.reason, "Blocked time");
            }
        }
        Command::AddBlockedTime { start, end, reason } => {
            db.add_blocked_time(&start, &end, reason.as_deref()).await?;
        }
        Command::RemoveBlockedTime(id) => {
            db.remove_blocked_time(id).await?;
        }
    }

    Ok(())
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

    // Load configuration
    let cfg = config::Config::load()?;
    info!(mode = %cfg.mode, "Configuration loaded and logging initialized");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    // Initialize db manager
    let db = DbManager::init(&cfg).await?;
    info!("Database manager initialized");

    run(&db, command).await?;

    tokio::time::sleep(std::time::Duration::from_millis(500)).await; // Allow time for logging to flush
    Ok(())
}
