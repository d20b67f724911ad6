use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::benchmark::types::TradeRecord;

/// Headline numbers for one user's recent trades
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserTradeStats {
    pub total_trades: usize,
    pub total_profit: Decimal,
    /// Percentage of trades with positive net profit, one decimal place
    pub win_rate: Decimal,
    pub today_trades: usize,
    pub today_profit: Decimal,
}

pub fn user_trade_stats(trades: &[TradeRecord], now: DateTime<Utc>) -> UserTradeStats {
    let today = now.date_naive();
    let mut stats = UserTradeStats {
        total_trades: trades.len(),
        ..Default::default()
    };

    let mut wins = 0usize;
    for trade in trades {
        let profit = trade.net_profit.unwrap_or(Decimal::ZERO);
        stats.total_profit += profit;
        if profit > Decimal::ZERO {
            wins += 1;
        }
        if trade.entry_time.is_some_and(|t| t.date_naive() == today) {
            stats.today_trades += 1;
            stats.today_profit += profit;
        }
    }

    if stats.total_trades > 0 {
        stats.win_rate = (Decimal::from(wins) * Decimal::ONE_HUNDRED / Decimal::from(stats.total_trades)).round_dp(1);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn trade(profit: Option<Decimal>, entry: DateTime<Utc>) -> TradeRecord {
        TradeRecord {
            net_profit: profit,
            entry_time: Some(entry),
            ..Default::default()
        }
    }

    #[test]
    fn no_trades_means_zero_win_rate() {
        let stats = user_trade_stats(&[], Utc::now());
        assert_eq!(stats, UserTradeStats::default());
    }

    #[test]
    fn splits_today_from_history() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let earlier_today = Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 6, 14, 23, 0, 0).unwrap();

        let trades = vec![
            trade(Some(dec!(12.5)), earlier_today),
            trade(Some(dec!(-2.5)), earlier_today),
            trade(Some(dec!(4)), yesterday),
            trade(None, yesterday),
        ];
        let stats = user_trade_stats(&trades, now);

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.total_profit, dec!(14));
        assert_eq!(stats.win_rate, dec!(50.0));
        assert_eq!(stats.today_trades, 2);
        assert_eq!(stats.today_profit, dec!(10));
    }

    #[test]
    fn win_rate_rounds_to_one_place() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let trades = vec![
            trade(Some(dec!(1)), now),
            trade(Some(dec!(-1)), now),
            trade(Some(dec!(-1)), now),
        ];
        assert_eq!(user_trade_stats(&trades, now).win_rate, dec!(33.3));
    }
}
