use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use ipo_admin_console::benchmark::calculator::score_trades;
use ipo_admin_console::benchmark::engine::{compute_benchmark, compute_benchmark_from_json};
use ipo_admin_console::benchmark::error::BenchmarkError;
use ipo_admin_console::benchmark::types::TradeRecord;

fn pair(hfm: Decimal, equiti: Decimal, lot: Decimal) -> TradeRecord {
    TradeRecord {
        hfm_entry_price: Some(hfm),
        equiti_entry_price: Some(equiti),
        lot_size: Some(lot),
        ..Default::default()
    }
}

#[test]
fn scenario_price_derived_entry_gap() {
    let result = compute_benchmark(&[pair(dec!(1.25050), dec!(1.25000), dec!(1))], dec!(1));

    assert_eq!(result.total_lot_points_product, dec!(50.0));
    assert_eq!(result.total_lots, dec!(1));
    assert_eq!(result.score, dec!(49.0));
    assert_eq!(result.valid_count, 1);
}

#[test]
fn scenario_stored_point_gaps() {
    let trade = TradeRecord {
        entry_gap: Some(dec!(5)),
        exit_gap: Some(dec!(4)),
        ..pair(dec!(1.25050), dec!(1.25000), dec!(2))
    };
    let result = compute_benchmark(&[trade], Decimal::ZERO);

    assert_eq!(result.total_lot_points_product, dec!(18));
    assert_eq!(result.score, dec!(18));
}

#[test]
fn scenario_incomplete_pair() {
    let trade = TradeRecord {
        hfm_entry_price: Some(dec!(1.25050)),
        lot_size: Some(dec!(1)),
        ..Default::default()
    };
    let result = compute_benchmark(&[trade], dec!(1));

    assert_eq!(result.skipped_count, 1);
    assert_eq!(result.skipped_trades.len(), 1);
    assert_eq!(result.valid_count, 0);
    assert_eq!(result.score, Decimal::ZERO);
}

#[test]
fn mixed_batch_from_exported_json() {
    // Shape of the console's trade export: NUMERIC columns arrive as strings
    let export = json!([
        {
            "id": 1,
            "entry_time": "2025-06-02T09:15:00.000Z",
            "exit_time": "2025-06-02T09:16:30.000Z",
            "opportunity_type": "BUY_HFM_SELL_EQUITI",
            "lot_size": "0.50",
            "hfm_entry_price": "1.08530",
            "equiti_entry_price": "1.08500",
            "hfm_exit_price": "1.08510",
            "equiti_exit_price": "1.08500",
            "net_profit": "3.20",
            "entry_gap": null,
            "exit_gap": null,
            "status": "CLOSED",
            "username": "alice"
        },
        {
            "id": 2,
            "lot_size": "1.00",
            "hfm_entry_price": "1.08530",
            "equiti_entry_price": "1.08500",
            "entry_gap": "12",
            "exit_gap": "3",
            "username": "bob"
        },
        {
            "id": 3,
            "lot_size": "1.00",
            "hfm_entry_price": "1.08530",
            "equiti_entry_price": "0",
            "username": "carol"
        },
        {
            "id": 4,
            "lot_size": "0",
            "hfm_entry_price": "1.08530",
            "equiti_entry_price": "1.08500",
            "username": "dave"
        }
    ]);

    let result = compute_benchmark_from_json(&export, dec!(1)).unwrap();

    // alice: (30 + 10) * 0.5 = 20, bob: (12 + 3) * 1 = 15
    assert_eq!(result.total_lot_points_product, dec!(35));
    assert_eq!(result.total_lots, dec!(1.5));
    assert_eq!(result.score, dec!(33.5));
    assert_eq!(result.valid_count, 2);
    assert_eq!(result.skipped_count, 2);
    assert_eq!(result.skipped_trades.len(), 1);
    assert_eq!(result.skipped_trades[0].username.as_deref(), Some("carol"));
}

#[test]
fn order_does_not_matter() {
    let trades = vec![
        pair(dec!(1.25050), dec!(1.25000), dec!(1)),
        pair(dec!(150.012), dec!(150.000), dec!(0.25)),
        TradeRecord::default(),
    ];
    let mut reversed = trades.clone();
    reversed.reverse();

    let forward = compute_benchmark(&trades, dec!(1.5));
    let backward = compute_benchmark(&reversed, dec!(1.5));
    assert_eq!(forward.score, backward.score);
    assert_eq!(forward.total_lots, backward.total_lots);
    assert_eq!(forward.skipped_count, backward.skipped_count);
}

#[test]
fn constant_shifts_score_by_total_lots() {
    let trades = vec![pair(dec!(1.25050), dec!(1.25000), dec!(2))];
    let at_zero = compute_benchmark(&trades, Decimal::ZERO);
    let negative = compute_benchmark(&trades, dec!(-1));

    assert_eq!(at_zero.score, dec!(100));
    assert_eq!(negative.score, dec!(102));
}

#[test]
fn timed_scoring_matches_engine() {
    let trades = vec![pair(dec!(1.25050), dec!(1.25000), dec!(1))];
    assert_eq!(score_trades(&trades, dec!(1)), compute_benchmark(&trades, dec!(1)));
}

#[test]
fn non_sequence_input_is_rejected() {
    let err = compute_benchmark_from_json(&json!(42), dec!(1)).unwrap_err();
    assert!(matches!(err, BenchmarkError::InvalidArgument(_)));
    assert!(err.to_string().contains("a number"));
}
