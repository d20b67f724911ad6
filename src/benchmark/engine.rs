use rust_decimal::Decimal;
use serde_json::Value;

use super::{
    benchmark_constants::{POINTS_PER_PRICE_UNIT, RAW_PRICE_THRESHOLD},
    error::BenchmarkError,
    types::{BenchmarkResult, ResolvedGap, ResolvedGaps, SkipReason, TradeClassification, TradeRecord},
};

/// Compute the IPO benchmark score over a set of trades.
///
/// Each valid trade contributes `lot_size * (|entry points| + |exit points|)`; the score is that sum
/// minus `total_lots * constant`. Trade order does not matter and the input is never mutated.
pub fn compute_benchmark(trades: &[TradeRecord], constant: Decimal) -> BenchmarkResult {
    let mut result = BenchmarkResult::default();

    for trade in trades {
        match classify_trade(trade) {
            TradeClassification::Skipped(SkipReason::IncompletePair) => {
                result.skipped_count += 1;
                result.skipped_trades.push(trade.clone());
            }
            TradeClassification::Skipped(SkipReason::ZeroLot) => {
                result.skipped_count += 1;
            }
            TradeClassification::Valid => {
                let lot_size = lot_size_of(trade);
                let points = trade_points(trade);
                result.total_lot_points_product = result
                    .total_lot_points_product
                    .saturating_add(lot_size.saturating_mul(points));
                result.total_lots = result.total_lots.saturating_add(lot_size);
                result.valid_count += 1;
            }
        }
    }

    result.score = result
        .total_lot_points_product
        .saturating_sub(result.total_lots.saturating_mul(constant));
    result
}

/// Same as [`compute_benchmark`] but over loosely typed JSON, e.g. an exported trade list.
///
/// The value must be an array of objects. Fields inside each object are parsed leniently, see
/// [`TradeRecord::from_json_object`].
pub fn compute_benchmark_from_json(value: &Value, constant: Decimal) -> Result<BenchmarkResult, BenchmarkError> {
    let items = value.as_array().ok_or_else(|| {
        BenchmarkError::InvalidArgument(format!("expected a sequence of trade records, got {}", json_kind(value)))
    })?;

    let trades = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().map(TradeRecord::from_json_object).ok_or_else(|| {
                BenchmarkError::InvalidArgument(format!(
                    "trade record at index {} is {}, not an object",
                    i,
                    json_kind(item)
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(compute_benchmark(&trades, constant))
}

/// Decide whether a trade takes part in the benchmark
pub fn classify_trade(trade: &TradeRecord) -> TradeClassification {
    if !is_positive(trade.hfm_entry_price) || !is_positive(trade.equiti_entry_price) {
        return TradeClassification::Skipped(SkipReason::IncompletePair);
    }
    if lot_size_of(trade).is_zero() {
        return TradeClassification::Skipped(SkipReason::ZeroLot);
    }
    TradeClassification::Valid
}

/// Fill in missing gaps from the leg prices
pub fn resolve_gaps(trade: &TradeRecord) -> ResolvedGaps {
    ResolvedGaps {
        entry: resolve_gap(trade.entry_gap, trade.hfm_entry_price, trade.equiti_entry_price),
        exit: resolve_gap(trade.exit_gap, trade.hfm_exit_price, trade.equiti_exit_price),
    }
}

/// Convert a resolved gap into point units.
///
/// Anything derived from prices, or smaller than 0.9 in magnitude, is taken to be a raw price delta.
/// Genuine sub-0.9 point values get scaled too.
pub fn normalize_gap(gap: ResolvedGap) -> Decimal {
    if gap.price_derived || gap.value.abs() < RAW_PRICE_THRESHOLD {
        gap.value.saturating_mul(POINTS_PER_PRICE_UNIT)
    } else {
        gap.value
    }
}

/// Points captured by a single trade (entry plus exit, in absolute terms)
pub fn trade_points(trade: &TradeRecord) -> Decimal {
    let gaps = resolve_gaps(trade);
    normalize_gap(gaps.entry)
        .abs()
        .saturating_add(normalize_gap(gaps.exit).abs())
}

fn resolve_gap(stored: Option<Decimal>, hfm_price: Option<Decimal>, equiti_price: Option<Decimal>) -> ResolvedGap {
    let value = stored.unwrap_or(Decimal::ZERO);
    if !value.is_zero() {
        return ResolvedGap { value, price_derived: false };
    }
    match (nonzero(hfm_price), nonzero(equiti_price)) {
        (Some(hfm), Some(equiti)) => ResolvedGap {
            value: hfm.saturating_sub(equiti).abs(),
            price_derived: true,
        },
        _ => ResolvedGap { value, price_derived: false },
    }
}

fn lot_size_of(trade: &TradeRecord) -> Decimal {
    trade.lot_size.unwrap_or(Decimal::ZERO)
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| v > Decimal::ZERO)
}

fn nonzero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn priced(hfm: Decimal, equiti: Decimal, lot: Decimal) -> TradeRecord {
        TradeRecord {
            hfm_entry_price: Some(hfm),
            equiti_entry_price: Some(equiti),
            lot_size: Some(lot),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let result = compute_benchmark(&[], dec!(3));
        assert_eq!(result, BenchmarkResult::default());
        assert_eq!(result.score, Decimal::ZERO);
    }

    #[test]
    fn price_derived_entry_gap_is_scaled_to_points() {
        let trade = priced(dec!(1.25050), dec!(1.25000), dec!(1));
        let result = compute_benchmark(&[trade], dec!(1));

        assert_eq!(result.total_lot_points_product, dec!(50));
        assert_eq!(result.total_lots, dec!(1));
        assert_eq!(result.score, dec!(49));
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn stored_point_gaps_are_used_as_is() {
        let trade = TradeRecord {
            entry_gap: Some(dec!(5)),
            exit_gap: Some(dec!(4)),
            ..priced(dec!(1.1), dec!(1.1001), dec!(2))
        };
        let result = compute_benchmark(&[trade], Decimal::ZERO);

        assert_eq!(result.total_lot_points_product, dec!(18));
        assert_eq!(result.score, dec!(18));
    }

    #[test]
    fn missing_equiti_leg_is_listed_as_skipped() {
        let trade = TradeRecord {
            hfm_entry_price: Some(dec!(1.2)),
            lot_size: Some(dec!(1)),
            ..Default::default()
        };
        let result = compute_benchmark(&[trade.clone()], dec!(1));

        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.valid_count, 0);
        assert_eq!(result.skipped_trades, vec![trade]);
        assert_eq!(result.score, Decimal::ZERO);
    }

    #[test]
    fn negative_entry_price_is_an_incomplete_pair() {
        let trade = priced(dec!(-1.2), dec!(1.2), dec!(1));
        assert_eq!(classify_trade(&trade), TradeClassification::Skipped(SkipReason::IncompletePair));
    }

    #[test]
    fn zero_lot_is_counted_but_not_listed() {
        let zero = priced(dec!(1.2), dec!(1.2001), Decimal::ZERO);
        let absent = TradeRecord { lot_size: None, ..zero.clone() };
        let result = compute_benchmark(&[zero, absent], dec!(1));

        assert_eq!(result.skipped_count, 2);
        assert!(result.skipped_trades.is_empty());
        assert_eq!(result.total_lots, Decimal::ZERO);
        assert_eq!(result.valid_count, 0);
    }

    #[test]
    fn exit_gap_derived_only_when_both_exit_prices_present() {
        let mut trade = priced(dec!(1.0001), dec!(1.0000), dec!(1));
        trade.hfm_exit_price = Some(dec!(1.0003));
        let gaps = resolve_gaps(&trade);
        assert!(gaps.entry.price_derived);
        assert!(!gaps.exit.price_derived);
        assert_eq!(gaps.exit.value, Decimal::ZERO);

        trade.equiti_exit_price = Some(dec!(1.0000));
        let gaps = resolve_gaps(&trade);
        assert!(gaps.exit.price_derived);
        assert_eq!(gaps.exit.value, dec!(0.0003));
        assert_eq!(trade_points(&trade), dec!(40));
    }

    #[test]
    fn small_stored_gap_is_treated_as_raw_price() {
        let gap = ResolvedGap { value: dec!(0.00007), price_derived: false };
        assert_eq!(normalize_gap(gap), dec!(7));

        let at_threshold = ResolvedGap { value: dec!(0.9), price_derived: false };
        assert_eq!(normalize_gap(at_threshold), dec!(0.9));

        let negative = ResolvedGap { value: dec!(-3), price_derived: false };
        assert_eq!(normalize_gap(negative), dec!(-3));
    }

    #[test]
    fn negative_stored_gaps_contribute_their_magnitude() {
        let trade = TradeRecord {
            entry_gap: Some(dec!(-6)),
            exit_gap: Some(dec!(2)),
            ..priced(dec!(1.3), dec!(1.3), dec!(0.5))
        };
        let result = compute_benchmark(&[trade], dec!(2));
        assert_eq!(result.total_lot_points_product, dec!(4));
        assert_eq!(result.score, dec!(3));
    }

    #[test]
    fn raising_the_constant_lowers_the_score() {
        let trades = vec![priced(dec!(1.25050), dec!(1.25000), dec!(1.5))];
        let low = compute_benchmark(&trades, dec!(1));
        let high = compute_benchmark(&trades, dec!(2));
        assert!(high.score < low.score);

        let skipped_only = vec![TradeRecord::default()];
        assert_eq!(
            compute_benchmark(&skipped_only, dec!(1)).score,
            compute_benchmark(&skipped_only, dec!(100)).score
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let trades = vec![
            priced(dec!(1.25050), dec!(1.25000), dec!(1)),
            TradeRecord::default(),
            priced(dec!(150.010), dec!(150.000), dec!(0.3)),
        ];
        let snapshot = trades.clone();
        let first = compute_benchmark(&trades, dec!(0.7));
        let second = compute_benchmark(&trades, dec!(0.7));
        assert_eq!(first, second);
        assert_eq!(trades, snapshot);
    }

    #[test]
    fn json_input_must_be_a_sequence_of_objects() {
        assert!(matches!(
            compute_benchmark_from_json(&json!({"trades": []}), dec!(1)),
            Err(BenchmarkError::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_benchmark_from_json(&json!([{"lot_size": 1}, 7]), dec!(1)),
            Err(BenchmarkError::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_benchmark_from_json(&json!("trades"), dec!(1)),
            Err(BenchmarkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn json_fields_degrade_to_zero() {
        let trades = json!([
            {
                "hfm_entry_price": "1.25050",
                "equiti_entry_price": 1.25,
                "lot_size": "1",
                "entry_gap": "n/a",
                "exit_gap": null,
                "net_profit": {"usd": 3}
            },
            {
                "hfmEntryPrice": "1.1",
                "equitiEntryPrice": "1.1",
                "lotSize": "lots"
            }
        ]);
        let result = compute_benchmark_from_json(&trades, dec!(1)).unwrap();
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.score, dec!(49));
    }

    #[test]
    fn zero_stored_entry_gap_falls_back_to_prices() {
        let trade = TradeRecord {
            entry_gap: Some(Decimal::ZERO),
            ..priced(dec!(1.25050), dec!(1.25000), dec!(1))
        };
        let gaps = resolve_gaps(&trade);
        assert!(gaps.entry.price_derived);
        assert_eq!(gaps.entry.value, dec!(0.00050));
        assert_eq!(trade_points(&trade), dec!(50));
    }

    #[test]
    fn entry_and_exit_are_normalized_independently() {
        // Entry derived from prices (raw delta), exit stored in points
        let trade = TradeRecord {
            exit_gap: Some(dec!(4)),
            ..priced(dec!(1.25050), dec!(1.25000), dec!(2))
        };
        let gaps = resolve_gaps(&trade);
        assert!(gaps.entry.price_derived);
        assert!(!gaps.exit.price_derived);
        assert_eq!(normalize_gap(gaps.entry), dec!(50));
        assert_eq!(normalize_gap(gaps.exit), dec!(4));

        let result = compute_benchmark(&[trade], dec!(1));
        assert_eq!(result.total_lot_points_product, dec!(108));
        assert_eq!(result.score, dec!(106));
    }

    #[test]
    fn extreme_prices_saturate_instead_of_panicking() {
        let trades = json!([{
            "hfm_entry_price": "1.2",
            "equiti_entry_price": "1.1",
            "lot_size": "1",
            "hfm_exit_price": "79228162514264337593543950335",
            "equiti_exit_price": "-79228162514264337593543950335"
        }]);
        let result = compute_benchmark_from_json(&trades, dec!(1)).unwrap();
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.total_lot_points_product, Decimal::MAX);

        let huge_lots = vec![priced(dec!(1.2), dec!(1.1), Decimal::MAX), priced(dec!(1.2), dec!(1.1), Decimal::MAX)];
        let result = compute_benchmark(&huge_lots, dec!(-5));
        assert_eq!(result.total_lots, Decimal::MAX);
        assert_eq!(result.score, Decimal::MAX);
    }

    #[test]
    fn duplicate_field_spellings_do_not_fail_the_call() {
        let trades = json!([{
            "hfm_entry_price": 1.2,
            "equiti_entry_price": 1.1,
            "lot_size": 1,
            "lotSize": 2
        }]);
        let result = compute_benchmark_from_json(&trades, Decimal::ZERO).unwrap();
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.total_lots, dec!(1));
        assert_eq!(result.total_lot_points_product, dec!(10000));
    }
}
