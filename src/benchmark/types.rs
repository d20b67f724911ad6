use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::parsing::{decimal_from_value, string_from_value, timestamp_from_value};

/// One cross-broker arbitrage trade (an HFM leg paired with an Equiti leg), as handed to the
/// IPO calculator. Every numeric field is optional: missing or unparsable values read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeRecord {
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,

    pub lot_size: Option<Decimal>,

    // Broker legs
    pub hfm_entry_price: Option<Decimal>,
    pub hfm_exit_price: Option<Decimal>,
    pub equiti_entry_price: Option<Decimal>,
    pub equiti_exit_price: Option<Decimal>,

    // Precomputed gaps, usually already in points
    pub entry_gap: Option<Decimal>,
    pub exit_gap: Option<Decimal>,

    pub net_profit: Option<Decimal>,

    // Metadata, not used in scoring
    pub opportunity_type: Option<String>,
    pub username: Option<String>,
    pub symbol: Option<String>,
}

impl TradeRecord {
    /// Build a record from a loosely typed JSON object.
    ///
    /// Each field is looked up under its snake_case name, then its camelCase name; when both are
    /// present the snake_case one wins. Values that do not parse read as absent, so this never fails.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let field = |name: &str, camel: &str| object.get(name).or_else(|| object.get(camel));
        let decimal = |name: &str, camel: &str| field(name, camel).and_then(decimal_from_value);
        let timestamp = |name: &str, camel: &str| field(name, camel).and_then(timestamp_from_value);

        TradeRecord {
            entry_time: timestamp("entry_time", "entryTime"),
            exit_time: timestamp("exit_time", "exitTime"),
            lot_size: decimal("lot_size", "lotSize"),
            hfm_entry_price: decimal("hfm_entry_price", "hfmEntryPrice"),
            hfm_exit_price: decimal("hfm_exit_price", "hfmExitPrice"),
            equiti_entry_price: decimal("equiti_entry_price", "equitiEntryPrice"),
            equiti_exit_price: decimal("equiti_exit_price", "equitiExitPrice"),
            entry_gap: decimal("entry_gap", "entryGap"),
            exit_gap: decimal("exit_gap", "exitGap"),
            net_profit: decimal("net_profit", "netProfit"),
            opportunity_type: field("opportunity_type", "opportunityType").and_then(string_from_value),
            username: object.get("username").and_then(string_from_value),
            symbol: object.get("symbol").and_then(string_from_value),
        }
    }
}

impl<'de> Deserialize<'de> for TradeRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(TradeRecord::from_json_object(&object))
    }
}

/// Why a trade was left out of the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// One of the two entry prices is missing or not positive
    IncompletePair,
    /// Lot size resolved to zero
    ZeroLot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeClassification {
    Valid,
    Skipped(SkipReason),
}

/// A gap value after resolution, remembering whether it had to be derived from the leg prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGap {
    pub value: Decimal,
    pub price_derived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGaps {
    pub entry: ResolvedGap,
    pub exit: ResolvedGap,
}

/// Output of one IPO calculator run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub score: Decimal,
    pub total_lot_points_product: Decimal,
    pub total_lots: Decimal,
    pub valid_count: usize,
    pub skipped_count: usize,
    /// Trades rejected for an incomplete pair. Zero-lot skips are counted but not listed.
    pub skipped_trades: Vec<TradeRecord>,
}
