use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;

use crate::benchmark::parsing::parse_decimal_str;
use crate::error::AdminError;

// Values shown when a user has no settings row yet
pub const DEFAULT_LOT_PER_BASE: Decimal = Decimal::from_parts(35, 0, 0, false, 2); // 0.35
pub const DEFAULT_MAX_LOT: Decimal = Decimal::from_parts(48, 0, 0, false, 1); // 4.8
pub const DEFAULT_MIN_ENTRY_GAP: Decimal = Decimal::from_parts(5, 0, 0, false, 5); // 0.00005
pub const DEFAULT_MAX_SPREAD: Decimal = Decimal::from_parts(3, 0, 0, false, 5); // 0.00003

/// User list row: account, headline bot settings and trade stats
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummaryModel {
    pub id: i64,
    pub email: Option<String>,
    pub username: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub hfm_terminal_path: Option<String>,
    pub equiti_terminal_path: Option<String>,
    pub lot_per_base: Option<Decimal>,
    pub max_lot: Option<Decimal>,
    pub min_entry_gap: Option<Decimal>,
    pub max_spread: Option<Decimal>,
    pub total_trades: i64,
    pub total_profit: Decimal,
    pub open_trades: i64,
}

impl UserSummaryModel {
    pub fn lot_per_base_or_default(&self) -> Decimal {
        self.lot_per_base.unwrap_or(DEFAULT_LOT_PER_BASE)
    }

    pub fn max_lot_or_default(&self) -> Decimal {
        self.max_lot.unwrap_or(DEFAULT_MAX_LOT)
    }

    pub fn min_entry_gap_or_default(&self) -> Decimal {
        self.min_entry_gap.unwrap_or(DEFAULT_MIN_ENTRY_GAP)
    }

    pub fn max_spread_or_default(&self) -> Decimal {
        self.max_spread.unwrap_or(DEFAULT_MAX_SPREAD)
    }
}

/// Single user with the full bot settings row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDetailModel {
    pub id: i64,
    pub email: Option<String>,
    pub username: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub lot_per_base: Option<Decimal>,
    pub lot_base_amount: Option<Decimal>,
    pub max_lot: Option<Decimal>,
    pub min_entry_gap: Option<Decimal>,
    pub max_spread: Option<Decimal>,
    pub exit_reversal_gap: Option<Decimal>,
    pub min_hold_time: Option<Decimal>,
    pub slippage: Option<Decimal>,
    pub hfm_terminal_path: Option<String>,
    pub equiti_terminal_path: Option<String>,
    pub hfm_symbol: Option<String>,
    pub equiti_symbol: Option<String>,
}

/// Bot settings an operator may change remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    LotPerBase,
    LotBaseAmount,
    MaxLot,
    MinEntryGap,
    MaxSpread,
    ExitReversalGap,
    MinHoldTime,
    Slippage,
    HfmTerminalPath,
    EquitiTerminalPath,
    HfmSymbol,
    EquitiSymbol,
}

impl SettingsField {
    pub const ALL: [SettingsField; 12] = [
        SettingsField::LotPerBase,
        SettingsField::LotBaseAmount,
        SettingsField::MaxLot,
        SettingsField::MinEntryGap,
        SettingsField::MaxSpread,
        SettingsField::ExitReversalGap,
        SettingsField::MinHoldTime,
        SettingsField::Slippage,
        SettingsField::HfmTerminalPath,
        SettingsField::EquitiTerminalPath,
        SettingsField::HfmSymbol,
        SettingsField::EquitiSymbol,
    ];

    /// Column name in `user_settings`
    pub fn column(self) -> &'static str {
        match self {
            SettingsField::LotPerBase => "lot_per_base",
            SettingsField::LotBaseAmount => "lot_base_amount",
            SettingsField::MaxLot => "max_lot",
            SettingsField::MinEntryGap => "min_entry_gap",
            SettingsField::MaxSpread => "max_spread",
            SettingsField::ExitReversalGap => "exit_reversal_gap",
            SettingsField::MinHoldTime => "min_hold_time",
            SettingsField::Slippage => "slippage",
            SettingsField::HfmTerminalPath => "hfm_terminal_path",
            SettingsField::EquitiTerminalPath => "equiti_terminal_path",
            SettingsField::HfmSymbol => "hfm_symbol",
            SettingsField::EquitiSymbol => "equiti_symbol",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            SettingsField::HfmTerminalPath
                | SettingsField::EquitiTerminalPath
                | SettingsField::HfmSymbol
                | SettingsField::EquitiSymbol
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Number(Decimal),
    Text(String),
}

/// Validated set of column updates for one user's settings row
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUpdate {
    pub changes: Vec<(SettingsField, SettingValue)>,
}

impl SettingsUpdate {
    /// Build from raw `key`/`value` pairs. Unknown keys are dropped; at least one known key is required.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, AdminError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut changes: Vec<(SettingsField, SettingValue)> = Vec::new();
        for (key, raw) in pairs {
            let Some(field) = SettingsField::from_column(key.trim()) else {
                warn!(key = %key, "Ignoring unknown settings field");
                continue;
            };
            let value = if field.is_numeric() {
                let number = parse_decimal_str(raw).ok_or_else(|| AdminError::InvalidSettingValue {
                    field: field.column(),
                    value: raw.to_string(),
                })?;
                SettingValue::Number(number)
            } else {
                SettingValue::Text(raw.to_string())
            };

            // Last write for a field wins
            changes.retain(|(existing, _)| *existing != field);
            changes.push((field, value));
        }

        if changes.is_empty() {
            return Err(AdminError::NoValidFields);
        }
        Ok(Self { changes })
    }
}
