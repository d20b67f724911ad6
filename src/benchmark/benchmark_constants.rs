use rust_decimal::Decimal;

// --- IPO CALCULATOR CONSTANTS ---
/// Raw price deltas are multiplied by this to land in point units (1 point = 0.00001)
pub const POINTS_PER_PRICE_UNIT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
/// Gap magnitudes below this are assumed to still be raw price deltas
pub const RAW_PRICE_THRESHOLD: Decimal = Decimal::from_parts(9, 0, 0, false, 1); // 0.9
/// Points-per-lot constant used when the operator has not supplied one
pub const DEFAULT_POINTS_PER_LOT: Decimal = Decimal::ONE;
