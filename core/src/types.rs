//! Shared primitive types used across the generator and dashboard.

/// Stable merchant identifier, `M####`.
pub type MerchantId = String;

/// Whole-number transaction volume (currency units).
pub type Volume = u64;

/// Feature adoption as an integer percentage in [0, 100].
pub type Percent = u8;

/// Number of trailing months in every merchant's volume series.
pub const SERIES_MONTHS: usize = 12;
