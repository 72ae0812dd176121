//! Display units for sidechain amounts.
//!
//! Amounts are stored as satoshis everywhere; this module only decides how
//! they are rendered. The formatting contract (fixed decimal places per
//! unit, optional thousands grouping of the integer part) matches what
//! Bitcoin wallets show in their transaction tables.

use bitcoin::Amount;
use serde::{Deserialize, Serialize};

/// Unit used to render satoshi amounts as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountUnit {
    #[default]
    Btc,
    MilliBtc,
    MicroBtc,
    Sat,
}

impl AmountUnit {
    /// All selectable units, in menu order.
    pub const ALL: [Self; 4] = [Self::Btc, Self::MilliBtc, Self::MicroBtc, Self::Sat];

    /// Suffix appended after a formatted amount.
    pub const fn ticker(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::MilliBtc => "mBTC",
            Self::MicroBtc => "uBTC",
            Self::Sat => "sat",
        }
    }

    /// Number of decimal places shown for this unit.
    pub const fn decimals(&self) -> u32 {
        match self {
            Self::Btc => 8,
            Self::MilliBtc => 5,
            Self::MicroBtc => 2,
            Self::Sat => 0,
        }
    }

    /// Satoshis per whole unit.
    const fn sats_per_unit(&self) -> u64 {
        10u64.pow(self.decimals())
    }
}

/// Whether the integer part gets thousands separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStyle {
    Never,
    Always,
}

/// Source of the user's current display-unit preference.
///
/// The history projection holds this behind a weak handle; it never owns
/// the provider's lifetime.
pub trait UnitProvider: Send + Sync {
    fn display_unit(&self) -> AmountUnit;
}

/// Format a satoshi amount in the given unit, without the unit suffix.
pub fn format(
    unit: AmountUnit,
    amount: Amount,
    plus_sign: bool,
    separators: SeparatorStyle,
) -> String {
    let sats = amount.to_sat();
    let per_unit = unit.sats_per_unit();
    let whole = sats / per_unit;
    let frac = sats % per_unit;

    let mut out = String::new();
    if plus_sign {
        out.push('+');
    }
    match separators {
        SeparatorStyle::Always => out.push_str(&group_thousands(whole)),
        SeparatorStyle::Never => out.push_str(&whole.to_string()),
    }
    let decimals = unit.decimals();
    if decimals > 0 {
        out.push('.');
        out.push_str(&format!("{frac:0width$}", width = decimals as usize));
    }
    out
}

/// Format a satoshi amount with its unit suffix, e.g. `"1,234.56789000 BTC"`.
pub fn format_with_unit(
    unit: AmountUnit,
    amount: Amount,
    plus_sign: bool,
    separators: SeparatorStyle,
) -> String {
    format!("{} {}", format(unit, amount, plus_sign, separators), unit.ticker())
}

/// Group the digits of a non-negative integer into threes with commas.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== group_thousands tests ====================

    #[test]
    fn test_group_thousands_short_values_untouched() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(42), "42");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn test_group_thousands_inserts_commas() {
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(123_456), "123,456");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(1_000_000_000), "1,000,000,000");
    }

    // ==================== format tests ====================

    #[test]
    fn test_format_zero_btc() {
        let text = format(AmountUnit::Btc, Amount::ZERO, false, SeparatorStyle::Never);
        assert_eq!(text, "0.00000000");
    }

    #[test]
    fn test_format_one_btc() {
        let one = Amount::from_sat(100_000_000);
        let text = format(AmountUnit::Btc, one, false, SeparatorStyle::Always);
        assert_eq!(text, "1.00000000");
    }

    #[test]
    fn test_format_btc_with_separators() {
        let amount = Amount::from_sat(123_456_789_012_345);
        let text = format(AmountUnit::Btc, amount, false, SeparatorStyle::Always);
        assert_eq!(text, "1,234,567.89012345");
    }

    #[test]
    fn test_format_millibtc() {
        let amount = Amount::from_sat(150_000);
        let text = format(AmountUnit::MilliBtc, amount, false, SeparatorStyle::Never);
        assert_eq!(text, "1.50000");
    }

    #[test]
    fn test_format_microbtc() {
        let amount = Amount::from_sat(12_345);
        let text = format(AmountUnit::MicroBtc, amount, false, SeparatorStyle::Never);
        assert_eq!(text, "123.45");
    }

    #[test]
    fn test_format_sat_has_no_decimal_point() {
        let amount = Amount::from_sat(1_234_567);
        let text = format(AmountUnit::Sat, amount, false, SeparatorStyle::Always);
        assert_eq!(text, "1,234,567");
    }

    #[test]
    fn test_format_plus_sign() {
        let amount = Amount::from_sat(100_000_000);
        let text = format(AmountUnit::Btc, amount, true, SeparatorStyle::Never);
        assert_eq!(text, "+1.00000000");
    }

    // ==================== format_with_unit tests ====================

    #[test]
    fn test_format_with_unit_appends_ticker() {
        let amount = Amount::from_sat(250_000_000);
        let text = format_with_unit(AmountUnit::Btc, amount, false, SeparatorStyle::Always);
        assert_eq!(text, "2.50000000 BTC");
        let text = format_with_unit(AmountUnit::Sat, amount, false, SeparatorStyle::Always);
        assert_eq!(text, "250,000,000 sat");
    }
}
