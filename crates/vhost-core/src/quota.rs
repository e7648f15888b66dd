//! Human-readable quota sizes
//!
//! Quotas are written as `<number><unit>` with decimal multipliers:
//! `""`/`B` = 1, `K` = 10^3, `M` = 10^6, `G` = 10^9, `T` = 10^12. Units are
//! case-insensitive and may be separated from the number by whitespace.
//!
//! Parsing uses fixed-point integer arithmetic so that `2.5G` is exactly
//! `2_500_000_000` bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Units from largest to smallest, used by [`format`].
const UNITS: [(char, u64); 4] = [
    ('T', 1_000_000_000_000),
    ('G', 1_000_000_000),
    ('M', 1_000_000),
    ('K', 1_000),
];

fn multiplier(unit: &str) -> Option<u64> {
    match unit.to_ascii_uppercase().as_str() {
        "" | "B" => Some(1),
        "K" => Some(1_000),
        "M" => Some(1_000_000),
        "G" => Some(1_000_000_000),
        "T" => Some(1_000_000_000_000),
        _ => None,
    }
}

/// Parse quota text into a byte count.
pub fn parse(text: &str) -> Result<u64> {
    let invalid = || Error::InvalidQuotaFormat {
        input: text.to_string(),
    };

    let trimmed = text.trim();
    let literal_end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (literal, rest) = trimmed.split_at(literal_end);
    let unit = rest.trim_start();

    let (whole, fraction) = match literal.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (literal, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.contains('.') || (literal.contains('.') && fraction.is_empty()) {
        return Err(invalid());
    }

    let scale = multiplier(unit).ok_or_else(invalid)? as u128;

    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    // Cut to 24 digits to keep the arithmetic inside u128.
    let fraction = &fraction[..fraction.len().min(24)];
    let fraction_value: u128 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().map_err(|_| invalid())?
    };
    let denominator = 10u128.pow(fraction.len() as u32);

    let bytes = whole_value
        .checked_mul(scale)
        .and_then(|w| {
            let scaled = fraction_value * scale;
            w.checked_add((scaled + denominator / 2) / denominator)
        })
        .ok_or_else(invalid)?;

    u64::try_from(bytes).map_err(|_| invalid())
}

/// Format a byte count as the shortest exact quota literal.
pub fn format(bytes: u64) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    for (unit, scale) in UNITS {
        if bytes % scale == 0 {
            return format!("{}{}", bytes / scale, unit);
        }
    }
    bytes.to_string()
}

/// A quota setting. An unset quota means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quota {
    #[default]
    Unlimited,
    Limited(u64),
}

impl Quota {
    /// The byte limit, if any.
    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Limited(bytes) => Some(*bytes),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// True if `usage` bytes fits inside this quota.
    pub fn allows(&self, usage: u64) -> bool {
        self.bytes().is_none_or(|limit| usage <= limit)
    }
}

impl FromStr for Quota {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        parse(s).map(Self::Limited)
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Limited(bytes) => write!(f, "{}", format(*bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1M", 1_000_000)]
    #[case("2.5G", 2_500_000_000)]
    #[case("300", 300)]
    #[case("300 ", 300)]
    #[case("300 M", 300_000_000)]
    #[case("  7k\n", 7_000)]
    #[case("12B", 12)]
    #[case("1T", 1_000_000_000_000)]
    #[case(".5K", 500)]
    #[case("0.0004K", 0)]
    #[case("1.0005K", 1_001)]
    #[case("0", 0)]
    fn parses_quota_text(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("M")]
    #[case("1X")]
    #[case("1MB")]
    #[case("-1M")]
    #[case("1.2.3")]
    #[case("1.")]
    #[case(".")]
    #[case("1 M B")]
    #[case("99999999999T")]
    fn rejects_malformed_quota_text(#[case] input: &str) {
        assert!(matches!(
            parse(input),
            Err(Error::InvalidQuotaFormat { .. })
        ));
    }

    #[rstest]
    #[case(0, "0")]
    #[case(300, "300")]
    #[case(1_000_000, "1M")]
    #[case(2_500_000_000, "2500M")]
    #[case(1_500, "1500")]
    #[case(3_000_000_000_000, "3T")]
    fn formats_minimal_literal(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format(bytes), expected);
    }

    #[test]
    fn quota_display_and_parse_agree() {
        let quota: Quota = "2.5G".parse().unwrap();
        assert_eq!(quota, Quota::Limited(2_500_000_000));
        assert_eq!(quota.to_string().parse::<Quota>().unwrap(), quota);
        assert_eq!("unlimited".parse::<Quota>().unwrap(), Quota::Unlimited);
    }

    #[test]
    fn unlimited_allows_everything() {
        assert!(Quota::Unlimited.allows(u64::MAX));
        assert!(Quota::Limited(10).allows(10));
        assert!(!Quota::Limited(10).allows(11));
    }

    proptest::proptest! {
        #[test]
        fn format_then_parse_is_exact(bytes in proptest::prelude::any::<u64>()) {
            proptest::prop_assert_eq!(parse(&format(bytes)).unwrap(), bytes);
        }
    }
}
