use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rates expressed as percentages (5.75 = 5.75%).
pub type Rate = Decimal;

/// Round a money value to cents, midpoints away from zero.
///
/// Applied at every computation boundary that produces a stored or
/// displayed figure, so composed results are reproducible to the cent.
pub fn round2(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Months needed to recoup an upfront cost.
///
/// `Never` is a domain outcome (no savings to recoup with), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakeven {
    Months(u32),
    Never,
}

impl Breakeven {
    pub fn is_finite(&self) -> bool {
        matches!(self, Breakeven::Months(_))
    }

    pub fn months(&self) -> Option<u32> {
        match self {
            Breakeven::Months(m) => Some(*m),
            Breakeven::Never => None,
        }
    }

    /// True when the cost is recouped within `limit` months.
    pub fn within(&self, limit: u32) -> bool {
        matches!(self, Breakeven::Months(m) if *m <= limit)
    }
}

impl std::fmt::Display for Breakeven {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Breakeven::Months(m) => write!(f, "{m} months"),
            Breakeven::Never => write!(f, "never"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation.
///
/// Carries no timing so that identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
    pub rounding: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
            rounding: "2dp_half_away_from_zero".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(1.004999)), dec!(1.00));
        assert_eq!(round2(dec!(-2.675)), dec!(-2.68));
        assert_eq!(round2(dec!(7)), dec!(7));
    }

    #[test]
    fn test_breakeven_within() {
        assert!(Breakeven::Months(7).within(24));
        assert!(Breakeven::Months(24).within(24));
        assert!(!Breakeven::Months(25).within(24));
        assert!(!Breakeven::Never.within(u32::MAX));
    }

    #[test]
    fn test_breakeven_serialization() {
        let json = serde_json::to_string(&Breakeven::Months(7)).unwrap();
        assert_eq!(json, r#"{"months":7}"#);
        let json = serde_json::to_string(&Breakeven::Never).unwrap();
        assert_eq!(json, r#""never""#);
    }
}
