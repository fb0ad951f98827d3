use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::CashFlowProfile;
use crate::types::{Breakeven, Money};

/// Months to recoup `eligible_cost` from `monthly_savings`.
///
/// Savings of zero or less never recoup anything: the result is
/// [`Breakeven::Never`] regardless of the cost.
pub fn breakeven_months(eligible_cost: Money, monthly_savings: Money) -> Breakeven {
    if monthly_savings <= Decimal::ZERO {
        return Breakeven::Never;
    }
    if eligible_cost <= Decimal::ZERO {
        return Breakeven::Months(0);
    }
    (eligible_cost / monthly_savings)
        .ceil()
        .to_u32()
        .map_or(Breakeven::Months(u32::MAX), Breakeven::Months)
}

/// Walk a cash-flow profile month by month and return the first month in
/// `1..=months` whose cumulative position is non-negative.
///
/// Used where costs land in more than one month and no closed form applies.
pub fn walk_breakeven(profile: &impl CashFlowProfile, months: u32) -> Breakeven {
    let mut position = profile.cash_flow(0);
    for month in 1..=months {
        position += profile.cash_flow(month);
        if position >= Decimal::ZERO {
            return Breakeven::Months(month);
        }
    }
    Breakeven::Never
}
