use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakeven::breakeven_months;
use super::CashFlowProfile;
use crate::types::{round2, Breakeven, Money};

/// Outcome of refinancing immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceNowOutcome {
    pub monthly_savings: Money,
    pub breakeven: Breakeven,
    pub net_savings: Money,
}

/// Savings, breakeven and horizon net savings of refinancing today.
///
/// Payments already include mortgage insurance, so a costlier MI on the new
/// loan shows up as lower savings.
pub fn evaluate_refinance_now(
    current_payment: Money,
    refinance_payment: Money,
    eliminated_debt_payment: Money,
    eligible_cost: Money,
    horizon_months: u32,
) -> RefinanceNowOutcome {
    let monthly_savings = round2(current_payment - refinance_payment + eliminated_debt_payment);
    let breakeven = breakeven_months(eligible_cost, monthly_savings);
    let net_savings = round2(monthly_savings * Decimal::from(horizon_months) - eligible_cost);

    RefinanceNowOutcome {
        monthly_savings,
        breakeven,
        net_savings,
    }
}

/// Pay the costs at closing, save every month after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinanceNowProfile {
    pub upfront_cost: Money,
    pub monthly_savings: Money,
}

impl CashFlowProfile for RefinanceNowProfile {
    fn cash_flow(&self, month: u32) -> Money {
        if month == 0 {
            -self.upfront_cost
        } else {
            self.monthly_savings
        }
    }
}
