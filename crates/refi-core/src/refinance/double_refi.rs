//! Double refinance: refinance now, then again at the future rate once the
//! wait is over, paying closing costs both times.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::breakeven::walk_breakeven;
use super::CashFlowProfile;
use crate::amortization::{monthly_payment, LoanState};
use crate::types::{round2, Breakeven, Money, Rate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleRefiInput {
    pub current_payment: Money,
    /// The loan taken today; its term is reused for the second refinance.
    pub refinance_now: LoanState,
    pub refinance_now_payment: Money,
    pub future_rate_pct: Rate,
    pub wait_months: u32,
    /// Closing costs of a single refinance.
    pub eligible_cost: Money,
    pub horizon_months: u32,
    #[serde(default)]
    pub eliminated_debt_payment: Money,
    #[serde(default)]
    pub future_mortgage_insurance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleRefiOutput {
    pub phase1_monthly_savings: Money,
    pub phase1_months: u32,
    pub balance_at_second_refinance: Money,
    pub phase2_principal_and_interest: Money,
    /// Phase-2 P&I plus future MI.
    pub phase2_payment: Money,
    pub phase2_monthly_savings: Money,
    pub phase2_months: u32,
    /// Always twice the single-refinance cost.
    pub total_costs: Money,
    pub breakeven: Breakeven,
    pub net_savings: Money,
}

/// Simulate both refinances over the plan-to-stay horizon.
pub fn simulate_double_refinance(input: &DoubleRefiInput) -> DoubleRefiOutput {
    let wait = input.wait_months;
    let horizon = input.horizon_months;

    let phase1_monthly_savings =
        round2(input.current_payment - input.refinance_now_payment + input.eliminated_debt_payment);
    let phase1_months = wait.min(horizon);

    let balance_at_second_refinance = input.refinance_now.balance_after(wait);
    let phase2_principal_and_interest = monthly_payment(
        balance_at_second_refinance,
        input.future_rate_pct,
        input.refinance_now.remaining_term_months,
    );
    let phase2_payment = round2(phase2_principal_and_interest + input.future_mortgage_insurance);
    let phase2_monthly_savings =
        round2(input.current_payment - phase2_payment + input.eliminated_debt_payment);
    let phase2_months = horizon.saturating_sub(wait);

    let total_costs = round2(input.eligible_cost * dec!(2));

    let profile = DoubleRefiProfile {
        single_cost: input.eligible_cost,
        wait_months: wait,
        phase1_monthly_savings,
        phase2_monthly_savings,
    };
    let breakeven = walk_breakeven(&profile, horizon);

    let net_savings = round2(
        phase1_monthly_savings * Decimal::from(phase1_months)
            + phase2_monthly_savings * Decimal::from(phase2_months)
            - total_costs,
    );

    debug!(
        %phase1_monthly_savings,
        %phase2_monthly_savings,
        %total_costs,
        %breakeven,
        "double refinance simulated"
    );

    DoubleRefiOutput {
        phase1_monthly_savings,
        phase1_months,
        balance_at_second_refinance,
        phase2_principal_and_interest,
        phase2_payment,
        phase2_monthly_savings,
        phase2_months,
        total_costs,
        breakeven,
        net_savings,
    }
}

/// First closing at month 0, second closing in the month after the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleRefiProfile {
    pub single_cost: Money,
    pub wait_months: u32,
    pub phase1_monthly_savings: Money,
    pub phase2_monthly_savings: Money,
}

impl DoubleRefiProfile {
    pub fn from_output(output: &DoubleRefiOutput, single_cost: Money, wait_months: u32) -> Self {
        Self {
            single_cost,
            wait_months,
            phase1_monthly_savings: output.phase1_monthly_savings,
            phase2_monthly_savings: output.phase2_monthly_savings,
        }
    }
}

impl CashFlowProfile for DoubleRefiProfile {
    fn cash_flow(&self, month: u32) -> Money {
        if month == 0 {
            -self.single_cost
        } else if month <= self.wait_months {
            self.phase1_monthly_savings
        } else if month == self.wait_months + 1 {
            self.phase2_monthly_savings - self.single_cost
        } else {
            self.phase2_monthly_savings
        }
    }
}
