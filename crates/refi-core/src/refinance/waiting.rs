//! Cost of waiting: refinance now versus keep the current loan for a few
//! months and refinance at an anticipated better rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::breakeven::breakeven_months;
use super::immediate::evaluate_refinance_now;
use super::CashFlowProfile;
use crate::amortization::{monthly_payment, LoanState};
use crate::types::{round2, Breakeven, Money, Rate};

/// Inputs to the wait-versus-now comparison. Payments include MI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitComparisonInput {
    pub current_loan: LoanState,
    pub current_payment: Money,
    pub refinance_now_payment: Money,
    /// Term of the refinance offer; the post-wait loan uses it too.
    pub refinance_term_months: u32,
    pub future_rate_pct: Rate,
    pub wait_months: u32,
    pub eligible_cost: Money,
    pub horizon_months: u32,
    #[serde(default)]
    pub eliminated_debt_payment: Money,
    #[serde(default)]
    pub future_mortgage_insurance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOfWaitingOutput {
    pub monthly_savings_now: Money,
    /// Savings forgone while waiting: `max(0, savings_now) × wait`.
    pub extra_interest_while_waiting: Money,
    /// Current-loan balance when the delayed refinance closes.
    pub balance_after_waiting: Money,
    pub future_principal_and_interest: Money,
    /// Future P&I plus future MI.
    pub future_payment: Money,
    pub monthly_savings_wait: Money,
    pub effective_total_cost_if_waiting: Money,
    pub breakeven_now: Breakeven,
    pub breakeven_wait: Breakeven,
    pub net_savings_now: Money,
    pub net_savings_wait: Money,
    /// Positive when refinancing now beats waiting.
    pub net_difference: Money,
}

impl CostOfWaitingOutput {
    /// Cash-flow profile of the wait-then-refinance strategy.
    pub fn wait_profile(&self, wait_months: u32) -> WaitThenRefinanceProfile {
        WaitThenRefinanceProfile {
            upfront_cost: self.effective_total_cost_if_waiting,
            wait_months,
            monthly_savings: self.monthly_savings_wait,
        }
    }
}

/// Compare refinancing today against waiting `wait_months` for `future_rate_pct`.
///
/// The borrower keeps paying the current loan while waiting. The delayed
/// refinance always takes a fresh full term of `refinance_term_months`,
/// however long the wait was.
pub fn compare_cost_of_waiting(input: &WaitComparisonInput) -> CostOfWaitingOutput {
    let wait = Decimal::from(input.wait_months);
    let now = evaluate_refinance_now(
        input.current_payment,
        input.refinance_now_payment,
        input.eliminated_debt_payment,
        input.eligible_cost,
        input.horizon_months,
    );
    let monthly_savings_now = now.monthly_savings;

    let extra_interest_while_waiting = round2(monthly_savings_now.max(Decimal::ZERO) * wait);

    let balance_after_waiting = input.current_loan.balance_after(input.wait_months);
    let future_principal_and_interest = monthly_payment(
        balance_after_waiting,
        input.future_rate_pct,
        input.refinance_term_months,
    );
    let future_payment = round2(future_principal_and_interest + input.future_mortgage_insurance);

    let monthly_savings_wait =
        round2(input.current_payment - future_payment + input.eliminated_debt_payment);
    let effective_total_cost_if_waiting =
        round2(input.eligible_cost + extra_interest_while_waiting);
    let breakeven_wait = breakeven_months(effective_total_cost_if_waiting, monthly_savings_wait);

    let months_after_wait = Decimal::from(input.horizon_months.saturating_sub(input.wait_months));
    let net_savings_wait =
        round2(monthly_savings_wait * months_after_wait - effective_total_cost_if_waiting);
    let net_difference = round2(now.net_savings - net_savings_wait);

    debug!(
        %monthly_savings_now,
        %monthly_savings_wait,
        %future_payment,
        %net_difference,
        "cost of waiting computed"
    );

    CostOfWaitingOutput {
        monthly_savings_now,
        extra_interest_while_waiting,
        balance_after_waiting,
        future_principal_and_interest,
        future_payment,
        monthly_savings_wait,
        effective_total_cost_if_waiting,
        breakeven_now: now.breakeven,
        breakeven_wait,
        net_savings_now: now.net_savings,
        net_savings_wait,
        net_difference,
    }
}

/// Nothing happens until the wait ends; the forgone savings and the closing
/// costs are booked up front so the chart starts below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitThenRefinanceProfile {
    pub upfront_cost: Money,
    pub wait_months: u32,
    pub monthly_savings: Money,
}

impl CashFlowProfile for WaitThenRefinanceProfile {
    fn cash_flow(&self, month: u32) -> Money {
        if month == 0 {
            -self.upfront_cost
        } else if month <= self.wait_months {
            Decimal::ZERO
        } else {
            self.monthly_savings
        }
    }
}
