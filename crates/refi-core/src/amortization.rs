//! Level-payment amortization primitives.
//!
//! Monthly payment, remaining balance and month-by-month schedules for a
//! fixed-rate loan. Rates are annual percentages; every money output is
//! rounded to cents with [`round2`].

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RefiError;
use crate::types::{round2, Money, Rate};
use crate::RefiResult;

/// Longest term, wait or horizon accepted, in months. Also caps the rows
/// of any projected schedule.
pub const MAX_TERM_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Snapshot of a fixed-rate loan: the current mortgage, a refinance offer or
/// a hypothetical future refinance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanState {
    /// Outstanding principal.
    pub balance: Money,
    /// Annual rate as a percentage (e.g., 5.75 = 5.75%).
    pub annual_rate_pct: Rate,
    /// Months left until the loan is fully repaid.
    pub remaining_term_months: u32,
}

impl LoanState {
    pub fn new(balance: Money, annual_rate_pct: Rate, remaining_term_months: u32) -> Self {
        Self {
            balance,
            annual_rate_pct,
            remaining_term_months,
        }
    }

    /// Level principal & interest payment.
    pub fn monthly_payment(&self) -> Money {
        monthly_payment(self.balance, self.annual_rate_pct, self.remaining_term_months)
    }

    /// Balance left after `payments_made` scheduled payments.
    pub fn balance_after(&self, payments_made: u32) -> Money {
        remaining_balance(
            self.balance,
            self.annual_rate_pct,
            self.remaining_term_months,
            payments_made,
        )
    }

    /// The loan as it stands after `months` scheduled payments.
    pub fn amortize(&self, months: u32) -> LoanState {
        LoanState {
            balance: self.balance_after(months),
            annual_rate_pct: self.annual_rate_pct,
            remaining_term_months: self.remaining_term_months.saturating_sub(months),
        }
    }
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Balance after this month's payment.
    pub balance: Money,
}

/// Column totals of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    pub total_payments: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub ending_balance: Money,
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Reject a term of zero or beyond [`MAX_TERM_MONTHS`].
pub fn check_term(field: &str, term_months: u32) -> RefiResult<()> {
    if term_months == 0 {
        return Err(RefiError::InvalidInput {
            field: field.into(),
            reason: "Term must be greater than zero".into(),
        });
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(RefiError::InvalidInput {
            field: field.into(),
            reason: format!("Term must not exceed {MAX_TERM_MONTHS} months"),
        });
    }
    Ok(())
}

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// (1 + r)^n, or `None` when it does not fit in a Decimal.
fn growth_factor(monthly_rate: Rate, periods: u32) -> Option<Decimal> {
    (Decimal::ONE + monthly_rate).checked_powi(i64::from(periods))
}

/// Level monthly payment: `M = P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// A zero or negative rate pays the principal down in equal instalments.
/// Non-positive principal or a zero term yields zero.
pub fn monthly_payment(principal: Money, annual_rate_pct: Rate, term_months: u32) -> Money {
    if principal <= Decimal::ZERO || term_months == 0 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(term_months);
    if annual_rate_pct <= Decimal::ZERO {
        return round2(principal / n);
    }

    let r = monthly_rate(annual_rate_pct);
    match growth_factor(r, term_months) {
        Some(factor) if factor > Decimal::ONE => {
            round2(principal * r / (Decimal::ONE - Decimal::ONE / factor))
        }
        Some(_) => round2(principal / n),
        // Factor beyond Decimal range: the payment has converged to interest-only.
        None => round2(principal * r),
    }
}

/// Balance after `payments_made` payments:
/// `B = P·((1+r)^N − (1+r)^n) / ((1+r)^N − 1)`, never below zero.
pub fn remaining_balance(
    principal: Money,
    annual_rate_pct: Rate,
    total_term_months: u32,
    payments_made: u32,
) -> Money {
    if principal <= Decimal::ZERO || total_term_months == 0 {
        return Decimal::ZERO;
    }
    if payments_made >= total_term_months {
        return Decimal::ZERO;
    }
    if payments_made == 0 {
        return round2(principal);
    }

    if annual_rate_pct <= Decimal::ZERO {
        let paid_down =
            principal * Decimal::from(payments_made) / Decimal::from(total_term_months);
        return round2(principal - paid_down).max(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_pct);
    let (full, elapsed) = match (
        growth_factor(r, total_term_months),
        growth_factor(r, payments_made),
    ) {
        (Some(full), Some(elapsed)) if full > Decimal::ONE => (full, elapsed),
        // Degenerate or overflowing factors: nothing measurable has amortized.
        _ => return round2(principal),
    };

    round2(principal * (full - elapsed) / (full - Decimal::ONE)).max(Decimal::ZERO)
}

/// Month-by-month schedule for `loan`, at most
/// `min(months_to_project, remaining_term_months, MAX_TERM_MONTHS)` rows.
///
/// Each row is rounded to cents and derived from the prior row's balance,
/// so column sums match the displayed figures exactly. The final month
/// absorbs any rounding residue.
pub fn generate_amortization_schedule(
    loan: &LoanState,
    months_to_project: u32,
) -> Vec<AmortizationRow> {
    let term = loan.remaining_term_months;
    let rows = months_to_project.min(term).min(MAX_TERM_MONTHS);
    let mut schedule = Vec::new();
    if loan.balance <= Decimal::ZERO || rows == 0 {
        return schedule;
    }

    let payment = loan.monthly_payment();
    let r = if loan.annual_rate_pct > Decimal::ZERO {
        monthly_rate(loan.annual_rate_pct)
    } else {
        Decimal::ZERO
    };
    let mut balance = round2(loan.balance);

    for month in 1..=rows {
        let interest = round2(balance * r);
        let mut principal = round2(payment - interest).max(Decimal::ZERO);
        if month == term || principal > balance {
            principal = balance;
        }
        balance -= principal;

        schedule.push(AmortizationRow {
            month,
            payment: principal + interest,
            principal,
            interest,
            balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    schedule
}

/// Fold a schedule into its column totals.
pub fn summarize_schedule(schedule: &[AmortizationRow]) -> ScheduleSummary {
    let mut summary = ScheduleSummary {
        months: schedule.len() as u32,
        total_payments: Decimal::ZERO,
        total_principal: Decimal::ZERO,
        total_interest: Decimal::ZERO,
        ending_balance: Decimal::ZERO,
    };
    for row in schedule {
        summary.total_payments += row.payment;
        summary.total_principal += row.principal;
        summary.total_interest += row.interest;
        summary.ending_balance = row.balance;
    }
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn current_loan() -> LoanState {
        LoanState::new(dec!(485_000), dec!(6.875), 348)
    }

    #[test]
    fn test_monthly_payment_standard_formula() {
        assert_eq!(monthly_payment(dec!(485_000), dec!(6.875), 348), dec!(3219.61));
        assert_eq!(monthly_payment(dec!(485_000), dec!(5.75), 360), dec!(2830.33));
    }

    #[test]
    fn test_monthly_payment_textbook_case() {
        // $200k at 6% for 30 years
        assert_eq!(monthly_payment(dec!(200_000), dec!(6), 360), dec!(1199.10));
    }

    #[test]
    fn test_monthly_payment_zero_rate_is_straight_line() {
        assert_eq!(monthly_payment(dec!(120_000), dec!(0), 360), dec!(333.33));
        assert_eq!(monthly_payment(dec!(1000), dec!(-1), 3), dec!(333.33));
    }

    #[test]
    fn test_monthly_payment_degenerate_inputs() {
        assert_eq!(monthly_payment(dec!(0), dec!(5), 360), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(-10), dec!(5), 360), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(100_000), dec!(5), 0), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_payment_single_month() {
        // One payment repays principal plus one month of interest.
        assert_eq!(monthly_payment(dec!(1200), dec!(12), 1), dec!(1212.00));
    }

    #[test]
    fn test_remaining_balance_endpoints() {
        let loan = current_loan();
        assert_eq!(loan.balance_after(0), dec!(485_000));
        assert_eq!(loan.balance_after(348), Decimal::ZERO);
        assert_eq!(loan.balance_after(500), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_balance_monotonic() {
        let loan = current_loan();
        let mut previous = loan.balance;
        for n in 0..=loan.remaining_term_months {
            let balance = loan.balance_after(n);
            assert!(balance <= previous, "balance rose at month {n}");
            assert!(balance >= Decimal::ZERO);
            previous = balance;
        }
        assert_eq!(previous, Decimal::ZERO);
    }

    #[test]
    fn test_remaining_balance_zero_rate() {
        assert_eq!(remaining_balance(dec!(1200), dec!(0), 12, 3), dec!(900));
        assert_eq!(remaining_balance(dec!(1200), dec!(0), 12, 12), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_balance_matches_schedule() {
        let loan = LoanState::new(dec!(200_000), dec!(6), 360);
        let schedule = generate_amortization_schedule(&loan, 12);
        let closed_form = loan.balance_after(12);
        // Per-row rounding drifts from the closed form by at most a few cents.
        assert!((schedule[11].balance - closed_form).abs() <= dec!(0.05));
    }

    #[test]
    fn test_amortize_derives_new_state() {
        let loan = current_loan();
        let later = loan.amortize(24);
        assert_eq!(later.remaining_term_months, 324);
        assert_eq!(later.balance, loan.balance_after(24));
        assert_eq!(later.annual_rate_pct, loan.annual_rate_pct);
        // Original untouched.
        assert_eq!(loan.balance, dec!(485_000));
    }

    #[test]
    fn test_schedule_capped_at_term() {
        let loan = LoanState::new(dec!(10_000), dec!(5), 24);
        let schedule = generate_amortization_schedule(&loan, 600);
        assert_eq!(schedule.len(), 24);
        assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_capped_at_projection() {
        let loan = current_loan();
        let schedule = generate_amortization_schedule(&loan, 60);
        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule[0].month, 1);
        assert_eq!(schedule[59].month, 60);
    }

    #[test]
    fn test_schedule_never_exceeds_term_ceiling() {
        let loan = LoanState::new(dec!(100_000), dec!(5), u32::MAX);
        let schedule = generate_amortization_schedule(&loan, u32::MAX);
        assert_eq!(schedule.len(), MAX_TERM_MONTHS as usize);
        assert_eq!(schedule.last().unwrap().month, MAX_TERM_MONTHS);
    }

    #[test]
    fn test_check_term_bounds() {
        assert!(check_term("term", 1).is_ok());
        assert!(check_term("term", MAX_TERM_MONTHS).is_ok());

        let err = check_term("term", 0).unwrap_err();
        assert_eq!(err.issues()[0].reason, "Term must be greater than zero");
        let err = check_term("term", MAX_TERM_MONTHS + 1).unwrap_err();
        assert!(matches!(err, RefiError::InvalidInput { ref field, .. } if field == "term"));
        assert_eq!(err.issues()[0].reason, "Term must not exceed 600 months");
    }

    #[test]
    fn test_schedule_rows_consistent() {
        let loan = LoanState::new(dec!(200_000), dec!(6), 360);
        let schedule = generate_amortization_schedule(&loan, 360);
        let mut balance = loan.balance;
        for row in &schedule {
            assert_eq!(row.payment, row.principal + row.interest);
            assert_eq!(row.balance, balance - row.principal);
            balance = row.balance;
        }
        let summary = summarize_schedule(&schedule);
        assert_eq!(summary.total_principal, dec!(200_000));
        assert_eq!(summary.ending_balance, Decimal::ZERO);
        assert_eq!(
            summary.total_payments,
            summary.total_principal + summary.total_interest
        );
    }

    #[test]
    fn test_schedule_first_row_interest() {
        let loan = LoanState::new(dec!(200_000), dec!(6), 360);
        let schedule = generate_amortization_schedule(&loan, 1);
        assert_eq!(schedule[0].interest, dec!(1000.00));
        assert_eq!(schedule[0].principal, dec!(199.10));
        assert_eq!(schedule[0].balance, dec!(199_800.90));
    }

    #[test]
    fn test_zero_rate_schedule_repays_principal_exactly() {
        for (principal, term) in [
            (dec!(100), 3u32),
            (dec!(120_000), 360),
            (dec!(99_999.99), 7),
            (dec!(0.05), 10),
        ] {
            let loan = LoanState::new(principal, Decimal::ZERO, term);
            assert_eq!(loan.monthly_payment(), round2(principal / Decimal::from(term)));
            let summary = summarize_schedule(&generate_amortization_schedule(&loan, term));
            assert_eq!(summary.total_principal, principal, "principal {principal}");
            assert_eq!(summary.total_interest, Decimal::ZERO);
            assert_eq!(summary.ending_balance, Decimal::ZERO);
        }
    }

    #[test]
    fn test_schedule_empty_for_zero_balance() {
        let loan = LoanState::new(Decimal::ZERO, dec!(5), 360);
        assert!(generate_amortization_schedule(&loan, 12).is_empty());
    }
}
