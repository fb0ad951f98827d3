//! Refinance decision analysis: validates one input record and assembles
//! payments, closing costs, strategy results and timelines into one output.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::double_refi::{
    simulate_double_refinance, DoubleRefiInput, DoubleRefiOutput, DoubleRefiProfile,
};
use super::immediate::{evaluate_refinance_now, RefinanceNowProfile};
use super::timeline::{build_savings_timelines, SavingsTimelines};
use super::waiting::{compare_cost_of_waiting, CostOfWaitingOutput, WaitComparisonInput};
use super::{ScenarioResult, Strategy};
use crate::amortization::{
    generate_amortization_schedule, summarize_schedule, LoanState, MAX_TERM_MONTHS,
};
use crate::closing_costs::{summarize_closing_costs, ClosingCostSummary, FeeRecord, FeeTaxonomy};
use crate::error::{RefiError, ValidationIssue};
use crate::types::{round2, with_metadata, Breakeven, ComputationOutput, Money, Rate};
use crate::RefiResult;

/// Rates at or above this are rejected as data-entry errors.
const MAX_RATE_PCT: Rate = dec!(30);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Caller-supplied monthly mortgage insurance per rate scenario.
///
/// Zero means no MI; no estimate is ever substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageInsurance {
    #[serde(default)]
    pub current: Money,
    #[serde(default)]
    pub refinance_now: Money,
    #[serde(default)]
    pub future: Money,
}

/// Present when the borrower wants to compare waiting for a better rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitScenario {
    /// Anticipated annual rate after the wait, as a percentage.
    pub future_rate_pct: Rate,
    pub wait_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub current_loan: LoanState,
    pub refinance_offer: LoanState,
    #[serde(default)]
    pub fees: FeeRecord,
    /// Months the borrower expects to keep the loan.
    pub plan_to_stay_months: u32,
    /// Breakeven the borrower would accept, in months.
    pub target_breakeven_months: u32,
    /// Monthly debt payment retired by a cash-out refinance.
    #[serde(default)]
    pub eliminated_debt_payment: Money,
    #[serde(default)]
    pub mortgage_insurance: MortgageInsurance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_scenario: Option<WaitScenario>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_and_interest: Money,
    pub mortgage_insurance: Money,
    pub total: Money,
}

impl PaymentBreakdown {
    fn new(principal_and_interest: Money, mortgage_insurance: Money) -> Self {
        Self {
            principal_and_interest,
            mortgage_insurance,
            total: round2(principal_and_interest + mortgage_insurance),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPayments {
    pub current: PaymentBreakdown,
    pub refinance_now: PaymentBreakdown,
    /// Payment after waiting, when a wait scenario was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future: Option<PaymentBreakdown>,
}

/// Interest and balances of keeping the current loan versus taking the offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestComparison {
    pub horizon_months: u32,
    pub current_interest_over_horizon: Money,
    pub refinance_interest_over_horizon: Money,
    pub interest_saved_over_horizon: Money,
    pub current_balance_at_horizon: Money,
    pub refinance_balance_at_horizon: Money,
    pub current_lifetime_interest: Money,
    pub refinance_lifetime_interest: Money,
    /// Refinance lifetime interest minus current; positive means the reset
    /// term costs more interest overall.
    pub lifetime_interest_change: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceAnalysis {
    pub payments: ScenarioPayments,
    pub closing_costs: ClosingCostSummary,
    pub refinance_now: ScenarioResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_then_refinance: Option<ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_refinance: Option<ScenarioResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_of_waiting: Option<CostOfWaitingOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_refinance_detail: Option<DoubleRefiOutput>,
    pub timelines: SavingsTimelines,
    pub interest_comparison: InterestComparison,
    /// Largest net savings over the horizon; ties favour the simpler strategy.
    pub best_strategy: Strategy,
    pub plan_to_stay_months: u32,
    pub target_breakeven_months: u32,
    pub eliminated_debt_payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a refinance decision with the standard fee taxonomy.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> RefiResult<ComputationOutput<RefinanceAnalysis>> {
    analyze_refinance_with_taxonomy(input, &FeeTaxonomy::standard())
}

/// Analyse a refinance decision, classifying fees with `taxonomy`.
pub fn analyze_refinance_with_taxonomy(
    input: &RefinanceInput,
    taxonomy: &FeeTaxonomy,
) -> RefiResult<ComputationOutput<RefinanceAnalysis>> {
    let start = Instant::now();

    taxonomy.validate()?;
    let issues = validate_refinance_input(input);
    if !issues.is_empty() {
        warn!(count = issues.len(), "refinance input rejected");
        return Err(RefiError::ValidationFailed { issues });
    }

    let analysis = build_analysis(input, taxonomy);
    let warnings = collect_warnings(input, &analysis);

    let methodology = if input.wait_scenario.is_some() {
        "Refinance Decision Analysis (refinance now, cost of waiting, double refinance)"
    } else {
        "Refinance Decision Analysis (refinance now)"
    };

    info!(
        elapsed_us = start.elapsed().as_micros() as u64,
        best = ?analysis.best_strategy,
        "refinance analysis complete"
    );
    Ok(with_metadata(methodology, input, warnings, analysis))
}

/// Every violated input rule, in field order. Empty when the input is valid.
pub fn validate_refinance_input(input: &RefinanceInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_loan("current_loan", &input.current_loan, &mut issues);
    validate_loan("refinance_offer", &input.refinance_offer, &mut issues);

    if input.plan_to_stay_months == 0 {
        issues.push(ValidationIssue::new(
            "plan_to_stay_months",
            "Plan-to-stay horizon must be greater than zero",
        ));
    } else if input.plan_to_stay_months > MAX_TERM_MONTHS {
        issues.push(ValidationIssue::new(
            "plan_to_stay_months",
            format!("Plan-to-stay horizon must not exceed {MAX_TERM_MONTHS} months"),
        ));
    }

    if let Some(wait) = &input.wait_scenario {
        validate_rate("wait_scenario.future_rate_pct", wait.future_rate_pct, &mut issues);
        if wait.wait_months == 0 {
            issues.push(ValidationIssue::new(
                "wait_scenario.wait_months",
                "Wait period must be greater than zero",
            ));
        } else if wait.wait_months > MAX_TERM_MONTHS {
            issues.push(ValidationIssue::new(
                "wait_scenario.wait_months",
                format!("Wait period must not exceed {MAX_TERM_MONTHS} months"),
            ));
        }
    }

    for (id, amount) in input.fees.iter() {
        if amount < Decimal::ZERO {
            issues.push(ValidationIssue::new(
                format!("fees.{id}"),
                "Fee amounts cannot be negative",
            ));
        }
    }

    if input.eliminated_debt_payment < Decimal::ZERO {
        issues.push(ValidationIssue::new(
            "eliminated_debt_payment",
            "Eliminated debt payment cannot be negative",
        ));
    }

    let mi = &input.mortgage_insurance;
    for (field, amount) in [
        ("mortgage_insurance.current", mi.current),
        ("mortgage_insurance.refinance_now", mi.refinance_now),
        ("mortgage_insurance.future", mi.future),
    ] {
        if amount < Decimal::ZERO {
            issues.push(ValidationIssue::new(
                field,
                "Mortgage insurance cannot be negative",
            ));
        }
    }

    issues
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_loan(prefix: &str, loan: &LoanState, issues: &mut Vec<ValidationIssue>) {
    if loan.balance <= Decimal::ZERO {
        issues.push(ValidationIssue::new(
            format!("{prefix}.balance"),
            "Loan balance must be positive",
        ));
    }
    validate_rate(&format!("{prefix}.annual_rate_pct"), loan.annual_rate_pct, issues);
    if loan.remaining_term_months == 0 {
        issues.push(ValidationIssue::new(
            format!("{prefix}.remaining_term_months"),
            "Term must be greater than zero",
        ));
    } else if loan.remaining_term_months > MAX_TERM_MONTHS {
        issues.push(ValidationIssue::new(
            format!("{prefix}.remaining_term_months"),
            format!("Term must not exceed {MAX_TERM_MONTHS} months"),
        ));
    }
}

fn validate_rate(field: &str, rate: Rate, issues: &mut Vec<ValidationIssue>) {
    if rate <= Decimal::ZERO || rate >= MAX_RATE_PCT {
        issues.push(ValidationIssue::new(
            field,
            format!("Rate must be greater than 0% and below {MAX_RATE_PCT}%"),
        ));
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn build_analysis(input: &RefinanceInput, taxonomy: &FeeTaxonomy) -> RefinanceAnalysis {
    let horizon = input.plan_to_stay_months;
    let target = input.target_breakeven_months;
    let mi = &input.mortgage_insurance;

    let current = PaymentBreakdown::new(input.current_loan.monthly_payment(), mi.current);
    let refinance =
        PaymentBreakdown::new(input.refinance_offer.monthly_payment(), mi.refinance_now);

    let closing_costs = summarize_closing_costs(&input.fees, taxonomy);
    let eligible_cost = closing_costs.total_breakeven;
    debug!(
        current_payment = %current.total,
        refinance_payment = %refinance.total,
        %eligible_cost,
        "payments and closing costs"
    );

    let now = evaluate_refinance_now(
        current.total,
        refinance.total,
        input.eliminated_debt_payment,
        eligible_cost,
        horizon,
    );
    let refinance_now = ScenarioResult {
        strategy: Strategy::RefinanceNow,
        monthly_payment: refinance.total,
        monthly_savings: now.monthly_savings,
        upfront_cost: eligible_cost,
        breakeven: now.breakeven,
        within_target: now.breakeven.within(target),
        net_savings: now.net_savings,
    };
    let now_profile = RefinanceNowProfile {
        upfront_cost: eligible_cost,
        monthly_savings: now.monthly_savings,
    };

    let mut future = None;
    let mut cost_of_waiting = None;
    let mut double_refinance_detail = None;
    let mut wait_then_refinance = None;
    let mut double_refinance = None;
    let mut wait_profile = None;
    let mut double_profile = None;

    if let Some(wait) = &input.wait_scenario {
        let waiting = compare_cost_of_waiting(&WaitComparisonInput {
            current_loan: input.current_loan.clone(),
            current_payment: current.total,
            refinance_now_payment: refinance.total,
            refinance_term_months: input.refinance_offer.remaining_term_months,
            future_rate_pct: wait.future_rate_pct,
            wait_months: wait.wait_months,
            eligible_cost,
            horizon_months: horizon,
            eliminated_debt_payment: input.eliminated_debt_payment,
            future_mortgage_insurance: mi.future,
        });
        let double = simulate_double_refinance(&DoubleRefiInput {
            current_payment: current.total,
            refinance_now: input.refinance_offer.clone(),
            refinance_now_payment: refinance.total,
            future_rate_pct: wait.future_rate_pct,
            wait_months: wait.wait_months,
            eligible_cost,
            horizon_months: horizon,
            eliminated_debt_payment: input.eliminated_debt_payment,
            future_mortgage_insurance: mi.future,
        });

        future = Some(PaymentBreakdown::new(
            waiting.future_principal_and_interest,
            mi.future,
        ));
        wait_then_refinance = Some(ScenarioResult {
            strategy: Strategy::WaitThenRefinance,
            monthly_payment: waiting.future_payment,
            monthly_savings: waiting.monthly_savings_wait,
            upfront_cost: waiting.effective_total_cost_if_waiting,
            breakeven: waiting.breakeven_wait,
            within_target: waiting.breakeven_wait.within(target),
            net_savings: waiting.net_savings_wait,
        });
        double_refinance = Some(ScenarioResult {
            strategy: Strategy::DoubleRefinance,
            monthly_payment: double.phase2_payment,
            monthly_savings: double.phase2_monthly_savings,
            upfront_cost: double.total_costs,
            breakeven: double.breakeven,
            within_target: double.breakeven.within(target),
            net_savings: double.net_savings,
        });
        wait_profile = Some(waiting.wait_profile(wait.wait_months));
        double_profile = Some(DoubleRefiProfile::from_output(
            &double,
            eligible_cost,
            wait.wait_months,
        ));
        cost_of_waiting = Some(waiting);
        double_refinance_detail = Some(double);
    }

    let breakevens: Vec<Breakeven> = [
        Some(&refinance_now),
        wait_then_refinance.as_ref(),
        double_refinance.as_ref(),
    ]
    .into_iter()
    .flatten()
    .map(|r| r.breakeven)
    .collect();
    let timelines = build_savings_timelines(
        &now_profile,
        wait_profile.as_ref(),
        double_profile.as_ref(),
        &breakevens,
        horizon,
    );

    let best_strategy = pick_best_strategy(
        &refinance_now,
        wait_then_refinance.as_ref(),
        double_refinance.as_ref(),
    );

    RefinanceAnalysis {
        payments: ScenarioPayments {
            current,
            refinance_now: refinance,
            future,
        },
        closing_costs,
        refinance_now,
        wait_then_refinance,
        double_refinance,
        cost_of_waiting,
        double_refinance_detail,
        timelines,
        interest_comparison: compare_interest(&input.current_loan, &input.refinance_offer, horizon),
        best_strategy,
        plan_to_stay_months: horizon,
        target_breakeven_months: target,
        eliminated_debt_payment: input.eliminated_debt_payment,
    }
}

fn pick_best_strategy(
    now: &ScenarioResult,
    wait: Option<&ScenarioResult>,
    double: Option<&ScenarioResult>,
) -> Strategy {
    let mut best = now;
    for candidate in [wait, double].into_iter().flatten() {
        if candidate.net_savings > best.net_savings {
            best = candidate;
        }
    }
    best.strategy
}

fn compare_interest(current: &LoanState, offer: &LoanState, horizon: u32) -> InterestComparison {
    let current_schedule = generate_amortization_schedule(current, current.remaining_term_months);
    let offer_schedule = generate_amortization_schedule(offer, offer.remaining_term_months);

    let current_lifetime = summarize_schedule(&current_schedule);
    let offer_lifetime = summarize_schedule(&offer_schedule);
    let current_horizon =
        summarize_schedule(&current_schedule[..current_schedule.len().min(horizon as usize)]);
    let offer_horizon =
        summarize_schedule(&offer_schedule[..offer_schedule.len().min(horizon as usize)]);

    InterestComparison {
        horizon_months: horizon,
        current_interest_over_horizon: current_horizon.total_interest,
        refinance_interest_over_horizon: offer_horizon.total_interest,
        interest_saved_over_horizon: round2(
            current_horizon.total_interest - offer_horizon.total_interest,
        ),
        current_balance_at_horizon: current_horizon.ending_balance,
        refinance_balance_at_horizon: offer_horizon.ending_balance,
        current_lifetime_interest: current_lifetime.total_interest,
        refinance_lifetime_interest: offer_lifetime.total_interest,
        lifetime_interest_change: round2(
            offer_lifetime.total_interest - current_lifetime.total_interest,
        ),
    }
}

fn collect_warnings(input: &RefinanceInput, analysis: &RefinanceAnalysis) -> Vec<String> {
    let mut warnings = Vec::new();
    let horizon = input.plan_to_stay_months;

    if analysis.payments.refinance_now.total >= analysis.payments.current.total {
        warnings.push(format!(
            "Refinance payment {} is not lower than the current payment {}",
            analysis.payments.refinance_now.total, analysis.payments.current.total
        ));
    }

    let breakeven = analysis.refinance_now.breakeven;
    if !breakeven.within(horizon) {
        warnings.push(format!(
            "Refinance-now breakeven ({breakeven}) exceeds the {horizon}-month plan-to-stay horizon"
        ));
    }
    if !breakeven.within(input.target_breakeven_months) {
        warnings.push(format!(
            "Refinance-now breakeven ({breakeven}) exceeds the {}-month target",
            input.target_breakeven_months
        ));
    }

    if let Some(wait) = &input.wait_scenario {
        if wait.wait_months >= horizon {
            warnings.push(format!(
                "Wait period of {} months is not shorter than the {horizon}-month plan-to-stay horizon",
                wait.wait_months
            ));
        }
    }

    for id in &analysis.closing_costs.unclassified_fees {
        warnings.push(format!("Fee '{id}' is not in the taxonomy; counted as other"));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
