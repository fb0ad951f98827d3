use pretty_assertions::assert_eq;
use refi_core::amortization::{
    generate_amortization_schedule, monthly_payment, remaining_balance, summarize_schedule,
    LoanState,
};
use refi_core::closing_costs::FeeRecord;
use refi_core::refinance::analysis::{MortgageInsurance, WaitScenario};
use refi_core::refinance::breakeven::breakeven_months;
use refi_core::refinance::double_refi::{simulate_double_refinance, DoubleRefiInput};
use refi_core::refinance::{analyze_refinance, RefinanceInput, Strategy};
use refi_core::{Breakeven, RefiError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn reference_input() -> RefinanceInput {
    // $485k at 6.875% with 29 years left, offered 5.75% for 30 years.
    RefinanceInput {
        current_loan: LoanState::new(dec!(485_000), dec!(6.875), 348),
        refinance_offer: LoanState::new(dec!(485_000), dec!(5.75), 360),
        fees: FeeRecord::worksheet_defaults(),
        plan_to_stay_months: 84,
        target_breakeven_months: 24,
        eliminated_debt_payment: Decimal::ZERO,
        mortgage_insurance: MortgageInsurance::default(),
        wait_scenario: Some(WaitScenario {
            future_rate_pct: dec!(5.25),
            wait_months: 6,
        }),
    }
}

// ===========================================================================
// Amortization properties
// ===========================================================================

#[test]
fn test_zero_rate_payment_and_schedule_over_grid() {
    for principal in [dec!(1), dec!(999.99), dec!(150_000), dec!(485_000.01)] {
        for term in [1u32, 7, 180, 360] {
            assert_eq!(
                monthly_payment(principal, Decimal::ZERO, term),
                (principal / Decimal::from(term)).round_dp_with_strategy(
                    2,
                    rust_decimal::RoundingStrategy::MidpointAwayFromZero
                )
            );
            let loan = LoanState::new(principal, Decimal::ZERO, term);
            let summary = summarize_schedule(&generate_amortization_schedule(&loan, term));
            assert_eq!(summary.total_principal, principal);
        }
    }
}

#[test]
fn test_remaining_balance_non_increasing_and_zero_at_term() {
    for (rate, term) in [(dec!(6.875), 348u32), (dec!(3), 180), (dec!(0), 120), (dec!(29.99), 60)] {
        let mut previous = dec!(250_000);
        for n in 0..=term {
            let b = remaining_balance(dec!(250_000), rate, term, n);
            assert!(b <= previous, "rate {rate} month {n}");
            previous = b;
        }
        assert_eq!(remaining_balance(dec!(250_000), rate, term, term), Decimal::ZERO);
    }
}

// ===========================================================================
// Breakeven
// ===========================================================================

#[test]
fn test_breakeven_sentinel_for_non_positive_savings() {
    for cost in [dec!(0.01), dec!(500), dec!(2665.45)] {
        for savings in [Decimal::ZERO, dec!(-0.01), dec!(-1000)] {
            assert_eq!(breakeven_months(cost, savings), Breakeven::Never);
        }
    }
}

// ===========================================================================
// End-to-end analysis
// ===========================================================================

#[test]
fn test_reference_scenario() {
    let out = analyze_refinance(&reference_input()).unwrap();
    let a = &out.result;

    assert_eq!(a.payments.current.total, dec!(3219.61));
    assert_eq!(a.payments.refinance_now.total, dec!(2830.33));
    assert_eq!(a.refinance_now.monthly_savings, dec!(389.28));
    assert_eq!(a.closing_costs.total_breakeven, dec!(2665.45));
    // ceil(2665.45 / 389.28)
    assert_eq!(a.refinance_now.breakeven, Breakeven::Months(7));
    assert_eq!(a.refinance_now.net_savings, dec!(30034.07));

    let waiting = a.cost_of_waiting.as_ref().unwrap();
    assert_eq!(waiting.extra_interest_while_waiting, dec!(2335.68));
    assert_eq!(
        waiting.net_difference,
        waiting.net_savings_now - waiting.net_savings_wait
    );
}

#[test]
fn test_no_savings_example() {
    // Refi payment $2,200 against a current $2,000.
    let mut previous = None;
    for horizon in [12u32, 36, 84, 180] {
        let mut input = reference_input();
        input.current_loan = LoanState::new(dec!(2000) * dec!(120), dec!(0.0001), 120);
        input.refinance_offer = LoanState::new(dec!(2200) * dec!(120), dec!(0.0001), 120);
        input.plan_to_stay_months = horizon;
        input.wait_scenario = None;
        let a = analyze_refinance(&input).unwrap().result;

        assert!(a.refinance_now.monthly_savings < Decimal::ZERO);
        assert_eq!(a.refinance_now.breakeven, Breakeven::Never);
        assert!(a.refinance_now.net_savings < Decimal::ZERO);
        if let Some(prev) = previous {
            assert!(a.refinance_now.net_savings < prev);
        }
        previous = Some(a.refinance_now.net_savings);
    }
}

#[test]
fn test_double_refi_costs_always_doubled() {
    for fee in [dec!(0), dec!(100), dec!(2665.45), dec!(9_999.99)] {
        let mut input = reference_input();
        input.fees = FeeRecord::new().with("origination_fee", fee);
        let a = analyze_refinance(&input).unwrap().result;
        let detail = a.double_refinance_detail.unwrap();
        assert_eq!(detail.total_costs, fee * dec!(2));
    }
}

#[test]
fn test_double_refi_profitable_implies_breakeven_within_horizon() {
    let refinance_now = LoanState::new(dec!(300_000), dec!(6.5), 360);
    for wait in [1u32, 6, 12, 24, 48] {
        let input = DoubleRefiInput {
            current_payment: dec!(2400),
            refinance_now_payment: refinance_now.monthly_payment(),
            refinance_now: refinance_now.clone(),
            future_rate_pct: dec!(5.5),
            wait_months: wait,
            eligible_cost: dec!(3000),
            horizon_months: 120,
            eliminated_debt_payment: Decimal::ZERO,
            future_mortgage_insurance: Decimal::ZERO,
        };
        let out = simulate_double_refinance(&input);
        assert_eq!(out.total_costs, dec!(6000));
        if out.net_savings > Decimal::ZERO {
            assert!(out.breakeven.within(120), "wait {wait}");
        }
    }
}

#[test]
fn test_validation_collects_every_issue() {
    let mut input = reference_input();
    input.current_loan.annual_rate_pct = dec!(0);
    input.current_loan.remaining_term_months = 0;
    input.refinance_offer.balance = dec!(-1);
    input.plan_to_stay_months = 0;

    match analyze_refinance(&input) {
        Err(RefiError::ValidationFailed { issues }) => assert_eq!(issues.len(), 4),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_sub_cent_fees_keep_partition() {
    let mut input = reference_input();
    input.fees = FeeRecord::new()
        .with("prepaid_interest", dec!(0.005))
        .with("escrow_deposit", dec!(0.005));
    let cc = analyze_refinance(&input).unwrap().result.closing_costs;
    assert_eq!(cc.total_all, dec!(0.02));
    assert_eq!(cc.total_all, cc.total_breakeven + cc.groups.prepaid + cc.groups.escrow);
}

#[test]
fn test_long_stay_rejected() {
    let mut input = reference_input();
    input.plan_to_stay_months = 10_000_000;
    let err = analyze_refinance(&input).unwrap_err();
    let fields: Vec<String> = err.issues().into_iter().map(|i| i.field).collect();
    assert_eq!(fields, vec!["plan_to_stay_months".to_string()]);
}

#[test]
fn test_wait_rules_only_apply_when_enabled() {
    let mut input = reference_input();
    input.wait_scenario = Some(WaitScenario {
        future_rate_pct: dec!(45),
        wait_months: 0,
    });
    let err = analyze_refinance(&input).unwrap_err();
    assert_eq!(err.issues().len(), 2);

    input.wait_scenario = None;
    assert!(analyze_refinance(&input).is_ok());
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let input = reference_input();
    let first = serde_json::to_string(&analyze_refinance(&input).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze_refinance(&input).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_timelines_start_below_zero_and_share_horizon() {
    let a = analyze_refinance(&reference_input()).unwrap().result;
    let t = &a.timelines;
    let wait = t.wait_then_refinance.as_ref().unwrap();
    let double = t.double_refinance.as_ref().unwrap();

    assert_eq!(t.refinance_now.len(), t.horizon_months as usize + 1);
    assert_eq!(wait.len(), t.refinance_now.len());
    assert_eq!(double.len(), t.refinance_now.len());
    assert!(t.refinance_now[0].cumulative_net_savings < Decimal::ZERO);
    assert!(wait[0].cumulative_net_savings < Decimal::ZERO);
    assert!(double[0].cumulative_net_savings < Decimal::ZERO);

    // Month 84 on the refi-now line is the horizon net savings.
    assert_eq!(
        t.refinance_now[84].cumulative_net_savings,
        a.refinance_now.net_savings
    );
}

#[test]
fn test_cash_out_adjustment_raises_every_strategy() {
    let base = analyze_refinance(&reference_input()).unwrap().result;
    let mut input = reference_input();
    input.eliminated_debt_payment = dec!(400);
    let a = analyze_refinance(&input).unwrap().result;

    assert_eq!(
        a.refinance_now.monthly_savings,
        base.refinance_now.monthly_savings + dec!(400)
    );
    assert_eq!(
        a.wait_then_refinance.unwrap().monthly_savings,
        base.wait_then_refinance.unwrap().monthly_savings + dec!(400)
    );
    assert_eq!(a.eliminated_debt_payment, dec!(400));
}

#[test]
fn test_best_strategy_without_wait_is_refinance_now() {
    let mut input = reference_input();
    input.wait_scenario = None;
    let a = analyze_refinance(&input).unwrap().result;
    assert_eq!(a.best_strategy, Strategy::RefinanceNow);
}
