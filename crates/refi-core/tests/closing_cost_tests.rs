use pretty_assertions::assert_eq;
use refi_core::closing_costs::summary::ClosingCostInput;
use refi_core::closing_costs::{
    analyze_closing_costs, summarize_closing_costs, FeeGroup, FeeRecord, FeeTaxonomy,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn every_fee(amount: Decimal) -> FeeRecord {
    FeeTaxonomy::standard()
        .entries
        .iter()
        .fold(FeeRecord::new(), |fees, def| fees.with(&def.id, amount))
}

#[test]
fn test_partition_over_amount_grid() {
    let taxonomy = FeeTaxonomy::standard();
    for amount in [dec!(0), dec!(0.01), dec!(17.5), dec!(1234.56)] {
        let s = summarize_closing_costs(&every_fee(amount), &taxonomy);
        assert_eq!(
            s.total_all,
            s.total_breakeven + s.groups.prepaid + s.groups.escrow
        );
        assert_eq!(s.total_all - s.total_breakeven, amount * dec!(2));
        // The one monthly item never lands in a closing-cost total.
        assert_eq!(s.monthly_recurring, amount);
    }
}

#[test]
fn test_breakeven_total_excludes_flagged_fees() {
    let taxonomy = FeeTaxonomy::standard();
    let fees = every_fee(dec!(100));
    let s = summarize_closing_costs(&fees, &taxonomy);

    let expected: Decimal = taxonomy
        .entries
        .iter()
        .filter(|d| !d.exclude_from_breakeven && !d.is_monthly_not_closing)
        .map(|d| fees.amount(&d.id))
        .sum();
    assert_eq!(s.total_breakeven, expected);
}

#[test]
fn test_group_subtotals_sum_to_total_all() {
    let s = summarize_closing_costs(&FeeRecord::worksheet_defaults(), &FeeTaxonomy::standard());
    let sum: Decimal = FeeGroup::ALL.iter().map(|g| s.groups.get(*g)).sum();
    assert_eq!(sum, s.total_all);
}

#[test]
fn test_taxonomy_round_trips_through_json() {
    let taxonomy = FeeTaxonomy::standard();
    let json = serde_json::to_string(&taxonomy).unwrap();
    let parsed: FeeTaxonomy = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, taxonomy);
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_worksheet_envelope() {
    let input = ClosingCostInput {
        fees: FeeRecord::worksheet_defaults(),
        taxonomy: None,
    };
    let out = analyze_closing_costs(&input).unwrap();
    assert_eq!(out.result.total_breakeven, dec!(2665.45));
    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}
