//! Closing-cost aggregation: group subtotals, breakeven-eligible total and
//! grand total, driven entirely by a [`FeeTaxonomy`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::taxonomy::{FeeGroup, FeeRecord, FeeTaxonomy};
use crate::types::{round2, with_metadata, ComputationOutput, Money};
use crate::RefiResult;

/// Per-group subtotals of closing costs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSubtotals {
    pub origination: Money,
    pub cannot_shop: Money,
    pub can_shop: Money,
    pub government: Money,
    pub prepaid: Money,
    pub escrow: Money,
    pub mortgage_insurance: Money,
    pub other: Money,
}

impl GroupSubtotals {
    fn slot(&mut self, group: FeeGroup) -> &mut Money {
        match group {
            FeeGroup::Origination => &mut self.origination,
            FeeGroup::CannotShop => &mut self.cannot_shop,
            FeeGroup::CanShop => &mut self.can_shop,
            FeeGroup::Government => &mut self.government,
            FeeGroup::Prepaid => &mut self.prepaid,
            FeeGroup::Escrow => &mut self.escrow,
            FeeGroup::MortgageInsurance => &mut self.mortgage_insurance,
            FeeGroup::Other => &mut self.other,
        }
    }

    pub fn get(&self, group: FeeGroup) -> Money {
        match group {
            FeeGroup::Origination => self.origination,
            FeeGroup::CannotShop => self.cannot_shop,
            FeeGroup::CanShop => self.can_shop,
            FeeGroup::Government => self.government,
            FeeGroup::Prepaid => self.prepaid,
            FeeGroup::Escrow => self.escrow,
            FeeGroup::MortgageInsurance => self.mortgage_insurance,
            FeeGroup::Other => self.other,
        }
    }
}

/// Derived closing-cost totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingCostSummary {
    pub groups: GroupSubtotals,
    /// Everything except prepaid interest and escrow deposits.
    pub total_breakeven: Money,
    /// `total_breakeven` plus prepaid and escrow.
    pub total_all: Money,
    /// Recurring monthly items (e.g. monthly MI), never part of the totals.
    pub monthly_recurring: Money,
    /// Fee ids absent from the taxonomy; their amounts are counted as `other`.
    pub unclassified_fees: Vec<String>,
}

/// Aggregate a fee record against a taxonomy.
pub fn summarize_closing_costs(fees: &FeeRecord, taxonomy: &FeeTaxonomy) -> ClosingCostSummary {
    let mut groups = GroupSubtotals::default();
    let mut total_breakeven = Decimal::ZERO;
    let mut excluded = Decimal::ZERO;
    let mut monthly_recurring = Decimal::ZERO;
    let mut unclassified_fees = Vec::new();

    for (id, raw) in fees.iter() {
        // Cents first, so every subtotal and total is an exact sum.
        let amount = round2(raw);
        let (group, exclude, monthly) = match taxonomy.get(id) {
            Some(def) => (def.group, def.exclude_from_breakeven, def.is_monthly_not_closing),
            None => {
                unclassified_fees.push(id.to_string());
                (FeeGroup::Other, false, false)
            }
        };

        if monthly {
            monthly_recurring += amount;
            continue;
        }

        *groups.slot(group) += amount;
        if exclude {
            excluded += amount;
        } else {
            total_breakeven += amount;
        }
    }

    let total_all = total_breakeven + excluded;

    debug!(
        %total_breakeven,
        %total_all,
        unclassified = unclassified_fees.len(),
        "closing costs aggregated"
    );

    ClosingCostSummary {
        groups,
        total_breakeven,
        total_all,
        monthly_recurring,
        unclassified_fees,
    }
}

/// Input for the standalone closing-cost worksheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingCostInput {
    pub fees: FeeRecord,
    /// Falls back to [`FeeTaxonomy::standard`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<FeeTaxonomy>,
}

/// Validate the taxonomy and aggregate the worksheet, with warnings.
pub fn analyze_closing_costs(
    input: &ClosingCostInput,
) -> RefiResult<ComputationOutput<ClosingCostSummary>> {
    let standard;
    let taxonomy = match &input.taxonomy {
        Some(t) => {
            t.validate()?;
            t
        }
        None => {
            standard = FeeTaxonomy::standard();
            &standard
        }
    };

    let summary = summarize_closing_costs(&input.fees, taxonomy);
    let mut warnings = Vec::new();
    for id in &summary.unclassified_fees {
        warnings.push(format!("Fee '{id}' is not in the taxonomy; counted as other"));
    }
    for (id, amount) in input.fees.iter() {
        if amount < Decimal::ZERO {
            warnings.push(format!("Fee '{id}' is negative ({amount})"));
        }
    }

    Ok(with_metadata(
        "Closing Cost Worksheet Aggregation",
        input,
        warnings,
        summary,
    ))
}
