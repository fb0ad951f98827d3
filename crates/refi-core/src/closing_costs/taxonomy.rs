//! Fee taxonomy and fee records for the closing-cost worksheet.
//!
//! The taxonomy is plain data: which group each fee belongs to and whether
//! it counts toward breakeven. Adding a fee means adding an entry here, the
//! aggregator never names individual fees.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RefiError;
use crate::types::Money;
use crate::RefiResult;

/// Closing-cost worksheet sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeGroup {
    /// Lender charges: origination, points, underwriting.
    Origination,
    /// Third-party services the borrower cannot shop for.
    CannotShop,
    /// Third-party services the borrower can shop for.
    CanShop,
    /// Recording fees and transfer taxes.
    Government,
    Prepaid,
    Escrow,
    MortgageInsurance,
    Other,
}

impl FeeGroup {
    pub const ALL: [FeeGroup; 8] = [
        FeeGroup::Origination,
        FeeGroup::CannotShop,
        FeeGroup::CanShop,
        FeeGroup::Government,
        FeeGroup::Prepaid,
        FeeGroup::Escrow,
        FeeGroup::MortgageInsurance,
        FeeGroup::Other,
    ];

    /// Prepaid interest and escrow deposits pre-fund the borrower's own
    /// obligations and are never recouped through payment savings.
    pub fn is_prefunding(&self) -> bool {
        matches!(self, FeeGroup::Prepaid | FeeGroup::Escrow)
    }
}

/// One taxonomy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDefinition {
    pub id: String,
    pub label: String,
    pub group: FeeGroup,
    #[serde(default)]
    pub exclude_from_breakeven: bool,
    /// Recurring monthly charge (e.g. monthly MI): tracked, never summed
    /// into closing costs.
    #[serde(default)]
    pub is_monthly_not_closing: bool,
}

impl FeeDefinition {
    fn closing(id: &str, label: &str, group: FeeGroup) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            group,
            exclude_from_breakeven: group.is_prefunding(),
            is_monthly_not_closing: false,
        }
    }

    fn monthly(id: &str, label: &str, group: FeeGroup) -> Self {
        Self {
            is_monthly_not_closing: true,
            ..Self::closing(id, label, group)
        }
    }
}

/// Immutable fee classification table, passed explicitly to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTaxonomy {
    pub entries: Vec<FeeDefinition>,
}

impl Default for FeeTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

impl FeeTaxonomy {
    /// Built-in worksheet taxonomy.
    pub fn standard() -> Self {
        use FeeGroup::*;
        let entries = vec![
            FeeDefinition::closing("origination_fee", "Origination fee", Origination),
            FeeDefinition::closing("discount_points", "Discount points", Origination),
            FeeDefinition::closing("underwriting_fee", "Underwriting fee", Origination),
            FeeDefinition::closing("application_fee", "Application fee", Origination),
            FeeDefinition::closing("appraisal_fee", "Appraisal fee", CannotShop),
            FeeDefinition::closing("credit_report_fee", "Credit report", CannotShop),
            FeeDefinition::closing("flood_certification", "Flood certification", CannotShop),
            FeeDefinition::closing("tax_service_fee", "Tax service", CannotShop),
            FeeDefinition::closing("title_lenders_policy", "Title - lender's policy", CanShop),
            FeeDefinition::closing("title_settlement_fee", "Title - settlement fee", CanShop),
            FeeDefinition::closing("title_endorsements", "Title - endorsements", CanShop),
            FeeDefinition::closing("survey_fee", "Survey", CanShop),
            FeeDefinition::closing("pest_inspection", "Pest inspection", CanShop),
            FeeDefinition::closing("recording_fee", "Recording fees", Government),
            FeeDefinition::closing("transfer_tax", "Transfer taxes", Government),
            FeeDefinition::closing("prepaid_interest", "Prepaid interest", Prepaid),
            FeeDefinition::closing("escrow_deposit", "Initial escrow deposit", Escrow),
            FeeDefinition::closing("upfront_mi_premium", "Upfront MI premium", MortgageInsurance),
            FeeDefinition::monthly("monthly_mi_premium", "Monthly MI premium", MortgageInsurance),
            FeeDefinition::closing("attorney_fee", "Attorney fee", Other),
            FeeDefinition::closing("other_fees", "Other fees", Other),
        ];
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&FeeDefinition> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Check the rules that keep `total_all = total_breakeven + prepaid + escrow`.
    pub fn validate(&self) -> RefiResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.id.trim().is_empty() {
                return Err(RefiError::InvalidTaxonomy("fee id must not be empty".into()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(RefiError::InvalidTaxonomy(format!(
                    "duplicate fee id '{}'",
                    entry.id
                )));
            }
            if entry.group.is_prefunding() != entry.exclude_from_breakeven {
                return Err(RefiError::InvalidTaxonomy(format!(
                    "fee '{}': exclude_from_breakeven must be set exactly for prepaid and escrow fees",
                    entry.id
                )));
            }
            if entry.is_monthly_not_closing && entry.group != FeeGroup::MortgageInsurance {
                return Err(RefiError::InvalidTaxonomy(format!(
                    "fee '{}': only mortgage insurance items may be monthly",
                    entry.id
                )));
            }
        }
        Ok(())
    }
}

/// Fee amounts keyed by taxonomy id. Absent fees are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRecord(pub BTreeMap<String, Money>);

impl FeeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, amount: Money) -> Self {
        self.0.insert(id.to_string(), amount);
        self
    }

    pub fn amount(&self, id: &str) -> Money {
        self.0.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Worksheet reset defaults: $2,665.45 eligible for breakeven, plus
    /// prepaid interest and an initial escrow deposit.
    pub fn worksheet_defaults() -> Self {
        Self::new()
            .with("origination_fee", dec!(995.00))
            .with("appraisal_fee", dec!(550.00))
            .with("credit_report_fee", dec!(65.00))
            .with("flood_certification", dec!(15.00))
            .with("tax_service_fee", dec!(85.00))
            .with("title_lenders_policy", dec!(575.00))
            .with("title_settlement_fee", dec!(250.00))
            .with("recording_fee", dec!(130.45))
            .with("prepaid_interest", dec!(450.00))
            .with("escrow_deposit", dec!(1800.00))
    }
}
