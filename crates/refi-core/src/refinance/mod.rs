//! Refinance strategy simulation: breakeven, cost of waiting for a better
//! rate, refinancing twice, and the savings timelines that chart them.

pub mod analysis;
pub mod breakeven;
pub mod double_refi;
pub mod immediate;
pub mod timeline;
pub mod waiting;

use serde::{Deserialize, Serialize};

use crate::types::{Breakeven, Money};

pub use analysis::{
    analyze_refinance, analyze_refinance_with_taxonomy, RefinanceAnalysis, RefinanceInput,
};

/// The three strategies a borrower can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    RefinanceNow,
    WaitThenRefinance,
    DoubleRefinance,
}

/// Headline figures for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub strategy: Strategy,
    /// Long-run monthly payment under the strategy (P&I plus MI).
    pub monthly_payment: Money,
    /// Monthly savings against keeping the current loan.
    pub monthly_savings: Money,
    /// Costs the strategy must recoup.
    pub upfront_cost: Money,
    pub breakeven: Breakeven,
    /// Breakeven is finite and no later than the target.
    pub within_target: bool,
    /// Net savings over the plan-to-stay horizon.
    pub net_savings: Money,
}

/// Month-indexed cash effect of a strategy relative to keeping the current
/// loan. Month 0 carries the upfront costs.
pub trait CashFlowProfile {
    fn cash_flow(&self, month: u32) -> Money;
}
