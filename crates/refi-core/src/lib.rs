//! Refinance decision engine.
//!
//! Pure, synchronous calculations over a single [`refinance::RefinanceInput`]:
//! amortization, closing-cost aggregation, breakeven, cost of waiting for a
//! better rate and refinancing twice, plus the savings timelines that drive
//! charts. All money is `rust_decimal::Decimal`, rounded to cents.

pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "closing_costs")]
pub mod closing_costs;

#[cfg(feature = "refinance")]
pub mod refinance;

pub use error::{RefiError, ValidationIssue};
pub use types::*;

/// Standard result type for all refinance-engine operations
pub type RefiResult<T> = Result<T, RefiError>;
