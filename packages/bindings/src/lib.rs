use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use refi_core::amortization::{self, LoanState};
use refi_core::closing_costs::summary::{self, ClosingCostInput};
use refi_core::refinance::{self, RefinanceInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Refinance analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_refinance(input_json: String) -> NapiResult<String> {
    let input: RefinanceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance::analyze_refinance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validation issues for a form, as a JSON array; empty when valid.
#[napi]
pub fn validate_refinance(input_json: String) -> NapiResult<String> {
    let input: RefinanceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let issues = refinance::analysis::validate_refinance_input(&input);
    serde_json::to_string(&issues).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Closing costs
// ---------------------------------------------------------------------------

#[napi]
pub fn closing_costs(input_json: String) -> NapiResult<String> {
    let input: ClosingCostInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = summary::analyze_closing_costs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Decimal strings in, decimal string out, so no precision is lost in JS.
#[napi]
pub fn monthly_payment(
    principal: String,
    annual_rate_pct: String,
    term_months: u32,
) -> NapiResult<String> {
    amortization::check_term("term_months", term_months).map_err(to_napi_error)?;
    let principal = parse_decimal("principal", &principal)?;
    let rate = parse_decimal("annual_rate_pct", &annual_rate_pct)?;
    Ok(amortization::monthly_payment(principal, rate, term_months).to_string())
}

#[napi]
pub fn amortization_schedule(loan_json: String, months_to_project: u32) -> NapiResult<String> {
    let loan: LoanState = serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    amortization::check_term("remaining_term_months", loan.remaining_term_months)
        .map_err(to_napi_error)?;
    let schedule = amortization::generate_amortization_schedule(&loan, months_to_project);
    serde_json::to_string(&schedule).map_err(to_napi_error)
}
