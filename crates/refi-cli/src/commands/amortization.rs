use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use refi_core::amortization::{self, LoanState};

/// Arguments for a level monthly payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual rate as a percentage (e.g. 5.75 for 5.75%)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in months
    #[arg(long)]
    pub term: u32,
}

/// Arguments for the remaining balance after some payments
#[derive(Args)]
pub struct BalanceArgs {
    /// Original loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual rate as a percentage
    #[arg(long)]
    pub rate: Decimal,

    /// Full term in months
    #[arg(long)]
    pub term: u32,

    /// Payments already made
    #[arg(long)]
    pub payments_made: u32,
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan balance
    #[arg(long)]
    pub principal: Decimal,

    /// Annual rate as a percentage
    #[arg(long)]
    pub rate: Decimal,

    /// Remaining term in months
    #[arg(long)]
    pub term: u32,

    /// Months to project (defaults to the full term)
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    amortization::check_term("term", args.term)?;
    let payment = amortization::monthly_payment(args.principal, args.rate, args.term);
    Ok(json!({
        "result": {
            "monthly_payment": payment,
            "principal": args.principal,
            "annual_rate_pct": args.rate,
            "term_months": args.term,
        }
    }))
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    amortization::check_term("term", args.term)?;
    let balance =
        amortization::remaining_balance(args.principal, args.rate, args.term, args.payments_made);
    Ok(json!({
        "result": {
            "remaining_balance": balance,
            "payments_made": args.payments_made,
            "term_months": args.term,
        }
    }))
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    amortization::check_term("term", args.term)?;
    let loan = LoanState::new(args.principal, args.rate, args.term);
    let schedule =
        amortization::generate_amortization_schedule(&loan, args.months.unwrap_or(args.term));
    let summary = amortization::summarize_schedule(&schedule);
    Ok(json!({
        "results": schedule,
        "summary": summary,
    }))
}
