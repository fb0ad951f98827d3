use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use refi_core::closing_costs::FeeTaxonomy;
use refi_core::refinance::breakeven::breakeven_months;
use refi_core::refinance::{self, RefinanceInput};

use crate::input;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// JSON file with the analysis inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Fee taxonomy file (JSON or YAML); defaults to the built-in worksheet
    #[arg(long)]
    pub taxonomy: Option<String>,
}

/// Arguments for a simple breakeven
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BreakevenArgs {
    /// Closing costs to recoup
    #[arg(long)]
    pub cost: Decimal,

    /// Monthly savings (zero or negative never breaks even)
    #[arg(long)]
    pub savings: Decimal,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for refinance analysis".into());
    };
    let taxonomy: FeeTaxonomy = match args.taxonomy {
        Some(ref path) => input::file::read_config(path)?,
        None => FeeTaxonomy::standard(),
    };
    let result = refinance::analyze_refinance_with_taxonomy(&refi_input, &taxonomy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_breakeven(args: BreakevenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let breakeven = breakeven_months(args.cost, args.savings);
    Ok(json!({
        "result": {
            "breakeven": breakeven,
            "breakeven_months": breakeven.months(),
            "recoups": breakeven.is_finite(),
        }
    }))
}
