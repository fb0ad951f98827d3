use clap::Args;
use serde_json::Value;

use refi_core::closing_costs::summary::{self, ClosingCostInput};
use refi_core::closing_costs::FeeRecord;

use crate::input;

#[derive(Args)]
pub struct ClosingCostsArgs {
    /// JSON file with the worksheet (`{"fees": {...}}`)
    #[arg(long)]
    pub input: Option<String>,

    /// Fee taxonomy file (JSON or YAML); overrides any taxonomy in the input
    #[arg(long)]
    pub taxonomy: Option<String>,

    /// Use the reset-default worksheet fees
    #[arg(long, conflicts_with = "input")]
    pub defaults: bool,
}

pub fn run_closing_costs(args: ClosingCostsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cc_input: ClosingCostInput = if args.defaults {
        ClosingCostInput {
            fees: FeeRecord::worksheet_defaults(),
            taxonomy: None,
        }
    } else if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json>, --defaults or stdin required for closing costs".into());
    };
    if let Some(ref path) = args.taxonomy {
        cc_input.taxonomy = Some(input::file::read_config(path)?);
    }
    let result = summary::analyze_closing_costs(&cc_input)?;
    Ok(serde_json::to_value(result)?)
}
