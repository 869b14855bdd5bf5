use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use solar_roi_core::solar::roi::{self, SolarRoiInput};
use solar_roi_core::solar::{RoofOrientation, SolarResource};

use crate::input;

/// Arguments for a solar ROI projection
#[derive(Args, Debug)]
pub struct RoiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Average monthly electricity bill (USD)
    #[arg(long)]
    pub monthly_bill: Option<Decimal>,

    /// Installed system price before incentives (USD)
    #[arg(long)]
    pub system_cost: Option<Decimal>,

    /// Retail electricity price (USD/kWh)
    #[arg(long)]
    pub electricity_rate: Option<Decimal>,

    /// System size in kW (derived from the bill when omitted)
    #[arg(long)]
    pub system_size_kw: Option<Decimal>,

    /// Cash paid up front (omit for a cash purchase)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual loan APR in percent, e.g. 6.5
    #[arg(long)]
    pub financing_rate: Option<Decimal>,

    /// Local solar resource: high, average, low
    #[arg(long)]
    pub solar_resource: Option<SolarResource>,

    /// Roof orientation: south, southeast, southwest, east, west, north
    #[arg(long)]
    pub roof_orientation: Option<RoofOrientation>,

    /// Projection horizon in years
    #[arg(long)]
    pub time_frame: Option<u32>,

    /// Annual utility price escalation in percent
    #[arg(long, allow_hyphen_values = true)]
    pub utility_rate_increase: Option<Decimal>,

    /// Print the year-by-year series instead of the summary
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let roi_input: SolarRoiInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        input_from_flags(&args)?
    };

    let output = roi::calculate_solar_roi(&roi_input)?;
    if args.yearly {
        let rounded = output.map(|p| p.rounded().yearly);
        Ok(serde_json::to_value(rounded)?)
    } else {
        Ok(serde_json::to_value(output.map(|p| p.summary()))?)
    }
}

fn input_from_flags(args: &RoiArgs) -> Result<SolarRoiInput, Box<dyn std::error::Error>> {
    let monthly_bill = args
        .monthly_bill
        .ok_or("--monthly-bill is required (or provide --input)")?;
    let system_cost = args
        .system_cost
        .ok_or("--system-cost is required (or provide --input)")?;

    let mut roi_input = SolarRoiInput::new(monthly_bill, system_cost);
    if let Some(rate) = args.electricity_rate {
        roi_input.electricity_rate = rate;
    }
    roi_input.system_size_kw = args.system_size_kw;
    roi_input.down_payment = args.down_payment;
    if let Some(rate) = args.financing_rate {
        roi_input.financing_rate_annual_pct = rate;
    }
    if let Some(resource) = args.solar_resource {
        roi_input.solar_resource = resource;
    }
    if let Some(orientation) = args.roof_orientation {
        roi_input.roof_orientation = orientation;
    }
    if let Some(years) = args.time_frame {
        roi_input.time_frame_years = years;
    }
    if let Some(increase) = args.utility_rate_increase {
        roi_input.utility_rate_increase_pct = increase;
    }
    Ok(roi_input)
}
