use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SolarRoiError;
use crate::solar::resource::{RoofOrientation, SolarResource, TIME_FRAME_OPTIONS};
use crate::time_value::{loan_payment, total_interest};
use crate::types::{with_metadata, ComputationOutput, Kwh, Money, Rate, Tons};
use crate::SolarRoiResult;

// ---------------------------------------------------------------------------
// Model constants
// ---------------------------------------------------------------------------

/// Sun-hours/day used only to size a system when none is supplied.
pub const SIZING_SUN_HOURS: Decimal = dec!(4.5);
/// Inverter, wiring and shading losses.
pub const SYSTEM_EFFICIENCY: Decimal = dec!(0.85);
/// Federal residential clean energy credit.
pub const FEDERAL_TAX_CREDIT_RATE: Decimal = dec!(0.30);
/// Year-over-year panel output retained (0.5% loss per year).
pub const DEGRADATION_STEP: Decimal = dec!(0.995);
/// Metric tons CO2 avoided per kWh generated.
pub const CARBON_TONS_PER_KWH: Decimal = dec!(0.0004);
/// Trees needed to absorb one ton of CO2 over the horizon.
pub const TREES_PER_TON: Decimal = dec!(16);
pub const LOAN_TERM_YEARS: u32 = 20;
pub const LOAN_TERM_MONTHS: u32 = LOAN_TERM_YEARS * 12;
/// Longest horizon the simulation accepts.
pub const MAX_TIME_FRAME_YEARS: u32 = 100;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const DAYS_PER_YEAR: Decimal = dec!(365);
const HUNDRED: Decimal = dec!(100);

fn default_electricity_rate() -> Money {
    dec!(0.12)
}

fn default_financing_rate() -> Rate {
    dec!(6.5)
}

fn default_time_frame() -> u32 {
    20
}

fn default_utility_rate_increase() -> Rate {
    dec!(3.0)
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Energy and financial inputs collected by the lead form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarRoiInput {
    /// Average monthly electricity bill (USD)
    pub monthly_bill: Money,
    /// Retail electricity price (USD/kWh)
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: Money,
    /// Annual household consumption. Collected for reporting, not modelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_usage_kwh: Option<Kwh>,
    /// Installed DC capacity. Derived from the bill when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_size_kw: Option<Decimal>,
    /// Installed system price before incentives (USD)
    pub system_cost: Money,
    /// Cash paid up front. Absent means a cash purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    /// Annual loan APR in percent
    #[serde(default = "default_financing_rate")]
    pub financing_rate_annual_pct: Rate,
    #[serde(default)]
    pub solar_resource: SolarResource,
    #[serde(default)]
    pub roof_orientation: RoofOrientation,
    #[serde(default = "default_time_frame")]
    pub time_frame_years: u32,
    /// Annual utility price escalation in percent
    #[serde(default = "default_utility_rate_increase")]
    pub utility_rate_increase_pct: Rate,
}

impl SolarRoiInput {
    /// Cash purchase with every other field at its form default.
    pub fn new(monthly_bill: Money, system_cost: Money) -> Self {
        Self {
            monthly_bill,
            electricity_rate: default_electricity_rate(),
            annual_usage_kwh: None,
            system_size_kw: None,
            system_cost,
            down_payment: None,
            financing_rate_annual_pct: default_financing_rate(),
            solar_resource: SolarResource::default(),
            roof_orientation: RoofOrientation::default(),
            time_frame_years: default_time_frame(),
            utility_rate_increase_pct: default_utility_rate_increase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiYear {
    /// 1-based year index
    pub year: u32,
    /// Degraded annual output
    pub production_kwh: Kwh,
    /// `0.995^(year-1)`
    pub degradation_factor: Decimal,
    /// `(1 + escalation)^(year-1)`
    pub escalation_factor: Decimal,
    /// Avoided electricity spend this year
    pub savings: Money,
    pub cumulative_savings: Money,
    pub cumulative_costs: Money,
    /// Running total of bills with no system installed
    pub bill_without_solar: Money,
    /// Set only on the first year savings catch up with costs
    pub is_break_even: bool,
}

/// Complete ROI projection for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiProjection {
    // System sizing
    pub system_size_kw: Decimal,
    pub system_size_derived: bool,
    /// Undegraded year-1 output
    pub annual_production_kwh: Kwh,
    pub first_year_savings: Money,

    // Cost breakdown
    pub system_cost: Money,
    pub federal_tax_credit: Money,
    pub net_system_cost: Money,
    pub down_payment: Money,
    /// Down payment less the credit attributed to it
    pub out_of_pocket: Money,

    // Financing
    pub loan_amount: Money,
    pub monthly_loan_payment: Money,
    pub total_interest_paid: Money,
    /// `out_of_pocket + total_interest_paid`
    pub total_investment: Money,

    // Series result
    pub cumulative_savings: Money,
    pub cumulative_costs: Money,
    /// First year cumulative savings >= cumulative costs; 0 = never
    pub break_even_year: u32,
    pub payback_period_years: u32,

    // Summary
    pub total_lifetime_savings: Money,
    pub roi_pct: Decimal,
    /// Linear, not compounded
    pub annualized_roi_pct: Decimal,
    pub effective_annual_savings: Money,
    pub is_profitable: bool,
    pub total_electricity_bill_without_solar: Money,

    // Environmental
    pub carbon_offset_per_year_tons: Tons,
    pub total_carbon_offset_tons: Tons,
    pub tree_equivalent: Decimal,

    // Bill impact
    pub current_monthly_bill: Money,
    pub new_monthly_bill: Money,
    pub monthly_savings: Money,

    pub time_frame_years: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yearly: Vec<RoiYear>,
}

impl RoiProjection {
    /// Convenience accessor for the yearly series row of a given year.
    pub fn year(&self, year: u32) -> Option<&RoiYear> {
        self.yearly.iter().find(|y| y.year == year)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Project savings, payback and ROI for a residential solar installation.
///
/// Pure and deterministic: identical input always yields an identical
/// projection. Values are full precision; call [`RoiProjection::rounded`]
/// for display.
pub fn compute(input: &SolarRoiInput) -> SolarRoiResult<RoiProjection> {
    validate_input(input)?;

    let horizon = input.time_frame_years;
    let rate = input.electricity_rate;

    // ── System sizing and production ─────────────────────────────────
    let (system_size_kw, system_size_derived) = match input.system_size_kw {
        Some(kw) => (kw, false),
        None => {
            let annual_bill = mul(input.monthly_bill, MONTHS_PER_YEAR, "monthly_bill")?;
            let per_kw = mul(rate, dec!(1000), "electricity_rate")?;
            let denominator = mul(per_kw, SIZING_SUN_HOURS, "electricity_rate")?;
            (div(annual_bill, denominator, "monthly_bill")?, true)
        }
    };

    let field = "system_size_kw";
    let annual_production_kwh = [
        input.solar_resource.peak_sun_hours(),
        DAYS_PER_YEAR,
        input.roof_orientation.efficiency(),
        SYSTEM_EFFICIENCY,
    ]
    .into_iter()
    .try_fold(system_size_kw, |acc, f| mul(acc, f, field))?;
    let first_year_savings = mul(annual_production_kwh, rate, "electricity_rate")?;

    // ── Incentive ────────────────────────────────────────────────────
    let federal_tax_credit = input.system_cost * FEDERAL_TAX_CREDIT_RATE;
    let net_system_cost = input.system_cost - federal_tax_credit;
    let down_payment = input.down_payment.unwrap_or(input.system_cost);
    let out_of_pocket = down_payment - down_payment * FEDERAL_TAX_CREDIT_RATE;

    // ── Financing ────────────────────────────────────────────────────
    let loan_amount = input.system_cost - down_payment;
    let has_loan = loan_amount > Decimal::ZERO;
    let (monthly_loan_payment, total_interest_paid) = if has_loan {
        let monthly_rate = input.financing_rate_annual_pct / HUNDRED / MONTHS_PER_YEAR;
        let payment = loan_payment(loan_amount, monthly_rate, LOAN_TERM_MONTHS)?;
        let interest = if monthly_rate.is_zero() {
            Decimal::ZERO
        } else {
            total_interest(payment, LOAN_TERM_MONTHS, loan_amount)?
        };
        (payment, interest)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let total_investment = add(out_of_pocket, total_interest_paid, "down_payment")?;
    if total_investment <= Decimal::ZERO {
        return Err(SolarRoiError::InvalidInput {
            field: "down_payment".into(),
            reason: "Total investment (out-of-pocket plus loan interest) must be positive".into(),
        });
    }

    // ── Year-by-year simulation ──────────────────────────────────────
    let escalation_step = Decimal::ONE + input.utility_rate_increase_pct / HUNDRED;
    let annual_bill = mul(input.monthly_bill, MONTHS_PER_YEAR, "monthly_bill")?;
    let annual_loan_cost = mul(monthly_loan_payment, MONTHS_PER_YEAR, "system_cost")?;

    let mut yearly: Vec<RoiYear> = Vec::with_capacity(horizon as usize);
    let mut production = annual_production_kwh;
    let mut degradation_factor = Decimal::ONE;
    let mut escalation_factor = Decimal::ONE;
    let mut cumulative_savings = Decimal::ZERO;
    let mut cumulative_costs = total_investment;
    let mut bill_without_solar = Decimal::ZERO;
    let mut break_even_year: u32 = 0;

    for year in 1..=horizon {
        if year > 1 {
            production *= DEGRADATION_STEP;
            degradation_factor *= DEGRADATION_STEP;
            escalation_factor =
                mul(escalation_factor, escalation_step, "utility_rate_increase_pct")?;
        }

        let at_base_rate = mul(production, rate, "electricity_rate")?;
        let savings = mul(at_base_rate, escalation_factor, "utility_rate_increase_pct")?;
        cumulative_savings = add(cumulative_savings, savings, "time_frame_years")?;

        if has_loan && year <= LOAN_TERM_YEARS {
            cumulative_costs = add(cumulative_costs, annual_loan_cost, "system_cost")?;
        }

        let bill = mul(annual_bill, escalation_factor, "utility_rate_increase_pct")?;
        bill_without_solar = add(bill_without_solar, bill, "time_frame_years")?;

        let is_break_even = break_even_year == 0 && cumulative_savings >= cumulative_costs;
        if is_break_even {
            break_even_year = year;
        }

        yearly.push(RoiYear {
            year,
            production_kwh: production,
            degradation_factor,
            escalation_factor,
            savings,
            cumulative_savings,
            cumulative_costs,
            bill_without_solar,
            is_break_even,
        });
    }

    // ── Summary ──────────────────────────────────────────────────────
    let horizon_dec = Decimal::from(horizon);
    let total_lifetime_savings = cumulative_savings - cumulative_costs;
    let roi_pct = mul(
        div(total_lifetime_savings, total_investment, "down_payment")?,
        HUNDRED,
        "down_payment",
    )?;
    let annualized_roi_pct = roi_pct / horizon_dec;

    let carbon_offset_per_year_tons = annual_production_kwh * CARBON_TONS_PER_KWH;
    let total_carbon_offset_tons = mul(carbon_offset_per_year_tons, horizon_dec, field)?;
    let tree_equivalent = mul(total_carbon_offset_tons, TREES_PER_TON, field)?;

    let monthly_first_year_savings = first_year_savings / MONTHS_PER_YEAR;

    Ok(RoiProjection {
        system_size_kw,
        system_size_derived,
        annual_production_kwh,
        first_year_savings,
        system_cost: input.system_cost,
        federal_tax_credit,
        net_system_cost,
        down_payment,
        out_of_pocket,
        loan_amount: loan_amount.max(Decimal::ZERO),
        monthly_loan_payment,
        total_interest_paid,
        total_investment,
        cumulative_savings,
        cumulative_costs,
        break_even_year,
        payback_period_years: break_even_year,
        total_lifetime_savings,
        roi_pct,
        annualized_roi_pct,
        effective_annual_savings: total_lifetime_savings / horizon_dec,
        is_profitable: total_lifetime_savings > Decimal::ZERO,
        total_electricity_bill_without_solar: bill_without_solar,
        carbon_offset_per_year_tons,
        total_carbon_offset_tons,
        tree_equivalent,
        current_monthly_bill: input.monthly_bill,
        new_monthly_bill: (input.monthly_bill - monthly_first_year_savings).max(Decimal::ZERO),
        monthly_savings: input.monthly_bill.min(monthly_first_year_savings),
        time_frame_years: horizon,
        yearly,
    })
}

/// Run [`compute`] and wrap the projection with methodology, model
/// assumptions and advisory warnings.
pub fn calculate_solar_roi(
    input: &SolarRoiInput,
) -> SolarRoiResult<ComputationOutput<RoiProjection>> {
    let start = Instant::now();

    let projection = compute(input)?;
    let warnings = collect_warnings(input, &projection);

    tracing::debug!(
        system_size_kw = %projection.system_size_kw,
        break_even_year = projection.break_even_year,
        roi_pct = %projection.roi_pct,
        warnings = warnings.len(),
        "solar ROI projection computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "sizing_sun_hours_per_day": SIZING_SUN_HOURS.to_string(),
        "peak_sun_hours": input.solar_resource.peak_sun_hours().to_string(),
        "roof_efficiency": input.roof_orientation.efficiency().to_string(),
        "system_efficiency": SYSTEM_EFFICIENCY.to_string(),
        "federal_tax_credit_rate": FEDERAL_TAX_CREDIT_RATE.to_string(),
        "annual_degradation": (Decimal::ONE - DEGRADATION_STEP).to_string(),
        "loan_term_months": LOAN_TERM_MONTHS,
        "carbon_tons_per_kwh": CARBON_TONS_PER_KWH.to_string(),
        "trees_per_ton": TREES_PER_TON.to_string(),
        "environmental_offset_basis": "undegraded first-year production",
        "currency": "USD"
    });

    Ok(with_metadata(
        "Residential Solar ROI (degrading production, escalating utility rates, 20-year amortised loan)",
        &assumptions,
        warnings,
        elapsed,
        projection,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn out_of_range(field: &str) -> SolarRoiError {
    SolarRoiError::InvalidInput {
        field: field.into(),
        reason: "Value too large for the projection (decimal overflow)".into(),
    }
}

fn mul(a: Decimal, b: Decimal, field: &str) -> SolarRoiResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

fn add(a: Decimal, b: Decimal, field: &str) -> SolarRoiResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

fn div(a: Decimal, b: Decimal, field: &str) -> SolarRoiResult<Decimal> {
    a.checked_div(b).ok_or_else(|| out_of_range(field))
}

fn validate_input(input: &SolarRoiInput) -> SolarRoiResult<()> {
    if input.monthly_bill <= Decimal::ZERO {
        return Err(SolarRoiError::InvalidInput {
            field: "monthly_bill".into(),
            reason: "Monthly bill must be positive".into(),
        });
    }

    if input.electricity_rate <= Decimal::ZERO {
        return Err(SolarRoiError::InvalidInput {
            field: "electricity_rate".into(),
            reason: "Electricity rate must be positive".into(),
        });
    }

    if input.system_cost <= Decimal::ZERO {
        return Err(SolarRoiError::InvalidInput {
            field: "system_cost".into(),
            reason: "System cost must be positive".into(),
        });
    }

    if let Some(kw) = input.system_size_kw {
        if kw <= Decimal::ZERO {
            return Err(SolarRoiError::InvalidInput {
                field: "system_size_kw".into(),
                reason: "System size must be positive when supplied".into(),
            });
        }
    }

    if let Some(dp) = input.down_payment {
        if dp < Decimal::ZERO {
            return Err(SolarRoiError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot be negative".into(),
            });
        }
    }

    if input.time_frame_years < 1 || input.time_frame_years > MAX_TIME_FRAME_YEARS {
        return Err(SolarRoiError::InvalidInput {
            field: "time_frame_years".into(),
            reason: format!("Time frame must be between 1 and {MAX_TIME_FRAME_YEARS} years"),
        });
    }

    if input.utility_rate_increase_pct <= -HUNDRED || input.utility_rate_increase_pct > HUNDRED {
        return Err(SolarRoiError::InvalidInput {
            field: "utility_rate_increase_pct".into(),
            reason: "Utility rate increase must be greater than -100% and at most 100%".into(),
        });
    }

    if input.financing_rate_annual_pct < Decimal::ZERO
        || input.financing_rate_annual_pct > HUNDRED
    {
        return Err(SolarRoiError::InvalidInput {
            field: "financing_rate_annual_pct".into(),
            reason: "Financing rate must be between 0% and 100%".into(),
        });
    }

    Ok(())
}

fn collect_warnings(input: &SolarRoiInput, projection: &RoiProjection) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if projection.system_size_derived {
        warnings.push(format!(
            "System size not supplied; estimated {:.1} kW from the monthly bill at {} sun-hours/day",
            projection.system_size_kw,
            SIZING_SUN_HOURS
        ));
    }

    if let Some(dp) = input.down_payment {
        if dp > input.system_cost {
            warnings.push("Down payment exceeds system cost; treated as a cash purchase".into());
        }
    }

    if projection.loan_amount > Decimal::ZERO && input.financing_rate_annual_pct.is_zero() {
        warnings.push(format!(
            "Financing rate is 0%; loan repaid straight-line over {LOAN_TERM_MONTHS} months"
        ));
    }

    if input.roof_orientation == RoofOrientation::North {
        warnings.push(
            "North-facing roof produces 40% less than a south-facing roof.".into(),
        );
    }

    if !TIME_FRAME_OPTIONS.contains(&input.time_frame_years) {
        warnings.push(format!(
            "Time frame of {} years is not one of the standard options {:?}",
            input.time_frame_years, TIME_FRAME_OPTIONS
        ));
    }

    if projection.break_even_year == 0 {
        warnings.push(format!(
            "Cumulative savings do not offset costs within {} years",
            input.time_frame_years
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cash_purchase() -> SolarRoiInput {
        SolarRoiInput {
            down_payment: Some(dec!(25000)),
            ..SolarRoiInput::new(dec!(180), dec!(25000))
        }
    }

    fn sunny_financed() -> SolarRoiInput {
        SolarRoiInput {
            electricity_rate: dec!(0.18),
            down_payment: Some(dec!(5000)),
            solar_resource: SolarResource::High,
            time_frame_years: 25,
            utility_rate_increase_pct: dec!(4),
            ..SolarRoiInput::new(dec!(250), dec!(20000))
        }
    }

    #[test]
    fn test_derived_system_size() {
        let out = compute(&cash_purchase()).unwrap();
        assert_eq!(out.system_size_kw, dec!(4));
        assert!(out.system_size_derived);
        assert_eq!(out.annual_production_kwh, dec!(5212.2));
    }

    #[test]
    fn test_supplied_system_size_used() {
        let input = SolarRoiInput {
            system_size_kw: Some(dec!(8)),
            ..cash_purchase()
        };
        let out = compute(&input).unwrap();
        assert_eq!(out.system_size_kw, dec!(8));
        assert!(!out.system_size_derived);
        // 8 * 4.2 * 365 * 1.0 * 0.85
        assert_eq!(out.annual_production_kwh, dec!(10424.4));
    }

    #[test]
    fn test_incentive_split() {
        let out = compute(&cash_purchase()).unwrap();
        assert_eq!(out.federal_tax_credit, dec!(7500));
        assert_eq!(out.net_system_cost, dec!(17500));
        assert_eq!(out.out_of_pocket, dec!(17500));
        assert_eq!(out.net_system_cost + out.federal_tax_credit, out.system_cost);
    }

    #[test]
    fn test_absent_down_payment_is_cash_purchase() {
        let out = compute(&SolarRoiInput::new(dec!(180), dec!(25000))).unwrap();
        assert_eq!(out.down_payment, dec!(25000));
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert_eq!(out.monthly_loan_payment, Decimal::ZERO);
        assert_eq!(out.total_interest_paid, Decimal::ZERO);
    }

    #[test]
    fn test_financed_loan_terms() {
        let out = compute(&sunny_financed()).unwrap();
        assert_eq!(out.loan_amount, dec!(15000));
        assert!(
            (out.monthly_loan_payment - dec!(111.836)).abs() < dec!(0.001),
            "got {}",
            out.monthly_loan_payment
        );
        assert!(
            (out.total_interest_paid - dec!(11840.633)).abs() < dec!(0.01),
            "got {}",
            out.total_interest_paid
        );
        assert_eq!(out.out_of_pocket, dec!(3500));
    }

    #[test]
    fn test_loan_payments_stop_after_term() {
        let out = compute(&sunny_financed()).unwrap();
        let y20 = out.year(20).unwrap().cumulative_costs;
        let y21 = out.year(21).unwrap().cumulative_costs;
        let y25 = out.year(25).unwrap().cumulative_costs;
        assert_eq!(y20, y21);
        assert_eq!(y21, y25);
    }

    #[test]
    fn test_break_even_is_sticky() {
        let out = compute(&sunny_financed()).unwrap();
        assert_eq!(out.break_even_year, 25);
        let flagged: Vec<u32> = out
            .yearly
            .iter()
            .filter(|y| y.is_break_even)
            .map(|y| y.year)
            .collect();
        assert_eq!(flagged, vec![25]);
        assert_eq!(out.payback_period_years, out.break_even_year);
    }

    #[test]
    fn test_degradation_law() {
        let out = compute(&sunny_financed()).unwrap();
        for pair in out.yearly.windows(2) {
            assert_eq!(pair[1].production_kwh, pair[0].production_kwh * DEGRADATION_STEP);
        }
        assert_eq!(out.yearly[0].production_kwh, out.annual_production_kwh);
    }

    #[test]
    fn test_bill_impact_capped() {
        // 10 kW on a $50 bill produces far more than the bill
        let input = SolarRoiInput {
            system_size_kw: Some(dec!(10)),
            ..SolarRoiInput::new(dec!(50), dec!(30000))
        };
        let out = compute(&input).unwrap();
        assert_eq!(out.monthly_savings, dec!(50));
        assert_eq!(out.new_monthly_bill, Decimal::ZERO);
    }

    #[test]
    fn test_environmental_uses_first_year_production() {
        let out = compute(&cash_purchase()).unwrap();
        assert_eq!(out.carbon_offset_per_year_tons, dec!(2.08488));
        assert_eq!(out.total_carbon_offset_tons, dec!(41.6976));
        assert_eq!(out.tree_equivalent, dec!(667.1616));
    }

    #[test]
    fn test_zero_time_frame_rejected() {
        let input = SolarRoiInput {
            time_frame_years: 0,
            ..cash_purchase()
        };
        match compute(&input) {
            Err(SolarRoiError::InvalidInput { field, .. }) => {
                assert_eq!(field, "time_frame_years")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_horizon_beyond_limit_rejected() {
        let input = SolarRoiInput {
            time_frame_years: 3000,
            ..SolarRoiInput::new(dec!(180), dec!(25000))
        };
        match compute(&input) {
            Err(SolarRoiError::InvalidInput { field, .. }) => {
                assert_eq!(field, "time_frame_years")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_longest_horizon_computes() {
        let input = SolarRoiInput {
            time_frame_years: MAX_TIME_FRAME_YEARS,
            ..cash_purchase()
        };
        let out = compute(&input).unwrap();
        assert_eq!(out.yearly.len(), MAX_TIME_FRAME_YEARS as usize);
    }

    #[test]
    fn test_huge_bill_is_invalid_input_not_panic() {
        let input = SolarRoiInput::new(Decimal::MAX, dec!(25000));
        assert!(matches!(
            compute(&input),
            Err(SolarRoiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_runaway_escalation_is_invalid_input_not_panic() {
        // Doubling every year for a century exceeds the decimal range
        let input = SolarRoiInput {
            utility_rate_increase_pct: dec!(100),
            time_frame_years: MAX_TIME_FRAME_YEARS,
            ..cash_purchase()
        };
        assert!(matches!(
            compute(&input),
            Err(SolarRoiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_explicit_zero_down_payment_is_full_loan() {
        let input = SolarRoiInput {
            down_payment: Some(Decimal::ZERO),
            ..cash_purchase()
        };
        let out = compute(&input).unwrap();
        assert_eq!(out.loan_amount, dec!(25000));
        assert_eq!(out.out_of_pocket, Decimal::ZERO);
        assert!(out.total_interest_paid > Decimal::ZERO);
        assert_eq!(out.total_investment, out.total_interest_paid);
    }

    #[test]
    fn test_zero_investment_rejected() {
        // Fully financed at 0% => nothing out of pocket, no interest
        let input = SolarRoiInput {
            down_payment: Some(Decimal::ZERO),
            financing_rate_annual_pct: Decimal::ZERO,
            ..cash_purchase()
        };
        assert!(matches!(
            compute(&input),
            Err(SolarRoiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_positive_required_fields_rejected() {
        for input in [
            SolarRoiInput::new(Decimal::ZERO, dec!(25000)),
            SolarRoiInput::new(dec!(180), Decimal::ZERO),
            SolarRoiInput {
                electricity_rate: Decimal::ZERO,
                ..cash_purchase()
            },
            SolarRoiInput {
                down_payment: Some(dec!(-1)),
                ..cash_purchase()
            },
        ] {
            assert!(compute(&input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_warnings_for_cash_purchase_without_break_even() {
        let out = calculate_solar_roi(&cash_purchase()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("estimated 4")));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("do not offset costs within 20 years")));
        assert_eq!(out.assumptions["loan_term_months"], 240);
    }

    #[test]
    fn test_overpaid_down_payment_warns() {
        let input = SolarRoiInput {
            down_payment: Some(dec!(30000)),
            ..cash_purchase()
        };
        let out = calculate_solar_roi(&input).unwrap();
        assert_eq!(out.result.loan_amount, Decimal::ZERO);
        assert_eq!(out.result.monthly_loan_payment, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("cash purchase")));
    }

    #[test]
    fn test_serde_defaults() {
        let input: SolarRoiInput =
            serde_json::from_str(r#"{"monthly_bill": "180", "system_cost": "25000"}"#).unwrap();
        assert_eq!(input, SolarRoiInput::new(dec!(180), dec!(25000)));
    }
}
