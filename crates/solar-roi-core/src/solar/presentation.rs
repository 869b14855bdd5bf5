//! Display rounding for [`RoiProjection`].
//!
//! Currency rounds to whole dollars, percentages, kW and tons to one
//! decimal. Halves round toward positive infinity, as the lead form's
//! display does (`-2.5` becomes `-2`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::solar::roi::{RoiProjection, RoiYear};

const HALF: Decimal = dec!(0.5);
const TEN: Decimal = dec!(10);
const FACTOR_DP: u32 = 4;

/// Nearest whole unit. Values at the edge of the decimal range are
/// already integral and are floored as-is.
pub fn round_whole(value: Decimal) -> Decimal {
    value.checked_add(HALF).unwrap_or(value).floor()
}

/// Nearest tenth.
pub fn round_tenth(value: Decimal) -> Decimal {
    value
        .checked_mul(TEN)
        .and_then(|v| v.checked_add(HALF))
        .map(|v| v.floor() / TEN)
        .unwrap_or_else(|| value.round_dp(1))
}

impl RoiProjection {
    /// Copy of this projection rounded for display and delivery.
    ///
    /// Derived flags (`is_profitable`, `break_even_year`) are carried from
    /// the full-precision run, never recomputed from rounded figures.
    pub fn rounded(&self) -> RoiProjection {
        RoiProjection {
            system_size_kw: round_tenth(self.system_size_kw),
            system_size_derived: self.system_size_derived,
            annual_production_kwh: round_whole(self.annual_production_kwh),
            first_year_savings: round_whole(self.first_year_savings),
            system_cost: round_whole(self.system_cost),
            federal_tax_credit: round_whole(self.federal_tax_credit),
            net_system_cost: round_whole(self.net_system_cost),
            down_payment: round_whole(self.down_payment),
            out_of_pocket: round_whole(self.out_of_pocket),
            loan_amount: round_whole(self.loan_amount),
            monthly_loan_payment: round_whole(self.monthly_loan_payment),
            total_interest_paid: round_whole(self.total_interest_paid),
            total_investment: round_whole(self.total_investment),
            cumulative_savings: round_whole(self.cumulative_savings),
            cumulative_costs: round_whole(self.cumulative_costs),
            break_even_year: self.break_even_year,
            payback_period_years: self.payback_period_years,
            total_lifetime_savings: round_whole(self.total_lifetime_savings),
            roi_pct: round_tenth(self.roi_pct),
            annualized_roi_pct: round_tenth(self.annualized_roi_pct),
            effective_annual_savings: round_whole(self.effective_annual_savings),
            is_profitable: self.is_profitable,
            total_electricity_bill_without_solar: round_whole(
                self.total_electricity_bill_without_solar,
            ),
            carbon_offset_per_year_tons: round_tenth(self.carbon_offset_per_year_tons),
            total_carbon_offset_tons: round_tenth(self.total_carbon_offset_tons),
            tree_equivalent: round_whole(self.tree_equivalent),
            current_monthly_bill: round_whole(self.current_monthly_bill),
            new_monthly_bill: round_whole(self.new_monthly_bill),
            monthly_savings: round_whole(self.monthly_savings),
            time_frame_years: self.time_frame_years,
            yearly: self.yearly.iter().map(RoiYear::rounded).collect(),
        }
    }

    /// Rounded copy without the yearly series, as sent to lead intake.
    pub fn summary(&self) -> RoiProjection {
        let mut summary = self.rounded();
        summary.yearly.clear();
        summary
    }
}

impl RoiYear {
    pub fn rounded(&self) -> RoiYear {
        RoiYear {
            year: self.year,
            production_kwh: round_whole(self.production_kwh),
            degradation_factor: self.degradation_factor.round_dp(FACTOR_DP),
            escalation_factor: self.escalation_factor.round_dp(FACTOR_DP),
            savings: round_whole(self.savings),
            cumulative_savings: round_whole(self.cumulative_savings),
            cumulative_costs: round_whole(self.cumulative_costs),
            bill_without_solar: round_whole(self.bill_without_solar),
            is_break_even: self.is_break_even,
        }
    }
}
