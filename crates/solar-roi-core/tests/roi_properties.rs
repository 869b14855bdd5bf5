use proptest::prelude::*;
use rust_decimal::Decimal;
use solar_roi_core::solar::roi::{
    calculate_solar_roi, compute, SolarRoiInput, DEGRADATION_STEP, MAX_TIME_FRAME_YEARS,
};
use solar_roi_core::solar::{RoofOrientation, SolarResource};
use solar_roi_core::SolarRoiError;

fn resource() -> impl Strategy<Value = SolarResource> {
    prop_oneof![
        Just(SolarResource::High),
        Just(SolarResource::Average),
        Just(SolarResource::Low),
    ]
}

fn orientation() -> impl Strategy<Value = RoofOrientation> {
    prop_oneof![
        Just(RoofOrientation::South),
        Just(RoofOrientation::Southeast),
        Just(RoofOrientation::Southwest),
        Just(RoofOrientation::East),
        Just(RoofOrientation::West),
        Just(RoofOrientation::North),
    ]
}

prop_compose! {
    fn lead_inputs()(
        bill in 40u32..600,
        rate_mills in 60u32..400,
        cost_hundreds in 80u32..600,
        down_pct in prop::option::of(5u32..=120),
        financing_tenths in 0u32..150,
        escalation_tenths in -500i64..=100,
        time_frame_years in 1u32..=MAX_TIME_FRAME_YEARS,
        solar_resource in resource(),
        roof_orientation in orientation(),
    ) -> SolarRoiInput {
        let system_cost = Decimal::from(cost_hundreds * 100);
        SolarRoiInput {
            electricity_rate: Decimal::new(i64::from(rate_mills), 3),
            down_payment: down_pct
                .map(|pct| system_cost * Decimal::from(pct) / Decimal::ONE_HUNDRED),
            financing_rate_annual_pct: Decimal::new(i64::from(financing_tenths), 1),
            solar_resource,
            roof_orientation,
            time_frame_years,
            utility_rate_increase_pct: Decimal::new(escalation_tenths, 1),
            ..SolarRoiInput::new(Decimal::from(bill), system_cost)
        }
    }
}

/// Any representable decimal, sign and scale included.
fn any_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, negative, scale)| {
            Decimal::from_parts(lo, mid, hi, negative, scale)
        })
}

prop_compose! {
    fn extreme_inputs()(
        monthly_bill in any_decimal(),
        electricity_rate in any_decimal(),
        system_size_kw in prop::option::of(any_decimal()),
        system_cost in any_decimal(),
        down_payment in prop::option::of(any_decimal()),
        financing_rate_annual_pct in any_decimal(),
        utility_rate_increase_pct in any_decimal(),
        time_frame_years in 0u32..=3000,
        solar_resource in resource(),
        roof_orientation in orientation(),
    ) -> SolarRoiInput {
        SolarRoiInput {
            monthly_bill,
            electricity_rate,
            annual_usage_kwh: None,
            system_size_kw,
            system_cost,
            down_payment,
            financing_rate_annual_pct,
            solar_resource,
            roof_orientation,
            time_frame_years,
            utility_rate_increase_pct,
        }
    }
}

proptest! {
    #[test]
    fn credit_and_net_cost_sum_to_system_cost(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        prop_assert_eq!(out.net_system_cost + out.federal_tax_credit, out.system_cost);
        prop_assert_eq!(out.federal_tax_credit, input.system_cost * Decimal::new(3, 1));
    }

    #[test]
    fn profitability_follows_lifetime_savings(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        prop_assert_eq!(out.is_profitable, out.total_lifetime_savings > Decimal::ZERO);
    }

    #[test]
    fn break_even_is_first_crossing(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        let first = out
            .yearly
            .iter()
            .find(|y| y.cumulative_savings >= y.cumulative_costs)
            .map(|y| y.year)
            .unwrap_or(0);
        prop_assert_eq!(out.break_even_year, first);
        prop_assert!(out.yearly.iter().filter(|y| y.is_break_even).count() <= 1);
    }

    #[test]
    fn production_degrades_each_year(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        for pair in out.yearly.windows(2) {
            prop_assert_eq!(pair[1].production_kwh, pair[0].production_kwh * DEGRADATION_STEP);
            prop_assert!(pair[1].production_kwh <= pair[0].production_kwh);
        }
    }

    #[test]
    fn savings_grow_by_escalation_times_degradation(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        let expected = (Decimal::ONE + input.utility_rate_increase_pct / Decimal::ONE_HUNDRED)
            * DEGRADATION_STEP;
        let tolerance = Decimal::new(1, 12);
        // Deep negative escalation shrinks savings toward the last decimal
        // place, where the ratio loses precision.
        let significant = Decimal::new(1, 6);
        for pair in out
            .yearly
            .windows(2)
            .filter(|p| p[0].escalation_factor >= significant)
        {
            let ratio = pair[1].savings / pair[0].savings;
            prop_assert!((ratio - expected).abs() < tolerance, "ratio {} expected {}", ratio, expected);
        }
    }

    #[test]
    fn higher_escalation_never_lowers_lifetime_savings(
        input in lead_inputs(),
        bump_tenths in 1u32..30,
    ) {
        let higher = SolarRoiInput {
            utility_rate_increase_pct: input.utility_rate_increase_pct
                + Decimal::new(i64::from(bump_tenths), 1),
            ..input.clone()
        };
        let base = compute(&input).unwrap();
        let bumped = compute(&higher).unwrap();
        prop_assert!(bumped.total_lifetime_savings >= base.total_lifetime_savings);
    }

    #[test]
    fn monthly_savings_never_exceed_bill(input in lead_inputs()) {
        let out = compute(&input).unwrap();
        prop_assert!(out.monthly_savings <= out.current_monthly_bill);
        prop_assert!(out.new_monthly_bill >= Decimal::ZERO);
    }

    #[test]
    fn cash_purchase_has_no_financing(input in lead_inputs()) {
        let cash = SolarRoiInput { down_payment: Some(input.system_cost), ..input };
        let out = compute(&cash).unwrap();
        prop_assert_eq!(out.monthly_loan_payment, Decimal::ZERO);
        prop_assert_eq!(out.total_interest_paid, Decimal::ZERO);
    }

    #[test]
    fn extreme_inputs_never_panic(input in extreme_inputs()) {
        match calculate_solar_roi(&input) {
            Ok(out) => {
                let rounded = out.result.rounded();
                prop_assert_eq!(rounded.yearly.len(), input.time_frame_years as usize);
            }
            Err(SolarRoiError::InvalidInput { .. } | SolarRoiError::DivisionByZero { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn compute_is_deterministic(input in lead_inputs()) {
        prop_assert_eq!(compute(&input).unwrap(), compute(&input).unwrap());
    }
}
