//! Sizing of the electrolyzer plant and resolution of user-supplied plant inputs.
use super::capacity_factor::RatedCapacity;
use crate::error::InvalidUserInput;
use crate::input::assumptions::UserValue;
use crate::units::{Dimensionless, EnergyPerMass, MoneyPerMass, Power};
use log::warn;

/// Sale price of hydrogen used when the user does not supply a valid one
pub const DEFAULT_HYDROGEN_SALE_PRICE: MoneyPerMass = MoneyPerMass(7.0);

/// Electrolyzer efficiency: the energy content of the hydrogen produced per unit of electricity
pub fn electrolyzer_efficiency(
    hydrogen_energy_density: EnergyPerMass,
    electricity_per_kg: EnergyPerMass,
) -> Dimensionless {
    hydrogen_energy_density / electricity_per_kg
}

/// The default plant size: the average renewable output the electrolyzer can usefully convert.
///
/// Rounded to the nearest whole kW.
pub fn default_plant_size(
    capacity: &RatedCapacity,
    mean_combined_capacity_factor: Dimensionless,
    efficiency: Dimensionless,
) -> Power {
    (capacity.total() * mean_combined_capacity_factor * efficiency).round_to(0)
}

/// Parse a user-supplied plant size, which must be positive and no larger than the total
/// generation capacity.
pub fn parse_plant_size(input: &UserValue, max: Power) -> Result<Power, InvalidUserInput> {
    const FIELD: &str = "Electrolyzer plant size";
    let size = Power(input.to_number(FIELD)?);
    if !size.is_finite() || size <= Power(0.0) {
        return Err(InvalidUserInput::OutOfRange {
            field: FIELD,
            value: size.value(),
            reason: "it must be a positive number".into(),
        });
    }
    if size > max {
        return Err(InvalidUserInput::OutOfRange {
            field: FIELD,
            value: size.value(),
            reason: format!(
                "it cannot exceed the total wind + solar PV generation capacity of {max} kW"
            ),
        });
    }

    Ok(size)
}

/// Parse a user-supplied hydrogen sale price, which must be finite and non-negative
pub fn parse_sale_price(input: &UserValue) -> Result<MoneyPerMass, InvalidUserInput> {
    const FIELD: &str = "Hydrogen sale price";
    let price = MoneyPerMass(input.to_number(FIELD)?);
    if !price.is_finite() || price < MoneyPerMass(0.0) {
        return Err(InvalidUserInput::OutOfRange {
            field: FIELD,
            value: price.value(),
            reason: "it must be a finite, non-negative number".into(),
        });
    }

    Ok(price)
}

/// Resolve the plant size, substituting `default` if the user's value is missing or invalid
pub fn resolve_plant_size(input: Option<&UserValue>, default: Power, max: Power) -> Power {
    let Some(input) = input else {
        return default;
    };

    parse_plant_size(input, max).unwrap_or_else(|err| {
        warn!("Invalid input: {err}. Using default size of {default} kW.");
        default
    })
}

/// Resolve the hydrogen sale price, substituting the default if the user's value is missing or
/// invalid
pub fn resolve_sale_price(input: Option<&UserValue>) -> MoneyPerMass {
    let Some(input) = input else {
        return DEFAULT_HYDROGEN_SALE_PRICE;
    };

    parse_sale_price(input).unwrap_or_else(|err| {
        warn!("Invalid input: {err}. Using default value of {DEFAULT_HYDROGEN_SALE_PRICE} $/kg.");
        DEFAULT_HYDROGEN_SALE_PRICE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::rated_capacity;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_electrolyzer_efficiency() {
        assert_approx_eq!(
            Dimensionless,
            electrolyzer_efficiency(EnergyPerMass(33.33), EnergyPerMass(55.5)),
            Dimensionless(0.600_540_540_540_540_5)
        );
    }

    #[rstest]
    fn test_default_plant_size(rated_capacity: RatedCapacity) {
        // 2500 kW * 0.3 * 0.6005... = 450.4 kW
        let efficiency = electrolyzer_efficiency(EnergyPerMass(33.33), EnergyPerMass(55.5));
        assert_eq!(
            default_plant_size(&rated_capacity, Dimensionless(0.3), efficiency),
            Power(450.0)
        );
    }

    #[rstest]
    #[case(UserValue::Number(1000.0), Ok(Power(1000.0)))]
    #[case(UserValue::Text(" 1200 ".into()), Ok(Power(1200.0)))]
    #[case(UserValue::Number(2500.0), Ok(Power(2500.0)))]
    #[case(UserValue::Text("big".into()), Err(InvalidUserInput::NotANumber {
        field: "Electrolyzer plant size",
        raw: "big".into(),
    }))]
    fn test_parse_plant_size(
        #[case] input: UserValue,
        #[case] expected: Result<Power, InvalidUserInput>,
    ) {
        assert_eq!(parse_plant_size(&input, Power(2500.0)), expected);
    }

    #[rstest]
    #[case(UserValue::Number(0.0))]
    #[case(UserValue::Number(-10.0))]
    #[case(UserValue::Number(2500.5))]
    #[case(UserValue::Text("NaN".into()))]
    fn test_parse_plant_size_out_of_range(#[case] input: UserValue) {
        assert!(matches!(
            parse_plant_size(&input, Power(2500.0)),
            Err(InvalidUserInput::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(None, Power(450.0))]
    #[case(Some(UserValue::Number(900.0)), Power(900.0))]
    #[case(Some(UserValue::Number(5000.0)), Power(450.0))]
    #[case(Some(UserValue::Text("abc".into())), Power(450.0))]
    fn test_resolve_plant_size(#[case] input: Option<UserValue>, #[case] expected: Power) {
        assert_eq!(
            resolve_plant_size(input.as_ref(), Power(450.0), Power(2500.0)),
            expected
        );
    }

    #[rstest]
    #[case(None, 7.0)]
    #[case(Some(UserValue::Number(5.5)), 5.5)]
    #[case(Some(UserValue::Text("4".into())), 4.0)]
    #[case(Some(UserValue::Number(0.0)), 0.0)]
    #[case(Some(UserValue::Number(-1.0)), 7.0)]
    #[case(Some(UserValue::Text("seven".into())), 7.0)]
    #[case(Some(UserValue::Number(f64::INFINITY)), 7.0)]
    fn test_resolve_sale_price(#[case] input: Option<UserValue>, #[case] expected: f64) {
        assert_eq!(resolve_sale_price(input.as_ref()), MoneyPerMass(expected));
    }
}
