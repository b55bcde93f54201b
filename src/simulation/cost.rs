//! Costs of the electricity and water consumed by the electrolyzer.
use super::aggregate::AnnualProduction;
use super::conversion::ConversionRatios;
use crate::timeseries::MergedHourlyRecord;
use crate::units::{Money, MoneyPerVolume};
use indexmap::IndexMap;
use log::warn;

/// Decimal places kept for currency figures
const CURRENCY_DECIMALS: i32 = 2;

/// Electricity and water costs for one year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnualCosts {
    /// Cost of electricity at market prices
    pub electricity: Money,
    /// Cost of water
    pub water: Money,
    /// Number of hours for which a price was available
    pub priced_hours: u32,
}

/// Cost of one hour's generation at that hour's market price, rounded to cents
pub fn hourly_electricity_cost(record: &MergedHourlyRecord) -> Money {
    (record.generation.total() * record.price).round_to(CURRENCY_DECIMALS)
}

/// Calculate annual electricity and water costs from the merged hourly table.
///
/// Costs are only calculated for the years in `years`, so that years excluded for insufficient
/// generation data are excluded here too. Water costs are summed unrounded and only the annual
/// total is rounded.
pub fn annual_costs(
    merged: &[MergedHourlyRecord],
    ratios: &ConversionRatios,
    water_tariff: MoneyPerVolume,
    years: &[AnnualProduction],
) -> IndexMap<i32, AnnualCosts> {
    let mut costs: IndexMap<_, _> = years
        .iter()
        .map(|annual| (annual.year, AnnualCosts::default()))
        .collect();

    for record in merged {
        let Some(cost) = costs.get_mut(&record.generation.year()) else {
            continue;
        };

        let water = ratios.convert(&record.generation).water;
        cost.electricity += hourly_electricity_cost(record);
        cost.water += water * water_tariff;
        cost.priced_hours += 1;
    }

    for annual in years {
        let cost = &mut costs[&annual.year];
        cost.electricity = cost.electricity.round_to(CURRENCY_DECIMALS);
        cost.water = cost.water.round_to(CURRENCY_DECIMALS);

        if cost.priced_hours < annual.hours_covered {
            let missing = annual.hours_covered - cost.priced_hours;
            warn!(
                "Year {}: {:.2}% of generation hours have no electricity price and are not costed",
                annual.year,
                100.0 * missing as f64 / annual.hours_covered as f64
            );
        }
    }

    costs
}
