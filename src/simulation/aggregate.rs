//! Aggregation of hourly results into calendar years.
use super::capacity_factor::CapacityFactors;
use super::conversion::HourlyProduction;
use super::cost::AnnualCosts;
use crate::error::SimulationError;
use crate::units::{Dimensionless, Mass, Money, Volume};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

/// Years covering fewer days than this are excluded from all annual figures
pub const MIN_DAYS_PER_YEAR: u32 = 310;

/// Decimal places kept for annual hydrogen and water totals
const ANNUAL_DECIMALS: i32 = 1;

const HOURS_PER_DAY: f64 = 24.0;

/// Hydrogen production figures for one calendar year
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualProduction {
    /// Calendar year
    pub year: i32,
    /// Number of hours of generation data in the year
    pub hours_covered: u32,
    /// Total hydrogen produced
    pub hydrogen: Mass,
    /// Total water consumed
    pub water: Volume,
    /// Mean hydrogen produced per hour of data
    pub mean_hourly_hydrogen: Mass,
    /// Number of hours in which some hydrogen was produced
    pub hours_with_production: u32,
}

impl AnnualProduction {
    /// The number of days covered by the year's data
    pub fn days_covered(&self) -> f64 {
        self.hours_covered as f64 / HOURS_PER_DAY
    }

    /// Whether the year has enough data to be used
    pub fn has_sufficient_coverage(&self) -> bool {
        self.days_covered() >= MIN_DAYS_PER_YEAR as f64
    }

    /// Fraction of covered hours the electrolyzer is effectively producing, after losses
    pub fn utilisation(&self, production_loss: Dimensionless) -> Dimensionless {
        Dimensionless(self.hours_with_production as f64) * (Dimensionless(1.0) - production_loss)
            / Dimensionless(self.hours_covered as f64)
    }
}

/// Sum hourly production for the hours of a single year
fn aggregate_year<'a, I>(year: i32, hours: I) -> AnnualProduction
where
    I: Iterator<Item = &'a HourlyProduction>,
{
    let mut hours_covered = 0;
    let mut hours_with_production = 0;
    let mut hydrogen = Mass(0.0);
    let mut water = Volume(0.0);
    for hour in hours {
        hours_covered += 1;
        if hour.hydrogen > Mass(0.0) {
            hours_with_production += 1;
        }
        hydrogen += hour.hydrogen;
        water += hour.water;
    }

    let mean_hourly_hydrogen = hydrogen / Dimensionless(hours_covered as f64);
    AnnualProduction {
        year,
        hours_covered,
        hydrogen: hydrogen.round_to(ANNUAL_DECIMALS),
        water: water.round_to(ANNUAL_DECIMALS),
        mean_hourly_hydrogen: mean_hourly_hydrogen.round_to(ANNUAL_DECIMALS),
        hours_with_production,
    }
}

/// Aggregate hourly production by calendar year, keeping only years with sufficient coverage.
///
/// The input must be in time order. The retained years are returned in chronological order.
///
/// # Returns
///
/// The production for each retained year or [`SimulationError::InsufficientHistory`] if no year has
/// enough data.
pub fn aggregate_production(
    production: &[HourlyProduction],
) -> Result<Vec<AnnualProduction>, SimulationError> {
    let mut retained = Vec::new();
    for (year, hours) in &production.iter().chunk_by(|hour| hour.generation.year()) {
        let annual = aggregate_year(year, hours);
        if annual.has_sufficient_coverage() {
            info!(
                "Year {year}: {:.1} days of generation data",
                annual.days_covered()
            );
            retained.push(annual);
        } else {
            warn!(
                "Excluding year {year}: only {:.1} days of generation data (minimum is {MIN_DAYS_PER_YEAR})",
                annual.days_covered()
            );
        }
    }

    if retained.is_empty() {
        return Err(SimulationError::InsufficientHistory {
            min_days: MIN_DAYS_PER_YEAR,
        });
    }

    Ok(retained)
}

/// All annual results for one retained year of historical data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualAggregate {
    /// Calendar year
    pub year: i32,
    /// Hours of generation data in the year
    pub hours_covered: u32,
    /// Total hydrogen produced
    #[serde(rename = "hydrogen_produced[kg]")]
    pub total_hydrogen: Mass,
    /// Total water consumed
    #[serde(rename = "water_consumed[gallons]")]
    pub total_water: Volume,
    /// Mean hydrogen produced per hour
    #[serde(rename = "mean_hourly_hydrogen[kg]")]
    pub mean_hourly_hydrogen: Mass,
    /// Total cost of electricity consumed
    #[serde(rename = "cost_of_electricity[$]")]
    pub electricity_cost: Money,
    /// Total cost of water consumed
    #[serde(rename = "cost_of_water[$]")]
    pub water_cost: Money,
    /// Wind capacity factor
    pub capacity_factor_wind: Dimensionless,
    /// Solar PV capacity factor
    pub capacity_factor_solar: Dimensionless,
    /// Combined wind and solar capacity factor
    pub capacity_factor_combined: Dimensionless,
    /// Hours in which hydrogen was produced
    pub hours_with_production: u32,
    /// Effective electrolyzer utilisation
    pub electrolyzer_utilisation: Dimensionless,
    /// Hours for which an electricity price was available
    pub priced_hours: u32,
}

/// Combine the per-year results of the production, capacity factor and cost stages.
///
/// All three maps must be keyed by the same retained years.
pub fn combine_annual_results(
    production: &[AnnualProduction],
    capacity_factors: &IndexMap<i32, CapacityFactors>,
    costs: &IndexMap<i32, AnnualCosts>,
    production_loss: Dimensionless,
) -> Vec<AnnualAggregate> {
    production
        .iter()
        .map(|annual| {
            let factors = capacity_factors[&annual.year];
            let cost = &costs[&annual.year];
            AnnualAggregate {
                year: annual.year,
                hours_covered: annual.hours_covered,
                total_hydrogen: annual.hydrogen,
                total_water: annual.water,
                mean_hourly_hydrogen: annual.mean_hourly_hydrogen,
                electricity_cost: cost.electricity,
                water_cost: cost.water,
                capacity_factor_wind: factors.wind,
                capacity_factor_solar: factors.solar,
                capacity_factor_combined: factors.combined,
                hours_with_production: annual.hours_with_production,
                electrolyzer_utilisation: annual.utilisation(production_loss),
                priced_hours: cost.priced_hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, conversion_ratios, full_year_generation, hour, hourly_record};
    use crate::simulation::conversion::ConversionRatios;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_aggregate_sums_hourly_values(conversion_ratios: ConversionRatios) {
        let generation = full_year_generation(2021, 555.0, 0.0);
        let production = conversion_ratios.convert_all(&generation);

        let annual = aggregate_production(&production).unwrap();
        assert_eq!(annual.len(), 1);
        let annual = &annual[0];
        assert_eq!(annual.year, 2021);
        assert_eq!(annual.hours_covered, 8760);
        assert_approx_eq!(Mass, annual.hydrogen, Mass(9.0 * 8760.0));
        assert_approx_eq!(Volume, annual.water, Volume(34.0 * 8760.0), epsilon = 1e-6);
        assert_eq!(annual.mean_hourly_hydrogen, Mass(9.0));
        assert_eq!(annual.hours_with_production, 8760);
    }

    #[rstest]
    fn test_aggregate_excludes_short_years(conversion_ratios: ConversionRatios) {
        // A full 2021, plus the first 300 days of 2022
        let mut generation = full_year_generation(2021, 100.0, 100.0);
        generation.extend(
            full_year_generation(2022, 100.0, 100.0)
                .into_iter()
                .take(300 * 24),
        );
        let production = conversion_ratios.convert_all(&generation);

        let years: Vec<_> = aggregate_production(&production)
            .unwrap()
            .iter()
            .map(|annual| annual.year)
            .collect();
        assert_eq!(years, [2021]);
    }

    #[rstest]
    #[case(309 * 24, false)]
    #[case(310 * 24 - 1, false)]
    #[case(310 * 24, true)]
    fn test_coverage_threshold(
        conversion_ratios: ConversionRatios,
        #[case] hours: usize,
        #[case] retained: bool,
    ) {
        let generation: Vec<_> = full_year_generation(2023, 10.0, 0.0)
            .into_iter()
            .take(hours)
            .collect();
        let production = conversion_ratios.convert_all(&generation);
        assert_eq!(aggregate_production(&production).is_ok(), retained);
    }

    #[rstest]
    fn test_insufficient_history(conversion_ratios: ConversionRatios) {
        let generation = [hourly_record(hour(2021, 1, 1, 0), 1.0, 1.0)];
        let production = conversion_ratios.convert_all(&generation);
        assert_error!(
            aggregate_production(&production).map_err(anyhow::Error::from),
            "No year of generation data covers at least 310 days"
        );
    }

    #[test]
    fn test_utilisation() {
        let annual = AnnualProduction {
            year: 2021,
            hours_covered: 8760,
            hydrogen: Mass(0.0),
            water: Volume(0.0),
            mean_hourly_hydrogen: Mass(0.0),
            hours_with_production: 4380,
        };
        assert_approx_eq!(
            Dimensionless,
            annual.utilisation(Dimensionless(0.1)),
            Dimensionless(0.45)
        );
    }
}
