//! Fixtures for tests
use crate::columns::{GENERATION_INDEX, PRICE_INDEX, SOLAR_GENERATION, WIND_GENERATION};
use crate::input::assumptions::{PROJECT_FILE_NAME, ProjectAssumptions};
use crate::input::generation::GENERATION_FILE_NAME;
use crate::input::price::PRICE_FILE_NAME;
use crate::simulation::aggregate::AnnualAggregate;
use crate::simulation::capacity_factor::RatedCapacity;
use crate::simulation::cash_flow::FinancialParameters;
use crate::simulation::conversion::ConversionRatios;
use crate::timeseries::HourlyRecord;
use crate::units::{
    Dimensionless, Energy, EnergyPerMass, Mass, Money, MoneyPerMass, MoneyPerPower, Power, Volume,
    VolumePerMass,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use rstest::fixture;
use std::fs;
use std::iter;
use std::path::Path;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The start of the given hour
pub fn hour(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// An hour of generation
pub fn hourly_record(timestamp: NaiveDateTime, wind: f64, solar: f64) -> HourlyRecord {
    HourlyRecord {
        timestamp,
        wind: Energy(wind),
        solar: Energy(solar),
    }
}

/// Constant generation for every hour of a calendar year
pub fn full_year_generation(year: i32, wind: f64, solar: f64) -> Vec<HourlyRecord> {
    iter::successors(Some(hour(year, 1, 1, 0)), |timestamp| {
        Some(*timestamp + TimeDelta::hours(1))
    })
    .take_while(|timestamp| timestamp.year() == year)
    .map(|timestamp| hourly_record(timestamp, wind, solar))
    .collect()
}

/// The annual results for a year, with the figures the cash flow projection depends on
pub fn annual_aggregate(
    year: i32,
    hydrogen: f64,
    electricity_cost: f64,
    water_cost: f64,
) -> AnnualAggregate {
    AnnualAggregate {
        year,
        hours_covered: 8760,
        total_hydrogen: Mass(hydrogen),
        total_water: Volume(hydrogen * 3.78),
        mean_hourly_hydrogen: Mass(hydrogen / 8760.0),
        electricity_cost: Money(electricity_cost),
        water_cost: Money(water_cost),
        capacity_factor_wind: Dimensionless(0.3),
        capacity_factor_solar: Dimensionless(0.2),
        capacity_factor_combined: Dimensionless(0.26),
        hours_with_production: 8000,
        electrolyzer_utilisation: Dimensionless(0.82),
        priced_hours: 8760,
    }
}

#[fixture]
pub fn conversion_ratios() -> ConversionRatios {
    ConversionRatios {
        electricity_per_kg: EnergyPerMass(55.5),
        water_per_kg: VolumePerMass(3.78),
        production_loss: Dimensionless(0.1),
    }
}

#[fixture]
pub fn rated_capacity() -> RatedCapacity {
    RatedCapacity {
        wind: Power(1500.0),
        solar: Power(1000.0),
    }
}

#[fixture]
pub fn financial_parameters() -> FinancialParameters {
    FinancialParameters {
        project_lifetime: 20,
        plant_size: Power(1000.0),
        capex_per_kw: MoneyPerPower(2000.0),
        fixed_opex_per_kw: MoneyPerPower(200.0),
        variable_opex_per_kg: MoneyPerMass(0.05),
        sale_price: MoneyPerMass(7.0),
        income_tax_rate: Dimensionless(0.21),
        ptc_per_kg: MoneyPerMass(3.0),
    }
}

/// The contents of a minimal `project.toml` for the given state
pub fn project_toml(state: &str) -> String {
    format!(
        "city = \"Testville\"\n\
         state = \"{state}\"\n\
         wind_capacity_kw = 1500\n\
         solar_capacity_kw = 1000\n"
    )
}

#[fixture]
pub fn project_assumptions() -> ProjectAssumptions {
    toml::from_str(&project_toml("TX")).unwrap()
}

/// Write a complete project to `dir_path`: one year of generation at a combined capacity factor
/// of 0.3 and a flat price split across two zones
pub fn write_project(dir_path: &Path, state: &str) {
    fs::write(dir_path.join(PROJECT_FILE_NAME), project_toml(state)).unwrap();

    let generation = full_year_generation(2021, 500.0, 250.0);
    let mut generation_csv = format!("{GENERATION_INDEX},{WIND_GENERATION},{SOLAR_GENERATION}\n");
    let mut price_csv = format!("{PRICE_INDEX},zone_1_lmp[$/MWh],zone_2_lmp[$/MWh]\n");
    for record in &generation {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S");
        generation_csv += &format!("{timestamp},{},{}\n", record.wind, record.solar);
        price_csv += &format!("{timestamp},15.0,25.0\n");
    }
    fs::write(dir_path.join(GENERATION_FILE_NAME), generation_csv).unwrap();
    fs::write(dir_path.join(PRICE_FILE_NAME), price_csv).unwrap();
}
