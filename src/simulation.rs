//! Functionality for running the techno-economic simulation.
//!
//! The stages run strictly downstream, each producing a new table: the generation and price
//! series are aligned, generation is converted into hydrogen, hourly results are aggregated into
//! years, the years are costed and projected over the project lifetime and finally the projection
//! is discounted into NPV and LCOH.
use crate::error::SimulationError;
use crate::finance::{lcoh, npv};
use crate::input::assumptions::ProjectAssumptions;
use crate::timeseries::{GenerationSeries, MergedHourlyRecord, PriceSeries, merge};
use crate::units::{Money, MoneyPerMass, Power};
use log::info;

pub mod aggregate;
use aggregate::{AnnualAggregate, aggregate_production, combine_annual_results};
pub mod capacity_factor;
use capacity_factor::{CapacityFactors, annual_capacity_factors, average_capacity_factors};
pub mod cash_flow;
use cash_flow::{CashFlowYear, project_cash_flows};
pub mod conversion;
use conversion::HourlyProduction;
pub mod cost;
use cost::{annual_costs, hourly_electricity_cost};
pub mod plant;
use plant::{default_plant_size, electrolyzer_efficiency, resolve_plant_size, resolve_sale_price};

/// One hour of the merged table with its production and electricity cost
#[derive(Debug, Clone, PartialEq)]
pub struct PricedHour {
    /// Hydrogen production in this hour
    pub production: HourlyProduction,
    /// The merged generation and price record
    pub record: MergedHourlyRecord,
    /// Cost of the electricity generated in this hour
    pub electricity_cost: Money,
}

/// Everything produced by a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    /// The electrolyzer plant size used
    pub plant_size: Power,
    /// The plant size which would have been used without a user override
    pub default_plant_size: Power,
    /// The hydrogen sale price used
    pub sale_price: MoneyPerMass,
    /// Capacity factors averaged over the retained years
    pub average_capacity_factors: CapacityFactors,
    /// Results for each retained year, in chronological order
    pub annual: Vec<AnnualAggregate>,
    /// Projected cash flows, starting with year 0
    pub cash_flows: Vec<CashFlowYear>,
    /// Net present value of the project
    pub npv: Money,
    /// Levelised cost of hydrogen
    pub lcoh: MoneyPerMass,
    /// The hours for which both generation and price data are available
    pub priced_hours: Vec<PricedHour>,
}

/// Run the simulation.
///
/// # Arguments
///
/// * `assumptions` - The project's assumptions
/// * `generation` - The hourly generation sample
/// * `prices` - Hourly electricity prices for the project's market region
pub fn run(
    assumptions: &ProjectAssumptions,
    generation: &GenerationSeries,
    prices: &PriceSeries,
) -> Result<SimulationResults, SimulationError> {
    let merged = merge(generation, prices)?;
    let ratios = assumptions.conversion_ratios();
    let capacity = assumptions.rated_capacity();

    let production = ratios.convert_all(&generation.records);
    let years = aggregate_production(&production)?;
    let capacity_factors = annual_capacity_factors(&generation.records, &years, &capacity);
    let average_capacity_factors = average_capacity_factors(&capacity_factors);
    let costs = annual_costs(
        &merged,
        &ratios,
        assumptions.water_cost_per_gallon,
        &years,
    );
    let annual = combine_annual_results(
        &years,
        &capacity_factors,
        &costs,
        ratios.production_loss,
    );

    let efficiency = electrolyzer_efficiency(
        assumptions.hydrogen_energy_density,
        ratios.electricity_per_kg,
    );
    let default_plant_size =
        default_plant_size(&capacity, average_capacity_factors.combined, efficiency);
    let plant_size = resolve_plant_size(
        assumptions.plant_size_kw.as_ref(),
        default_plant_size,
        capacity.total(),
    );
    let sale_price = resolve_sale_price(assumptions.hydrogen_sale_price_per_kg.as_ref());
    info!("Electrolyzer plant size: {plant_size} kW");
    info!("Hydrogen sale price: {sale_price} $/kg");

    let params = assumptions.financial_parameters(plant_size, sale_price);
    let cash_flows = project_cash_flows(&annual, &params);
    let npv = npv(&cash_flows, assumptions.discount_rate);
    let lcoh = lcoh(&cash_flows, assumptions.discount_rate);
    info!("NPV: ${:.2}", npv.value());
    info!("LCOH: ${:.2}/kg", lcoh.value());

    let priced_hours = merged
        .into_iter()
        .map(|record| PricedHour {
            production: ratios.convert(&record.generation),
            electricity_cost: hourly_electricity_cost(&record),
            record,
        })
        .collect();

    Ok(SimulationResults {
        plant_size,
        default_plant_size,
        sale_price,
        average_capacity_factors,
        annual,
        cash_flows,
        npv,
        lcoh,
        priced_hours,
    })
}
