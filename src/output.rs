//! The module responsible for writing output data to disk.
use crate::input::Project;
use crate::simulation::aggregate::AnnualAggregate;
use crate::simulation::cash_flow::CashFlowYear;
use crate::simulation::{PricedHour, SimulationResults};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which project-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "h2sim_results";

/// The output file name for annual results
const ANNUAL_SUMMARY_FILE_NAME: &str = "annual_summary.csv";

/// The output file name for projected cash flows
const CASH_FLOWS_FILE_NAME: &str = "cash_flows.csv";

/// The output file name for the headline results
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// The output file name for the merged hourly table
const DEBUG_HOURLY_FILE_NAME: &str = "debug_hourly.csv";

/// Get the default output directory for the project in the specified directory
pub fn get_output_dir(project_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let project_dir = project_dir
        .canonicalize()
        .context("Could not resolve path to project")?;

    let project_name = project_dir
        .file_name()
        .context("Project cannot be in root folder")?
        .to_str()
        .context("Invalid chars in project dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, project_name].iter().collect())
}

/// Create a new output directory.
///
/// If the directory already exists and is not empty, it is only replaced if `allow_overwrite` is
/// true.
///
/// # Returns
///
/// True if an existing directory was overwritten, false otherwise.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the debug hourly CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct HourlyRow {
    time: String,
    #[serde(rename = "electricity_wind[kwh]")]
    wind: f64,
    #[serde(rename = "electricity_solar_pv[kwh]")]
    solar: f64,
    #[serde(rename = "electricity_total[kwh]")]
    total: f64,
    #[serde(rename = "price[$/MWh]")]
    price: f64,
    #[serde(rename = "hydrogen_produced[kg]")]
    hydrogen: f64,
    #[serde(rename = "water_consumed[gallons]")]
    water: f64,
    #[serde(rename = "cost_of_electricity[$]")]
    electricity_cost: f64,
}

impl HourlyRow {
    fn new(hour: &PricedHour) -> Self {
        let generation = &hour.record.generation;
        Self {
            time: generation.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            wind: generation.wind.value(),
            solar: generation.solar.value(),
            total: generation.total().value(),
            price: hour.record.price.value(),
            hydrogen: hour.production.hydrogen.value(),
            water: hour.production.water.value(),
            electricity_cost: hour.electricity_cost.value(),
        }
    }
}

/// The headline results of a run, written to `summary.toml`
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Summary {
    city: Option<String>,
    state: String,
    market_region: String,
    years_simulated: Vec<i32>,
    plant_size_kw: f64,
    default_plant_size_kw: f64,
    hydrogen_sale_price_per_kg: f64,
    capacity_factor_wind: f64,
    capacity_factor_solar: f64,
    capacity_factor_combined: f64,
    npv: f64,
    lcoh_per_kg: f64,
}

impl Summary {
    fn new(project: &Project, results: &SimulationResults) -> Self {
        let factors = &results.average_capacity_factors;
        Self {
            city: project.assumptions.city.clone(),
            state: project.assumptions.state.clone(),
            market_region: project.region.to_string(),
            years_simulated: results.annual.iter().map(|annual| annual.year).collect(),
            plant_size_kw: results.plant_size.value(),
            default_plant_size_kw: results.default_plant_size.value(),
            hydrogen_sale_price_per_kg: results.sale_price.value(),
            capacity_factor_wind: factors.wind.value(),
            capacity_factor_solar: factors.solar.value(),
            capacity_factor_combined: factors.combined.value(),
            npv: results.npv.value(),
            lcoh_per_kg: results.lcoh.value(),
        }
    }
}

/// Write the headline results to `summary.toml` in the specified folder
pub fn write_summary(
    output_path: &Path,
    project: &Project,
    results: &SimulationResults,
) -> Result<()> {
    let summary = Summary::new(project, results);
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&file_path, toml::to_string(&summary)?)?;

    Ok(())
}

/// An object for writing simulation results to CSV files
pub struct DataWriter {
    annual_writer: csv::Writer<File>,
    cash_flows_writer: csv::Writer<File>,
    debug_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include the hourly table for debugging
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            Some(new_writer(DEBUG_HOURLY_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            annual_writer: new_writer(ANNUAL_SUMMARY_FILE_NAME)?,
            cash_flows_writer: new_writer(CASH_FLOWS_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write annual results to a CSV file
    pub fn write_annual(&mut self, annual: &[AnnualAggregate]) -> Result<()> {
        for row in annual {
            self.annual_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write projected cash flows to a CSV file
    pub fn write_cash_flows(&mut self, cash_flows: &[CashFlowYear]) -> Result<()> {
        for row in cash_flows {
            self.cash_flows_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the merged hourly table to a CSV file, if debug output is enabled
    pub fn write_debug_info(&mut self, hours: &[PricedHour]) -> Result<()> {
        if let Some(wtr) = &mut self.debug_writer {
            for hour in hours {
                wtr.serialize(HourlyRow::new(hour))?;
            }
        }

        Ok(())
    }

    /// Write all results of a run
    pub fn write_results(&mut self, results: &SimulationResults) -> Result<()> {
        self.write_annual(&results.annual)?;
        self.write_cash_flows(&results.cash_flows)?;
        self.write_debug_info(&results.priced_hours)?;

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.annual_writer.flush()?;
        self.cash_flows_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
