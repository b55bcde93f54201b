//! Common routines for handling input data.
use crate::region::{MarketRegion, price_region_for_state};
use crate::timeseries::{GenerationSeries, PriceSeries};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDateTime;
use itertools::Itertools;
use log::info;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs::{self, File};
use std::path::Path;

pub mod assumptions;
use assumptions::ProjectAssumptions;
pub mod generation;
use generation::read_generation;
pub mod price;
use price::read_prices;

/// Formats accepted for timestamps in input files
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A project read from disk, ready to be simulated
#[derive(Debug)]
pub struct Project {
    /// The project's assumptions
    pub assumptions: ProjectAssumptions,
    /// The market region electricity is priced in
    pub region: MarketRegion,
    /// Hourly generation sample
    pub generation: GenerationSeries,
    /// Hourly electricity prices
    pub prices: PriceSeries,
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Open a CSV file, returning the reader together with the file's header row.
///
/// The headers are trimmed of surrounding whitespace.
pub fn open_csv(file_path: &Path) -> Result<(csv::Reader<File>, csv::StringRecord)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)?;
    let headers = reader.headers()?.clone();
    ensure!(!headers.is_empty(), "CSV file has no header row");

    Ok((reader, headers))
}

/// Find the index of the column with the given header
pub fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .with_context(|| format!("Missing column: {name}"))
}

/// Parse a timestamp in one of the accepted formats
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .with_context(|| format!("Invalid timestamp: \"{value}\""))
}

/// Parse an optional numeric field, treating an empty cell as missing
pub fn parse_optional_f64(value: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }

    let value: f64 = value
        .parse()
        .with_context(|| format!("Invalid number: \"{value}\""))?;
    ensure!(value.is_finite(), "Value must be finite, got {value}");

    Ok(Some(value))
}

/// Read a [`Dimensionless`], checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value must be between 0 and 1"))?;
    }

    Ok(Dimensionless(value))
}

/// Check whether an iterator contains values that are sorted and unique
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// Resolve the market region for the project's state.
///
/// Fails if the state is unknown, lies outside an organised market or the market has no price data.
fn resolve_region(assumptions: &ProjectAssumptions) -> Result<MarketRegion> {
    let region = price_region_for_state(&assumptions.state)?;
    info!("{} is in the {region} market region", assumptions.state);

    Ok(region)
}

/// Read a project from the specified directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing the project files
pub fn load_project<P: AsRef<Path>>(project_dir: P) -> Result<Project> {
    let project_dir = project_dir.as_ref();
    let assumptions = ProjectAssumptions::from_path(project_dir)?;
    let region = resolve_region(&assumptions)?;
    let generation = read_generation(project_dir)?;
    let prices = read_prices(project_dir, region)?;

    Ok(Project {
        assumptions,
        region,
        generation,
        prices,
    })
}
