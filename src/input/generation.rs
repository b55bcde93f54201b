//! Code for reading the hourly generation sample from a CSV file.
use super::{find_column, input_err_msg, is_sorted_and_unique, open_csv, parse_timestamp};
use crate::columns::{SOLAR_GENERATION, WIND_GENERATION};
use crate::timeseries::{GenerationSeries, HourlyRecord};
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use log::info;
use std::path::Path;

/// The name of the file containing the generation sample
pub const GENERATION_FILE_NAME: &str = "generation.csv";

/// Parse a generation value, which must be a finite number
fn parse_generation(value: &str, column: &str) -> Result<Energy> {
    let value: f64 = value
        .parse()
        .with_context(|| format!("Invalid value for {column}: \"{value}\""))?;
    ensure!(
        value.is_finite(),
        "Value for {column} must be finite, got {value}"
    );

    Ok(Energy(value))
}

/// Read the generation sample from the specified file.
///
/// The first column holds the timestamp for each hour and its header is used as the name of the
/// series' index. Records are returned in time order.
fn read_generation_from_file(file_path: &Path) -> Result<GenerationSeries> {
    let (mut reader, headers) = open_csv(file_path)?;
    let index_name = headers[0].to_string();
    let wind_idx = find_column(&headers, WIND_GENERATION)?;
    let solar_idx = find_column(&headers, SOLAR_GENERATION)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let parse_row = || -> Result<HourlyRecord> {
            Ok(HourlyRecord {
                timestamp: parse_timestamp(&record[0])?,
                wind: parse_generation(&record[wind_idx], WIND_GENERATION)?,
                solar: parse_generation(&record[solar_idx], SOLAR_GENERATION)?,
            })
        };
        // Row numbers are 1-based and the header is row 1
        records.push(parse_row().with_context(|| format!("Invalid data on row {}", row + 2))?);
    }
    ensure!(!records.is_empty(), "Generation file cannot be empty");

    records.sort_by_key(|record| record.timestamp);
    ensure!(
        is_sorted_and_unique(records.iter().map(|record| record.timestamp)),
        "Generation file contains duplicate timestamps"
    );

    Ok(GenerationSeries::new(index_name, records))
}

/// Read the generation sample for a project.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project files
pub fn read_generation(project_dir: &Path) -> Result<GenerationSeries> {
    let file_path = project_dir.join(GENERATION_FILE_NAME);
    let generation =
        read_generation_from_file(&file_path).with_context(|| input_err_msg(&file_path))?;
    info!(
        "Read {} hours of generation data from {}",
        generation.len(),
        file_path.display()
    );

    Ok(generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::GENERATION_INDEX;
    use crate::fixture::{assert_error, hour};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_generation_file(dir_path: &Path, contents: &str) {
        let mut file = File::create(dir_path.join(GENERATION_FILE_NAME)).unwrap();
        write!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_read_generation() {
        let dir = tempdir().unwrap();
        write_generation_file(
            dir.path(),
            "time,electricity_solar_pv[kw],electricity_wind[kw],temperature\n\
             2021-01-01 01:00:00,0.0,120.5,3.1\n\
             2021-01-01 00:00:00,1.5,100.0,3.0\n",
        );

        let generation = read_generation(dir.path()).unwrap();
        assert_eq!(generation.index_name, GENERATION_INDEX);
        assert_eq!(
            generation.records,
            [
                HourlyRecord {
                    timestamp: hour(2021, 1, 1, 0),
                    wind: Energy(100.0),
                    solar: Energy(1.5),
                },
                HourlyRecord {
                    timestamp: hour(2021, 1, 1, 1),
                    wind: Energy(120.5),
                    solar: Energy(0.0),
                },
            ]
        );
    }

    #[test]
    fn test_read_generation_keeps_index_name() {
        let dir = tempdir().unwrap();
        write_generation_file(
            dir.path(),
            "datetime,electricity_wind[kw],electricity_solar_pv[kw]\n2021-01-01 00:00,1,2\n",
        );

        let generation = read_generation(dir.path()).unwrap();
        assert_eq!(generation.index_name, "datetime");
    }

    #[test]
    fn test_read_generation_missing_column() {
        let dir = tempdir().unwrap();
        write_generation_file(
            dir.path(),
            "time,electricity_wind[kw]\n2021-01-01 00:00,1\n",
        );
        assert_error!(
            read_generation_from_file(&dir.path().join(GENERATION_FILE_NAME)),
            "Missing column: electricity_solar_pv[kw]"
        );
    }

    #[test]
    fn test_read_generation_duplicate_timestamps() {
        let dir = tempdir().unwrap();
        write_generation_file(
            dir.path(),
            "time,electricity_wind[kw],electricity_solar_pv[kw]\n\
             2021-01-01 00:00,1,2\n\
             2021-01-01 00:00,3,4\n",
        );
        assert_error!(
            read_generation_from_file(&dir.path().join(GENERATION_FILE_NAME)),
            "Generation file contains duplicate timestamps"
        );
    }

    #[test]
    fn test_read_generation_empty() {
        let dir = tempdir().unwrap();
        write_generation_file(dir.path(), "time,electricity_wind[kw],electricity_solar_pv[kw]\n");
        assert_error!(
            read_generation_from_file(&dir.path().join(GENERATION_FILE_NAME)),
            "Generation file cannot be empty"
        );
    }

    #[test]
    fn test_read_generation_bad_value() {
        let dir = tempdir().unwrap();
        write_generation_file(
            dir.path(),
            "time,electricity_wind[kw],electricity_solar_pv[kw]\n2021-01-01 00:00,windy,2\n",
        );
        assert_error!(
            read_generation_from_file(&dir.path().join(GENERATION_FILE_NAME)),
            "Invalid data on row 2"
        );
    }
}
