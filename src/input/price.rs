//! Code for reading wholesale electricity prices from a CSV file.
//!
//! Price files hold locational marginal prices (LMPs) for one or more hubs or zones of a market
//! region, possibly at sub-hourly resolution. They are reduced to a single representative price
//! per hour.
use super::{input_err_msg, open_csv, parse_optional_f64, parse_timestamp};
use crate::columns::{LMP_SUFFIX, average_lmp_column};
use crate::region::MarketRegion;
use crate::timeseries::{PriceRecord, PriceSeries};
use crate::units::MoneyPerMegawattHour;
use anyhow::{Context, Result, ensure};
use chrono::{Datelike, DurationRound, NaiveDate, NaiveDateTime, TimeDelta};
use itertools::Itertools;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// The name of the file containing electricity prices
pub const PRICE_FILE_NAME: &str = "prices.csv";

/// Find the indices of the columns to take prices from.
///
/// If the region's pre-averaged column is present, only that is used. Otherwise every LMP column
/// is used and the values are averaged.
fn price_columns(headers: &csv::StringRecord, region: MarketRegion) -> Result<Vec<usize>> {
    let average_column = average_lmp_column(region.column_prefix());
    if let Some(idx) = headers.iter().position(|header| header == average_column) {
        return Ok(vec![idx]);
    }

    let columns = headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, header)| header.ends_with(LMP_SUFFIX))
        .map(|(idx, _)| idx)
        .collect_vec();
    ensure!(
        !columns.is_empty(),
        "No price columns found (expected headers ending in \"{LMP_SUFFIX}\")"
    );

    Ok(columns)
}

/// The mean of the prices available for one interval, or `None` if there are none
fn mean_price(record: &csv::StringRecord, columns: &[usize]) -> Result<Option<f64>> {
    let mut sum = 0.0;
    let mut count = 0;
    for &idx in columns {
        if let Some(value) = parse_optional_f64(&record[idx])? {
            sum += value;
            count += 1;
        }
    }

    Ok((count > 0).then(|| sum / count as f64))
}

/// Number of hours in a calendar year
fn hours_in_year(year: i32) -> u32 {
    let is_leap_year = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
    if is_leap_year { 366 * 24 } else { 365 * 24 }
}

/// Log the share of each calendar year for which no price is available
fn log_missing_hours(records: &[PriceRecord]) {
    for (year, hours) in &records.iter().chunk_by(|record| record.timestamp.year()) {
        let expected = hours_in_year(year);
        let present = hours.count() as u32;
        let missing = 100.0 * f64::from(expected.saturating_sub(present)) / f64::from(expected);
        info!("Year {year}: {missing:.2}% of hours have no electricity price");
    }
}

/// Read prices from the specified file, resampled to hourly means
fn read_prices_from_file(file_path: &Path, region: MarketRegion) -> Result<PriceSeries> {
    let (mut reader, headers) = open_csv(file_path)?;
    let index_name = headers[0].to_string();
    let columns = price_columns(&headers, region)?;

    // Keyed by the start of the hour
    let mut hourly: BTreeMap<NaiveDateTime, (f64, u32)> = BTreeMap::new();
    let mut dropped = 0;
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let parse_row = || -> Result<Option<(NaiveDateTime, f64)>> {
            let timestamp = parse_timestamp(&record[0])?;
            let hour = timestamp.duration_trunc(TimeDelta::hours(1))?;
            Ok(mean_price(&record, &columns)?.map(|price| (hour, price)))
        };
        match parse_row().with_context(|| format!("Invalid data on row {}", row + 2))? {
            Some((hour, price)) => {
                let (sum, count) = hourly.entry(hour).or_default();
                *sum += price;
                *count += 1;
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {dropped} price intervals with no price data");
    }

    let records = hourly
        .into_iter()
        .map(|(timestamp, (sum, count))| PriceRecord {
            timestamp,
            price: MoneyPerMegawattHour(sum / f64::from(count)),
        })
        .collect_vec();
    ensure!(!records.is_empty(), "Price file contains no prices");

    log_missing_hours(&records);

    Ok(PriceSeries::new(index_name, records))
}

/// Read the electricity prices for a project.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project files
/// * `region` - The market region the prices are for
pub fn read_prices(project_dir: &Path, region: MarketRegion) -> Result<PriceSeries> {
    let file_path = project_dir.join(PRICE_FILE_NAME);
    let prices =
        read_prices_from_file(&file_path, region).with_context(|| input_err_msg(&file_path))?;
    info!(
        "Read {} hours of {region} prices from {}",
        prices.len(),
        file_path.display()
    );

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::PRICE_INDEX;
    use crate::fixture::{assert_error, hour};
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    fn write_price_file(contents: &str) -> TempDir {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join(PRICE_FILE_NAME)).unwrap();
        write!(file, "{contents}").unwrap();
        dir
    }

    fn prices(series: &PriceSeries) -> Vec<(NaiveDateTime, f64)> {
        series
            .records
            .iter()
            .map(|record| (record.timestamp, record.price.value()))
            .collect()
    }

    #[test]
    fn test_read_prices_averages_zones() {
        let dir = write_price_file(
            "local_time_int_start,zone_a_lmp[$/MWh],zone_b_lmp[$/MWh],load[MW]\n\
             2021-01-01 00:00:00,10.0,20.0,5000\n\
             2021-01-01 01:00:00,30.0,,5000\n",
        );

        let series = read_prices(dir.path(), MarketRegion::Ercot).unwrap();
        assert_eq!(series.index_name, PRICE_INDEX);
        assert_eq!(
            prices(&series),
            [(hour(2021, 1, 1, 0), 15.0), (hour(2021, 1, 1, 1), 30.0)]
        );
    }

    #[test]
    fn test_read_prices_prefers_average_column() {
        let dir = write_price_file(
            "local_time_int_start,pjm_average_lmp[$/MWh],east_lmp[$/MWh]\n\
             2021-01-01 00:00,25.0,100.0\n",
        );

        let series = read_prices(dir.path(), MarketRegion::Pjm).unwrap();
        assert_eq!(prices(&series), [(hour(2021, 1, 1, 0), 25.0)]);
    }

    #[test]
    fn test_read_prices_resamples_to_hourly() {
        let dir = write_price_file(
            "local_time_int_start,hub_lmp[$/MWh]\n\
             2021-01-01 00:00,10.0\n\
             2021-01-01 00:15,20.0\n\
             2021-01-01 00:30,30.0\n\
             2021-01-01 00:45,40.0\n\
             2021-01-01 01:00,-5.0\n",
        );

        let series = read_prices(dir.path(), MarketRegion::Caiso).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.records[0].price, MoneyPerMegawattHour(25.0));
        assert_eq!(series.records[1].price, MoneyPerMegawattHour(-5.0));
    }

    #[test]
    fn test_read_prices_drops_empty_rows() {
        let dir = write_price_file(
            "local_time_int_start,hub_lmp[$/MWh]\n\
             2021-01-01 00:00,\n\
             2021-01-01 01:00,12.0\n",
        );

        let series = read_prices(dir.path(), MarketRegion::Miso).unwrap();
        assert_eq!(prices(&series), [(hour(2021, 1, 1, 1), 12.0)]);
    }

    #[test]
    fn test_read_prices_keeps_index_name() {
        let dir = write_price_file("timestamp,hub_lmp[$/MWh]\n2021-01-01 00:00,12.0\n");
        let series = read_prices(dir.path(), MarketRegion::Spp).unwrap();
        assert_eq!(series.index_name, "timestamp");
    }

    #[rstest]
    #[case(
        "local_time_int_start,load[MW]\n2021-01-01 00:00,5000\n",
        "No price columns found (expected headers ending in \"lmp[$/MWh]\")"
    )]
    #[case(
        "local_time_int_start,hub_lmp[$/MWh]\n2021-01-01 00:00,\n",
        "Price file contains no prices"
    )]
    #[case(
        "local_time_int_start,hub_lmp[$/MWh]\n2021-01-01 00:00,cheap\n",
        "Invalid data on row 2"
    )]
    fn test_read_prices_invalid(#[case] contents: &str, #[case] msg: &str) {
        let dir = write_price_file(contents);
        assert_error!(
            read_prices_from_file(&dir.path().join(PRICE_FILE_NAME), MarketRegion::Nyiso),
            msg
        );
    }

    #[rstest]
    #[case(2021, 8760)]
    #[case(2020, 8784)]
    #[case(1900, 8760)]
    fn test_hours_in_year(#[case] year: i32, #[case] expected: u32) {
        assert_eq!(hours_in_year(year), expected);
    }
}
