//! Common code for writing a synthetic project to disk.
use chrono::{Datelike, NaiveDate, TimeDelta};
use std::fs;
use std::iter;
use std::path::Path;

// The function below gives a spurious warning about being unused because of the multiple `mod
// project` declarations in different test files, so we suppress the warning manually

/// Write a project for the given state with one year of constant hourly generation and a flat price
/// split across two pricing zones
#[allow(dead_code)]
pub fn write_project(dir_path: &Path, state: &str) {
    fs::write(
        dir_path.join("project.toml"),
        format!(
            "city = \"Testville\"\n\
             state = \"{state}\"\n\
             wind_capacity_kw = 1500\n\
             solar_capacity_kw = 1000\n"
        ),
    )
    .unwrap();

    let start = NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut generation = "time,electricity_wind[kw],electricity_solar_pv[kw]\n".to_string();
    let mut prices = "local_time_int_start,zone_1_lmp[$/MWh],zone_2_lmp[$/MWh]\n".to_string();
    for timestamp in iter::successors(Some(start), |t| Some(*t + TimeDelta::hours(1)))
        .take_while(|t| t.year() == 2021)
    {
        let timestamp = timestamp.format("%Y-%m-%d %H:%M:%S");
        generation += &format!("{timestamp},500.0,250.0\n");
        prices += &format!("{timestamp},15.0,25.0\n");
    }
    fs::write(dir_path.join("generation.csv"), generation).unwrap();
    fs::write(dir_path.join("prices.csv"), prices).unwrap();
}
