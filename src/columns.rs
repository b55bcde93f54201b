//! Canonical column and index names shared by the input readers, the engine and the output files.
//!
//! Units are carried in square brackets after the name, as in the source data files.

/// Index name for the hourly generation series
pub const GENERATION_INDEX: &str = "time";

/// Index name for the hourly price series (the start of the pricing interval, local time)
pub const PRICE_INDEX: &str = "local_time_int_start";

/// Hourly wind generation
pub const WIND_GENERATION: &str = "electricity_wind[kw]";

/// Hourly solar PV generation
pub const SOLAR_GENERATION: &str = "electricity_solar_pv[kw]";

/// Suffix shared by all locational marginal price columns
pub const LMP_SUFFIX: &str = "lmp[$/MWh]";

/// The column name holding a region's representative (averaged) price
pub fn average_lmp_column(region_prefix: &str) -> String {
    format!("{region_prefix}_average_{LMP_SUFFIX}")
}
