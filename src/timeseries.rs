//! Hourly generation and price series, and the code for aligning them on a shared timestamp.
use crate::columns::{GENERATION_INDEX, PRICE_INDEX};
use crate::error::{MissingKey, SeriesSide, SimulationError};
use crate::units::{Energy, MoneyPerMegawattHour};
use chrono::{Datelike, NaiveDateTime};
use log::debug;
use std::collections::HashMap;

/// Renewable generation for one hour at the project location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    /// Start of the hour (local time)
    pub timestamp: NaiveDateTime,
    /// Wind generation in this hour
    pub wind: Energy,
    /// Solar PV generation in this hour
    pub solar: Energy,
}

impl HourlyRecord {
    /// Total renewable generation in this hour
    pub fn total(&self) -> Energy {
        self.wind + self.solar
    }

    /// The calendar year this hour falls in
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }
}

/// The representative market price for one hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord {
    /// Start of the pricing interval (local time)
    pub timestamp: NaiveDateTime,
    /// Price averaged over the region's hubs/zones
    pub price: MoneyPerMegawattHour,
}

/// An hour of generation together with the market price for that hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedHourlyRecord {
    /// The generation in this hour
    pub generation: HourlyRecord,
    /// The price of electricity in this hour
    pub price: MoneyPerMegawattHour,
}

/// A series of records indexed by timestamp, sorted in time order.
///
/// `index_name` is the name of the timestamp column the series was read from; it is checked
/// against the expected key before two series are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    /// The name of the timestamp index
    pub index_name: String,
    /// The records, in time order
    pub records: Vec<T>,
}

impl<T> TimeSeries<T> {
    /// Create a new series
    pub fn new(index_name: impl Into<String>, records: Vec<T>) -> Self {
        Self {
            index_name: index_name.into(),
            records,
        }
    }

    /// Whether the series contains any records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// The hourly generation sample for a location
pub type GenerationSeries = TimeSeries<HourlyRecord>;

/// The hourly price sample for a market region
pub type PriceSeries = TimeSeries<PriceRecord>;

/// Check the index names of both series against the merge contract
fn check_join_keys(
    generation: &GenerationSeries,
    prices: &PriceSeries,
) -> Result<(), SimulationError> {
    let mut missing = Vec::new();
    if generation.index_name != GENERATION_INDEX {
        missing.push(MissingKey {
            side: SeriesSide::Generation,
            expected: GENERATION_INDEX,
            found: generation.index_name.clone(),
        });
    }
    if prices.index_name != PRICE_INDEX {
        missing.push(MissingKey {
            side: SeriesSide::Price,
            expected: PRICE_INDEX,
            found: prices.index_name.clone(),
        });
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SimulationError::SchemaMismatch(missing))
    }
}

/// Merge the generation and price series on exact timestamp equality.
///
/// This is an inner join: hours missing from either series are dropped, as they cannot be costed.
/// The output follows the order of the generation series.
///
/// # Returns
///
/// The merged hourly table or [`SimulationError::SchemaMismatch`] if either series is not indexed
/// by its agreed key.
pub fn merge(
    generation: &GenerationSeries,
    prices: &PriceSeries,
) -> Result<Vec<MergedHourlyRecord>, SimulationError> {
    check_join_keys(generation, prices)?;

    let price_by_hour: HashMap<_, _> = prices
        .records
        .iter()
        .map(|record| (record.timestamp, record.price))
        .collect();

    let merged: Vec<_> = generation
        .records
        .iter()
        .filter_map(|record| {
            price_by_hour
                .get(&record.timestamp)
                .map(|price| MergedHourlyRecord {
                    generation: *record,
                    price: *price,
                })
        })
        .collect();

    debug!(
        "Merged {} of {} generation hours with prices",
        merged.len(),
        generation.len()
    );

    Ok(merged)
}
