//! Capacity factors of the wind and solar generators.
use super::aggregate::AnnualProduction;
use crate::timeseries::HourlyRecord;
use crate::units::{Dimensionless, Energy, Power};
use indexmap::IndexMap;
use serde::Serialize;

/// Rated capacities of the generators feeding the electrolyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedCapacity {
    /// Wind capacity
    pub wind: Power,
    /// Solar PV capacity
    pub solar: Power,
}

impl RatedCapacity {
    /// Combined capacity of wind and solar
    pub fn total(&self) -> Power {
        self.wind + self.solar
    }
}

/// Ratio of actual to maximum possible generation
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityFactors {
    /// Wind capacity factor
    pub wind: Dimensionless,
    /// Solar PV capacity factor
    pub solar: Dimensionless,
    /// Combined capacity factor
    pub combined: Dimensionless,
}

/// Capacity factor for `generated` energy from a generator of `capacity` over `hours`.
///
/// A generator with no capacity has a capacity factor of zero.
fn capacity_factor(generated: Energy, capacity: Power, hours: u32) -> Dimensionless {
    let maximum = capacity.over_hours(hours as f64);
    if maximum == Energy(0.0) {
        return Dimensionless(0.0);
    }

    generated / maximum
}

/// Calculate capacity factors for each of the retained years.
///
/// The denominator uses the hours of data covered in each year, not the calendar length of the
/// year. Hours belonging to years not in `years` are ignored.
pub fn annual_capacity_factors(
    generation: &[HourlyRecord],
    years: &[AnnualProduction],
    capacity: &RatedCapacity,
) -> IndexMap<i32, CapacityFactors> {
    let mut totals: IndexMap<i32, (Energy, Energy)> = years
        .iter()
        .map(|annual| (annual.year, (Energy(0.0), Energy(0.0))))
        .collect();
    for record in generation {
        if let Some((wind, solar)) = totals.get_mut(&record.year()) {
            *wind += record.wind;
            *solar += record.solar;
        }
    }

    years
        .iter()
        .map(|annual| {
            let (wind, solar) = totals[&annual.year];
            let hours = annual.hours_covered;
            let factors = CapacityFactors {
                wind: capacity_factor(wind, capacity.wind, hours),
                solar: capacity_factor(solar, capacity.solar, hours),
                combined: capacity_factor(wind + solar, capacity.total(), hours),
            };
            (annual.year, factors)
        })
        .collect()
}

/// The mean of each capacity factor across years
pub fn average_capacity_factors(annual: &IndexMap<i32, CapacityFactors>) -> CapacityFactors {
    if annual.is_empty() {
        return CapacityFactors::default();
    }

    let count = Dimensionless(annual.len() as f64);
    CapacityFactors {
        wind: annual.values().map(|cf| cf.wind).sum::<Dimensionless>() / count,
        solar: annual.values().map(|cf| cf.solar).sum::<Dimensionless>() / count,
        combined: annual.values().map(|cf| cf.combined).sum::<Dimensionless>() / count,
    }
}
