//! Conversion of electricity into hydrogen and water throughput by the electrolyzer.
use crate::timeseries::HourlyRecord;
use crate::units::{Dimensionless, Energy, EnergyPerMass, Mass, Volume, VolumePerMass};
use chrono::NaiveDateTime;

/// Decimal places kept for hourly hydrogen and water figures
const HOURLY_DECIMALS: i32 = 1;

/// Fixed ratios describing the electrolyzer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRatios {
    /// Electricity consumed per kg of hydrogen produced
    pub electricity_per_kg: EnergyPerMass,
    /// Water consumed per kg of hydrogen produced
    pub water_per_kg: VolumePerMass,
    /// Fraction of potential production lost
    pub production_loss: Dimensionless,
}

/// Hydrogen produced and water consumed in one hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyProduction {
    /// The generation which fed the electrolyzer
    pub generation: HourlyRecord,
    /// Hydrogen produced, rounded to one decimal place
    pub hydrogen: Mass,
    /// Water consumed, rounded to one decimal place
    pub water: Volume,
}

impl HourlyProduction {
    /// Start of the hour
    pub fn timestamp(&self) -> NaiveDateTime {
        self.generation.timestamp
    }
}

impl ConversionRatios {
    /// Hydrogen produced from `electricity`, before rounding
    pub fn hydrogen_from(&self, electricity: Energy) -> Mass {
        (electricity / self.electricity_per_kg) * (Dimensionless(1.0) - self.production_loss)
    }

    /// Convert one hour of generation.
    ///
    /// Rounding happens here, once, at the hourly grain. Water is derived from the rounded hydrogen
    /// figure. Zero or negative generation gives a non-producing hour, not an error.
    pub fn convert(&self, generation: &HourlyRecord) -> HourlyProduction {
        let hydrogen = self.hydrogen_from(generation.total()).round_to(HOURLY_DECIMALS);
        let water = (hydrogen * self.water_per_kg).round_to(HOURLY_DECIMALS);

        HourlyProduction {
            generation: *generation,
            hydrogen,
            water,
        }
    }

    /// Convert every hour of a generation sample
    pub fn convert_all<'a, I>(&self, generation: I) -> Vec<HourlyProduction>
    where
        I: IntoIterator<Item = &'a HourlyRecord>,
    {
        generation
            .into_iter()
            .map(|record| self.convert(record))
            .collect()
    }
}
