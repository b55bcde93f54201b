//! Defines the `ProjectAssumptions` struct, which represents the contents of `project.toml`.
use crate::error::InvalidUserInput;
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use crate::simulation::capacity_factor::RatedCapacity;
use crate::simulation::cash_flow::FinancialParameters;
use crate::simulation::conversion::ConversionRatios;
use crate::units::{
    Dimensionless, EnergyPerMass, MoneyPerMass, MoneyPerPower, MoneyPerVolume, Power,
    VolumePerMass,
};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The name of the file containing a project's assumptions
pub const PROJECT_FILE_NAME: &str = "project.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

// Defaults are the NREL H2A-Lite assumptions
define_unit_param_default!(default_electricity_input, EnergyPerMass, 55.5);
define_unit_param_default!(default_water_input, VolumePerMass, 3.78);
define_unit_param_default!(default_production_loss, Dimensionless, 0.1);
define_unit_param_default!(default_energy_density, EnergyPerMass, 33.33);
define_unit_param_default!(default_water_cost, MoneyPerVolume, 0.01);
define_unit_param_default!(default_discount_rate, Dimensionless, 0.1);
define_unit_param_default!(default_income_tax_rate, Dimensionless, 0.21);
define_unit_param_default!(default_ptc, MoneyPerMass, 3.0);
define_unit_param_default!(default_capex, MoneyPerPower, 2000.0);
define_unit_param_default!(default_fixed_opex, MoneyPerPower, 200.0);
define_unit_param_default!(default_variable_opex, MoneyPerMass, 0.05);
define_param_default!(default_project_lifetime, u32, 20);

/// A value entered by the user, which may or may not be a valid number.
///
/// Values which cannot be used are replaced by a default rather than rejected, so they are kept
/// as entered until they are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserValue {
    /// A numeric value
    Number(f64),
    /// A value given as text
    Text(String),
}

impl UserValue {
    /// Interpret the value as a number.
    ///
    /// Text is parsed after trimming whitespace. Range checks are left to the caller.
    pub fn to_number(&self, field: &'static str) -> Result<f64, InvalidUserInput> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| InvalidUserInput::NotANumber {
                    field,
                    raw: raw.clone(),
                }),
        }
    }
}

impl From<String> for UserValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Represents the contents of the entire project file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectAssumptions {
    /// Name of the city the project is located in (informational only)
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter abbreviation of the US state the project is located in
    pub state: String,
    /// Rated capacity of the wind generator
    #[serde(rename = "wind_capacity_kw")]
    pub wind_capacity: Power,
    /// Rated capacity of the solar PV generator
    #[serde(rename = "solar_capacity_kw")]
    pub solar_capacity: Power,
    /// Electricity consumed per kg of hydrogen produced
    #[serde(default = "default_electricity_input")]
    #[serde(rename = "electricity_input_per_kg_hydrogen")]
    pub electricity_per_kg: EnergyPerMass,
    /// Water consumed per kg of hydrogen produced
    #[serde(default = "default_water_input")]
    #[serde(rename = "water_input_per_kg_hydrogen")]
    pub water_per_kg: VolumePerMass,
    /// Proportion of potential hydrogen production which is lost
    #[serde(default = "default_production_loss")]
    #[serde(rename = "hydrogen_production_loss")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub production_loss: Dimensionless,
    /// Energy content of hydrogen (lower heating value)
    #[serde(default = "default_energy_density")]
    pub hydrogen_energy_density: EnergyPerMass,
    /// Cost of water
    #[serde(default = "default_water_cost")]
    pub water_cost_per_gallon: MoneyPerVolume,
    /// Number of operating years
    #[serde(default = "default_project_lifetime")]
    pub project_lifetime: u32,
    /// Discount rate for NPV and LCOH
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Rate of tax applied to sales revenue
    #[serde(default = "default_income_tax_rate")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub income_tax_rate: Dimensionless,
    /// Production tax credit per kg of hydrogen
    #[serde(default = "default_ptc")]
    #[serde(rename = "hydrogen_ptc_per_kg")]
    pub ptc_per_kg: MoneyPerMass,
    /// Capital cost per kW of electrolyzer
    #[serde(default = "default_capex")]
    pub capex_per_kw: MoneyPerPower,
    /// Fixed operating cost per kW of electrolyzer per year
    #[serde(default = "default_fixed_opex")]
    pub fixed_opex_per_kw: MoneyPerPower,
    /// Variable operating cost per kg of hydrogen
    #[serde(default = "default_variable_opex")]
    pub variable_opex_per_kg: MoneyPerMass,
    /// Electrolyzer plant size in kW. A default is calculated if absent or invalid.
    #[serde(default)]
    pub plant_size_kw: Option<UserValue>,
    /// Sale price of hydrogen in $/kg. A default is used if absent or invalid.
    #[serde(default)]
    pub hydrogen_sale_price_per_kg: Option<UserValue>,
}

/// Check that a rated capacity is valid
fn check_capacity(name: &str, capacity: Power) -> Result<()> {
    ensure!(
        capacity.is_finite() && capacity >= Power(0.0),
        "{name} must be a finite, non-negative number"
    );

    Ok(())
}

/// Check that a cost or rate is finite and non-negative
fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite, non-negative number"
    );

    Ok(())
}

/// Check that a conversion ratio is finite and greater than zero
fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

impl ProjectAssumptions {
    /// Read a project file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Folder containing project files
    ///
    /// # Returns
    ///
    /// The file contents as a [`ProjectAssumptions`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(project_dir: P) -> Result<ProjectAssumptions> {
        let file_path = project_dir.as_ref().join(PROJECT_FILE_NAME);
        let assumptions: ProjectAssumptions = read_toml(&file_path)?;

        assumptions
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(assumptions)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.state.trim().is_empty(), "state cannot be empty");

        check_capacity("wind_capacity_kw", self.wind_capacity)?;
        check_capacity("solar_capacity_kw", self.solar_capacity)?;
        ensure!(
            self.rated_capacity().total() > Power(0.0),
            "The total wind + solar PV capacity must be greater than zero"
        );

        check_positive(
            "electricity_input_per_kg_hydrogen",
            self.electricity_per_kg.value(),
        )?;
        check_non_negative("water_input_per_kg_hydrogen", self.water_per_kg.value())?;
        check_positive(
            "hydrogen_energy_density",
            self.hydrogen_energy_density.value(),
        )?;
        check_non_negative("water_cost_per_gallon", self.water_cost_per_gallon.value())?;

        // production loss and income tax rate already validated with deserialise_proportion

        ensure!(self.project_lifetime > 0, "project_lifetime cannot be zero");
        check_non_negative("discount_rate", self.discount_rate.value())?;
        check_non_negative("hydrogen_ptc_per_kg", self.ptc_per_kg.value())?;
        check_non_negative("capex_per_kw", self.capex_per_kw.value())?;
        check_non_negative("fixed_opex_per_kw", self.fixed_opex_per_kw.value())?;
        check_non_negative("variable_opex_per_kg", self.variable_opex_per_kg.value())?;

        Ok(())
    }

    /// Replace the user-supplied plant size and sale price, where given
    pub fn with_overrides(
        mut self,
        plant_size: Option<UserValue>,
        sale_price: Option<UserValue>,
    ) -> Self {
        if plant_size.is_some() {
            self.plant_size_kw = plant_size;
        }
        if sale_price.is_some() {
            self.hydrogen_sale_price_per_kg = sale_price;
        }

        self
    }

    /// The electrolyzer's conversion ratios
    pub fn conversion_ratios(&self) -> ConversionRatios {
        ConversionRatios {
            electricity_per_kg: self.electricity_per_kg,
            water_per_kg: self.water_per_kg,
            production_loss: self.production_loss,
        }
    }

    /// The rated capacities of the generators
    pub fn rated_capacity(&self) -> RatedCapacity {
        RatedCapacity {
            wind: self.wind_capacity,
            solar: self.solar_capacity,
        }
    }

    /// The financial parameters for a plant of the given size selling at the given price
    pub fn financial_parameters(
        &self,
        plant_size: Power,
        sale_price: MoneyPerMass,
    ) -> FinancialParameters {
        FinancialParameters {
            project_lifetime: self.project_lifetime,
            plant_size,
            capex_per_kw: self.capex_per_kw,
            fixed_opex_per_kw: self.fixed_opex_per_kw,
            variable_opex_per_kg: self.variable_opex_per_kg,
            sale_price,
            income_tax_rate: self.income_tax_rate,
            ptc_per_kg: self.ptc_per_kg,
        }
    }
}
