//! Projection of annual cash flows over the lifetime of the project.
//!
//! The historical sample (typically two or three years) is replayed in chronological order for the
//! first operating years. Every later year uses the mean of the historical years.
use super::aggregate::AnnualAggregate;
use crate::units::{Dimensionless, Mass, Money, MoneyPerMass, MoneyPerPower, Power};
use serde::Serialize;

/// The production tax credit is only paid in operating years up to and including this one
pub const PTC_ELIGIBLE_YEARS: u32 = 10;

/// Decimal places kept for currency figures
const CURRENCY_DECIMALS: i32 = 2;

/// Financial parameters of the project
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialParameters {
    /// Number of operating years
    pub project_lifetime: u32,
    /// Electrolyzer plant size
    pub plant_size: Power,
    /// Capital cost per kW of plant
    pub capex_per_kw: MoneyPerPower,
    /// Fixed operating cost per kW of plant per year
    pub fixed_opex_per_kw: MoneyPerPower,
    /// Variable operating cost per kg of hydrogen produced
    pub variable_opex_per_kg: MoneyPerMass,
    /// Sale price of hydrogen
    pub sale_price: MoneyPerMass,
    /// Income tax rate applied to sales revenue
    pub income_tax_rate: Dimensionless,
    /// Production tax credit per kg of hydrogen
    pub ptc_per_kg: MoneyPerMass,
}

/// Where the figures for a projected year came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowSource {
    /// Upfront capital outlay (year 0)
    Capital,
    /// Replayed from a historical year
    Historical,
    /// The mean of the historical years
    Extrapolated,
}

/// Projected cash flow for a single project year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowYear {
    /// Project year (0 = construction)
    pub year_index: u32,
    /// Origin of the year's figures
    pub source: CashFlowSource,
    /// Hydrogen produced
    #[serde(rename = "hydrogen_produced[kg]")]
    pub hydrogen: Mass,
    /// Revenue from hydrogen sales
    #[serde(rename = "revenue[$]")]
    pub revenue: Money,
    /// Operating costs of the plant
    #[serde(rename = "opex[$]")]
    pub opex: Money,
    /// Cost of electricity
    #[serde(rename = "cost_of_electricity[$]")]
    pub electricity_cost: Money,
    /// Cost of water
    #[serde(rename = "cost_of_water[$]")]
    pub water_cost: Money,
    /// Income tax on sales revenue
    #[serde(rename = "income_tax[$]")]
    pub income_tax: Money,
    /// Production tax credit
    #[serde(rename = "tax_credit[$]")]
    pub tax_credit: Money,
    /// Total cost, net of the tax credit (capex for year 0)
    #[serde(rename = "cost[$]")]
    pub cost: Money,
    /// Revenue minus cost
    #[serde(rename = "net_cash_flow[$]")]
    pub net_cash_flow: Money,
}

/// The operating figures of one year before tax credits are applied
#[derive(Debug, Clone, Copy, PartialEq)]
struct OperatingYear {
    hydrogen: Mass,
    revenue: Money,
    opex: Money,
    electricity_cost: Money,
    water_cost: Money,
    income_tax: Money,
}

impl OperatingYear {
    /// Calculate a year's operating figures from its annual aggregate
    fn from_aggregate(annual: &AnnualAggregate, params: &FinancialParameters) -> Self {
        let hydrogen = annual.total_hydrogen;
        let revenue = (hydrogen * params.sale_price).round_to(CURRENCY_DECIMALS);
        let opex = (params.plant_size * params.fixed_opex_per_kw
            + hydrogen * params.variable_opex_per_kg)
            .round_to(CURRENCY_DECIMALS);

        Self {
            hydrogen,
            revenue,
            opex,
            electricity_cost: annual.electricity_cost,
            water_cost: annual.water_cost,
            income_tax: params.income_tax_rate * revenue,
        }
    }

    /// The unweighted arithmetic mean of each field across `years`
    fn mean(years: &[OperatingYear]) -> Self {
        let count = Dimensionless(years.len() as f64);
        Self {
            hydrogen: years.iter().map(|y| y.hydrogen).sum::<Mass>() / count,
            revenue: years.iter().map(|y| y.revenue).sum::<Money>() / count,
            opex: years.iter().map(|y| y.opex).sum::<Money>() / count,
            electricity_cost: years.iter().map(|y| y.electricity_cost).sum::<Money>() / count,
            water_cost: years.iter().map(|y| y.water_cost).sum::<Money>() / count,
            income_tax: years.iter().map(|y| y.income_tax).sum::<Money>() / count,
        }
    }

    /// Complete the cash flow for project year `year_index`, applying the tax credit if eligible
    fn into_cash_flow(
        self,
        year_index: u32,
        source: CashFlowSource,
        ptc_per_kg: MoneyPerMass,
    ) -> CashFlowYear {
        let tax_credit = if year_index <= PTC_ELIGIBLE_YEARS {
            (self.hydrogen * ptc_per_kg).round_to(CURRENCY_DECIMALS)
        } else {
            Money(0.0)
        };
        let cost =
            self.opex + self.electricity_cost + self.water_cost + self.income_tax - tax_credit;

        CashFlowYear {
            year_index,
            source,
            hydrogen: self.hydrogen,
            revenue: self.revenue,
            opex: self.opex,
            electricity_cost: self.electricity_cost,
            water_cost: self.water_cost,
            income_tax: self.income_tax,
            tax_credit,
            cost,
            net_cash_flow: self.revenue - cost,
        }
    }
}

/// The cash flow for year 0, consisting solely of the capital outlay
fn capital_year(params: &FinancialParameters) -> CashFlowYear {
    let capex = params.plant_size * params.capex_per_kw;
    CashFlowYear {
        year_index: 0,
        source: CashFlowSource::Capital,
        hydrogen: Mass(0.0),
        revenue: Money(0.0),
        opex: Money(0.0),
        electricity_cost: Money(0.0),
        water_cost: Money(0.0),
        income_tax: Money(0.0),
        tax_credit: Money(0.0),
        cost: capex,
        net_cash_flow: -capex,
    }
}

/// Project cash flows over the lifetime of the plant.
///
/// # Arguments
///
/// * `history` - Aggregates for the retained historical years, in chronological order. Must not be
///   empty.
/// * `params` - Financial parameters of the project
///
/// # Returns
///
/// `project_lifetime + 1` entries: the capital outlay in year 0 followed by each operating year.
pub fn project_cash_flows(
    history: &[AnnualAggregate],
    params: &FinancialParameters,
) -> Vec<CashFlowYear> {
    assert!(!history.is_empty(), "Cannot project cash flows without history");

    let historical: Vec<_> = history
        .iter()
        .map(|annual| OperatingYear::from_aggregate(annual, params))
        .collect();
    let mean = OperatingYear::mean(&historical);

    let mut cash_flows = Vec::with_capacity(params.project_lifetime as usize + 1);
    cash_flows.push(capital_year(params));
    for year_index in 1..=params.project_lifetime {
        let (year, source) = match historical.get(year_index as usize - 1) {
            Some(year) => (*year, CashFlowSource::Historical),
            None => (mean, CashFlowSource::Extrapolated),
        };
        cash_flows.push(year.into_cash_flow(year_index, source, params.ptc_per_kg));
    }

    cash_flows
}
