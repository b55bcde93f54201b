//! General functions related to finance.
use crate::simulation::cash_flow::CashFlowYear;
use crate::units::{Dimensionless, Mass, Money, MoneyPerMass};

/// The factor by which an amount in project year `year_index` is discounted to year 0
pub fn discount_factor(year_index: u32, discount_rate: Dimensionless) -> Dimensionless {
    Dimensionless(1.0) / (Dimensionless(1.0) + discount_rate).powi(year_index as i32)
}

/// The present value of an amount arising in project year `year_index`
pub fn present_value<T>(amount: T, year_index: u32, discount_rate: Dimensionless) -> T
where
    T: std::ops::Mul<Dimensionless, Output = T>,
{
    amount * discount_factor(year_index, discount_rate)
}

/// Calculates the net present value of a series of cash flows.
///
/// Each entry is discounted according to its year index, so year 0 is taken at nominal value.
pub fn npv(cash_flows: &[CashFlowYear], discount_rate: Dimensionless) -> Money {
    cash_flows
        .iter()
        .map(|year| present_value(year.net_cash_flow, year.year_index, discount_rate))
        .sum()
}

/// Calculates the levelised cost of hydrogen.
///
/// This is the present value of all costs divided by the present value of all hydrogen produced.
/// If no hydrogen is produced, the result is infinite.
pub fn lcoh(cash_flows: &[CashFlowYear], discount_rate: Dimensionless) -> MoneyPerMass {
    let mut discounted_cost = Money(0.0);
    let mut discounted_hydrogen = Mass(0.0);
    for year in cash_flows {
        discounted_cost += present_value(year.cost, year.year_index, discount_rate);
        discounted_hydrogen += present_value(year.hydrogen, year.year_index, discount_rate);
    }

    if discounted_hydrogen == Mass(0.0) {
        return MoneyPerMass(f64::INFINITY);
    }

    discounted_cost / discounted_hydrogen
}
