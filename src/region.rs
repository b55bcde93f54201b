//! Wholesale electricity market regions (RTOs/ISOs) and the lookup from US states to them.
//!
//! RTO/ISO footprints do not follow state boundaries and some states are covered by more than one
//! market, so each state is assigned the single best-fit region. See
//! <https://www.ferc.gov/power-sales-and-markets/rtos-and-isos>.
use crate::error::SimulationError;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};
use unicase::UniCase;

/// An organised wholesale electricity market
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum MarketRegion {
    /// California ISO
    #[strum(serialize = "CAISO")]
    #[serde(rename = "CAISO")]
    Caiso,
    /// Electric Reliability Council of Texas
    #[strum(serialize = "ERCOT")]
    #[serde(rename = "ERCOT")]
    Ercot,
    /// ISO New England
    #[strum(serialize = "ISO-NE")]
    #[serde(rename = "ISO-NE")]
    IsoNe,
    /// Midcontinent ISO
    #[strum(serialize = "MISO")]
    #[serde(rename = "MISO")]
    Miso,
    /// New York ISO
    #[strum(serialize = "NYISO")]
    #[serde(rename = "NYISO")]
    Nyiso,
    /// PJM Interconnection
    #[strum(serialize = "PJM")]
    #[serde(rename = "PJM")]
    Pjm,
    /// Southwest Power Pool
    #[strum(serialize = "SPP")]
    #[serde(rename = "SPP")]
    Spp,
    /// Hawaii (no published real-time price data)
    #[strum(serialize = "HICC")]
    #[serde(rename = "HICC")]
    Hicc,
}

impl MarketRegion {
    /// Whether real-time price data can be read for this region
    pub fn has_price_data(self) -> bool {
        !matches!(self, Self::Hicc)
    }

    /// The lower-case prefix used for this region's price column names (e.g. `ercot`)
    pub fn column_prefix(self) -> &'static str {
        match self {
            Self::Caiso => "caiso",
            Self::Ercot => "ercot",
            Self::IsoNe => "isone",
            Self::Miso => "miso",
            Self::Nyiso => "nyiso",
            Self::Pjm => "pjm",
            Self::Spp => "spp",
            Self::Hicc => "hicc",
        }
    }
}

/// The result of looking up a state's wholesale market
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketLookup {
    /// The state is served by an organised market
    Market(MarketRegion),
    /// The state is not part of any RTO/ISO
    NoOrganizedMarket,
}

use MarketLookup::{Market, NoOrganizedMarket};
use MarketRegion::{Caiso, Ercot, Hicc, IsoNe, Miso, Nyiso, Pjm, Spp};

/// Best-fit market for each state: (abbreviation, name, market)
const STATE_MARKETS: [(&str, &str, MarketLookup); 51] = [
    ("AL", "Alabama", NoOrganizedMarket),
    ("AK", "Alaska", NoOrganizedMarket),
    ("AZ", "Arizona", NoOrganizedMarket),
    ("AR", "Arkansas", Market(Miso)),
    ("CA", "California", Market(Caiso)),
    ("CO", "Colorado", NoOrganizedMarket),
    ("CT", "Connecticut", Market(IsoNe)),
    ("DE", "Delaware", Market(Pjm)),
    ("FL", "Florida", NoOrganizedMarket),
    ("GA", "Georgia", NoOrganizedMarket),
    ("HI", "Hawaii", Market(Hicc)),
    ("ID", "Idaho", NoOrganizedMarket),
    ("IL", "Illinois", Market(Miso)),
    ("IN", "Indiana", Market(Miso)),
    ("IA", "Iowa", Market(Miso)),
    ("KS", "Kansas", Market(Spp)),
    ("KY", "Kentucky", Market(Pjm)),
    ("LA", "Louisiana", Market(Miso)),
    ("ME", "Maine", Market(IsoNe)),
    ("MD", "Maryland", Market(Pjm)),
    ("MA", "Massachusetts", Market(IsoNe)),
    ("MI", "Michigan", Market(Miso)),
    ("MN", "Minnesota", Market(Miso)),
    ("MS", "Mississippi", Market(Miso)),
    ("MO", "Missouri", Market(Miso)),
    ("MT", "Montana", Market(Spp)),
    ("NE", "Nebraska", Market(Spp)),
    ("NV", "Nevada", NoOrganizedMarket),
    ("NH", "New Hampshire", Market(IsoNe)),
    ("NJ", "New Jersey", Market(Pjm)),
    ("NM", "New Mexico", NoOrganizedMarket),
    ("NY", "New York", Market(Nyiso)),
    ("NC", "North Carolina", NoOrganizedMarket),
    ("ND", "North Dakota", Market(Miso)),
    ("OH", "Ohio", Market(Pjm)),
    ("OK", "Oklahoma", Market(Spp)),
    ("OR", "Oregon", NoOrganizedMarket),
    ("PA", "Pennsylvania", Market(Pjm)),
    ("RI", "Rhode Island", Market(IsoNe)),
    ("SC", "South Carolina", NoOrganizedMarket),
    ("SD", "South Dakota", Market(Spp)),
    ("TN", "Tennessee", NoOrganizedMarket),
    ("TX", "Texas", Market(Ercot)),
    ("UT", "Utah", NoOrganizedMarket),
    ("VT", "Vermont", Market(IsoNe)),
    ("VA", "Virginia", Market(Pjm)),
    ("WA", "Washington", NoOrganizedMarket),
    ("WV", "West Virginia", Market(Pjm)),
    ("WI", "Wisconsin", Market(Miso)),
    ("WY", "Wyoming", NoOrganizedMarket),
    ("DC", "District of Columbia", Market(Pjm)),
];

/// Look up the wholesale market for a state abbreviation (case-insensitive).
///
/// Returns the state's full name alongside the lookup result.
pub fn lookup_state(state: &str) -> Result<(&'static str, MarketLookup), SimulationError> {
    let key = UniCase::new(state.trim());
    STATE_MARKETS
        .iter()
        .find(|(abbr, _, _)| UniCase::new(*abbr) == key)
        .map(|(_, name, lookup)| (*name, *lookup))
        .ok_or_else(|| SimulationError::UnknownState(state.to_string()))
}

/// Get the market region whose prices should be used to cost electricity for `state`.
///
/// Fails if the state is unknown, is not in an organised market or is in a market for which price
/// data is not supported.
pub fn price_region_for_state(state: &str) -> Result<MarketRegion, SimulationError> {
    match lookup_state(state)?.1 {
        Market(region) if region.has_price_data() => Ok(region),
        Market(region) => Err(SimulationError::UnsupportedRegion(region)),
        NoOrganizedMarket => Err(SimulationError::NoOrganizedMarket {
            state: state.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case("TX", Ercot)]
    #[case("tx", Ercot)]
    #[case(" NY ", Nyiso)]
    #[case("CA", Caiso)]
    #[case("MA", IsoNe)]
    #[case("DC", Pjm)]
    fn test_price_region_for_state(#[case] state: &str, #[case] expected: MarketRegion) {
        assert_eq!(price_region_for_state(state).unwrap(), expected);
    }

    #[test]
    fn test_price_region_no_market() {
        assert_eq!(
            price_region_for_state("AZ").unwrap_err(),
            SimulationError::NoOrganizedMarket {
                state: "AZ".to_string()
            }
        );
    }

    #[test]
    fn test_price_region_unsupported() {
        assert_eq!(
            price_region_for_state("HI").unwrap_err(),
            SimulationError::UnsupportedRegion(Hicc)
        );
    }

    #[test]
    fn test_price_region_unknown_state() {
        assert_eq!(
            price_region_for_state("XX").unwrap_err(),
            SimulationError::UnknownState("XX".to_string())
        );
    }

    #[test]
    fn test_lookup_state_name() {
        assert_eq!(lookup_state("wv").unwrap(), ("West Virginia", Market(Pjm)));
    }

    #[test]
    fn test_region_names_roundtrip() {
        for region in MarketRegion::iter() {
            assert_eq!(
                MarketRegion::from_str(&region.to_string()).unwrap(),
                region
            );
        }
        assert_eq!(MarketRegion::from_str("iso-ne").unwrap(), IsoNe);
    }
}
