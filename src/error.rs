//! Error types raised by the simulation engine.
//!
//! Most of the program reports errors through [`anyhow`], but the conditions below are part of the
//! engine's contract, so they are represented by a dedicated type which callers can match on (e.g.
//! with [`anyhow::Error::downcast_ref`]).
use crate::region::MarketRegion;
use std::fmt;
use thiserror::Error;

/// Which of the two input series a join key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSide {
    /// The hourly generation series
    Generation,
    /// The market price series
    Price,
}

impl fmt::Display for SeriesSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation => write!(f, "generation"),
            Self::Price => write!(f, "price"),
        }
    }
}

/// A join key which was expected on one side of a merge but not found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    /// The series missing the key
    pub side: SeriesSide,
    /// The key name required by the merge
    pub expected: &'static str,
    /// The key name the series actually had
    pub found: String,
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} index in {} data (found \"{}\")",
            self.expected, self.side, self.found
        )
    }
}

/// Errors raised by the simulation engine
#[derive(Error, Debug, PartialEq)]
pub enum SimulationError {
    /// One or both series lack the agreed join key
    #[error("Missing indices for merging: {}", format_missing(.0))]
    SchemaMismatch(Vec<MissingKey>),

    /// The market region has no price data support
    #[error("Unsupported RTO/ISO: {0}")]
    UnsupportedRegion(MarketRegion),

    /// The state is not covered by an organised wholesale market
    #[error("{state} is in a non-RTO/ISO region, so electricity cannot be priced")]
    NoOrganizedMarket {
        /// The state abbreviation supplied
        state: String,
    },

    /// The state abbreviation is not known
    #[error("State abbreviation not found: {0}")]
    UnknownState(String),

    /// No year of generation data survives the coverage filter
    #[error("No year of generation data covers at least {min_days} days")]
    InsufficientHistory {
        /// The minimum number of days a year must cover to be retained
        min_days: u32,
    },
}

fn format_missing(missing: &[MissingKey]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A value supplied by the user which cannot be used.
///
/// These are never fatal: the caller substitutes a documented default and reports the substitution.
#[derive(Error, Debug, PartialEq)]
pub enum InvalidUserInput {
    /// The value could not be parsed as a number
    #[error("{field} must be a number, got \"{raw}\"")]
    NotANumber {
        /// The name of the input
        field: &'static str,
        /// The text supplied
        raw: String,
    },

    /// The value was a number, but outside the permitted range
    #[error("{field} of {value} is out of range: {reason}")]
    OutOfRange {
        /// The name of the input
        field: &'static str,
        /// The value supplied
        value: f64,
        /// Description of the permitted range
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message() {
        let err = SimulationError::SchemaMismatch(vec![
            MissingKey {
                side: SeriesSide::Generation,
                expected: "time",
                found: "datetime".into(),
            },
            MissingKey {
                side: SeriesSide::Price,
                expected: "local_time_int_start",
                found: "timestamp".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Missing indices for merging: time index in generation data (found \"datetime\"), \
             local_time_int_start index in price data (found \"timestamp\")"
        );
    }

    #[test]
    fn test_invalid_user_input_message() {
        let err = InvalidUserInput::NotANumber {
            field: "plant size",
            raw: "big".into(),
        };
        assert_eq!(err.to_string(), "plant size must be a number, got \"big\"");
    }
}
