//! Common functionality for h2sim, a techno-economic simulator for renewable-powered hydrogen
//! electrolysis.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod columns;
pub mod error;
pub mod finance;
pub mod input;
pub mod log;
pub mod output;
pub mod region;
pub mod settings;
pub mod simulation;
pub mod timeseries;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the path to the config directory for the program.
///
/// If the user's config directory cannot be determined, the current directory is used.
pub fn get_h2sim_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("h2sim");
    path
}
