//! The command line interface for the simulation.
use crate::input::assumptions::UserValue;
use crate::input::load_project;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{DataWriter, create_output_directory, get_output_dir, write_summary};
use crate::region::{MarketLookup, lookup_state};
use crate::settings::Settings;
use crate::timeseries::merge;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write the hourly table to a CSV file
    #[arg(long)]
    pub debug_model: bool,
    /// Electrolyzer plant size in kW, overriding the project file
    #[arg(long)]
    pub plant_size: Option<String>,
    /// Hydrogen sale price in $/kg, overriding the project file
    #[arg(long)]
    pub sale_price: Option<String>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a simulation for a project.
    Run {
        /// Path to the project directory.
        project_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a project.
    Validate {
        /// The path to the project directory.
        project_dir: PathBuf,
    },
    /// Show the electricity market region for a US state.
    Region {
        /// Two-letter state abbreviation.
        state: String,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { project_dir, opts } => handle_run_command(&project_dir, &opts, None),
            Self::Validate { project_dir } => handle_validate_command(&project_dir, None),
            Self::Region { state } => handle_region_command(&state),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ h2sim --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Initialise the program logger, unless this has already been done
fn init_logger(settings: &Settings, log_file_path: Option<&Path>) -> Result<()> {
    if log::is_logger_initialised() {
        return Ok(());
    }

    log::init(Some(&settings.log_level), log_file_path).context("Failed to initialise logging.")
}

/// Handle the `run` command.
pub fn handle_run_command(
    project_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // These settings can be overridden by command-line argument
    let debug_model = opts.debug_model || settings.debug_model;
    let allow_overwrite = opts.overwrite || settings.overwrite;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(project_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, allow_overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    init_logger(&settings, Some(output_path))?;

    // Load the project to run
    let mut project = load_project(project_path).context("Failed to load project.")?;
    project.assumptions = project.assumptions.with_overrides(
        opts.plant_size.clone().map(UserValue::from),
        opts.sale_price.clone().map(UserValue::from),
    );
    info!("Loaded project from {}", project_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Run the simulation
    let results =
        crate::simulation::run(&project.assumptions, &project.generation, &project.prices)?;

    // Write results
    let mut writer = DataWriter::create(output_path, debug_model)?;
    writer.write_results(&results)?;
    writer.flush()?;
    write_summary(output_path, &project, &results)?;
    write_metadata(
        output_path,
        project_path,
        project.assumptions.plant_size_kw.is_some(),
        project.assumptions.hydrogen_sale_price_per_kg.is_some(),
    )
    .context("Failed to save metadata.")?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(project_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    init_logger(&settings, None)?;

    // Load/validate the project
    let project = load_project(project_path).context("Failed to validate project.")?;
    let merged =
        merge(&project.generation, &project.prices).context("Failed to validate project.")?;
    info!(
        "{} of {} generation hours have a matching price",
        merged.len(),
        project.generation.len()
    );
    info!("Project validation successful!");

    Ok(())
}

/// Describe the market region for a state
fn describe_region(state: &str) -> Result<String> {
    let (name, lookup) = lookup_state(state)?;
    let description = match lookup {
        MarketLookup::Market(region) if region.has_price_data() => {
            format!("{name} is in the {region} market region")
        }
        MarketLookup::Market(region) => format!(
            "{name} is in the {region} market region, for which price data is unsupported"
        ),
        MarketLookup::NoOrganizedMarket => {
            format!("{name} is not in an organised wholesale electricity market")
        }
    };

    Ok(description)
}

/// Handle the `region` command.
pub fn handle_region_command(state: &str) -> Result<()> {
    println!("{}", describe_region(state)?);

    Ok(())
}
