use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use roster_tools::actions;
use roster_tools::model::Season;
use roster_tools::{Config, Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing() {
        eprintln!("error: {error}");
    }
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

/// Runs the selected command. Returns `false` when the command completed but
/// part of it failed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Refresh { workbook, season } => {
            let config = workbook.load_config()?;
            let report = actions::refresh_season(
                &workbook.workbook,
                workbook.output(),
                &config,
                season.into(),
            )?;
            println!("{report}");
            Ok(true)
        }
        Command::RefreshAll(workbook) => {
            let config = workbook.load_config()?;
            let outcomes =
                actions::refresh_all_seasons(&workbook.workbook, workbook.output(), &config)?;
            let mut all_ok = true;
            for outcome in outcomes {
                match outcome.result {
                    Ok(report) => println!("{report}"),
                    Err(error) => {
                        all_ok = false;
                        eprintln!("error: {error}");
                    }
                }
            }
            Ok(all_ok)
        }
        Command::Combine(workbook) => {
            let config = workbook.load_config()?;
            let report = actions::rebuild_combined(&workbook.workbook, workbook.output(), &config)?;
            println!("{report}");
            Ok(true)
        }
        Command::Guide => {
            println!("{}", actions::guide()?);
            Ok(true)
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Build seasonal and combined assessment sheets in an Excel workbook."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild one season's filtered sheet.
    Refresh {
        #[command(flatten)]
        workbook: WorkbookArgs,

        /// Season to rebuild.
        #[arg(long, value_enum)]
        season: SeasonArg,
    },
    /// Rebuild the filtered sheets of all three seasons.
    RefreshAll(WorkbookArgs),
    /// Merge the seasonal sheets into the combined sheet.
    Combine(WorkbookArgs),
    /// Explain what each command does.
    Guide,
}

#[derive(clap::Args)]
struct WorkbookArgs {
    /// Workbook holding the source sheets.
    #[arg(long)]
    workbook: PathBuf,

    /// Where to save the updated workbook. Defaults to overwriting the input.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding sheet names, filter, and column layout.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl WorkbookArgs {
    fn output(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.workbook)
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SeasonArg {
    Fall,
    Winter,
    Spring,
}

impl From<SeasonArg> for Season {
    fn from(arg: SeasonArg) -> Self {
        match arg {
            SeasonArg::Fall => Season::Fall,
            SeasonArg::Winter => Season::Winter,
            SeasonArg::Spring => Season::Spring,
        }
    }
}
