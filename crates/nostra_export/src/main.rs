use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use nostra_export::log::{derive_level_filter, init_logging};
use nostra_export::{SpecExportPlan, run_export};

/// Assemble the Nostra Utils `BuildFiles/` tree (headers, filtered project
/// tree, solution CMakeLists.txt).
#[derive(Debug, Parser)]
#[command(name = "nostra-export", version, about)]
struct Args {
    /// Directory the fixed source and destination paths are resolved against.
    #[arg(short = 'C', long = "root", value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not log anything, not even the failure reason.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(derive_level_filter(args.quiet, args.verbose));
    debug!("CLI args parsed: {:?}", args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let plan = SpecExportPlan::default();
    let report = run_export(&args.root, &plan)
        .with_context(|| format!("Failed to export build files under {}", args.root.display()))?;
    debug!("export finished:\n{report}");
    Ok(())
}
