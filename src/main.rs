//! tdt-report - Main Binary
//!
//! Prints standings for a Tournament Director save file and exports them as JSON

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tdt_report::{export, resolve, Report, RunLogger, TdtError, TdtFile, VerbosityLevel};

/// Verbosity level for run output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "tdt-report")]
#[command(about = "Tournament Director save file report", long_about = None)]
#[command(after_help = "Example:\n  tdt-report \"game 3 25.tdt\"")]
struct Cli {
    /// Tournament Director save file (.tdt)
    #[arg(value_name = "TDT_FILE")]
    file: Option<PathBuf>,

    /// Verbosity level for run output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', default_value = "normal")]
    verbosity: VerbosityArg,

    /// Export file (default: <TDT_FILE> with a .tournament_results.json extension)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the report without writing the export file
    #[arg(long)]
    no_export: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(file) = cli.file.as_deref() else {
        println!();
        // Nothing useful to do if stdout is gone
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let logger = RunLogger::with_verbosity(cli.verbosity.into());

    match run(&cli, file, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<TdtError>() {
            // Reported at every verbosity, like the processing error below
            Some(TdtError::NotFound(_)) => {
                println!("Error: {}", err);
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("Error processing {}: {}", file.display(), err);
                eprintln!("{:?}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli, file: &Path, logger: &RunLogger) -> anyhow::Result<()> {
    if !file.exists() {
        return Err(TdtError::NotFound(file.to_path_buf()).into());
    }

    logger.normal(&format!("Parsing tournament file: {}", display_name(file)));

    let tdt = TdtFile::load(file)?;
    logger.verbose(&format!(
        "Extracted {} prizes and {} players ({} player records dropped)",
        tdt.prizes.len(),
        tdt.players.len(),
        tdt.dropped_players
    ));

    let results = resolve(tdt);
    print!("{}", Report(&results));

    if cli.no_export {
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| export::export_path(file));
    export::write_results(&results, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    logger.normal("");
    logger.normal(&format!("Complete data saved to: {}", display_name(&output)));

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
