mod error;
mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use error::RunnerError;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Program to run. Starts the REPL when omitted.
    path: Option<PathBuf>,
    /// Log filter, overriding `RUST_LOG`.
    #[arg(long)]
    log_level: Option<LevelFilter>,
    /// Skip the REPL greeting.
    #[arg(long)]
    no_banner: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = cli.log_level {
        logger.filter_level(level);
    }
    logger.init();

    let result = match &cli.path {
        None => {
            log::info!("starting REPL");
            repl::start(!cli.no_banner)
        }
        Some(path) => runner::execute_file(path, &mut std::io::stdout().lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunnerError::Parse(errors)) => {
            eprintln!("Parser errors:");
            for error in errors {
                eprintln!("\t{}", error);
            }
            ExitCode::FAILURE
        }
        Err(RunnerError::Evaluation(error)) => {
            eprintln!("ERROR: {}", error);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
