use std::path::PathBuf;

use leopard_core::ParseError;
use leopard_interpreter::EvaluationError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing failed with {} error(s)", .0.len())]
    Parse(Vec<ParseError>),
    #[error("{0}")]
    Evaluation(EvaluationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
