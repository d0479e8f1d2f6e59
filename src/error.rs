//! Error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarcoError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    /// Orderly shutdown requested by `-T`/`--timeout`.
    #[error("time limit reached")]
    TimeoutSignal,

    /// Orderly shutdown requested by SIGINT/SIGTERM.
    #[error("interrupted")]
    InterruptSignal,

    /// A broken internal invariant, e.g. `known_max` claimed but the seed
    /// was not actually maximal. Indicates a bug, not a runtime condition.
    #[error("internal invariant failure: {0}")]
    InternalInvariantFailure(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised input format for '{path}' (use --cnf or --smt)")]
    UnrecognisedFormat { path: String },

    #[error("SMT-LIB input is not supported by this build's solver backend")]
    UnsupportedFormat,

    #[error("malformed input at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("constraint set is empty")]
    EmptyConstraintSet,
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("underlying solver reported resource exhaustion")]
    ResourceExhausted,

    #[error("underlying solver protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("underlying solver crashed: {0}")]
    Crashed(String),
}

impl From<varisat::SolverError> for SolverError {
    fn from(e: varisat::SolverError) -> Self {
        SolverError::Crashed(e.to_string())
    }
}

impl MarcoError {
    /// Process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            MarcoError::Input(_) => 1,
            MarcoError::Solver(_) => 1,
            MarcoError::InternalInvariantFailure(_) => 1,
            MarcoError::TimeoutSignal | MarcoError::InterruptSignal => 128,
        }
    }
}
