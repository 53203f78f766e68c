//! Error types for the solver.
//!
//! Every error is raised before the first generation runs: once a population
//! has been seeded the operators are total and cannot fail.

/// Errors reported by the solver and its input helpers.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The problem data itself cannot be optimized.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A run parameter is outside its admissible range.
    #[error("parameter out of range: {name} = {value} ({reason})")]
    ParameterOutOfRange {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot serialize solution: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolverError {
    pub(crate) fn out_of_range(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        SolverError::ParameterOutOfRange {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
