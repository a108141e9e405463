use thiserror::Error;

/// Structural defects reported by the check module.
///
/// Ordinary outcomes (missing values, empty trees) are represented as
/// `Option`/`bool` results, never as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("ordering violation: {prev} precedes {next} in the live in-order sequence")]
    OrderingViolation { prev: i64, next: i64 },

    #[error("unbalanced node {value}: balance factor {weight} outside [-1, 1]")]
    UnbalancedNode { value: i64, weight: i64 },

    #[error("stale weight at node {value}: stored {stored}, recomputed {computed}")]
    StaleWeight {
        value: i64,
        stored: i64,
        computed: i64,
    },
}

pub type TreeResult<T> = Result<T, TreeError>;
