use std::fmt;

use crate::sim::RoundState;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Operation not allowed in the current round state
    InvalidState {
        operation: &'static str,
        state: RoundState,
    },
    /// Pool already has its maximum number of instances handed out
    PoolExhausted { pool: String, maximum: usize },
    /// Tuning data failed to parse or validate
    InvalidTuning(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while round state is {state:?}")
            }
            Self::PoolExhausted { pool, maximum } => {
                write!(f, "pool {pool} exhausted: {maximum} instances already in use")
            }
            Self::InvalidTuning(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}
