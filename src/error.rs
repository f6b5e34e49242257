//! Error type shared by the grid, the frontier and the search engine.

use core::fmt;

use thiserror::Error;

use crate::Pos;

/// Why a start or goal position was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointIssue {
    OutOfBounds,
    Blocked,
}

impl fmt::Display for EndpointIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EndpointIssue::OutOfBounds => write!(f, "out of bounds"),
            EndpointIssue::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position {pos} lies outside the {size}x{size} grid")]
    OutOfBounds { pos: Pos, size: usize },

    #[error("invalid search endpoint {pos}: {reason}")]
    InvalidEndpoint { pos: Pos, reason: EndpointIssue },

    /// Popping an empty frontier. Only reachable through misuse of [crate::Frontier].
    #[error("pop from an empty frontier")]
    EmptyFrontier,

    #[error("grid parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

pub type GridResult<T> = Result<T, GridError>;
