use thiserror::Error;

use crate::graph::PersonId;

/// Main error type for Kingraph
#[derive(Error, Debug)]
pub enum KingraphError {
    /// Person not present in the graph scope of the current query
    #[error("Person not found: {0}")]
    PersonNotFound(PersonId),

    /// Relationship edge with a kind outside the closed set
    #[error("Malformed edge: {0}")]
    MalformedEdge(String),

    /// Depth mode outside the closed set
    #[error("Invalid depth mode: {0}")]
    InvalidDepthMode(String),

    /// Unusable filter value
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by a data collaborator
    #[error("Store error: {0}")]
    Store(String),
}

/// Convenient Result type using KingraphError
pub type Result<T> = std::result::Result<T, KingraphError>;
