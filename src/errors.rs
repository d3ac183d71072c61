//! Errors
//!
//! Custom error types used throughout the `arbol` crate.
use thiserror::Error;

/// Errors that can occur when building or querying a decision tree.
#[derive(Debug, Error)]
pub enum ArbolError {
    /// The training data is unusable as supplied.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidHyperparameter(String, String, String),
    /// An example queried at prediction or evaluation time does not match the
    /// schema the tree was trained with.
    #[error("Feature mismatch: {0}")]
    FeatureMismatch(String),
}
