mod constants;
#[cfg(test)]
mod testing;

// Modules
pub mod data;
pub mod errors;
pub mod explain;
pub mod metrics;
pub mod node;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::{Dataset, FeatureKind, FeatureSpec, FeatureValue};
pub use errors::ArbolError;
pub use metrics::{ConfusionMatrix, Evaluation};
pub use tree::{DecisionTree, TreeParams};
