//! Chromosome-holdout linear booster training for sequence-based expression models

pub mod artifacts;
pub mod error;
pub mod gblinear;
pub mod labels;
pub mod loader;
pub mod metrics;
pub mod params;
pub mod partition;
pub mod pipeline;
pub mod types;
