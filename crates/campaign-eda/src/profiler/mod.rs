//! Column profiling module.
//!
//! This module provides:
//! - Column classification into continuous and discrete sets
//! - Univariate summaries per column
//! - Plain descriptive statistics shared with the bivariate analyzers

mod classifier;
pub mod statistics;
mod univariate;

pub use classifier::ColumnClassifier;
pub use univariate::{summarize_continuous, summarize_discrete};
