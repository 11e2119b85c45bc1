//! Bivariate analysis module.
//!
//! - Continuous vs continuous: Pearson correlation matrix
//! - Discrete vs discrete: cross-tabulation with normalization and margins
//! - Continuous vs discrete: grouped aggregate statistics

mod correlation;
mod crosstab;
mod grouped;

pub use correlation::correlation_matrix;
pub use crosstab::crosstab;
pub use grouped::grouped_stats;
