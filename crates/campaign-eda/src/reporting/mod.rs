//! Report rendering module.
//!
//! An [`EdaReport`](crate::types::EdaReport) can be rendered as a console
//! text report (one block per column, then the bivariate tables) or as
//! pretty-printed JSON for piping into other tools.

mod generator;

pub use generator::ReportGenerator;
