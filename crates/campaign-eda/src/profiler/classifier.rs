//! Column classification into continuous and discrete sets.

use crate::config::ColumnRoles;
use crate::types::ColumnPartition;
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Splits a table's columns by dtype and configured roles.
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Partition the columns of `df`.
    ///
    /// - `continuous`: numeric columns not listed as discrete
    /// - `discrete_text`: text columns
    /// - `discrete_numeric`: numeric columns listed as discrete, minus identifiers
    ///
    /// Listed names that are absent from the table are ignored. Date and
    /// boolean columns land in none of the sets. Table order is preserved.
    pub fn classify(df: &DataFrame, roles: &ColumnRoles) -> ColumnPartition {
        let discrete: HashSet<&str> = roles.discrete_numeric.iter().map(|s| s.as_str()).collect();
        let identifiers: HashSet<&str> = roles.identifiers.iter().map(|s| s.as_str()).collect();

        let mut partition = ColumnPartition::default();

        for col in df.get_columns() {
            let name = col.name().as_str();
            match get_dtype_category(col.dtype()) {
                DtypeCategory::Numeric if discrete.contains(name) => {
                    if !identifiers.contains(name) {
                        partition.discrete_numeric.push(name.to_string());
                    }
                }
                DtypeCategory::Numeric => partition.continuous.push(name.to_string()),
                DtypeCategory::String => partition.discrete_text.push(name.to_string()),
                other => debug!("Column '{}' ({:?}) left unclassified", name, other),
            }
        }

        debug!(
            "Classified {} continuous, {} discrete text, {} discrete numeric columns",
            partition.continuous.len(),
            partition.discrete_text.len(),
            partition.discrete_numeric.len()
        );

        partition
    }
}
