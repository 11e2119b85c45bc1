//! Header sanitization.

use crate::error::{EdaError, Result};
use crate::utils::column_names;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Trim leading and trailing whitespace from every column name.
///
/// Columns are referenced by exact name downstream, so `" Income "` must
/// become `"Income"`. Two headers that collapse to the same name are an
/// error rather than a silent overwrite.
pub fn trim_column_names(df: DataFrame) -> Result<(DataFrame, usize)> {
    let mut df = df;
    let original = column_names(&df);

    let mut seen = HashSet::with_capacity(original.len());
    for name in &original {
        let trimmed = name.trim();
        if !seen.insert(trimmed.to_string()) {
            return Err(EdaError::DuplicateColumn(trimmed.to_string()));
        }
    }

    let mut renamed = 0;
    for name in &original {
        let trimmed = name.trim();
        if trimmed != name {
            debug!("Renaming column '{}' -> '{}'", name, trimmed);
            df.rename(name, trimmed.into())?;
            renamed += 1;
        }
    }

    Ok((df, renamed))
}
