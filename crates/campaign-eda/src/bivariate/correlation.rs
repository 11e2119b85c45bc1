//! Correlation matrix computation.

use crate::error::Result;
use crate::profiler::statistics::sample_variance;
use crate::types::CorrelationMatrix;
use crate::utils::column_as_f64;
use anofox_statistics::correlation::pearson;
use polars::prelude::*;
use tracing::debug;

/// Minimum number of complete pairs for a defined coefficient.
const MIN_PAIRS: usize = 3;

/// Compute the `n x n` Pearson correlation matrix between the named columns.
///
/// Each pair uses the rows where both values are present and needs at least
/// three of them. The diagonal is exactly 1.0 for columns with nonzero
/// variance and `None` otherwise; only the upper triangle is computed and
/// then mirrored, so the matrix is symmetric bit for bit.
pub fn correlation_matrix<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<CorrelationMatrix> {
    let names: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    let data: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| column_as_f64(df, name))
        .collect::<Result<_>>()?;

    let n = names.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        let present: Vec<f64> = data[i].iter().flatten().copied().collect();
        let has_variance = sample_variance(&present).is_some_and(|v| v > 0.0);
        values[i][i] = has_variance.then_some(1.0);

        for j in (i + 1)..n {
            let r = pairwise_pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Computed {}x{} correlation matrix", n, n);
    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}

/// Pearson coefficient over the rows where both sides are present.
fn pairwise_pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let (x, y): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    if x.len() < MIN_PAIRS {
        return None;
    }

    pearson(&x, &y, Some(0.95))
        .ok()
        .map(|result| result.estimate)
        .filter(|r| r.is_finite())
}
