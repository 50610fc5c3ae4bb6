//! Pairwise-complete Pearson correlation.

/// Pearson coefficient of two equally long columns, skipping every row
/// where either side is missing.
///
/// NaN when fewer than two complete pairs remain or either side has zero
/// variance over those pairs.
pub(crate) fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2
        || is_constant(pairs.iter().map(|(a, _)| *a))
        || is_constant(pairs.iter().map(|(_, b)| *b))
    {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Whether every value equals the first one.
fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// 1.0 for a column with nonzero variance over at least two values, NaN otherwise.
pub(crate) fn self_correlation(x: &[Option<f64>]) -> f64 {
    if pearson_pairwise(x, x).is_nan() {
        f64::NAN
    } else {
        1.0
    }
}

/// Full symmetric matrix over the given columns.
pub(crate) fn correlation_values(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        matrix[i][i] = self_correlation(&columns[i]);
        for j in (i + 1)..n {
            let r = pearson_pairwise(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    matrix
}
