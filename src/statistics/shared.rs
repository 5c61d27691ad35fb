///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Imports
///////////////////////////////////////////////////////////////////////////////////////////////////

use itertools::Itertools;

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Summary Statistics
///////////////////////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl<T: Iterator<Item=f64>> From<T> for Statistics {
    fn from(values: T) -> Self {
        let values = values.collect::<Vec<_>>();
        Self::from_slice(&values)
    }
}

impl Statistics {
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            median: median(values),
            std_dev: std_dev(values),
            min: values.iter().copied().fold(f64::NAN, f64::min),
            max: values.iter().copied().fold(f64::NAN, f64::max),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Helpers
///////////////////////////////////////////////////////////////////////////////////////////////////

pub fn ord_float(a: &f64, b: &f64) -> std::cmp::Ordering {
    a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    values.iter()
        .copied()
        .sorted_by(ord_float)
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mean = mean(values);
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between the closest ranks.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    quantile_of_sorted(&sorted(values), q)
}

pub fn quantile_of_sorted(ordered: &[f64], q: f64) -> f64 {
    if ordered.is_empty() {
        return f64::NAN;
    }
    let position = q * (ordered.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    ordered[lower] + (ordered[upper] - ordered[lower]) * fraction
}

pub fn diff(values: &[f64]) -> Vec<f64> {
    values.iter()
        .tuple_windows()
        .map(|(a, b)| b - a)
        .collect()
}

/// Pearson correlation; NaN if either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let mx = mean(xs);
    let my = mean(ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}
