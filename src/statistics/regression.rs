//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Simple Linear Regression
//////////////////////////////////////////////////////////////////////////////////////////////////

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub rvalue: f64,
    pub pvalue: f64,
    pub stderr: f64,
}

impl LinearFit {
    /// Least-squares fit of `ys` against `xs`.
    ///
    /// Returns `None` when fewer than two points are given or all `xs` are equal.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let x_mean = xs[..n].iter().sum::<f64>() / nf;
        let y_mean = ys[..n].iter().sum::<f64>() / nf;
        let mut ssxm = 0.0;
        let mut ssym = 0.0;
        let mut ssxym = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            ssxm += (x - x_mean).powi(2);
            ssym += (y - y_mean).powi(2);
            ssxym += (x - x_mean) * (y - y_mean);
        }
        ssxm /= nf;
        ssym /= nf;
        ssxym /= nf;
        if ssxm == 0.0 {
            return None;
        }
        let rvalue = if ssym == 0.0 {
            0.0
        } else {
            (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
        };
        let slope = ssxym / ssxm;
        let intercept = y_mean - slope * x_mean;
        let (pvalue, stderr) = if n == 2 {
            (if ys[0] == ys[1] { 1.0 } else { 0.0 }, 0.0)
        } else {
            const TINY: f64 = 1.0e-20;
            let df = (n - 2) as f64;
            let t = rvalue * (df / ((1.0 - rvalue + TINY) * (1.0 + rvalue + TINY))).sqrt();
            let pvalue = student_t_two_sided(t, df);
            let stderr = ((1.0 - rvalue * rvalue) * ssym / ssxm / df).sqrt();
            (pvalue, stderr)
        };
        Some(Self { slope, intercept, rvalue, pvalue, stderr })
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Ordinary Least Squares
//////////////////////////////////////////////////////////////////////////////////////////////////

/// Fits an autoregressive model with intercept by least squares.
///
/// Returns `[const, lag_1, ..., lag_k]`, or `None` if there are too few
/// observations for `k` lags.
pub fn autoregression(values: &[f64], k: usize) -> Option<Vec<f64>> {
    let rows = values.len().checked_sub(k)?;
    if rows < k + 1 {
        return None;
    }
    let design = DMatrix::from_fn(rows, k + 1, |r, c| {
        if c == 0 { 1.0 } else { values[k + r - c] }
    });
    let target = DVector::from_iterator(rows, values[k..].iter().copied());
    let coefficients = design.svd(true, true)
        .solve(&target, 1e-12)
        .ok()?;
    Some(coefficients.iter().copied().collect())
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Distributions
//////////////////////////////////////////////////////////////////////////////////////////////////

/// Two-sided p-value of a Student-t statistic.
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(distribution) => (2.0 * distribution.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}
