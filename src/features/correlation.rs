use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::statistics::shared::{mean, median, variance};

const MAX_PACF_LAG: usize = 9;
const AGG_MAX_LAG: usize = 40;

pub fn autocorrelation(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len();
    let m = mean(x);
    let var = variance(x);
    for lag in 0..10usize {
        let value = if n <= lag || var.abs() < 1e-8 {
            f64::NAN
        } else {
            let sum_product = (0..n - lag)
                .map(|i| (x[i] - m) * (x[i + lag] - m))
                .sum::<f64>();
            sum_product / ((n - lag) as f64 * var)
        };
        sink.emit("autocorrelation", &[("lag", Param::Int(lag as i64))], value);
    }
}

/// Autocovariance with the `n - k` denominator for lags `0..=max_lag`.
fn adjusted_autocovariance(x: &[f64], max_lag: usize) -> Vec<f64> {
    let n = x.len();
    let m = mean(x);
    (0..=max_lag.min(n.saturating_sub(1)))
        .map(|lag| {
            let total = (0..n - lag)
                .map(|i| (x[i] - m) * (x[i + lag] - m))
                .sum::<f64>();
            total / (n - lag) as f64
        })
        .collect()
}

/// Partial autocorrelations through the Durbin-Levinson recursion.
///
/// The number of lags is capped at half of the series length.
pub fn partial_autocorrelation(x: &[f64], sink: &mut FeatureSink) {
    let mut coefficients = vec![f64::NAN; MAX_PACF_LAG + 1];
    let max_lag = if MAX_PACF_LAG >= x.len() / 2 {
        (x.len() / 2).saturating_sub(1)
    } else {
        MAX_PACF_LAG
    };
    if x.len() > 1 && max_lag > 0 {
        let acov = adjusted_autocovariance(x, max_lag);
        if acov[0] != 0.0 {
            let rho = acov.iter().map(|c| c / acov[0]).collect::<Vec<_>>();
            let pacf = durbin_levinson(&rho, max_lag);
            for (lag, value) in pacf.into_iter().enumerate() {
                coefficients[lag] = value;
            }
        }
    }
    for (lag, value) in coefficients.into_iter().enumerate() {
        sink.emit("partial_autocorrelation", &[("lag", Param::Int(lag as i64))], value);
    }
}

fn durbin_levinson(rho: &[f64], max_lag: usize) -> Vec<f64> {
    let mut pacf = vec![f64::NAN; max_lag + 1];
    pacf[0] = 1.0;
    let mut phi = vec![0.0; max_lag + 1];
    let mut previous = vec![0.0; max_lag + 1];
    for k in 1..=max_lag {
        let numerator = rho[k] - (1..k).map(|j| previous[j] * rho[k - j]).sum::<f64>();
        let denominator = 1.0 - (1..k).map(|j| previous[j] * rho[j]).sum::<f64>();
        if denominator == 0.0 {
            break;
        }
        phi[k] = numerator / denominator;
        for j in 1..k {
            phi[j] = previous[j] - phi[k] * previous[k - j];
        }
        pacf[k] = phi[k];
        previous.copy_from_slice(&phi);
    }
    pacf
}

/// Mean, median and variance of the autocorrelations for lags `1..=40`.
pub fn agg_autocorrelation(x: &[f64], sink: &mut FeatureSink) {
    let var = variance(x);
    let correlations = if x.len() < 2 || var.abs() < 1e-10 {
        Vec::new()
    } else {
        let acov = adjusted_autocovariance(x, AGG_MAX_LAG.min(x.len()));
        acov[1..].iter().map(|c| c / acov[0]).collect::<Vec<_>>()
    };
    let aggregations: [(&str, fn(&[f64]) -> f64); 3] = [
        ("mean", mean),
        ("median", median),
        ("var", variance),
    ];
    for (name, aggregate) in aggregations {
        let value = if var.abs() < 1e-10 {
            0.0
        } else {
            aggregate(&correlations)
        };
        sink.emit("agg_autocorrelation",
                  &[("f_agg", Param::Str(name)), ("maxlag", Param::Int(AGG_MAX_LAG as i64))],
                  value);
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::features::Calculator;
    use super::*;

    fn run(calculator: Calculator, x: &[f64]) -> HashMap<String, f64> {
        let mut sink = FeatureSink::new("mean");
        calculator(x, &mut sink);
        sink.into_features().into_iter().collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn autocorrelation_of_alternating_series() {
        let x = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let features = run(autocorrelation, &x);
        assert!(close(features["mean__autocorrelation__lag_0"], 1.0));
        assert!(close(features["mean__autocorrelation__lag_1"], -1.0));
        assert!(close(features["mean__autocorrelation__lag_2"], 1.0));
        assert!(features["mean__autocorrelation__lag_6"].is_nan());
        assert!(run(autocorrelation, &[2.0, 2.0])["mean__autocorrelation__lag_1"].is_nan());
    }

    #[test]
    fn pacf_lag_one_matches_acf() {
        let x = (0..40).map(|i| ((i * 37) % 11) as f64).collect::<Vec<_>>();
        let features = run(partial_autocorrelation, &x);
        let acov = adjusted_autocovariance(&x, 1);
        assert_eq!(features["mean__partial_autocorrelation__lag_0"], 1.0);
        assert!(close(features["mean__partial_autocorrelation__lag_1"], acov[1] / acov[0]));
        assert!(features["mean__partial_autocorrelation__lag_9"].is_finite());
    }

    #[test]
    fn pacf_is_capped_by_length() {
        let x = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let features = run(partial_autocorrelation, &x);
        assert!(features["mean__partial_autocorrelation__lag_2"].is_finite());
        assert!(features["mean__partial_autocorrelation__lag_3"].is_nan());
        assert!(run(partial_autocorrelation, &[1.0])["mean__partial_autocorrelation__lag_0"].is_nan());
    }

    #[test]
    fn durbin_levinson_for_ar1() {
        // an AR(1) autocorrelation has no partial correlation past lag one
        let rho = [1.0, 0.5, 0.25, 0.125];
        let pacf = durbin_levinson(&rho, 3);
        assert!(close(pacf[1], 0.5));
        assert!(close(pacf[2], 0.0));
        assert!(close(pacf[3], 0.0));
    }

    #[test]
    fn aggregated_autocorrelation() {
        let features = run(agg_autocorrelation, &[3.0, 3.0, 3.0]);
        assert_eq!(features["mean__agg_autocorrelation__f_agg_\"mean\"__maxlag_40"], 0.0);
        let x = [1.0, -1.0, 1.0, -1.0];
        let features = run(agg_autocorrelation, &x);
        // adjusted lags 1..3: -1, 1, -1
        assert!(close(features["mean__agg_autocorrelation__f_agg_\"mean\"__maxlag_40"], -1.0 / 3.0));
        assert!(close(features["mean__agg_autocorrelation__f_agg_\"median\"__maxlag_40"], -1.0));
    }
}
