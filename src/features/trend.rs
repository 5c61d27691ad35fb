use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::features::simple::{max, min};
use crate::statistics::regression::{autoregression, LinearFit};
use crate::statistics::shared::{mean, variance};

const AR_ORDER: usize = 10;

fn attribute(fit: Option<&LinearFit>, name: &str) -> f64 {
    match (fit, name) {
        (Some(fit), "pvalue") => fit.pvalue,
        (Some(fit), "rvalue") => fit.rvalue,
        (Some(fit), "intercept") => fit.intercept,
        (Some(fit), "slope") => fit.slope,
        (Some(fit), "stderr") => fit.stderr,
        _ => f64::NAN,
    }
}

fn index_axis(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// Regression of the values against their position.
pub fn linear_trend(x: &[f64], sink: &mut FeatureSink) {
    let fit = LinearFit::fit(&index_axis(x.len()), x);
    for attr in ["pvalue", "rvalue", "intercept", "slope", "stderr"] {
        sink.emit("linear_trend", &[("attr", Param::Str(attr))], attribute(fit.as_ref(), attr));
    }
}

/// Regression over chunk aggregates; the final chunk may be shorter.
pub fn agg_linear_trend(x: &[f64], sink: &mut FeatureSink) {
    let aggregations: [(&str, fn(&[f64]) -> f64); 4] = [
        ("max", max),
        ("min", min),
        ("mean", mean),
        ("var", variance),
    ];
    for chunk_len in [5usize, 10, 50] {
        for (name, aggregate) in aggregations {
            let aggregated = x.chunks(chunk_len)
                .map(aggregate)
                .collect::<Vec<_>>();
            let fit = if aggregated.len() > 1 {
                LinearFit::fit(&index_axis(aggregated.len()), &aggregated)
            } else {
                None
            };
            for attr in ["rvalue", "intercept", "slope", "stderr"] {
                sink.emit("agg_linear_trend",
                          &[
                              ("attr", Param::Str(attr)),
                              ("chunk_len", Param::Int(chunk_len as i64)),
                              ("f_agg", Param::Str(name)),
                          ],
                          attribute(fit.as_ref(), attr));
            }
        }
    }
}

/// Coefficients of an AR(10) model with intercept; `coeff_0` is the intercept.
pub fn ar_coefficient(x: &[f64], sink: &mut FeatureSink) {
    let coefficients = autoregression(x, AR_ORDER);
    for coeff in 0..=AR_ORDER {
        let value = coefficients.as_ref()
            .and_then(|c| c.get(coeff).copied())
            .unwrap_or(f64::NAN);
        sink.emit("ar_coefficient",
                  &[("coeff", Param::Int(coeff as i64)), ("k", Param::Int(AR_ORDER as i64))],
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
    fn trend_of_a_line() {
        let x = (0..10).map(|i| 2.0 + 0.5 * i as f64).collect::<Vec<_>>();
        let features = run(linear_trend, &x);
        assert!(close(features["mean__linear_trend__attr_\"slope\""], 0.5));
        assert!(close(features["mean__linear_trend__attr_\"intercept\""], 2.0));
        assert!(close(features["mean__linear_trend__attr_\"rvalue\""], 1.0));
        assert!(features["mean__linear_trend__attr_\"pvalue\""] < 1e-9);
    }

    #[test]
    fn single_value_has_no_trend() {
        let features = run(linear_trend, &[4.0]);
        assert!(features.values().all(|v| v.is_nan()));
    }

    #[test]
    fn chunked_trend() {
        let x = (0..20).map(|i| i as f64).collect::<Vec<_>>();
        let features = run(agg_linear_trend, &x);
        // chunk maxima 4, 9, 14, 19
        assert!(close(features["mean__agg_linear_trend__attr_\"slope\"__chunk_len_5__f_agg_\"max\""], 5.0));
        assert!(close(features["mean__agg_linear_trend__attr_\"intercept\"__chunk_len_5__f_agg_\"max\""], 4.0));
        // chunk variances are all equal
        assert!(close(features["mean__agg_linear_trend__attr_\"slope\"__chunk_len_5__f_agg_\"var\""], 0.0));
        // a single chunk cannot carry a trend
        assert!(features["mean__agg_linear_trend__attr_\"slope\"__chunk_len_50__f_agg_\"mean\""].is_nan());
    }

    #[test]
    fn ar_coefficients_need_enough_data() {
        let short = run(ar_coefficient, &[1.0, 2.0, 3.0]);
        assert_eq!(short.len(), 11);
        assert!(short.values().all(|v| v.is_nan()));

        let long = (0..200)
            .map(|i| ((i * 7919) % 101) as f64 / 10.0)
            .collect::<Vec<_>>();
        let features = run(ar_coefficient, &long);
        assert!(features["mean__ar_coefficient__coeff_0__k_10"].is_finite());
        assert!(features["mean__ar_coefficient__coeff_10__k_10"].is_finite());
    }
}
