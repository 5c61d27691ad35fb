use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::statistics::shared::{diff, mean as mean_of, pearson, quantile_of_sorted, sorted, std_dev, variance as variance_of};

// ##### Minimal #####

pub fn sum_values(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("sum_values", &[], x.iter().sum());
}

pub fn median(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("median", &[], quantile_of_sorted(&sorted(x), 0.5));
}

pub fn mean(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("mean", &[], mean_of(x));
}

pub fn length(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("length", &[], x.len() as f64);
}

pub fn standard_deviation(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("standard_deviation", &[], std_dev(x));
}

pub fn variance(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("variance", &[], variance_of(x));
}

pub fn root_mean_square(x: &[f64], sink: &mut FeatureSink) {
    let value = if x.is_empty() {
        f64::NAN
    } else {
        (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
    };
    sink.emit("root_mean_square", &[], value);
}

pub fn maximum(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("maximum", &[], max(x));
}

pub fn absolute_maximum(x: &[f64], sink: &mut FeatureSink) {
    let value = x.iter().map(|v| v.abs()).fold(f64::NAN, f64::max);
    sink.emit("absolute_maximum", &[], value);
}

pub fn minimum(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("minimum", &[], min(x));
}

// ##### Changes #####

pub fn abs_energy(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("abs_energy", &[], x.iter().map(|v| v * v).sum());
}

pub fn absolute_sum_of_changes(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("absolute_sum_of_changes", &[], diff(x).iter().map(|d| d.abs()).sum());
}

pub fn mean_abs_change(x: &[f64], sink: &mut FeatureSink) {
    let changes = diff(x).iter().map(|d| d.abs()).collect::<Vec<_>>();
    sink.emit("mean_abs_change", &[], mean_of(&changes));
}

pub fn mean_change(x: &[f64], sink: &mut FeatureSink) {
    let value = if x.len() > 1 {
        (x[x.len() - 1] - x[0]) / (x.len() - 1) as f64
    } else {
        f64::NAN
    };
    sink.emit("mean_change", &[], value);
}

pub fn mean_second_derivative_central(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len();
    let value = if n > 2 {
        (x[n - 1] - x[n - 2] - x[1] + x[0]) / (2.0 * (n - 2) as f64)
    } else {
        f64::NAN
    };
    sink.emit("mean_second_derivative_central", &[], value);
}

// ##### Shape #####

/// Adjusted Fisher-Pearson skewness; zero for a constant series.
pub fn skewness(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len() as f64;
    let value = if x.len() < 3 {
        f64::NAN
    } else {
        let m = mean_of(x);
        let m2 = x.iter().map(|v| (v - m).powi(2)).sum::<f64>();
        let m3 = x.iter().map(|v| (v - m).powi(3)).sum::<f64>();
        if m2 == 0.0 {
            0.0
        } else {
            (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
        }
    };
    sink.emit("skewness", &[], value);
}

/// Unbiased excess kurtosis; zero for a constant series.
pub fn kurtosis(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len() as f64;
    let value = if x.len() < 4 {
        f64::NAN
    } else {
        let m = mean_of(x);
        let m2 = x.iter().map(|v| (v - m).powi(2)).sum::<f64>();
        let m4 = x.iter().map(|v| (v - m).powi(4)).sum::<f64>();
        let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
        let numerator = n * (n + 1.0) * (n - 1.0) * m4;
        let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
        if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator - adjustment
        }
    };
    sink.emit("kurtosis", &[], value);
}

pub fn variation_coefficient(x: &[f64], sink: &mut FeatureSink) {
    let m = mean_of(x);
    let value = if m != 0.0 { std_dev(x) / m } else { f64::NAN };
    sink.emit("variation_coefficient", &[], value);
}

pub fn variance_larger_than_standard_deviation(x: &[f64], sink: &mut FeatureSink) {
    let var = variance_of(x);
    sink.emit_flag("variance_larger_than_standard_deviation", &[], var > var.sqrt());
}

pub fn large_standard_deviation(x: &[f64], sink: &mut FeatureSink) {
    let spread = max(x) - min(x);
    let sd = std_dev(x);
    for step in 1..20 {
        let r = step as f64 * 0.05;
        sink.emit_flag("large_standard_deviation", &[("r", Param::Float(r))], sd > r * spread);
    }
}

pub fn symmetry_looking(x: &[f64], sink: &mut FeatureSink) {
    let ordered = sorted(x);
    let mean_median_difference = (mean_of(x) - quantile_of_sorted(&ordered, 0.5)).abs();
    let spread = max(x) - min(x);
    for step in 0..20 {
        let r = step as f64 * 0.05;
        sink.emit_flag("symmetry_looking", &[("r", Param::Float(r))], mean_median_difference < r * spread);
    }
}

pub fn quantile(x: &[f64], sink: &mut FeatureSink) {
    let ordered = sorted(x);
    for q in [0.1, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9] {
        sink.emit("quantile", &[("q", Param::Float(q))], quantile_of_sorted(&ordered, q));
    }
}

pub fn ratio_beyond_r_sigma(x: &[f64], sink: &mut FeatureSink) {
    let m = mean_of(x);
    let sd = std_dev(x);
    let rs = [
        (Param::Float(0.5), 0.5), (Param::Int(1), 1.0), (Param::Float(1.5), 1.5),
        (Param::Int(2), 2.0), (Param::Float(2.5), 2.5), (Param::Int(3), 3.0),
        (Param::Int(5), 5.0), (Param::Int(6), 6.0), (Param::Int(7), 7.0), (Param::Int(10), 10.0),
    ];
    for (r, factor) in rs {
        let beyond = x.iter().filter(|v| (*v - m).abs() > factor * sd).count();
        sink.emit("ratio_beyond_r_sigma", &[("r", r)], ratio(beyond, x.len()));
    }
}

pub fn count_above(x: &[f64], sink: &mut FeatureSink) {
    let above = x.iter().filter(|v| **v >= 0.0).count();
    sink.emit("count_above", &[("t", Param::Int(0))], ratio(above, x.len()));
}

pub fn count_below(x: &[f64], sink: &mut FeatureSink) {
    let below = x.iter().filter(|v| **v <= 0.0).count();
    sink.emit("count_below", &[("t", Param::Int(0))], ratio(below, x.len()));
}

pub fn value_count(x: &[f64], sink: &mut FeatureSink) {
    for value in [0, 1, -1] {
        let count = x.iter().filter(|v| **v == value as f64).count();
        sink.emit("value_count", &[("value", Param::Int(value))], count as f64);
    }
}

pub fn range_count(x: &[f64], sink: &mut FeatureSink) {
    let ranges = [
        (Param::Int(-1), Param::Int(1), -1.0, 1.0),
        (Param::Float(-1e12), Param::Int(0), -1e12, 0.0),
        (Param::Int(0), Param::Float(1e12), 0.0, 1e12),
    ];
    for (min_param, max_param, lower, upper) in ranges {
        let count = x.iter().filter(|v| **v >= lower && **v < upper).count();
        sink.emit("range_count", &[("min", min_param), ("max", max_param)], count as f64);
    }
}

pub fn mean_n_absolute_max(x: &[f64], sink: &mut FeatureSink) {
    let ordered = sorted(&x.iter().map(|v| v.abs()).collect::<Vec<_>>());
    for maxima in [3usize, 5, 7] {
        let value = if x.len() > maxima {
            mean_of(&ordered[ordered.len() - maxima..])
        } else {
            f64::NAN
        };
        sink.emit("mean_n_absolute_max", &[("number_of_maxima", Param::Int(maxima as i64))], value);
    }
}

/// Correlation between the first-digit distribution and Benford's law.
pub fn benford_correlation(x: &[f64], sink: &mut FeatureSink) {
    let digits = x.iter()
        .map(|v| {
            let v = if v.is_finite() { v.abs() } else { f64::MAX };
            format!("{:e}", v)
                .chars()
                .next()
                .and_then(|c| c.to_digit(10))
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();
    let benford = (1..10)
        .map(|d| (1.0 + 1.0 / d as f64).log10())
        .collect::<Vec<_>>();
    let observed = (1..10u32)
        .map(|d| ratio(digits.iter().filter(|x| **x == d).count(), digits.len()))
        .collect::<Vec<_>>();
    sink.emit("benford_correlation", &[], pearson(&benford, &observed));
}

pub fn number_crossing_m(x: &[f64], sink: &mut FeatureSink) {
    for m in [0, -1, 1] {
        let threshold = m as f64;
        let crossings = x.iter()
            .map(|v| *v > threshold)
            .collect::<Vec<_>>()
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count();
        sink.emit("number_crossing_m", &[("m", Param::Int(m))], crossings as f64);
    }
}

/// Counts values larger than their `n` neighbours on both sides.
pub fn number_peaks(x: &[f64], sink: &mut FeatureSink) {
    for support in [1usize, 3, 5, 10, 50] {
        let peaks = if x.len() <= 2 * support {
            0
        } else {
            (support..x.len() - support)
                .filter(|&j| (1..=support).all(|i| x[j] > x[j - i] && x[j] > x[j + i]))
                .count()
        };
        sink.emit("number_peaks", &[("n", Param::Int(support as i64))], peaks as f64);
    }
}

pub fn c3(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len();
    for lag in 1..=3usize {
        let value = if 2 * lag >= n {
            0.0
        } else {
            let products = (0..n - 2 * lag)
                .map(|i| x[i + 2 * lag] * x[i + lag] * x[i])
                .collect::<Vec<_>>();
            mean_of(&products)
        };
        sink.emit("c3", &[("lag", Param::Int(lag as i64))], value);
    }
}

pub fn time_reversal_asymmetry_statistic(x: &[f64], sink: &mut FeatureSink) {
    let n = x.len();
    for lag in 1..=3usize {
        let value = if 2 * lag >= n {
            0.0
        } else {
            let terms = (0..n - 2 * lag)
                .map(|i| {
                    let one = x[i + lag];
                    let two = x[i + 2 * lag];
                    two * two * one - one * x[i] * x[i]
                })
                .collect::<Vec<_>>();
            mean_of(&terms)
        };
        sink.emit("time_reversal_asymmetry_statistic", &[("lag", Param::Int(lag as i64))], value);
    }
}

/// Complexity estimate: length of the stretched-out series.
pub fn cid_ce(x: &[f64], sink: &mut FeatureSink) {
    for normalize in [true, false] {
        let value = if normalize {
            let sd = std_dev(x);
            if sd != 0.0 {
                let m = mean_of(x);
                let z = x.iter().map(|v| (v - m) / sd).collect::<Vec<_>>();
                complexity(&z)
            } else {
                0.0
            }
        } else {
            complexity(x)
        };
        sink.emit("cid_ce", &[("normalize", Param::Bool(normalize))], value);
    }
}

fn complexity(x: &[f64]) -> f64 {
    diff(x).iter().map(|d| d * d).sum::<f64>().sqrt()
}

pub(super) fn max(x: &[f64]) -> f64 {
    x.iter().copied().fold(f64::NAN, f64::max)
}

pub(super) fn min(x: &[f64]) -> f64 {
    x.iter().copied().fold(f64::NAN, f64::min)
}

pub(super) fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        count as f64 / total as f64
    }
}
