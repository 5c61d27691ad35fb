use std::collections::{HashMap, HashSet};
use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::features::simple::{max, min};

/// Shannon entropy of the values after binning into ten equal-width bins.
pub fn binned_entropy(x: &[f64], sink: &mut FeatureSink) {
    const BINS: usize = 10;
    let (lower, upper) = (min(x), max(x));
    let value = if x.is_empty() {
        f64::NAN
    } else if lower == upper {
        0.0
    } else {
        let mut histogram = [0usize; BINS];
        let width = (upper - lower) / BINS as f64;
        for v in x {
            let bin = (((v - lower) / width) as usize).min(BINS - 1);
            histogram[bin] += 1;
        }
        -histogram.iter()
            .filter(|count| **count > 0)
            .map(|count| {
                let p = *count as f64 / x.len() as f64;
                p * p.ln()
            })
            .sum::<f64>()
    };
    sink.emit("binned_entropy", &[("max_bins", Param::Int(BINS as i64))], value);
}

/// Entropy of the ordinal patterns of consecutive windows.
pub fn permutation_entropy(x: &[f64], sink: &mut FeatureSink) {
    for dimension in 3..=7usize {
        let value = if x.len() < dimension {
            f64::NAN
        } else {
            let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
            let windows = x.windows(dimension);
            let total = windows.len();
            for window in windows {
                *counts.entry(ordinal_pattern(window)).or_default() += 1;
            }
            -counts.values()
                .map(|count| {
                    let p = *count as f64 / total as f64;
                    p * p.ln()
                })
                .sum::<f64>()
        };
        sink.emit("permutation_entropy",
                  &[("dimension", Param::Int(dimension as i64)), ("tau", Param::Int(1))],
                  value);
    }
}

/// Rank of every element within its window; ties ranked by position.
fn ordinal_pattern(window: &[f64]) -> Vec<usize> {
    let mut order = (0..window.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| window[*a].partial_cmp(&window[*b]).unwrap_or(std::cmp::Ordering::Equal));
    let mut ranks = vec![0; window.len()];
    for (rank, index) in order.into_iter().enumerate() {
        ranks[index] = rank;
    }
    ranks
}

/// Lempel-Ziv complexity of the series quantised into equal-width levels.
pub fn lempel_ziv_complexity(x: &[f64], sink: &mut FeatureSink) {
    for bins in [2usize, 3, 5, 10, 100] {
        let value = if x.is_empty() {
            f64::NAN
        } else {
            let sequence = quantise(x, bins);
            let mut seen: HashSet<&[usize]> = HashSet::new();
            let n = sequence.len();
            let mut start = 0;
            let mut length = 1;
            while start + length <= n {
                let word = &sequence[start..start + length];
                if seen.contains(word) {
                    length += 1;
                } else {
                    seen.insert(word);
                    start += length;
                    length = 1;
                }
            }
            seen.len() as f64 / n as f64
        };
        sink.emit("lempel_ziv_complexity", &[("bins", Param::Int(bins as i64))], value);
    }
}

/// Level of every value: how many of the upper bin edges lie strictly below it.
fn quantise(x: &[f64], bins: usize) -> Vec<usize> {
    let (lower, upper) = (min(x), max(x));
    let edges = (1..=bins)
        .map(|i| lower + (upper - lower) * i as f64 / bins as f64)
        .collect::<Vec<_>>();
    x.iter()
        .map(|v| edges.iter().filter(|edge| **edge < *v).count())
        .collect()
}
