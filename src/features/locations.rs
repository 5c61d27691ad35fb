use crate::features::FeatureSink;
use crate::features::naming::Param;
use crate::features::simple::{max, min};
use crate::statistics::shared::mean;

pub fn count_above_mean(x: &[f64], sink: &mut FeatureSink) {
    let m = mean(x);
    sink.emit("count_above_mean", &[], x.iter().filter(|v| **v > m).count() as f64);
}

pub fn count_below_mean(x: &[f64], sink: &mut FeatureSink) {
    let m = mean(x);
    sink.emit("count_below_mean", &[], x.iter().filter(|v| **v < m).count() as f64);
}

pub fn longest_strike_above_mean(x: &[f64], sink: &mut FeatureSink) {
    let m = mean(x);
    sink.emit("longest_strike_above_mean", &[], longest_run(x, |v| v > m) as f64);
}

pub fn longest_strike_below_mean(x: &[f64], sink: &mut FeatureSink) {
    let m = mean(x);
    sink.emit("longest_strike_below_mean", &[], longest_run(x, |v| v < m) as f64);
}

fn longest_run(x: &[f64], predicate: impl Fn(f64) -> bool) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for v in x {
        if predicate(*v) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

// ##### Locations (relative to the series length) #####

pub fn first_location_of_maximum(x: &[f64], sink: &mut FeatureSink) {
    let target = max(x);
    let location = x.iter().position(|v| *v == target);
    sink.emit("first_location_of_maximum", &[], relative(location, x.len(), 0));
}

pub fn last_location_of_maximum(x: &[f64], sink: &mut FeatureSink) {
    let target = max(x);
    let location = x.iter().rposition(|v| *v == target);
    sink.emit("last_location_of_maximum", &[], relative(location, x.len(), 1));
}

pub fn first_location_of_minimum(x: &[f64], sink: &mut FeatureSink) {
    let target = min(x);
    let location = x.iter().position(|v| *v == target);
    sink.emit("first_location_of_minimum", &[], relative(location, x.len(), 0));
}

pub fn last_location_of_minimum(x: &[f64], sink: &mut FeatureSink) {
    let target = min(x);
    let location = x.iter().rposition(|v| *v == target);
    sink.emit("last_location_of_minimum", &[], relative(location, x.len(), 1));
}

fn relative(location: Option<usize>, n: usize, offset: usize) -> f64 {
    match location {
        Some(index) if n > 0 => (index + offset) as f64 / n as f64,
        _ => f64::NAN,
    }
}

/// Relative index at which `q` of the absolute mass of the series lies to the left.
pub fn index_mass_quantile(x: &[f64], sink: &mut FeatureSink) {
    let total = x.iter().map(|v| v.abs()).sum::<f64>();
    let mut cumulative = Vec::with_capacity(x.len());
    let mut running = 0.0;
    for v in x {
        running += v.abs();
        cumulative.push(running / total);
    }
    for q in [0.1, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9] {
        let value = if total == 0.0 {
            f64::NAN
        } else {
            let index = cumulative.iter().position(|c| *c >= q).unwrap_or(0);
            (index + 1) as f64 / x.len() as f64
        };
        sink.emit("index_mass_quantile", &[("q", Param::Float(q))], value);
    }
}

/// Share of the total energy contained in each of ten near-equal segments.
pub fn energy_ratio_by_chunks(x: &[f64], sink: &mut FeatureSink) {
    const SEGMENTS: usize = 10;
    let total = x.iter().map(|v| v * v).sum::<f64>();
    let base = x.len() / SEGMENTS;
    let larger = x.len() % SEGMENTS;
    let mut start = 0;
    for focus in 0..SEGMENTS {
        let size = base + usize::from(focus < larger);
        let energy = x[start..start + size].iter().map(|v| v * v).sum::<f64>();
        start += size;
        let value = if total == 0.0 { f64::NAN } else { energy / total };
        sink.emit("energy_ratio_by_chunks",
                  &[("num_segments", Param::Int(SEGMENTS as i64)), ("segment_focus", Param::Int(focus as i64))],
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

    #[test]
    fn counts_and_strikes() {
        let x = [1.0, 5.0, 6.0, 7.0, 1.0, 1.0, 1.0, 2.0];
        // mean is 3
        assert_eq!(run(count_above_mean, &x)["mean__count_above_mean"], 3.0);
        assert_eq!(run(count_below_mean, &x)["mean__count_below_mean"], 5.0);
        assert_eq!(run(longest_strike_above_mean, &x)["mean__longest_strike_above_mean"], 3.0);
        assert_eq!(run(longest_strike_below_mean, &x)["mean__longest_strike_below_mean"], 4.0);
        assert_eq!(run(longest_strike_above_mean, &[2.0, 2.0])["mean__longest_strike_above_mean"], 0.0);
    }

    #[test]
    fn locations_of_extremes() {
        let x = [3.0, 1.0, 3.0, 1.0, 2.0];
        assert_eq!(run(first_location_of_maximum, &x)["mean__first_location_of_maximum"], 0.0);
        assert_eq!(run(last_location_of_maximum, &x)["mean__last_location_of_maximum"], 0.6);
        assert_eq!(run(first_location_of_minimum, &x)["mean__first_location_of_minimum"], 0.2);
        assert_eq!(run(last_location_of_minimum, &x)["mean__last_location_of_minimum"], 0.8);
    }

    #[test]
    fn mass_quantiles() {
        let x = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let features = run(index_mass_quantile, &x);
        assert_eq!(features["mean__index_mass_quantile__q_0.1"], 0.1);
        assert_eq!(features["mean__index_mass_quantile__q_0.9"], 0.9);
        assert!(run(index_mass_quantile, &[0.0, 0.0])["mean__index_mass_quantile__q_0.4"].is_nan());
    }

    #[test]
    fn energy_segments_sum_to_one() {
        let x = (1..=23).map(|v| v as f64).collect::<Vec<_>>();
        let features = run(energy_ratio_by_chunks, &x);
        let total = features.values().sum::<f64>();
        assert!((total - 1.0).abs() < 1e-12);
        // 23 values: the first three segments hold three values each
        let first = features["mean__energy_ratio_by_chunks__num_segments_10__segment_focus_0"];
        let energy = x.iter().map(|v| v * v).sum::<f64>();
        assert!((first - 14.0 / energy).abs() < 1e-12);
    }

    #[test]
    fn short_series_has_empty_segments() {
        let features = run(energy_ratio_by_chunks, &[2.0, 2.0]);
        assert_eq!(features["mean__energy_ratio_by_chunks__num_segments_10__segment_focus_0"], 0.5);
        assert_eq!(features["mean__energy_ratio_by_chunks__num_segments_10__segment_focus_9"], 0.0);
    }
}
