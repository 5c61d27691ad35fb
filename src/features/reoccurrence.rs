use itertools::Itertools;
use crate::features::FeatureSink;
use crate::features::simple::{max, min, ratio};
use crate::statistics::shared::sorted;

/// `(value, occurrences)` for every distinct value, ascending.
fn value_counts(x: &[f64]) -> Vec<(f64, usize)> {
    let ordered = sorted(x);
    let chunks = ordered.iter().chunk_by(|v| **v);
    let counts = chunks.into_iter()
        .map(|(value, group)| (value, group.count()))
        .collect();
    counts
}

pub fn has_duplicate(x: &[f64], sink: &mut FeatureSink) {
    sink.emit_flag("has_duplicate", &[], value_counts(x).len() != x.len());
}

pub fn has_duplicate_max(x: &[f64], sink: &mut FeatureSink) {
    let target = max(x);
    sink.emit_flag("has_duplicate_max", &[], x.iter().filter(|v| **v == target).count() >= 2);
}

pub fn has_duplicate_min(x: &[f64], sink: &mut FeatureSink) {
    let target = min(x);
    sink.emit_flag("has_duplicate_min", &[], x.iter().filter(|v| **v == target).count() >= 2);
}

pub fn percentage_of_reoccurring_datapoints_to_all_datapoints(x: &[f64], sink: &mut FeatureSink) {
    let reoccurring = value_counts(x).into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(_, count)| count)
        .sum::<usize>();
    sink.emit("percentage_of_reoccurring_datapoints_to_all_datapoints", &[], ratio(reoccurring, x.len()));
}

pub fn percentage_of_reoccurring_values_to_all_values(x: &[f64], sink: &mut FeatureSink) {
    let counts = value_counts(x);
    let value = if counts.is_empty() {
        0.0
    } else {
        counts.iter().filter(|(_, count)| *count > 1).count() as f64 / counts.len() as f64
    };
    sink.emit("percentage_of_reoccurring_values_to_all_values", &[], value);
}

pub fn sum_of_reoccurring_values(x: &[f64], sink: &mut FeatureSink) {
    let total = value_counts(x).into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value)
        .sum::<f64>();
    sink.emit("sum_of_reoccurring_values", &[], total);
}

pub fn sum_of_reoccurring_data_points(x: &[f64], sink: &mut FeatureSink) {
    let total = value_counts(x).into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, count)| value * count as f64)
        .sum::<f64>();
    sink.emit("sum_of_reoccurring_data_points", &[], total);
}

pub fn ratio_value_number_to_time_series_length(x: &[f64], sink: &mut FeatureSink) {
    sink.emit("ratio_value_number_to_time_series_length", &[], ratio(value_counts(x).len(), x.len()));
}
