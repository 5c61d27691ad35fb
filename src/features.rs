//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Imports
//////////////////////////////////////////////////////////////////////////////////////////////////

use std::collections::{BTreeMap, BTreeSet, HashSet};
use indicatif::{ProgressBar, ProgressStyle};
use crate::datasets::feature_matrix::FeatureMatrix;
use crate::features::naming::{feature_name, Param};

pub mod naming;
mod simple;
mod locations;
mod reoccurrence;
mod correlation;
mod entropy;
mod trend;
mod spectral;
mod changes;

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Calculators and Profiles
//////////////////////////////////////////////////////////////////////////////////////////////////

/// A feature calculator emits every parameterisation it owns into the sink,
/// using NaN where the series does not allow a value.
pub type Calculator = fn(&[f64], &mut FeatureSink);

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Minimal,
    Efficient,
}

const MINIMAL: &[Calculator] = &[
    simple::sum_values,
    simple::median,
    simple::mean,
    simple::length,
    simple::standard_deviation,
    simple::variance,
    simple::root_mean_square,
    simple::maximum,
    simple::absolute_maximum,
    simple::minimum,
];

const EFFICIENT_EXTRA: &[Calculator] = &[
    simple::abs_energy,
    simple::absolute_sum_of_changes,
    simple::mean_abs_change,
    simple::mean_change,
    simple::mean_second_derivative_central,
    simple::skewness,
    simple::kurtosis,
    simple::variation_coefficient,
    simple::variance_larger_than_standard_deviation,
    simple::large_standard_deviation,
    simple::symmetry_looking,
    simple::quantile,
    simple::ratio_beyond_r_sigma,
    simple::count_above,
    simple::count_below,
    simple::value_count,
    simple::range_count,
    simple::mean_n_absolute_max,
    simple::benford_correlation,
    simple::number_crossing_m,
    simple::number_peaks,
    simple::c3,
    simple::time_reversal_asymmetry_statistic,
    simple::cid_ce,
    locations::count_above_mean,
    locations::count_below_mean,
    locations::longest_strike_above_mean,
    locations::longest_strike_below_mean,
    locations::first_location_of_maximum,
    locations::last_location_of_maximum,
    locations::first_location_of_minimum,
    locations::last_location_of_minimum,
    locations::index_mass_quantile,
    locations::energy_ratio_by_chunks,
    reoccurrence::has_duplicate,
    reoccurrence::has_duplicate_max,
    reoccurrence::has_duplicate_min,
    reoccurrence::percentage_of_reoccurring_datapoints_to_all_datapoints,
    reoccurrence::percentage_of_reoccurring_values_to_all_values,
    reoccurrence::sum_of_reoccurring_values,
    reoccurrence::sum_of_reoccurring_data_points,
    reoccurrence::ratio_value_number_to_time_series_length,
    correlation::autocorrelation,
    correlation::partial_autocorrelation,
    correlation::agg_autocorrelation,
    entropy::binned_entropy,
    entropy::permutation_entropy,
    entropy::lempel_ziv_complexity,
    trend::linear_trend,
    trend::agg_linear_trend,
    trend::ar_coefficient,
    spectral::fft_coefficient,
    spectral::fft_aggregated,
    changes::change_quantiles,
];

impl Profile {
    pub fn calculators(&self) -> Vec<Calculator> {
        match self {
            Profile::Minimal => MINIMAL.to_vec(),
            Profile::Efficient => MINIMAL.iter()
                .chain(EFFICIENT_EXTRA.iter())
                .copied()
                .collect(),
        }
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Sink
//////////////////////////////////////////////////////////////////////////////////////////////////

pub struct FeatureSink {
    column: String,
    features: Vec<(String, f64)>,
}

impl FeatureSink {
    pub fn new(column: &str) -> Self {
        Self { column: column.to_string(), features: Vec::new() }
    }

    pub fn emit(&mut self, calculator: &str, params: &[(&str, Param)], value: f64) {
        let name = feature_name(&self.column, calculator, params);
        self.features.push((name, value));
    }

    pub fn emit_flag(&mut self, calculator: &str, params: &[(&str, Param)], flag: bool) {
        self.emit(calculator, params, if flag { 1.0 } else { 0.0 });
    }

    pub fn into_features(self) -> Vec<(String, f64)> {
        self.features
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Extraction
//////////////////////////////////////////////////////////////////////////////////////////////////

pub struct FeatureExtractor {
    column: String,
    calculators: Vec<Calculator>,
    show_progress: bool,
}

impl FeatureExtractor {
    pub fn new(column: &str, profile: Profile) -> Self {
        Self { column: column.to_string(), calculators: profile.calculators(), show_progress: false }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Runs every calculator over one ordered series.
    pub fn extract_series(&self, values: &[f64]) -> anyhow::Result<Vec<(String, f64)>> {
        let mut sink = FeatureSink::new(&self.column);
        for calculator in self.calculators.iter() {
            calculator(values, &mut sink);
        }
        let features = sink.into_features();
        let mut seen = HashSet::new();
        for (name, _) in features.iter() {
            if !seen.insert(name.as_str()) {
                return Err(anyhow::anyhow!("Feature {} computed more than once", name));
            }
        }
        Ok(features)
    }

    /// One row per series, one column per feature; columns in ascending order.
    pub fn extract(&self, series: &BTreeMap<String, Vec<f64>>) -> anyhow::Result<FeatureMatrix> {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(series.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut rows = Vec::with_capacity(series.len());
        let mut columns = BTreeSet::new();
        for (id, values) in series.iter() {
            progress.set_message(id.clone());
            let features = self.extract_series(values)
                .map_err(|e| anyhow::anyhow!("{}: {}", id, e))?;
            columns.extend(features.iter().map(|(name, _)| name.clone()));
            rows.push((id.clone(), features.into_iter().collect::<BTreeMap<_, _>>()));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let columns = columns.into_iter().collect::<Vec<_>>();
        let mut matrix = FeatureMatrix::new(columns);
        for (id, features) in rows {
            matrix.push_row_from_map(id, &features);
        }
        Ok(matrix)
    }
}

/// Every column the profile can produce, computed on a long varied series.
pub fn feature_names(column: &str, profile: Profile) -> anyhow::Result<Vec<String>> {
    let sample = (0..400)
        .map(|i| {
            let t = i as f64;
            (t / 7.0).sin() * 3.0 + (t / 3.0).cos() + (i % 5) as f64 - 2.0
        })
        .collect::<Vec<_>>();
    let extractor = FeatureExtractor::new(column, profile);
    let mut names = extractor.extract_series(&sample)?
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    names.sort();
    Ok(names)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(&str, Vec<f64>)]) -> BTreeMap<String, Vec<f64>> {
        values.iter()
            .map(|(id, v)| (id.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn minimal_profile_columns() {
        let names = feature_names("mean", Profile::Minimal).unwrap();
        assert_eq!(names, vec![
            "mean__absolute_maximum", "mean__length", "mean__maximum", "mean__mean",
            "mean__median", "mean__minimum", "mean__root_mean_square",
            "mean__standard_deviation", "mean__sum_values", "mean__variance",
        ]);
    }

    #[test]
    fn efficient_profile_has_no_duplicate_columns() {
        let names = feature_names("mean", Profile::Efficient).unwrap();
        let unique = names.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), names.len());
        assert!(names.contains(&"mean__quantile__q_0.1".to_string()));
        assert!(names.contains(&"mean__fft_coefficient__attr_\"abs\"__coeff_99".to_string()));
        assert!(names.contains(&"mean__ar_coefficient__coeff_10__k_10".to_string()));
        assert!(names.contains(&"mean__large_standard_deviation__r_0.05".to_string()));
    }

    #[test]
    fn column_set_is_independent_of_series() {
        let extractor = FeatureExtractor::new("mean", Profile::Efficient);
        let short = extractor.extract_series(&[1.0]).unwrap();
        let long = extractor.extract_series(&(0..100).map(|i| i as f64).collect::<Vec<_>>()).unwrap();
        let mut a = short.into_iter().map(|(n, _)| n).collect::<Vec<_>>();
        let mut b = long.into_iter().map(|(n, _)| n).collect::<Vec<_>>();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn one_row_per_series_in_id_order() {
        let extractor = FeatureExtractor::new("mean", Profile::Minimal);
        let matrix = extractor.extract(&series(&[
            ("Peru", vec![1.0, 2.0, 3.0]),
            ("Chile", vec![2.0, 2.0]),
        ])).unwrap();
        assert_eq!(matrix.ids(), &["Chile".to_string(), "Peru".to_string()]);
        assert_eq!(matrix.value("Peru", "mean__sum_values"), Some(6.0));
        assert_eq!(matrix.value("Chile", "mean__length"), Some(2.0));
    }
}
