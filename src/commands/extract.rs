use std::path::{Path, PathBuf};
use crate::datasets::discovery::discover_files;
use crate::datasets::loader::{load_country_files, SkippedFile, VALUE_COLUMN};
use crate::datasets::long_table::LongTable;
use crate::features::{FeatureExtractor, Profile};

pub const ID_COLUMN: &str = "Country";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input_pattern: String,
    pub output: PathBuf,
    pub profile: Profile,
    pub fill_value: f64,
    pub summary: Option<PathBuf>,
    pub show_progress: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    input_pattern: String,
    output: PathBuf,
    profile: Profile,
    files_found: usize,
    files_loaded: usize,
    skipped_files: Vec<SkippedFile>,
    rows_before_cleaning: usize,
    rows_dropped: usize,
    countries: Vec<String>,
    features: usize,
    dropped_columns: Vec<String>,
    filled_values: usize,
}


pub fn extract_country_features(options: ExtractOptions) -> anyhow::Result<()> {
    log::info!("Looking for files in: {}", options.input_pattern);
    let files = discover_files(&options.input_pattern)?;
    log::info!("Found {} country files.", files.len());

    let outcome = load_country_files(&files);
    let files_loaded = outcome.tables.len();
    let long_table = LongTable::concat(outcome.tables, &options.input_pattern)?;
    log::info!("Data loaded and cleaned ({} rows kept, {} dropped). Starting feature extraction...",
               long_table.observations().len(), long_table.rows_dropped());

    let series = long_table.series_by_country();
    let extractor = FeatureExtractor::new(VALUE_COLUMN, options.profile)
        .with_progress(options.show_progress);
    let mut matrix = match extractor.extract(&series) {
        Ok(matrix) => matrix,
        Err(e) => {
            log::error!("Feature extraction failed: {}", e);
            return Err(e);
        }
    };

    let dropped_columns = matrix.drop_all_missing_columns();
    if !dropped_columns.is_empty() {
        log::debug!("Dropped {} features that could not be computed for any country",
                    dropped_columns.len());
    }
    let filled_values = matrix.fill_missing(options.fill_value);
    log::info!("Extracted {} features for {} countries.", matrix.columns().len(), matrix.ids().len());

    ensure_parent_directory(&options.output)?;
    matrix.write_csv(&options.output, ID_COLUMN)?;
    log::info!("Success! Saved features to: {}", options.output.display());

    if let Some(summary_path) = options.summary.as_ref() {
        let summary = RunSummary {
            input_pattern: options.input_pattern.clone(),
            output: options.output.clone(),
            profile: options.profile,
            files_found: files.len(),
            files_loaded,
            skipped_files: outcome.skipped,
            rows_before_cleaning: long_table.rows_before_cleaning(),
            rows_dropped: long_table.rows_dropped(),
            countries: matrix.ids().to_vec(),
            features: matrix.columns().len(),
            dropped_columns,
            filled_values,
        };
        ensure_parent_directory(summary_path)?;
        let file = std::fs::File::create(summary_path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &summary)?;
        log::info!("Run summary written to: {}", summary_path.display());
    }

    Ok(())
}

fn ensure_parent_directory(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn write_country(dir: &Path, name: &str, values: &[f64]) {
        let mut content = String::from("date,lower,mean,upper\n");
        for (i, v) in values.iter().enumerate() {
            content.push_str(&format!("2020-04-{:02},0.0,{},9.0\n", i + 1, v));
        }
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn options(dir: &Path, profile: Profile) -> ExtractOptions {
        ExtractOptions {
            input_pattern: format!("{}/rt_*.csv", dir.display()),
            output: dir.join("out").join("country_features.csv"),
            profile,
            fill_value: 0.0,
            summary: Some(dir.join("out").join("summary.json")),
            show_progress: false,
        }
    }

    #[test]
    fn end_to_end_minimal() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), "rt_Chile.csv", &[1.0, 1.2, 0.9]);
        write_country(dir.path(), "rt_New_Zealand.csv", &[2.0, 2.0]);
        std::fs::write(dir.path().join("rt_Broken.csv"), "day,value\n1,2\n").unwrap();

        extract_country_features(options(dir.path(), Profile::Minimal)).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("out/country_features.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Country");
        assert_eq!(headers.len(), 11);
        let rows = reader.records().map(|r| r.unwrap()).collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Chile");
        assert_eq!(&rows[1][0], "New Zealand");
        let length_index = headers.iter().position(|h| h == "mean__length").unwrap();
        assert_eq!(&rows[1][length_index], "2.0");

        let summary: serde_json::Value = serde_json::from_reader(
            std::fs::File::open(dir.path().join("out/summary.json")).unwrap()
        ).unwrap();
        assert_eq!(summary["files_found"], 3);
        assert_eq!(summary["files_loaded"], 2);
        assert_eq!(summary["skipped_files"].as_array().unwrap().len(), 1);
        assert_eq!(summary["profile"], "minimal");
    }

    #[test]
    fn efficient_profile_output_has_no_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), "rt_Chile.csv", &[1.0, 1.2, 0.9, 1.4, 1.1, 0.8, 1.0]);
        write_country(dir.path(), "rt_Peru.csv", &[0.7]);

        extract_country_features(options(dir.path(), Profile::Efficient)).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("out/country_features.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        // coefficients past the longest series' Nyquist frequency are dropped
        assert!(!headers.iter().any(|h| h == "mean__fft_coefficient__attr_\"real\"__coeff_99"));
        assert!(headers.iter().any(|h| h == "mean__fft_coefficient__attr_\"real\"__coeff_3"));
        for record in reader.records() {
            let record = record.unwrap();
            assert!(record.iter().skip(1).all(|cell| cell != "NaN"));
        }
    }

    #[test]
    fn no_valid_files_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rt_Broken.csv"), "day,value\n1,2\n").unwrap();
        let result = extract_country_features(options(dir.path(), Profile::Minimal));
        assert!(result.is_err());
        assert!(!dir.path().join("out/country_features.csv").exists());
    }
}
