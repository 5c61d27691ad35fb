use std::path::{Path, PathBuf};
use crate::errors::LoadError;
use crate::utils::paths::ExtractCountry;

pub const DATE_COLUMN: &str = "date";
pub const VALUE_COLUMN: &str = "mean";

/// One country file projected onto `(date, Country, mean)`.
///
/// Cells are kept as raw text; coercion happens during aggregation.
#[derive(Debug, Clone)]
pub struct CountryTable {
    pub country: String,
    pub source: PathBuf,
    pub rows: Vec<RawObservation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub date: String,
    pub value: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub tables: Vec<CountryTable>,
    pub skipped: Vec<SkippedFile>,
}


pub fn load_country_file(path: &Path) -> anyhow::Result<CountryTable> {
    let country = path.extract_country()?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let column_index = |name: &str| {
        headers.iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn { column: name.to_string() })
    };
    let date_index = column_index(DATE_COLUMN)?;
    let value_index = column_index(VALUE_COLUMN)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            }.into());
        }
        // short rows leave the trailing fields empty
        rows.push(RawObservation {
            date: record.get(date_index).unwrap_or_default().to_string(),
            value: record.get(value_index).unwrap_or_default().to_string(),
        });
    }
    Ok(CountryTable { country, source: path.to_path_buf(), rows })
}

/// Loads every file, logging and skipping the ones that cannot be used.
pub fn load_country_files(paths: &[PathBuf]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for path in paths {
        match load_country_file(path) {
            Ok(table) => {
                log::debug!("Loaded {} rows for {} from {}",
                            table.rows.len(), table.country, table.source.display());
                outcome.tables.push(table);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                outcome.skipped.push(SkippedFile { path: path.clone(), reason: e.to_string() });
            }
        }
    }
    outcome
}
