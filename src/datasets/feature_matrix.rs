use std::collections::BTreeMap;
use std::path::Path;

/// One row per identifier, one column per feature. Missing values are NaN.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    ids: Vec<String>,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Self {
        Self { ids: Vec::new(), columns, rows: Vec::new() }
    }

    pub fn push_row_from_map(&mut self, id: String, features: &BTreeMap<String, f64>) {
        let row = self.columns.iter()
            .map(|column| features.get(column).copied().unwrap_or(f64::NAN))
            .collect();
        self.ids.push(id);
        self.rows.push(row);
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[cfg(test)]
    pub fn value(&self, id: &str, column: &str) -> Option<f64> {
        let row = self.ids.iter().position(|i| i == id)?;
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.rows[row][col])
    }

    /// Removes every column that is NaN for all identifiers; returns the removed names.
    pub fn drop_all_missing_columns(&mut self) -> Vec<String> {
        let keep = (0..self.columns.len())
            .map(|col| self.rows.iter().any(|row| !row[col].is_nan()))
            .collect::<Vec<_>>();
        let mut dropped = Vec::new();
        let mut columns = Vec::new();
        for (column, kept) in self.columns.drain(..).zip(keep.iter()) {
            if *kept {
                columns.push(column);
            } else {
                dropped.push(column);
            }
        }
        self.columns = columns;
        for row in self.rows.iter_mut() {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&false));
        }
        dropped
    }

    /// Replaces remaining NaN values; returns how many were replaced.
    pub fn fill_missing(&mut self, fill_value: f64) -> usize {
        let mut filled = 0;
        for value in self.rows.iter_mut().flat_map(|row| row.iter_mut()) {
            if value.is_nan() {
                *value = fill_value;
                filled += 1;
            }
        }
        filled
    }

    pub fn write_csv(&self, path: &Path, id_column: &str) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(std::iter::once(id_column).chain(self.columns.iter().map(String::as_str)))?;
        for (id, row) in self.ids.iter().zip(self.rows.iter()) {
            let record = std::iter::once(id.clone())
                .chain(row.iter().map(|v| format!("{:?}", v)));
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
