use std::collections::BTreeMap;
use itertools::Itertools;
use prettytable::{Cell, Row, Table};
use crate::datasets::discovery::discover_files;
use crate::datasets::loader::load_country_files;
use crate::datasets::long_table::LongTable;
use crate::statistics::shared::Statistics;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryOverview {
    pub country: String,
    pub observations: usize,
    pub first_date: String,
    pub last_date: String,
    pub statistics: Statistics,
}

pub fn inspect_country_files(pattern: &str) -> anyhow::Result<()> {
    let files = discover_files(pattern)?;
    log::info!("Found {} country files.", files.len());
    let outcome = load_country_files(&files);
    let long_table = LongTable::concat(outcome.tables, pattern)?;

    let mut table = Table::new();
    let header = ["Country", "Observations", "First Date", "Last Date", "Min", "Max", "Mean", "Std Dev"]
        .iter()
        .map(|title| Cell::new(title))
        .collect_vec();
    table.set_titles(Row::new(header));
    for overview in country_overviews(&long_table) {
        let stats = overview.statistics;
        table.add_row(Row::new(vec![
            Cell::new(&overview.country),
            Cell::new(&overview.observations.to_string()),
            Cell::new(&overview.first_date),
            Cell::new(&overview.last_date),
            Cell::new(&format!("{:.4}", stats.min)),
            Cell::new(&format!("{:.4}", stats.max)),
            Cell::new(&format!("{:.4}", stats.mean)),
            Cell::new(&format!("{:.4}", stats.std_dev)),
        ]));
    }
    table.printstd();

    if !outcome.skipped.is_empty() {
        log::warn!("{} files were skipped", outcome.skipped.len());
    }
    log::info!("{} rows dropped during cleaning", long_table.rows_dropped());
    Ok(())
}

pub fn country_overviews(long_table: &LongTable) -> Vec<CountryOverview> {
    let mut by_country: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for observation in long_table.observations() {
        by_country.entry(observation.country.as_str()).or_default().push(observation);
    }
    by_country.into_iter()
        .map(|(country, rows)| {
            let dates = rows.iter().map(|o| o.date).collect_vec();
            let format_date = |d: Option<&chrono::NaiveDateTime>| {
                d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
            };
            CountryOverview {
                country: country.to_string(),
                observations: rows.len(),
                first_date: format_date(dates.iter().min()),
                last_date: format_date(dates.iter().max()),
                statistics: Statistics::from(rows.iter().map(|o| o.value)),
            }
        })
        .collect()
}
