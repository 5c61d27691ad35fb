use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use crate::datasets::loader::CountryTable;
use crate::errors::AggregateError;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub date: NaiveDateTime,
    pub value: f64,
}

/// All countries concatenated into `(date, Country, mean)` rows,
/// after invalid rows have been dropped.
#[derive(Debug, Clone)]
pub struct LongTable {
    observations: Vec<Observation>,
    rows_before_cleaning: usize,
}

impl LongTable {
    pub fn concat(tables: Vec<CountryTable>, pattern: &str) -> Result<Self, AggregateError> {
        if tables.is_empty() {
            return Err(AggregateError::NoValidData { pattern: pattern.to_string() });
        }
        let mut rows_before_cleaning = 0;
        let mut observations = Vec::new();
        for table in tables {
            rows_before_cleaning += table.rows.len();
            let country = table.country;
            for row in table.rows {
                let (Some(date), Some(value)) = (parse_date(&row.date), parse_value(&row.value)) else {
                    continue;
                };
                observations.push(Observation { country: country.clone(), date, value });
            }
        }
        if observations.is_empty() {
            return Err(AggregateError::NothingLeftAfterCleaning { rows: rows_before_cleaning });
        }
        Ok(Self { observations, rows_before_cleaning })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn rows_before_cleaning(&self) -> usize {
        self.rows_before_cleaning
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_before_cleaning - self.observations.len()
    }

    /// Value sequences per country, countries ascending, each ordered by date.
    /// Rows sharing a date keep their input order.
    pub fn series_by_country(&self) -> BTreeMap<String, Vec<f64>> {
        let mut grouped: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
        for observation in self.observations.iter() {
            grouped.entry(observation.country.clone()).or_default().push(observation);
        }
        grouped.into_iter()
            .map(|(country, rows)| {
                let values = rows.into_iter()
                    .sorted_by_key(|o| o.date)
                    .map(|o| o.value)
                    .collect();
                (country, values)
            })
            .collect()
    }
}


/// Parses a date cell, yielding `None` for anything unparseable.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.naive_utc())
}

pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use crate::datasets::loader::RawObservation;
    use super::*;

    fn table(country: &str, rows: &[(&str, &str)]) -> CountryTable {
        CountryTable {
            country: country.to_string(),
            source: PathBuf::from(format!("rt_{}.csv", country)),
            rows: rows.iter()
                .map(|(d, v)| RawObservation { date: d.to_string(), value: v.to_string() })
                .collect(),
        }
    }

    #[test]
    fn no_tables_is_an_error() {
        let result = LongTable::concat(Vec::new(), "rt_*.csv");
        assert!(matches!(result, Err(AggregateError::NoValidData { .. })));
    }

    #[test]
    fn drops_invalid_rows() {
        let tables = vec![table("Chile", &[
            ("2020-03-01", "1.1"),
            ("not a date", "1.2"),
            ("2020-03-03", ""),
            ("2020-03-04", "NaN"),
            ("2020-03-05", "abc"),
            ("2020-03-06", "0.9"),
        ])];
        let long = LongTable::concat(tables, "rt_*.csv").unwrap();
        assert_eq!(long.observations().len(), 2);
        assert_eq!(long.rows_before_cleaning(), 6);
        assert_eq!(long.rows_dropped(), 4);
    }

    #[test]
    fn everything_dropped_is_an_error() {
        let tables = vec![table("Chile", &[("", "1.0"), ("2020-01-01", "")])];
        let result = LongTable::concat(tables, "rt_*.csv");
        assert!(matches!(result, Err(AggregateError::NothingLeftAfterCleaning { rows: 2 })));
    }

    #[test]
    fn groups_sorted_by_country_and_date() {
        let tables = vec![
            table("Peru", &[("2020-03-03", "3.0"), ("2020-03-01", "1.0"), ("2020-03-02", "2.0")]),
            table("Chile", &[("2020/03/02", "20.0"), ("2020-03-01", "10.0")]),
        ];
        let long = LongTable::concat(tables, "rt_*.csv").unwrap();
        let series = long.series_by_country();
        let countries = series.keys().cloned().collect::<Vec<_>>();
        assert_eq!(countries, vec!["Chile", "Peru"]);
        assert_eq!(series["Chile"], vec![10.0, 20.0]);
        assert_eq!(series["Peru"], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let tables = vec![table("Chile", &[("2020-03-01", "5.0"), ("2020-03-01", "4.0")])];
        let long = LongTable::concat(tables, "rt_*.csv").unwrap();
        assert_eq!(long.series_by_country()["Chile"], vec![5.0, 4.0]);
    }

    #[test]
    fn accepts_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 7, 4).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_date("2021-07-04"), Some(expected));
        assert_eq!(parse_date("2021/07/04"), Some(expected));
        assert_eq!(parse_date("07/04/2021"), Some(expected));
        assert_eq!(parse_date("2021-07-04 00:00:00"), Some(expected));
        assert_eq!(parse_date("2021-07-04T00:00:00"), Some(expected));
        assert_eq!(parse_date("2021-07-04T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_date("July 4th"), None);
    }
}
