use std::fmt;

/// A calculator parameter as it appears in a feature column name.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Float(f64),
    Str(&'static str),
    Bool(bool),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing ".0" and prints the shortest round-trip digits
            Param::Float(v) => write!(f, "{:?}", v),
            Param::Str(v) => write!(f, "\"{}\"", v),
            Param::Bool(true) => write!(f, "True"),
            Param::Bool(false) => write!(f, "False"),
        }
    }
}

/// `<column>__<calculator>[__<key>_<value>...]` with keys in ascending order.
pub fn feature_name(column: &str, calculator: &str, params: &[(&str, Param)]) -> String {
    let mut name = format!("{}__{}", column, calculator);
    let mut ordered = params.to_vec();
    ordered.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in ordered {
        name.push_str(&format!("__{}_{}", key, value));
    }
    name
}
