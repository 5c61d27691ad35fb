use error_set::error_set;

error_set!{
    DiscoveryError = {
        #[display("Invalid glob pattern {pattern}: {reason}")]
        InvalidPattern{pattern: String, reason: String},
    };
    LoadError = {
        #[display("Missing required column '{column}'")]
        MissingColumn{column: String},
        #[display("Could not derive an identifier from {path}")]
        InvalidFileName{path: String},
        #[display("Expected {expected} fields in line {line}, saw {found}")]
        TooManyFields{line: u64, expected: usize, found: usize},
    };
    AggregateError = {
        #[display("No valid data found! Double check the input pattern ({pattern})")]
        NoValidData{pattern: String},
        #[display("No rows survived cleaning ({rows} rows dropped)")]
        NothingLeftAfterCleaning{rows: usize},
    };
}
