pub mod discovery;
pub mod loader;
pub mod long_table;
pub mod feature_matrix;
