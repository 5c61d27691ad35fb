use std::path::Path;
use crate::errors::LoadError;

pub trait ExtractCountry {
    /// Derives the country identifier from an `rt_<Country_Name>.csv` path.
    ///
    /// Every occurrence of `rt_` and `.csv` is removed from the basename,
    /// and the remaining underscores become spaces. The result may be empty.
    fn extract_country(&self) -> Result<String, LoadError>;
}

impl ExtractCountry for Path {
    fn extract_country(&self) -> Result<String, LoadError> {
        let basename = self.file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LoadError::InvalidFileName { path: self.display().to_string() })?;
        let country = basename
            .replace("rt_", "")
            .replace(".csv", "")
            .replace('_', " ");
        Ok(country)
    }
}
