use std::path::PathBuf;
use crate::errors::DiscoveryError;


/// Resolves a glob pattern to the sorted list of regular files it matches.
///
/// Entries that cannot be read while walking the pattern are logged and skipped.
pub fn discover_files(pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = glob::glob(pattern)
        .map_err(|e| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string()
        })?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => {
                log::debug!("Ignoring non-file match {}", path.display());
            }
            Err(e) => {
                log::warn!("Error reading path: {}", e);
            }
        }
    }
    files.sort();
    Ok(files)
}
