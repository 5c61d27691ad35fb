use crate::datasets::loader::VALUE_COLUMN;
use crate::features::{feature_names, Profile};

pub fn list_features(profile: Profile) -> anyhow::Result<()> {
    let names = feature_names(VALUE_COLUMN, profile)?;
    for name in names.iter() {
        println!("{}", name);
    }
    log::info!("{} features in the {:?} profile", names.len(), profile);
    Ok(())
}
