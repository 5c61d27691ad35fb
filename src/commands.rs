pub(crate) mod extract;
pub(crate) mod inspect;
pub(crate) mod list_features;
