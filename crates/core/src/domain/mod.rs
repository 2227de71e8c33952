pub mod contract;
pub mod preferences;
pub mod profile;
pub mod snack;
