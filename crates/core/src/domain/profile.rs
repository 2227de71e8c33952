use serde::{Deserialize, Serialize};

/// Dietary context supplied by the user. Accepted by the recommender but not yet used in any
/// prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default, alias = "favoriteTypes")]
    pub favorite_types: Vec<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.dietary.is_empty() && self.allergies.is_empty() && self.favorite_types.is_empty()
    }
}
