use serde::{Deserialize, Serialize};

const SAVE_WEIGHT: f64 = 0.1;
const REJECT_WEIGHT: f64 = -0.05;

/// Linear taste weights learned from save/reject feedback, each kept in [-1, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceModel {
    pub sweet: f64,
    pub salty: f64,
    pub healthy: f64,
    pub spicy: f64,
    pub savory: f64,
    pub vegan: f64,
    pub gluten_free: f64,
    pub dairy_free: f64,
    pub nut_free: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    Save,
    Reject,
}

impl FeedbackAction {
    fn weight(self) -> f64 {
        match self {
            FeedbackAction::Save => SAVE_WEIGHT,
            FeedbackAction::Reject => REJECT_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trait {
    Sweet,
    Salty,
    Healthy,
    Spicy,
    Savory,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
}

const TRAIT_KEYWORDS: &[(Trait, &[&str])] = &[
    (Trait::Sweet, &["sweet", "candy", "chocolate", "sugar", "dessert", "honey"]),
    (Trait::Salty, &["salty", "chips", "pretzels", "popcorn", "fries", "bacon"]),
    (
        Trait::Healthy,
        &["fruit", "vegetable", "salad", "smoothie", "yogurt", "nuts", "seeds"],
    ),
    (Trait::Spicy, &["spicy", "hot", "pepper", "chili", "wasabi", "jalapeno"]),
    (Trait::Savory, &["cheese", "pizza", "burger", "sandwich", "soup", "meat"]),
    (Trait::Vegan, &["vegan", "plant-based", "tofu", "vegetable", "fruit"]),
    (
        Trait::GlutenFree,
        &["gluten-free", "celiac", "wheat-free", "bread-free"],
    ),
    (
        Trait::DairyFree,
        &["dairy-free", "lactose-free", "milk-free", "cheese-free", "vegan"],
    ),
    (
        Trait::NutFree,
        &["nut-free", "peanut-free", "almond-free", "tree-nut-free"],
    ),
];

impl PreferenceModel {
    /// Nudges every trait whose keywords appear in the snack name, then clamps all weights.
    pub fn apply_feedback(&mut self, snack_name: &str, action: FeedbackAction) {
        let name = snack_name.to_lowercase();
        for (t, keywords) in TRAIT_KEYWORDS {
            if keywords.iter().any(|k| name.contains(k)) {
                *self.weight_mut(*t) += action.weight();
            }
        }
        self.clamp();
    }

    fn weight_mut(&mut self, t: Trait) -> &mut f64 {
        match t {
            Trait::Sweet => &mut self.sweet,
            Trait::Salty => &mut self.salty,
            Trait::Healthy => &mut self.healthy,
            Trait::Spicy => &mut self.spicy,
            Trait::Savory => &mut self.savory,
            Trait::Vegan => &mut self.vegan,
            Trait::GlutenFree => &mut self.gluten_free,
            Trait::DairyFree => &mut self.dairy_free,
            Trait::NutFree => &mut self.nut_free,
        }
    }

    fn clamp(&mut self) {
        for w in [
            &mut self.sweet,
            &mut self.salty,
            &mut self.healthy,
            &mut self.spicy,
            &mut self.savory,
            &mut self.vegan,
            &mut self.gluten_free,
            &mut self.dairy_free,
            &mut self.nut_free,
        ] {
            *w = w.clamp(-1.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_bumps_matching_traits() {
        let mut m = PreferenceModel::default();
        m.apply_feedback("Spicy Cheese Popcorn", FeedbackAction::Save);
        assert!((m.spicy - 0.1).abs() < 1e-9);
        assert!((m.savory - 0.1).abs() < 1e-9);
        assert!((m.salty - 0.1).abs() < 1e-9);
        assert_eq!(m.sweet, 0.0);
    }

    #[test]
    fn reject_lowers_and_weights_stay_clamped() {
        let mut m = PreferenceModel {
            sweet: 0.98,
            ..Default::default()
        };
        m.apply_feedback("Chocolate Bark", FeedbackAction::Save);
        assert_eq!(m.sweet, 1.0);

        for _ in 0..50 {
            m.apply_feedback("Kale Chips", FeedbackAction::Reject);
        }
        assert_eq!(m.salty, -1.0);
    }

    #[test]
    fn reads_original_camel_case_keys() {
        let m: PreferenceModel =
            serde_json::from_str(r#"{"glutenFree": 0.3, "nutFree": -0.2}"#).unwrap();
        assert_eq!(m.gluten_free, 0.3);
        assert_eq!(m.nut_free, -0.2);
        assert_eq!(m.sweet, 0.0);
    }
}
