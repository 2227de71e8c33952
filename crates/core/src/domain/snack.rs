use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Per-serving estimate. Values are grams except `calories`; all are expected non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl NutritionInfo {
    pub fn is_non_negative(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat, self.fiber]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicRecommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub description: String,
}

/// Fallback snacks carry a one-line description; generated ones are asked for the structured
/// form but are not guaranteed to use it.
///
/// Decoding is lenient: a bare array reads as `steps`, a scalar `ingredients` or `steps` becomes
/// a one-item list, and object items are flattened to text. Only `null` is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recipe {
    Text(String),
    Structured {
        ingredients: Vec<String>,
        steps: Vec<String>,
    },
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Err(D::Error::custom("recipe must not be null")),
            Value::String(s) => Ok(Recipe::Text(s)),
            Value::Array(items) => Ok(Recipe::Structured {
                ingredients: Vec::new(),
                steps: items.iter().filter_map(recipe_line).collect(),
            }),
            Value::Object(map) => Ok(Recipe::Structured {
                ingredients: recipe_lines(map.get("ingredients")),
                steps: recipe_lines(map.get("steps")),
            }),
            other => Ok(Recipe::Text(other.to_string())),
        }
    }
}

fn recipe_lines(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(recipe_line).collect(),
        Some(other) => recipe_line(other).into_iter().collect(),
        None => Vec::new(),
    }
}

// {"item": "oats", "amount": "1 cup"} reads as its scalar values joined by spaces.
fn recipe_line(value: &Value) -> Option<String> {
    let line = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => map
            .values()
            .filter_map(recipe_line)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Array(items) => items
            .iter()
            .filter_map(recipe_line)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    (!line.is_empty()).then_some(line)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnackData {
    pub snack_name: String,
    pub emoji: String,
    pub energy_score: i64,
    pub recipe: Recipe,
    pub drink_pairing: String,
    pub description: String,
    pub nutrition: NutritionInfo,
    #[serde(default)]
    pub music_recommendations: Vec<MusicRecommendation>,
    #[serde(default)]
    pub book_recommendations: Vec<BookRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_snack() -> SnackData {
        SnackData {
            snack_name: "Spicy Mango Chaat".to_string(),
            emoji: "🥭".to_string(),
            energy_score: 4,
            recipe: Recipe::Structured {
                ingredients: vec!["1 mango".to_string(), "chili powder".to_string()],
                steps: vec!["Dice the mango".to_string(), "Dust with chili".to_string()],
            },
            drink_pairing: "Lime soda".to_string(),
            description: "Sweet heat for a restless afternoon.".to_string(),
            nutrition: NutritionInfo {
                calories: 150.0,
                protein: 1.5,
                carbs: 35.0,
                fat: 0.4,
                fiber: 3.2,
            },
            music_recommendations: vec![MusicRecommendation {
                title: "Mango Tree".to_string(),
                artist: "Zion".to_string(),
                genre: "Reggae".to_string(),
                mood: "Sunny".to_string(),
                description: "Fruity.".to_string(),
            }],
            book_recommendations: vec![BookRecommendation {
                title: "Salt Fat Acid Heat".to_string(),
                author: "Samin Nosrat".to_string(),
                genre: "Cooking".to_string(),
                mood: "Curious".to_string(),
                description: "Why the chili works.".to_string(),
            }],
        }
    }

    #[test]
    fn snack_survives_json_round_trip() {
        let snack = sample_snack();
        let text = serde_json::to_string(&snack).unwrap();
        let back: SnackData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, snack);
    }

    #[test]
    fn recipe_accepts_both_shapes() {
        let text: Recipe = serde_json::from_value(json!("Air-pop and season.")).unwrap();
        assert_eq!(text, Recipe::Text("Air-pop and season.".to_string()));

        let structured: Recipe =
            serde_json::from_value(json!({"ingredients": ["oats"], "steps": ["toast"]})).unwrap();
        assert_eq!(
            structured,
            Recipe::Structured {
                ingredients: vec!["oats".to_string()],
                steps: vec!["toast".to_string()],
            }
        );
    }

    #[test]
    fn recipe_tolerates_model_drift() {
        let bare_steps: Recipe = serde_json::from_value(json!(["mix oats", "chill"])).unwrap();
        assert_eq!(
            bare_steps,
            Recipe::Structured {
                ingredients: vec![],
                steps: vec!["mix oats".to_string(), "chill".to_string()],
            }
        );

        let scalar_fields: Recipe =
            serde_json::from_value(json!({"ingredients": "oats, dates", "steps": "blend"}))
                .unwrap();
        assert_eq!(
            scalar_fields,
            Recipe::Structured {
                ingredients: vec!["oats, dates".to_string()],
                steps: vec!["blend".to_string()],
            }
        );

        let object_items: Recipe = serde_json::from_value(json!({
            "ingredients": [{"item": "oats"}, 2, null],
            "steps": ["mix"]
        }))
        .unwrap();
        assert_eq!(
            object_items,
            Recipe::Structured {
                ingredients: vec!["oats".to_string(), "2".to_string()],
                steps: vec!["mix".to_string()],
            }
        );

        let missing_steps: Recipe =
            serde_json::from_value(json!({"ingredients": ["oats"]})).unwrap();
        assert_eq!(
            missing_steps,
            Recipe::Structured {
                ingredients: vec!["oats".to_string()],
                steps: vec![],
            }
        );

        assert!(serde_json::from_value::<Recipe>(Value::Null).is_err());
    }

    #[test]
    fn negative_nutrition_is_flagged() {
        let mut n = sample_snack().nutrition;
        assert!(n.is_non_negative());
        n.fat = -1.0;
        assert!(!n.is_non_negative());
    }
}
