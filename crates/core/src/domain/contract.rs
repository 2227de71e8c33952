use crate::domain::snack::{NutritionInfo, Recipe, SnackData};
use anyhow::{ensure, Context};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Snack object as the model returns it. Recommendations are attached later, and `nutrition`
/// stays untyped until validation decides whether to keep it.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSnack {
    pub snack_name: String,
    pub emoji: String,
    #[serde(deserialize_with = "deserialize_energy_score")]
    pub energy_score: i64,
    pub recipe: Recipe,
    pub drink_pairing: String,
    pub description: String,
    #[serde(default)]
    pub nutrition: Option<Value>,
}

impl GeneratedSnack {
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        serde_json::from_value(value).context("LLM output does not match the snack shape")
    }

    /// Energy score and emoji are passed through unchecked. Fields absent from a nutrition
    /// object are taken from `default_nutrition`; a missing, malformed or negative block is
    /// replaced by it entirely instead of failing.
    pub fn validate_and_into_snack(
        self,
        default_nutrition: &NutritionInfo,
    ) -> anyhow::Result<SnackData> {
        let snack_name = self.snack_name.trim().to_string();
        ensure!(!snack_name.is_empty(), "snack_name must be non-empty");

        let nutrition = match self.nutrition {
            Some(Value::Object(fields)) => match merge_nutrition(default_nutrition, fields) {
                Ok(n) if n.is_non_negative() => n,
                Ok(_) => {
                    tracing::warn!(%snack_name, "negative nutrition values; using default");
                    default_nutrition.clone()
                }
                Err(e) => {
                    tracing::warn!(%snack_name, error = %e, "malformed nutrition; using default");
                    default_nutrition.clone()
                }
            },
            _ => {
                tracing::debug!(%snack_name, "nutrition missing; using default");
                default_nutrition.clone()
            }
        };

        Ok(SnackData {
            snack_name,
            emoji: self.emoji,
            energy_score: self.energy_score,
            recipe: self.recipe,
            drink_pairing: self.drink_pairing,
            description: self.description,
            nutrition,
            music_recommendations: Vec::new(),
            book_recommendations: Vec::new(),
        })
    }
}

fn merge_nutrition(
    default_nutrition: &NutritionInfo,
    fields: serde_json::Map<String, Value>,
) -> serde_json::Result<NutritionInfo> {
    let mut merged = match serde_json::to_value(default_nutrition)? {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    merged.extend(fields.into_iter().filter(|(_, v)| !v.is_null()));
    serde_json::from_value(Value::Object(merged))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnergyScore {
    Int(i64),
    Float(f64),
    Text(String),
}

// Models drift between 3, 3.0 and "3".
fn deserialize_energy_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let as_float = match RawEnergyScore::deserialize(deserializer)? {
        RawEnergyScore::Int(n) => return Ok(n),
        RawEnergyScore::Float(f) => f,
        RawEnergyScore::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("energy_score is not numeric: {s:?}")))?,
    };
    if !as_float.is_finite() {
        return Err(D::Error::custom("energy_score must be finite"));
    }
    Ok(as_float.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_nutrition() -> NutritionInfo {
        NutritionInfo {
            calories: 200.0,
            protein: 5.0,
            carbs: 20.0,
            fat: 10.0,
            fiber: 3.0,
        }
    }

    fn generated(nutrition: Option<Value>) -> Value {
        let mut v = json!({
            "snack_name": "Honey Chili Popcorn",
            "emoji": "🍿",
            "energy_score": 3,
            "recipe": {"ingredients": ["popcorn", "honey"], "steps": ["pop", "drizzle"]},
            "drink_pairing": "Iced tea",
            "description": "Sticky and loud."
        });
        if let Some(n) = nutrition {
            v["nutrition"] = n;
        }
        v
    }

    #[test]
    fn keeps_valid_nutrition() {
        let n = json!({"calories": 180, "protein": 3, "carbs": 25, "fat": 7.5, "fiber": 2});
        let snack = GeneratedSnack::from_value(generated(Some(n)))
            .unwrap()
            .validate_and_into_snack(&default_nutrition())
            .unwrap();
        assert_eq!(snack.nutrition.calories, 180.0);
        assert_eq!(snack.nutrition.fat, 7.5);
    }

    #[test]
    fn missing_nutrition_gets_default() {
        let snack = GeneratedSnack::from_value(generated(None))
            .unwrap()
            .validate_and_into_snack(&default_nutrition())
            .unwrap();
        assert_eq!(snack.nutrition, default_nutrition());
        assert_eq!(snack.snack_name, "Honey Chili Popcorn");
        assert_eq!(snack.energy_score, 3);
    }

    #[test]
    fn non_object_nutrition_gets_default() {
        let snack = GeneratedSnack::from_value(generated(Some(json!("about 200 kcal"))))
            .unwrap()
            .validate_and_into_snack(&default_nutrition())
            .unwrap();
        assert_eq!(snack.nutrition, default_nutrition());
    }

    #[test]
    fn partial_nutrition_keeps_generated_values() {
        let n = json!({"calories": 180, "protein": 3, "carbs": 25, "fat": 7, "fiber": null});
        let snack = GeneratedSnack::from_value(generated(Some(n)))
            .unwrap()
            .validate_and_into_snack(&default_nutrition())
            .unwrap();
        assert_eq!(
            snack.nutrition,
            NutritionInfo {
                calories: 180.0,
                protein: 3.0,
                carbs: 25.0,
                fat: 7.0,
                fiber: 3.0,
            }
        );
    }

    #[test]
    fn drifting_recipe_keeps_generated_snack() {
        for recipe in [
            json!({"ingredients": [{"item": "oats", "amount": "1 cup"}], "steps": ["mix"]}),
            json!(["mix oats", "chill"]),
            json!({"ingredients": "oats, dates", "steps": "blend"}),
        ] {
            let mut v = generated(None);
            v["recipe"] = recipe;
            let snack = GeneratedSnack::from_value(v)
                .unwrap()
                .validate_and_into_snack(&default_nutrition())
                .unwrap();
            assert_eq!(snack.snack_name, "Honey Chili Popcorn");
            assert!(matches!(snack.recipe, Recipe::Structured { .. }));
        }
    }

    #[test]
    fn negative_nutrition_gets_default() {
        let n = json!({"calories": -5, "protein": 3, "carbs": 25, "fat": 7, "fiber": 2});
        let snack = GeneratedSnack::from_value(generated(Some(n)))
            .unwrap()
            .validate_and_into_snack(&default_nutrition())
            .unwrap();
        assert_eq!(snack.nutrition, default_nutrition());
    }

    #[test]
    fn energy_score_is_lenient_but_unclamped() {
        let mut v = generated(None);
        v["energy_score"] = json!("4.6");
        assert_eq!(GeneratedSnack::from_value(v.clone()).unwrap().energy_score, 5);
        v["energy_score"] = json!(9);
        assert_eq!(GeneratedSnack::from_value(v.clone()).unwrap().energy_score, 9);
        v["energy_score"] = json!("lots");
        assert!(GeneratedSnack::from_value(v).is_err());
    }

    #[test]
    fn missing_required_key_is_rejected() {
        let mut v = generated(None);
        v.as_object_mut().unwrap().remove("drink_pairing");
        assert!(GeneratedSnack::from_value(v).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut v = generated(None);
        v["snack_name"] = json!("   ");
        let res = GeneratedSnack::from_value(v)
            .unwrap()
            .validate_and_into_snack(&default_nutrition());
        assert!(res.is_err());
    }

    #[test]
    fn list_output_is_rejected() {
        assert!(GeneratedSnack::from_value(json!([generated(None)])).is_err());
    }
}
