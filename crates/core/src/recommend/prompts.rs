const PERSONA: &str =
    "You are a playful AI assistant for a snack recommendation app called SnackMatch.";

pub fn snack_prompt(vibe: &str) -> String {
    let vibe_line = format!("User's vibe: \"{vibe}\"");
    [
        PERSONA,
        "Based on the user's vibe, provide a creative and fun snack recommendation in a JSON object.",
        "The JSON object must have the following keys: snack_name, emoji, energy_score (1-5), recipe, drink_pairing, description, and nutrition.",
        "",
        "IMPORTANT: The 'recipe' field must be an OBJECT with the following two keys:",
        "1. 'ingredients': An array of strings (e.g., [\"1 cup flour\", \"2 eggs\"]).",
        "2. 'steps': An array of strings describing the instructions (e.g., [\"Mix flour and eggs\", \"Bake at 350F\"]).",
        "",
        "The nutrition object must contain: calories, protein (grams), carbs (grams), fat (grams), and fiber (grams).",
        "Provide realistic nutritional estimates for a standard serving size.",
        "The description should be fun and personality-filled.",
        vibe_line.as_str(),
        "Respond with only the JSON object, no extra text.",
    ]
    .join("\n")
}

pub fn music_prompt(snack_name: &str, vibe: &str, energy_score: i64) -> String {
    pairing_prompt(
        snack_name,
        vibe,
        energy_score,
        "songs",
        "title, artist, genre, mood, and description",
    )
}

pub fn book_prompt(snack_name: &str, vibe: &str, energy_score: i64) -> String {
    pairing_prompt(
        snack_name,
        vibe,
        energy_score,
        "books",
        "title, author, genre, mood, and description",
    )
}

fn pairing_prompt(
    snack_name: &str,
    vibe: &str,
    energy_score: i64,
    noun: &str,
    fields: &str,
) -> String {
    format!(
        "{PERSONA}\n\
Based on snack \"{snack_name}\" and user's vibe \"{vibe}\" (energy level: {energy_score}/5),\n\
recommend 3 perfect {noun} that would complement this snacking experience.\n\n\
Provide a JSON array with objects containing: {fields}.\n\
The mood should match both the snack type and user's vibe.\n\
Make descriptions fun and personality-filled.\n\
Respond with only the JSON array, no extra text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snack_prompt_names_required_keys_and_vibe() {
        let p = snack_prompt("rainy sunday");
        assert!(p.contains("User's vibe: \"rainy sunday\""));
        for key in ["snack_name", "emoji", "energy_score", "recipe", "drink_pairing", "nutrition"] {
            assert!(p.contains(key), "missing {key}");
        }
        assert!(p.contains("'ingredients'") && p.contains("'steps'"));
    }

    #[test]
    fn pairing_prompts_carry_stage_one_output() {
        let m = music_prompt("Classic Popcorn", "movie night", 2);
        assert!(m.contains("snack \"Classic Popcorn\""));
        assert!(m.contains("(energy level: 2/5)"));
        assert!(m.contains("recommend 3 perfect songs"));
        assert!(m.contains("artist"));

        let b = book_prompt("Classic Popcorn", "movie night", 2);
        assert!(b.contains("recommend 3 perfect books"));
        assert!(b.contains("author"));
    }
}
