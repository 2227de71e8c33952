use crate::domain::snack::{
    BookRecommendation, MusicRecommendation, NutritionInfo, Recipe, SnackData,
};

/// Fixed substitute content. Never personalised to the vibe that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackCatalog {
    pub snack: SnackData,
    /// Used when a generated snack has no usable nutrition block.
    pub nutrition: NutritionInfo,
    pub music: Vec<MusicRecommendation>,
    pub books: Vec<BookRecommendation>,
}

impl FallbackCatalog {
    /// Single-item list substituted when the music task fails.
    pub fn music_fallback(&self) -> Vec<MusicRecommendation> {
        self.music.iter().take(1).cloned().collect()
    }

    /// Single-item list substituted when the book task fails.
    pub fn book_fallback(&self) -> Vec<BookRecommendation> {
        self.books.iter().take(1).cloned().collect()
    }

    /// The fallback snack with the complete default lists, for runs that skip the provider.
    pub fn offline_snack(&self) -> SnackData {
        SnackData {
            music_recommendations: self.music.clone(),
            book_recommendations: self.books.clone(),
            ..self.snack.clone()
        }
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self {
            snack: SnackData {
                snack_name: "Classic Popcorn".to_string(),
                emoji: "🍿".to_string(),
                energy_score: 2,
                recipe: Recipe::Text(
                    "Air-pop some kernels and sprinkle with your favorite seasoning.".to_string(),
                ),
                drink_pairing: "A classic soda or sparkling water.".to_string(),
                description: "A timeless snack that never disappoints.".to_string(),
                nutrition: NutritionInfo {
                    calories: 31.0,
                    protein: 1.0,
                    carbs: 6.0,
                    fat: 0.4,
                    fiber: 1.2,
                },
                music_recommendations: Vec::new(),
                book_recommendations: Vec::new(),
            },
            nutrition: NutritionInfo {
                calories: 200.0,
                protein: 5.0,
                carbs: 20.0,
                fat: 10.0,
                fiber: 3.0,
            },
            music: vec![
                music(
                    "Good Vibrations",
                    "The Beach Boys",
                    "Pop/Rock",
                    "Upbeat",
                    "A classic feel-good track that pairs perfectly with any snack!",
                ),
                music(
                    "Lovely Day",
                    "Bill Withers",
                    "Soul",
                    "Relaxed",
                    "Smooth and mellow, just like your snacking moment.",
                ),
                music(
                    "Uptown Funk",
                    "Mark Ronson ft. Bruno Mars",
                    "Funk/Pop",
                    "Energetic",
                    "Get ready to snack and dance!",
                ),
            ],
            books: vec![
                book(
                    "The Hitchhiker's Guide to the Galaxy",
                    "Douglas Adams",
                    "Science Fiction Comedy",
                    "Playful",
                    "A hilarious space adventure perfect for mindless snacking!",
                ),
                book(
                    "The Little Book of Hygge",
                    "Meik Wiking",
                    "Lifestyle/Self-Help",
                    "Cozy",
                    "Find your perfect snacking comfort zone.",
                ),
                book(
                    "Ready Player One",
                    "Ernest Cline",
                    "Science Fiction",
                    "Adventurous",
                    "An exciting read that'll make you forget you're even eating!",
                ),
            ],
        }
    }
}

fn music(title: &str, artist: &str, genre: &str, mood: &str, description: &str) -> MusicRecommendation {
    MusicRecommendation {
        title: title.to_string(),
        artist: artist.to_string(),
        genre: genre.to_string(),
        mood: mood.to_string(),
        description: description.to_string(),
    }
}

fn book(title: &str, author: &str, genre: &str, mood: &str, description: &str) -> BookRecommendation {
    BookRecommendation {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        mood: mood.to_string(),
        description: description.to_string(),
    }
}
