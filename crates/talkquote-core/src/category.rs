use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Motivational,
    Funny,
    Inspirational,
    Zen,
    Tech,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Motivational => "motivational",
            Category::Funny => "funny",
            Category::Inspirational => "inspirational",
            Category::Zen => "zen",
            Category::Tech => "tech",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "motivational" => Some(Category::Motivational),
            "funny" => Some(Category::Funny),
            "inspirational" => Some(Category::Inspirational),
            "zen" => Some(Category::Zen),
            "tech" => Some(Category::Tech),
            _ => None,
        }
    }

    pub fn all() -> Vec<Category> {
        vec![
            Category::Motivational,
            Category::Funny,
            Category::Inspirational,
            Category::Zen,
            Category::Tech,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Motivational => "Motivational",
            Category::Funny => "Funny",
            Category::Inspirational => "Inspirational",
            Category::Zen => "Zen",
            Category::Tech => "Tech",
        }
    }

    /// The category after this one, wrapping around
    pub fn next(&self) -> Category {
        let all = Category::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Prompt template sent to the generator for this category
    pub fn prompt(&self) -> &'static str {
        match self {
            Category::Funny => {
                "Generate one short, witty, and funny quote suitable for a \"quote of the day\" message. Include the author."
            }
            Category::Inspirational => {
                "Generate one profound and inspirational quote suitable for a \"quote of the day\" message. Include the author."
            }
            Category::Zen => {
                "Generate one short, calming, and zen-like quote or proverb. Include the author or source (e.g., \"Zen Proverb\")."
            }
            Category::Tech => {
                "Generate one insightful or funny quote about technology, programming, or the future. Include the author."
            }
            Category::Motivational => {
                "Generate one powerful and motivational quote suitable for a \"quote of the day\" message. Include the author."
            }
        }
    }
}

/// Prompt for a category given by name. Unknown names get the motivational prompt.
pub fn prompt_for_name(name: &str) -> &'static str {
    Category::from_str(name).unwrap_or_default().prompt()
}
