use crate::Recipe;

/// Builder for text searches over the recipe collection.
///
/// Matching is case-insensitive substring matching. An empty query matches
/// every recipe.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    /// Text to find in the recipe name or any ingredient item.
    pub text: Option<String>,

    /// Text to find in an ingredient item only.
    pub ingredient: Option<String>,
}

impl RecipeQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query matching `text` against names and ingredient items.
    pub fn matching(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    /// Filters by text in the name or any ingredient item.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = normalize(text.into());
        self
    }

    /// Filters by text in any ingredient item.
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = normalize(ingredient.into());
        self
    }

    /// Returns true when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.ingredient.is_none()
    }

    /// Returns true if `recipe` satisfies every filter in this query.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(ref text) = self.text
            && !contains(&recipe.name, text)
            && !recipe.ingredients.iter().any(|i| contains(&i.item, text))
        {
            return false;
        }
        if let Some(ref ingredient) = self.ingredient
            && !recipe.ingredients.iter().any(|i| contains(&i.item, ingredient))
        {
            return false;
        }
        true
    }
}

// Only an empty filter is dropped. Whitespace is part of the needle.
fn normalize(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_lowercase())
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
