use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for a recipe.
///
/// Ids are opaque text. New ids are random UUIDs, but documents written by
/// older clients carry numeric ids, which are accepted on read and kept in
/// their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawRecipeId")]
pub struct RecipeId(String);

impl RecipeId {
    /// Creates a new random recipe ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecipeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Wire forms an id may take in a stored document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecipeId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<RawRecipeId> for RecipeId {
    fn from(raw: RawRecipeId) -> Self {
        match raw {
            RawRecipeId::Text(s) => Self(s),
            RawRecipeId::Unsigned(n) => Self(n.to_string()),
            RawRecipeId::Signed(n) => Self(n.to_string()),
        }
    }
}
