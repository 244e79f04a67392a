use serde::{Deserialize, Deserializer, Serialize};

use crate::RecipeId;

/// One line item of a recipe.
///
/// All fields are free text; `amount` is not parsed as a number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub measurement: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item: String,
}

impl Ingredient {
    /// Creates an ingredient line.
    pub fn new(
        amount: impl Into<String>,
        measurement: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            measurement: measurement.into(),
            item: item.into(),
        }
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glassware: Option<String>,
}

impl Recipe {
    /// Builds a stored recipe from a create request under the given id.
    pub fn from_new(id: RecipeId, new: NewRecipe) -> Self {
        Self {
            id,
            name: new.name,
            ingredients: new.ingredients,
            instructions: new.instructions,
            glassware: new.glassware,
        }
    }
}

/// Body of a create request. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default)]
    pub glassware: Option<String>,
}

impl NewRecipe {
    /// Creates a recipe request with a name and no other content.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends an ingredient line.
    pub fn ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Sets the instructions.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Sets the glassware.
    pub fn glassware(mut self, glassware: impl Into<String>) -> Self {
        self.glassware = Some(glassware.into());
        self
    }
}

/// Partial update of a recipe.
///
/// Absent fields leave the stored value untouched. `glassware` distinguishes
/// an absent field (`None`) from an explicit `null` (`Some(None)`), which
/// clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RecipePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub glassware: Option<Option<String>>,
}

impl RecipePatch {
    /// Shallow-merges the provided fields into `recipe`. The id never changes.
    pub fn apply_to(self, recipe: &mut Recipe) {
        if let Some(name) = self.name {
            recipe.name = name;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            recipe.instructions = instructions;
        }
        if let Some(glassware) = self.glassware {
            recipe.glassware = glassware;
        }
    }
}

// A stored `null` reads as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Only called when the key is present, so a JSON `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
