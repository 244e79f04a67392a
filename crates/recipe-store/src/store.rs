use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::{NewRecipe, Recipe, RecipeId, RecipePatch, RecipeQuery, Result};

/// Core trait for recipe store implementations.
///
/// A recipe store owns the authoritative recipe collection and keeps it in
/// sync with its backing storage. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Returns every recipe in insertion order.
    async fn list(&self) -> Result<Vec<Recipe>>;

    /// Returns the number of recipes without copying them.
    async fn count(&self) -> Result<usize>;

    /// Returns the recipe with the given id, or None if it doesn't exist.
    async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>>;

    /// Assigns a fresh id to `new`, appends it, and persists the collection.
    ///
    /// Returns the stored record.
    async fn create(&self, new: NewRecipe) -> Result<Recipe>;

    /// Merges the fields present in `patch` into an existing recipe and
    /// persists the collection.
    ///
    /// Fails with `NotFound` if the id doesn't exist.
    async fn update(&self, id: &RecipeId, patch: RecipePatch) -> Result<Recipe>;

    /// Removes a recipe and persists the remaining collection.
    ///
    /// Returns the removed record, or fails with `NotFound`.
    async fn delete(&self, id: &RecipeId) -> Result<Recipe>;
}

/// Extension trait providing convenience methods for recipe stores.
#[async_trait]
pub trait RecipeStoreExt: RecipeStore {
    /// Picks one recipe uniformly at random. Returns None when the store is
    /// empty.
    async fn random_recipe(&self) -> Result<Option<Recipe>> {
        let recipes = self.list().await?;
        let picked = recipes.choose(&mut rand::thread_rng()).cloned();
        Ok(picked)
    }

    /// Returns the recipes matching `query`, in insertion order.
    async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        let recipes = self.list().await?;
        if query.is_empty() {
            return Ok(recipes);
        }
        Ok(recipes.into_iter().filter(|r| query.matches(r)).collect())
    }

    /// Checks if a recipe with the given id exists.
    async fn contains(&self, id: &RecipeId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

// Blanket implementation for all RecipeStore implementations
impl<T: RecipeStore + ?Sized> RecipeStoreExt for T {}
