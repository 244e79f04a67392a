//! Recipe collection store.
//!
//! The collection lives in memory and is written back wholesale, as a single
//! JSON document, on every mutation.

pub mod document;
pub mod error;
pub mod persist;
pub mod query;
pub mod recipe;
pub mod store;

pub use common::RecipeId;
pub use document::DocumentStore;
pub use error::{Result, StoreError};
pub use persist::{InMemoryPersistence, JsonFilePersistence, Persistence};
pub use query::RecipeQuery;
pub use recipe::{Ingredient, NewRecipe, Recipe, RecipePatch};
pub use store::{RecipeStore, RecipeStoreExt};

/// Store backed by a JSON file on disk.
pub type JsonRecipeStore = DocumentStore<JsonFilePersistence>;
