//! Shared types for the recipe service.

mod types;

pub use types::RecipeId;
