use thiserror::Error;

use crate::RecipeId;

/// Errors that can occur when interacting with the recipe store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No recipe with the given id exists in the collection.
    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    /// Reading or writing the backing document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for recipe store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
