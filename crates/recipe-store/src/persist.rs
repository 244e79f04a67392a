//! Whole-document persistence backends.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Recipe, Result};

/// Storage for the full recipe collection as a single document.
///
/// Every save replaces the previous document wholesale.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Reads the stored collection. A document that does not exist yet is an
    /// empty collection, not an error.
    async fn load(&self) -> Result<Vec<Recipe>>;

    /// Replaces the stored collection with `recipes`.
    async fn save(&self, recipes: &[Recipe]) -> Result<()>;
}

/// JSON array on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Creates a backend for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Persistence for JsonFilePersistence {
    async fn load(&self) -> Result<Vec<Recipe>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "recipe file not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    async fn save(&self, recipes: &[Recipe]) -> Result<()> {
        let data = serde_json::to_vec_pretty(recipes)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically (write to temp, then rename)
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, data).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), count = recipes.len(), "recipes saved");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryPersistenceState {
    document: Option<Vec<Recipe>>,
    fail_on_save: bool,
    saves: usize,
}

/// In-memory persistence for testing.
///
/// Keeps the last saved collection and can be told to fail subsequent saves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    state: Arc<RwLock<InMemoryPersistenceState>>,
}

impl InMemoryPersistence {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `recipes`.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryPersistenceState {
                document: Some(recipes),
                ..Default::default()
            })),
        }
    }

    /// Configures the backend to fail every save until reset.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }

    /// Returns the last saved collection, if any save has happened.
    pub async fn document(&self) -> Option<Vec<Recipe>> {
        self.state.read().await.document.clone()
    }

    /// Returns the number of successful saves.
    pub async fn save_count(&self) -> usize {
        self.state.read().await.saves
    }
}

#[async_trait]
impl Persistence for InMemoryPersistence {
    async fn load(&self) -> Result<Vec<Recipe>> {
        Ok(self.state.read().await.document.clone().unwrap_or_default())
    }

    async fn save(&self, recipes: &[Recipe]) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(std::io::Error::other("simulated write failure").into());
        }
        state.document = Some(recipes.to_vec());
        state.saves += 1;
        Ok(())
    }
}
