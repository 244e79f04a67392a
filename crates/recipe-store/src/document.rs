use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    NewRecipe, Recipe, RecipeId, RecipePatch, Result, StoreError,
    persist::Persistence,
    store::RecipeStore,
};

/// Recipe store that keeps the collection in memory and writes the whole
/// document through its persistence backend on every mutation.
///
/// Mutations are applied to a copy of the collection, saved, and only then
/// committed in memory, so a failed save leaves both sides unchanged. The
/// write lock is held across the save, which serializes concurrent writers.
pub struct DocumentStore<P: Persistence> {
    recipes: Arc<RwLock<Vec<Recipe>>>,
    persistence: Arc<P>,
}

impl<P: Persistence> Clone for DocumentStore<P> {
    fn clone(&self) -> Self {
        Self {
            recipes: Arc::clone(&self.recipes),
            persistence: Arc::clone(&self.persistence),
        }
    }
}

impl<P: Persistence> DocumentStore<P> {
    /// Creates an empty store over `persistence` without reading it.
    pub fn new(persistence: P) -> Self {
        Self {
            recipes: Arc::new(RwLock::new(Vec::new())),
            persistence: Arc::new(persistence),
        }
    }

    /// Creates a store and loads the existing document.
    pub async fn open(persistence: P) -> Self {
        let store = Self::new(persistence);
        store.load().await;
        store
    }

    /// Replaces the in-memory collection with the stored document.
    ///
    /// Read or parse failures are logged and leave the collection empty.
    /// Returns the number of recipes loaded.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let loaded = match self.persistence.load().await {
            Ok(recipes) => dedup_ids(recipes),
            Err(e) => {
                tracing::error!(error = %e, "failed to load recipes, starting empty");
                Vec::new()
            }
        };

        let count = loaded.len();
        *self.recipes.write().await = loaded;
        tracing::info!(count, "recipes loaded");
        count
    }

    /// Returns the number of recipes held.
    pub async fn len(&self) -> usize {
        self.recipes.read().await.len()
    }

    /// Returns true if the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.recipes.read().await.is_empty()
    }

    async fn commit(&self, current: &mut Vec<Recipe>, next: Vec<Recipe>) -> Result<()> {
        if let Err(e) = self.persistence.save(&next).await {
            metrics::counter!("recipe_store_persist_failures_total").increment(1);
            tracing::error!(error = %e, "failed to persist recipes");
            return Err(e);
        }
        *current = next;
        Ok(())
    }
}

#[async_trait]
impl<P: Persistence> RecipeStore for DocumentStore<P> {
    async fn list(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.recipes.read().await.len())
    }

    async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| &r.id == id).cloned())
    }

    #[tracing::instrument(skip(self, new))]
    async fn create(&self, new: NewRecipe) -> Result<Recipe> {
        let mut recipes = self.recipes.write().await;

        let mut id = RecipeId::new();
        while recipes.iter().any(|r| r.id == id) {
            id = RecipeId::new();
        }

        let recipe = Recipe::from_new(id, new);
        let mut next = recipes.clone();
        next.push(recipe.clone());
        self.commit(&mut recipes, next).await?;

        metrics::counter!("recipes_created_total").increment(1);
        tracing::info!(id = %recipe.id, name = %recipe.name, "recipe created");
        Ok(recipe)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, id: &RecipeId, patch: RecipePatch) -> Result<Recipe> {
        let mut recipes = self.recipes.write().await;

        let index = recipes
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut next = recipes.clone();
        patch.apply_to(&mut next[index]);
        let updated = next[index].clone();
        self.commit(&mut recipes, next).await?;

        metrics::counter!("recipes_updated_total").increment(1);
        tracing::info!(%id, "recipe updated");
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &RecipeId) -> Result<Recipe> {
        let mut recipes = self.recipes.write().await;

        let index = recipes
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut next = recipes.clone();
        let removed = next.remove(index);
        self.commit(&mut recipes, next).await?;

        metrics::counter!("recipes_deleted_total").increment(1);
        tracing::info!(%id, "recipe deleted");
        Ok(removed)
    }
}

// First occurrence of an id wins.
fn dedup_ids(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.id.clone());
            if !fresh {
                tracing::warn!(id = %r.id, "dropping recipe with duplicate id");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ingredient, InMemoryPersistence, RecipeQuery, RecipeStoreExt};

    fn margarita() -> NewRecipe {
        NewRecipe::named("Margarita")
            .ingredient(Ingredient::new("2", "oz", "tequila"))
            .ingredient(Ingredient::new("1", "oz", "lime juice"))
            .instructions("Shake")
    }

    fn stored(id: &str, name: &str) -> Recipe {
        Recipe::from_new(RecipeId::from(id), NewRecipe::named(name))
    }

    #[tokio::test]
    async fn create_assigns_fresh_id_and_lists() {
        let store = DocumentStore::new(InMemoryPersistence::new());

        let first = store.create(margarita()).await.unwrap();
        let second = store.create(NewRecipe::named("Mojito")).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = store.list().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn create_persists_full_collection() {
        let persistence = InMemoryPersistence::new();
        let store = DocumentStore::new(persistence.clone());

        store.create(margarita()).await.unwrap();
        store.create(NewRecipe::named("Mojito")).await.unwrap();

        let document = persistence.document().await.unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document[0].name, "Margarita");
        assert_eq!(persistence.save_count().await, 2);
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        let found = store.get(&RecipeId::from("missing")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        let created = store.create(margarita()).await.unwrap();

        let patch = RecipePatch {
            instructions: Some("Shake hard, strain".to_string()),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).await.unwrap();

        assert_eq!(updated.instructions, "Shake hard, strain");
        assert_eq!(updated.ingredients, created.ingredients);
        assert_eq!(updated.name, created.name);
        assert_eq!(store.get(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        let result = store
            .update(&RecipeId::from("missing"), RecipePatch::default())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_recipe() {
        let persistence = InMemoryPersistence::new();
        let store = DocumentStore::new(persistence.clone());
        let keep = store.create(NewRecipe::named("Mojito")).await.unwrap();
        let gone = store.create(margarita()).await.unwrap();

        let removed = store.delete(&gone.id).await.unwrap();
        assert_eq!(removed, gone);
        assert_eq!(store.list().await.unwrap(), vec![keep.clone()]);
        assert_eq!(persistence.document().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_collection_unchanged() {
        let persistence = InMemoryPersistence::new();
        let store = DocumentStore::new(persistence.clone());
        store.create(margarita()).await.unwrap();
        let before = store.list().await.unwrap();

        let result = store.delete(&RecipeId::from("missing")).await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.list().await.unwrap(), before);
        assert_eq!(persistence.save_count().await, 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_memory_unchanged() {
        let persistence = InMemoryPersistence::new();
        let store = DocumentStore::new(persistence.clone());
        let created = store.create(margarita()).await.unwrap();

        persistence.set_fail_on_save(true).await;

        assert!(store.create(NewRecipe::named("Mojito")).await.is_err());
        assert!(store.delete(&created.id).await.is_err());
        let patch = RecipePatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(store.update(&created.id, patch).await.is_err());

        assert_eq!(store.list().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn open_loads_existing_document() {
        let persistence =
            InMemoryPersistence::with_recipes(vec![stored("1", "Negroni"), stored("2", "Sazerac")]);
        let store = DocumentStore::open(persistence).await;

        assert_eq!(store.len().await, 2);
        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Negroni", "Sazerac"]);
    }

    #[tokio::test]
    async fn load_drops_duplicate_ids() {
        let persistence = InMemoryPersistence::with_recipes(vec![
            stored("1", "Negroni"),
            stored("1", "Boulevardier"),
            stored("2", "Sazerac"),
        ]);
        let store = DocumentStore::open(persistence).await;

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Negroni");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn random_recipe_on_empty_store_is_none() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        assert!(store.is_empty().await);
        assert!(store.random_recipe().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn random_recipe_picks_a_member() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        let a = store.create(margarita()).await.unwrap();
        let b = store.create(NewRecipe::named("Mojito")).await.unwrap();

        for _ in 0..20 {
            let picked = store.random_recipe().await.unwrap().unwrap();
            assert!(picked == a || picked == b);
        }
    }

    #[tokio::test]
    async fn search_filters_by_name_and_ingredient() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        store.create(margarita()).await.unwrap();
        store
            .create(NewRecipe::named("Mojito").ingredient(Ingredient::new("2", "oz", "rum")))
            .await
            .unwrap();

        let by_item = store.search(&RecipeQuery::matching("lime")).await.unwrap();
        assert_eq!(by_item.len(), 1);
        assert_eq!(by_item[0].name, "Margarita");

        let by_name = store.search(&RecipeQuery::matching("moj")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Mojito");

        let all = store.search(&RecipeQuery::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = DocumentStore::new(InMemoryPersistence::new());
        let other = store.clone();

        let created = store.create(margarita()).await.unwrap();
        assert!(other.contains(&created.id).await.unwrap());
    }
}
