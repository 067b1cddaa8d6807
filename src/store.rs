//! Persistence contract for extracted recipes.
//!
//! Records are keyed by `source_url`: saving the same URL twice updates the
//! existing record and keeps its id, so repeated imports are idempotent.

use crate::error::ImportError;
use crate::model::RecipeData;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub type RecipeId = u64;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_source_url(&self, source_url: &str) -> Result<Option<RecipeData>, ImportError>;

    /// Insert or update by `source_url`, returning the record's id.
    async fn save(&self, recipe: RecipeData) -> Result<RecipeId, ImportError>;

    async fn update_tags(&self, id: RecipeId, tags: Vec<String>) -> Result<(), ImportError>;
}

#[derive(Default)]
struct Records {
    next_id: RecipeId,
    by_id: HashMap<RecipeId, RecipeData>,
    ids_by_url: HashMap<String, RecipeId>,
}

/// Process-local [`RecipeStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find_by_source_url(&self, source_url: &str) -> Result<Option<RecipeData>, ImportError> {
        let guard = self.inner.lock().await;
        Ok(guard
            .ids_by_url
            .get(source_url)
            .and_then(|id| guard.by_id.get(id))
            .cloned())
    }

    async fn save(&self, recipe: RecipeData) -> Result<RecipeId, ImportError> {
        if recipe.source_url.trim().is_empty() {
            return Err(ImportError::StoreError(
                "recipe has no source URL".to_string(),
            ));
        }

        let mut guard = self.inner.lock().await;
        let existing = guard.ids_by_url.get(&recipe.source_url).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                guard.next_id += 1;
                let id = guard.next_id;
                guard.ids_by_url.insert(recipe.source_url.clone(), id);
                id
            }
        };

        // An update keeps tags that were set after the first save.
        let mut recipe = recipe;
        if recipe.tags.is_none() {
            recipe.tags = guard.by_id.get(&id).and_then(|old| old.tags.clone());
        }
        guard.by_id.insert(id, recipe);
        Ok(id)
    }

    async fn update_tags(&self, id: RecipeId, tags: Vec<String>) -> Result<(), ImportError> {
        let mut guard = self.inner.lock().await;
        let recipe = guard
            .by_id
            .get_mut(&id)
            .ok_or_else(|| ImportError::StoreError(format!("no recipe with id {id}")))?;
        recipe.tags = Some(tags);
        Ok(())
    }
}
