use crate::{
    recipe::Recipe,
    store::{Slot, StorageBackend},
};
use std::sync::Arc;
use tokio::sync::watch;

/// Storage key for the saved-recipe set, unchanged from the original app.
pub const SAVED_RECIPES_KEY: &str = "bytebites-saved";

/// The user's saved recipes: an ordered set, unique by recipe name,
/// persisted on every mutation.
pub struct SavedRecipes {
    slot: Slot<Vec<Recipe>>,
}

impl SavedRecipes {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            slot: Slot::new(backend, SAVED_RECIPES_KEY, Vec::new()),
        }
    }

    pub async fn list(&self) -> Vec<Recipe> {
        self.slot.load().await
    }

    pub async fn is_saved(&self, name: &str) -> bool {
        self.list().await.iter().any(|recipe| recipe.name == name)
    }

    /// Save the recipe, or un-save it if an entry with the same name already
    /// exists. Returns whether the recipe is saved afterwards.
    pub async fn toggle(&self, recipe: &Recipe) -> bool {
        let mut now_saved = false;
        self.slot
            .update(|mut saved| {
                if saved.iter().any(|entry| entry.name == recipe.name) {
                    saved.retain(|entry| entry.name != recipe.name);
                } else {
                    saved.push(recipe.clone());
                    now_saved = true;
                }
                saved
            })
            .await;
        now_saved
    }

    /// Drop every entry with the given name, including any accidental
    /// duplicates.
    pub async fn remove(&self, name: &str) {
        self.slot
            .update(|mut saved| {
                saved.retain(|entry| entry.name != name);
                saved
            })
            .await;
    }

    /// Observe the saved set. Receivers see every mutation and refresh.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Recipe>> {
        self.slot.subscribe()
    }

    /// Re-read the stored set after a change notice from another context.
    pub async fn refresh(&self) -> Vec<Recipe> {
        self.slot.refresh().await
    }
}
