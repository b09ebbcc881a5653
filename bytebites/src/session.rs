use crate::{
    errors::SuggestError, recipe::Recipe, saved::SavedRecipes, suggest::RecipeSuggester,
};
use tracing::warn;

const EMPTY_INGREDIENTS_MESSAGE: &str = "Please enter some ingredients.";
const GENERATION_FAILED_MESSAGE: &str = "Could not find recipes. Please try again.";

/// Transient view state and the actions a frontend drives.
///
/// Holds the current recipe list, the detail-view selection, and the
/// loading/error flags; everything durable lives in [`SavedRecipes`].
pub struct Session {
    suggester: RecipeSuggester,
    saved: SavedRecipes,
    recipes: Vec<Recipe>,
    selected: Option<Recipe>,
    loading: bool,
    error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(suggester: RecipeSuggester, saved: SavedRecipes) -> Self {
        Self {
            suggester,
            saved,
            recipes: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }

    /// Submit an ingredient list and replace the current recipe list with
    /// the outcome. Empty input is rejected here, before any model call.
    pub async fn submit(&mut self, ingredients: &str) {
        if ingredients.trim().is_empty() {
            self.error = Some(EMPTY_INGREDIENTS_MESSAGE.to_string());
            return;
        }

        self.loading = true;
        self.error = None;
        self.recipes.clear();
        self.selected = None;

        match self.suggester.suggest(ingredients).await {
            Ok(result) => self.recipes = result.recipes,
            Err(error) => {
                warn!(%error, "suggestion failed");
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }

        self.loading = false;
    }

    /// Open the detail view for a recipe (from the grid or the saved
    /// drawer).
    pub fn select(&mut self, recipe: Recipe) {
        self.selected = Some(recipe);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Toggle the saved state of the selected recipe. Returns whether it is
    /// saved afterwards; `false` when nothing is selected.
    pub async fn toggle_save(&self) -> bool {
        match &self.selected {
            Some(recipe) => self.saved.toggle(recipe).await,
            None => false,
        }
    }

    pub async fn is_selection_saved(&self) -> bool {
        match &self.selected {
            Some(recipe) => self.saved.is_saved(&recipe.name).await,
            None => false,
        }
    }

    pub async fn remove_saved(&self, name: &str) {
        self.saved.remove(name).await;
    }

    pub async fn saved_recipes(&self) -> Vec<Recipe> {
        self.saved.list().await
    }

    #[must_use]
    pub fn saved(&self) -> &SavedRecipes {
        &self.saved
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Recipe> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
