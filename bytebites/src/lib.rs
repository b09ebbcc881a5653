mod config;
mod errors;
mod recipe;
mod saved;
mod session;
mod store;
mod suggest;

pub use config::{Config, ConfigError};
pub use errors::SuggestError;
pub use recipe::{Recipe, SuggestionResult};
pub use saved::{SavedRecipes, SAVED_RECIPES_KEY};
pub use session::Session;
pub use store::{FileBackend, MemoryBackend, Slot, StorageBackend, StoreError, StoreResult};
pub use suggest::RecipeSuggester;
