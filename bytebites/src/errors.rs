use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuggestError {
    /// The ingredient input was empty after trimming. Never reaches the
    /// model services.
    #[error("no ingredients were provided")]
    EmptyIngredients,
    /// The text-generation call failed outright. No partial result exists.
    #[error("text generation failed: {0}")]
    Generation(#[from] genai::GenerationError),
}
