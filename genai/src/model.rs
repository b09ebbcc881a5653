use crate::{GenerationInput, GenerationResult, ModelResponse};

/// A hosted generative model, callable for text or image output.
///
/// The two halves of the app (recipe text and recipe illustrations) are both
/// served through this one seam, so tests can swap either side for a mock.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate(&self, input: GenerationInput) -> GenerationResult<ModelResponse>;
}
