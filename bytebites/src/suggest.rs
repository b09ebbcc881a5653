use crate::{
    errors::SuggestError,
    recipe::{parse_suggestions, recipe_list_schema, SuggestionResult},
};
use genai::{
    GenerationError, GenerationInput, GenerationResult, GenerativeModel, JsonSchemaFormat, Message,
    Modality, ModelResponse, Part, ResponseFormat,
};
use std::{sync::Arc, time::Duration};
use tracing::warn;

const SUGGEST_SYSTEM_PROMPT: &str = "You are a recipe suggestion AI called RecipeAce.

You will be provided with a list of ingredients that a user has available, and you will suggest 3-5 recipes that the user can make with those ingredients.
For each recipe, provide a name, a short and enticing description (2-3 sentences), a list of ingredients with quantities, step-by-step instructions, a plausible but fake source URL from a popular recipe website like allrecipes.com or foodnetwork.com, and a short imagePrompt describing an appetizing photo of the finished dish.

Provide the output in the specified JSON format.";

/// Turns an ingredient list into illustrated recipe suggestions.
///
/// One text-model call proposes the recipes; one image-model call per recipe
/// illustrates them, all in flight concurrently. No call is ever retried.
pub struct RecipeSuggester {
    text_model: Arc<dyn GenerativeModel>,
    image_model: Arc<dyn GenerativeModel>,
    call_timeout: Option<Duration>,
}

impl RecipeSuggester {
    #[must_use]
    pub fn new(text_model: Arc<dyn GenerativeModel>, image_model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            text_model,
            image_model,
            call_timeout: None,
        }
    }

    /// Bound every outbound model call by a deadline. A timed-out text call
    /// fails the suggestion; a timed-out image call becomes a placeholder.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Suggest recipes for the given ingredient list.
    ///
    /// A reply that does not conform to the recipe schema degrades to an
    /// empty result instead of an error; an outright call failure is
    /// [`SuggestError::Generation`].
    pub async fn suggest(&self, ingredients: &str) -> Result<SuggestionResult, SuggestError> {
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Err(SuggestError::EmptyIngredients);
        }

        let response = self
            .call(
                self.text_model.as_ref(),
                GenerationInput {
                    system_prompt: Some(SUGGEST_SYSTEM_PROMPT.to_string()),
                    messages: vec![Message::user(vec![Part::text(format!(
                        "Ingredients: {ingredients}"
                    ))])],
                    response_format: Some(ResponseFormat::Json(JsonSchemaFormat {
                        name: "recipes".to_string(),
                        description: Some(
                            "A list of 3-5 suggested recipes based on the available ingredients."
                                .to_string(),
                        ),
                        schema: Some(recipe_list_schema()),
                    })),
                    ..Default::default()
                },
            )
            .await?;

        let raw = response.text();
        let Some(mut recipes) = parse_suggestions(&raw) else {
            warn!("suggestion reply did not conform to the recipe schema, returning no recipes");
            return Ok(SuggestionResult::default());
        };

        // One image call per recipe, all in flight at once. join_all keeps
        // the output order aligned with the input order regardless of the
        // order the calls complete in.
        let images = futures::future::join_all(
            recipes
                .iter()
                .map(|recipe| self.generate_image(&recipe.image_prompt, &recipe.name)),
        )
        .await;

        for (recipe, image_url) in recipes.iter_mut().zip(images) {
            recipe.image_url = image_url;
        }

        Ok(SuggestionResult { recipes })
    }

    /// Generate one illustration. A failed or empty reply leaves the recipe
    /// without an image rather than failing the suggestion.
    async fn generate_image(&self, prompt: &str, recipe_name: &str) -> Option<String> {
        let input = GenerationInput {
            messages: vec![Message::user(vec![Part::text(prompt)])],
            modalities: Some(vec![Modality::Text, Modality::Image]),
            ..Default::default()
        };

        match self.call(self.image_model.as_ref(), input).await {
            Ok(response) => match response.first_image() {
                Some(image) => Some(image.to_data_url()),
                None => {
                    warn!(recipe = recipe_name, "image model returned no image");
                    None
                }
            },
            Err(error) => {
                warn!(recipe = recipe_name, %error, "image generation failed");
                None
            }
        }
    }

    async fn call(
        &self,
        model: &dyn GenerativeModel,
        input: GenerationInput,
    ) -> GenerationResult<ModelResponse> {
        match self.call_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, model.generate(input)).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(deadline)),
            },
            None => model.generate(input).await,
        }
    }
}
