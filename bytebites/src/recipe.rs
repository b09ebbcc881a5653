use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

/// A suggested recipe.
///
/// `name` doubles as the key for save/remove operations; the app has no
/// separate recipe identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// The name of the recipe.
    pub name: String,
    /// A brief, enticing description of the recipe.
    pub description: String,
    /// The ingredients required for the recipe, including quantities.
    pub ingredients: Vec<String>,
    /// Step-by-step preparation instructions. Order is load-bearing.
    pub instructions: Vec<String>,
    /// A plausible but fake URL to an original recipe source.
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    /// A short description of the desired illustration, fed to the image
    /// model.
    pub image_prompt: String,
    /// Set once image generation completes. `None` is a valid state and
    /// consumers substitute a placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The outcome of one suggestion request: recipes in model order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SuggestionResult {
    pub recipes: Vec<Recipe>,
}

/// JSON schema for the structured text-model reply: the recipe fields minus
/// `imageUrl`, 3 to 5 entries.
pub(crate) fn recipe_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipes": {
                "type": "array",
                "description": "A list of 3-5 suggested recipes based on the available ingredients.",
                "minItems": 3,
                "maxItems": 5,
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "The name of the recipe."
                        },
                        "description": {
                            "type": "string",
                            "description": "A brief, enticing description of the recipe."
                        },
                        "ingredients": {
                            "type": "array",
                            "description": "A list of ingredients required for the recipe, including quantities.",
                            "items": { "type": "string" }
                        },
                        "instructions": {
                            "type": "array",
                            "description": "Step-by-step preparation instructions.",
                            "items": { "type": "string" }
                        },
                        "sourceURL": {
                            "type": "string",
                            "description": "A plausible but fake URL to an original recipe source."
                        },
                        "imagePrompt": {
                            "type": "string",
                            "description": "A short description of an appetizing photo of the finished dish."
                        }
                    },
                    "required": [
                        "name",
                        "description",
                        "ingredients",
                        "instructions",
                        "sourceURL",
                        "imagePrompt"
                    ],
                    "additionalProperties": false
                }
            }
        },
        "required": ["recipes"],
        "additionalProperties": false
    })
}

/// Parse a text-model reply into recipes. `None` means the reply did not
/// conform to the schema; callers degrade to an empty result rather than
/// erroring.
pub(crate) fn parse_suggestions(raw: &str) -> Option<Vec<Recipe>> {
    let parsed: SuggestionResult = serde_json::from_str(raw).ok()?;
    if !(3..=5).contains(&parsed.recipes.len()) {
        return None;
    }
    if !parsed.recipes.iter().all(recipe_is_valid) {
        return None;
    }
    Some(parsed.recipes)
}

fn recipe_is_valid(recipe: &Recipe) -> bool {
    if recipe.name.trim().is_empty() {
        return false;
    }
    matches!(
        Url::parse(&recipe.source_url),
        Ok(url) if matches!(url.scheme(), "http" | "https")
    )
}
