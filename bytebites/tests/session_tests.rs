use bytebites::{MemoryBackend, RecipeSuggester, SavedRecipes, Session};
use genai::{
    testing::{MockModel, MockResult},
    GenerationError, ImagePart, ModelResponse, Part,
};
use serde_json::json;
use std::sync::Arc;

fn text_reply() -> ModelResponse {
    let recipes: Vec<_> = ["Stir-Fry", "Garlic Chicken", "Broccoli Bake"]
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "description": "A quick weeknight dinner.",
                "ingredients": ["1 lb chicken breast"],
                "instructions": ["Cook it."],
                "sourceURL": "https://www.allrecipes.com/recipe/1",
                "imagePrompt": "A plated dinner",
            })
        })
        .collect();

    ModelResponse {
        content: vec![Part::text(json!({ "recipes": recipes }).to_string())],
        ..Default::default()
    }
}

fn session_with(text: Arc<MockModel>, image: Arc<MockModel>) -> Session {
    Session::new(
        RecipeSuggester::new(text, image),
        SavedRecipes::new(Arc::new(MemoryBackend::new())),
    )
}

#[tokio::test]
async fn empty_input_sets_an_inline_message_and_keeps_current_recipes() {
    let text = Arc::new(MockModel::new());
    let image = Arc::new(MockModel::new());
    let mut session = session_with(text.clone(), image);

    session.submit("").await;

    assert_eq!(session.error(), Some("Please enter some ingredients."));
    assert!(session.recipes().is_empty());
    assert!(!session.is_loading());
    assert!(text.tracked_inputs().is_empty());
}

#[tokio::test]
async fn successful_submit_replaces_recipes_and_clears_the_error() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply());
    let image = Arc::new(MockModel::new());
    image.enqueue_all((0..3).map(|_| {
        MockResult::response(ModelResponse {
            content: vec![Part::Image(ImagePart::from_bytes("image/png", b"img"))],
            ..Default::default()
        })
    }));

    let mut session = session_with(text, image);
    session.submit("").await; // leaves an error behind
    session.submit("chicken breast, broccoli").await;

    assert_eq!(session.error(), None);
    assert_eq!(session.recipes().len(), 3);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn generation_failure_surfaces_the_generic_message() {
    let text = Arc::new(MockModel::new());
    text.enqueue(MockResult::error(GenerationError::Invariant(
        "mock",
        "service unavailable".into(),
    )));
    let mut session = session_with(text, Arc::new(MockModel::new()));

    session.submit("chicken").await;

    assert_eq!(
        session.error(),
        Some("Could not find recipes. Please try again.")
    );
    assert!(session.recipes().is_empty());
}

#[tokio::test]
async fn toggle_save_acts_on_the_selection() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply());
    let image = Arc::new(MockModel::new());
    image.enqueue_all((0..3).map(|_| {
        MockResult::response(ModelResponse {
            content: vec![Part::Image(ImagePart::from_bytes("image/png", b"img"))],
            ..Default::default()
        })
    }));

    let mut session = session_with(text, image);
    session.submit("chicken").await;

    // Nothing selected yet.
    assert!(!session.toggle_save().await);
    assert!(session.saved_recipes().await.is_empty());

    let first = session.recipes()[0].clone();
    session.select(first.clone());
    assert!(session.toggle_save().await);
    assert!(session.is_selection_saved().await);
    assert_eq!(session.saved_recipes().await, vec![first.clone()]);

    session.clear_selection();
    assert!(!session.is_selection_saved().await);

    session.remove_saved(&first.name).await;
    assert!(session.saved_recipes().await.is_empty());
}
