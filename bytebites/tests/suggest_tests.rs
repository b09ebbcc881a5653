use bytebites::{RecipeSuggester, SuggestError};
use genai::{
    testing::{MockModel, MockResult},
    GenerationError, ImagePart, Message, ModelResponse, Modality, Part, ResponseFormat,
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

fn recipe_value(name: &str, image_prompt: &str) -> Value {
    json!({
        "name": name,
        "description": "A quick weeknight dinner.",
        "ingredients": ["1 lb chicken breast", "2 cups broccoli florets", "3 cloves garlic"],
        "instructions": ["Sear the chicken.", "Add the broccoli and garlic.", "Serve."],
        "sourceURL": "https://www.allrecipes.com/recipe/12345",
        "imagePrompt": image_prompt,
    })
}

fn text_reply(recipes: &[Value]) -> ModelResponse {
    ModelResponse {
        content: vec![Part::text(json!({ "recipes": recipes }).to_string())],
        ..Default::default()
    }
}

fn image_reply(bytes: &[u8]) -> ModelResponse {
    ModelResponse {
        content: vec![Part::Image(ImagePart::from_bytes("image/png", bytes))],
        ..Default::default()
    }
}

fn data_url(bytes: &[u8]) -> String {
    ImagePart::from_bytes("image/png", bytes).to_data_url()
}

fn three_recipes() -> Vec<Value> {
    vec![
        recipe_value("Chicken Stir-Fry", "p1"),
        recipe_value("Garlic Chicken", "p2"),
        recipe_value("Broccoli Bake", "p3"),
    ]
}

fn suggester(text: &Arc<MockModel>, image: &Arc<MockModel>) -> RecipeSuggester {
    RecipeSuggester::new(text.clone(), image.clone())
}

#[tokio::test]
async fn empty_ingredients_are_rejected_before_any_model_call() {
    let text = Arc::new(MockModel::new());
    let image = Arc::new(MockModel::new());

    let result = suggester(&text, &image).suggest("   ").await;

    assert!(matches!(result, Err(SuggestError::EmptyIngredients)));
    assert!(text.tracked_inputs().is_empty());
    assert!(image.tracked_inputs().is_empty());
}

#[tokio::test]
async fn merges_images_by_position_under_reverse_completion_order() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&three_recipes()));

    // The first image call finishes last and vice versa; the merge must
    // still pair by position, not by completion order.
    let image = Arc::new(MockModel::new());
    image.enqueue_all([
        MockResult::response(image_reply(b"u1")).after(Duration::from_millis(60)),
        MockResult::response(image_reply(b"u2")).after(Duration::from_millis(30)),
        MockResult::response(image_reply(b"u3")),
    ]);

    let result = suggester(&text, &image)
        .suggest("chicken, broccoli, garlic")
        .await
        .expect("suggestion succeeds");

    let names: Vec<_> = result.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Chicken Stir-Fry", "Garlic Chicken", "Broccoli Bake"]);

    assert_eq!(result.recipes[0].image_url, Some(data_url(b"u1")));
    assert_eq!(result.recipes[1].image_url, Some(data_url(b"u2")));
    assert_eq!(result.recipes[2].image_url, Some(data_url(b"u3")));
}

#[tokio::test]
async fn text_call_is_structured_and_image_calls_carry_the_prompts() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&three_recipes()));

    let image = Arc::new(MockModel::new());
    image.enqueue_all([
        MockResult::response(image_reply(b"a")),
        MockResult::response(image_reply(b"b")),
        MockResult::response(image_reply(b"c")),
    ]);

    suggester(&text, &image)
        .suggest("chicken, broccoli, garlic")
        .await
        .expect("suggestion succeeds");

    let text_inputs = text.tracked_inputs();
    assert_eq!(text_inputs.len(), 1);
    assert!(matches!(
        text_inputs[0].response_format,
        Some(ResponseFormat::Json(_))
    ));
    assert!(text_inputs[0]
        .system_prompt
        .as_deref()
        .is_some_and(|p| p.contains("RecipeAce")));
    let Message::User(user) = &text_inputs[0].messages[0] else {
        panic!("expected a user message");
    };
    assert!(user.content[0]
        .as_text()
        .is_some_and(|t| t.text.contains("chicken, broccoli, garlic")));

    let image_inputs = image.tracked_inputs();
    assert_eq!(image_inputs.len(), 3);
    for (input, prompt) in image_inputs.iter().zip(["p1", "p2", "p3"]) {
        assert_eq!(
            input.modalities,
            Some(vec![Modality::Text, Modality::Image])
        );
        let Message::User(user) = &input.messages[0] else {
            panic!("expected a user message");
        };
        assert_eq!(user.content[0].as_text().map(|t| t.text.as_str()), Some(prompt));
    }
}

#[tokio::test]
async fn unparsable_reply_degrades_to_an_empty_result() {
    let text = Arc::new(MockModel::new());
    text.enqueue(ModelResponse {
        content: vec![Part::text("here are some recipes!")],
        ..Default::default()
    });
    let image = Arc::new(MockModel::new());

    let result = suggester(&text, &image)
        .suggest("chicken")
        .await
        .expect("degrades, does not error");

    assert!(result.recipes.is_empty());
    assert!(image.tracked_inputs().is_empty());
}

#[tokio::test]
async fn schema_violating_reply_degrades_to_an_empty_result() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&[
        json!({"name": "Missing Everything Else"}),
        recipe_value("B", "p"),
        recipe_value("C", "p"),
    ]));
    let image = Arc::new(MockModel::new());

    let result = suggester(&text, &image)
        .suggest("chicken")
        .await
        .expect("degrades, does not error");

    assert!(result.recipes.is_empty());
    assert!(image.tracked_inputs().is_empty());
}

#[tokio::test]
async fn text_model_failure_is_a_generation_error() {
    let text = Arc::new(MockModel::new());
    text.enqueue(MockResult::error(GenerationError::Invariant(
        "mock",
        "service unavailable".into(),
    )));
    let image = Arc::new(MockModel::new());

    let result = suggester(&text, &image).suggest("chicken").await;

    assert!(matches!(result, Err(SuggestError::Generation(_))));
    assert!(image.tracked_inputs().is_empty());
}

#[tokio::test]
async fn failed_image_call_becomes_a_placeholder_for_that_recipe_only() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&three_recipes()));

    let image = Arc::new(MockModel::new());
    image.enqueue_all([
        MockResult::response(image_reply(b"u1")),
        MockResult::error(GenerationError::Refusal("blocked".into())),
        MockResult::response(image_reply(b"u3")),
    ]);

    let result = suggester(&text, &image)
        .suggest("chicken")
        .await
        .expect("one bad image does not sink the suggestion");

    assert_eq!(result.recipes[0].image_url, Some(data_url(b"u1")));
    assert_eq!(result.recipes[1].image_url, None);
    assert_eq!(result.recipes[2].image_url, Some(data_url(b"u3")));
}

#[tokio::test]
async fn image_reply_without_an_image_part_becomes_a_placeholder() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&three_recipes()));

    let image = Arc::new(MockModel::new());
    image.enqueue_all([
        MockResult::response(image_reply(b"u1")),
        MockResult::response(ModelResponse {
            content: vec![Part::text("no image for you")],
            ..Default::default()
        }),
        MockResult::response(image_reply(b"u3")),
    ]);

    let result = suggester(&text, &image)
        .suggest("chicken")
        .await
        .expect("suggestion succeeds");

    assert_eq!(result.recipes[1].image_url, None);
}

#[tokio::test]
async fn each_recipe_gets_exactly_one_image_call() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&[
        recipe_value("A", "p1"),
        recipe_value("B", "p2"),
        recipe_value("C", "p3"),
        recipe_value("D", "p4"),
    ]));

    let image = Arc::new(MockModel::new());
    image.enqueue_all((0..4).map(|_| MockResult::response(image_reply(b"img"))));

    let result = suggester(&text, &image)
        .suggest("chicken")
        .await
        .expect("suggestion succeeds");

    assert_eq!(result.recipes.len(), 4);
    assert_eq!(image.tracked_inputs().len(), 4);
}

#[tokio::test]
async fn timed_out_text_call_is_a_generation_error() {
    let text = Arc::new(MockModel::new());
    text.enqueue(MockResult::response(text_reply(&three_recipes())).after(Duration::from_millis(80)));
    let image = Arc::new(MockModel::new());

    let result = suggester(&text, &image)
        .with_call_timeout(Duration::from_millis(10))
        .suggest("chicken")
        .await;

    assert!(matches!(
        result,
        Err(SuggestError::Generation(GenerationError::Timeout(_)))
    ));
}

#[tokio::test]
async fn timed_out_image_call_becomes_a_placeholder() {
    let text = Arc::new(MockModel::new());
    text.enqueue(text_reply(&three_recipes()));

    let image = Arc::new(MockModel::new());
    image.enqueue_all([
        MockResult::response(image_reply(b"u1")),
        MockResult::response(image_reply(b"u2")).after(Duration::from_millis(120)),
        MockResult::response(image_reply(b"u3")),
    ]);

    let result = suggester(&text, &image)
        .with_call_timeout(Duration::from_millis(40))
        .suggest("chicken")
        .await
        .expect("suggestion succeeds");

    assert_eq!(result.recipes[0].image_url, Some(data_url(b"u1")));
    assert_eq!(result.recipes[1].image_url, None);
    assert_eq!(result.recipes[2].image_url, Some(data_url(b"u3")));
}
