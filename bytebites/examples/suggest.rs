use bytebites::{Config, RecipeSuggester, SavedRecipes, Session};
use dotenvy::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ingredients = if args.is_empty() {
        "chicken breast, broccoli, garlic, olive oil".to_string()
    } else {
        args.join(" ")
    };

    let config = Config::from_env().expect("GOOGLE_API_KEY must be set");
    let suggester = RecipeSuggester::new(
        Arc::new(config.text_model()),
        Arc::new(config.image_model()),
    );
    let saved = SavedRecipes::new(Arc::new(config.storage_backend()));
    let mut session = Session::new(suggester, saved);

    println!("Finding recipes for: {ingredients}\n");
    session.submit(&ingredients).await;

    if let Some(error) = session.error() {
        eprintln!("{error}");
        return;
    }

    for recipe in session.recipes() {
        println!("## {}", recipe.name);
        println!("{}", recipe.description);
        println!("Source: {}", recipe.source_url);
        match &recipe.image_url {
            Some(url) => println!("Illustration: data URL, {} chars", url.len()),
            None => println!("Illustration: (placeholder)"),
        }
        println!();
    }
}
