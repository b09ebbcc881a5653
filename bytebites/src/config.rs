use crate::store::FileBackend;
use genai::google::{GoogleModel, GoogleModelOptions};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
const DEFAULT_DATA_DIR: &str = ".bytebites";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub text_model_id: String,
    pub image_model_id: String,
    pub base_url: Option<String>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let google_api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GOOGLE_API_KEY"))?;

        Ok(Self {
            google_api_key,
            text_model_id: std::env::var("BYTEBITES_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            image_model_id: std::env::var("BYTEBITES_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            base_url: std::env::var("GOOGLE_BASE_URL").ok(),
            data_dir: std::env::var("BYTEBITES_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }

    #[must_use]
    pub fn text_model(&self) -> GoogleModel {
        GoogleModel::new(self.text_model_id.clone(), self.google_options())
    }

    #[must_use]
    pub fn image_model(&self) -> GoogleModel {
        GoogleModel::new(self.image_model_id.clone(), self.google_options())
    }

    #[must_use]
    pub fn storage_backend(&self) -> FileBackend {
        FileBackend::new(&self.data_dir)
    }

    fn google_options(&self) -> GoogleModelOptions {
        GoogleModelOptions {
            api_key: self.google_api_key.clone(),
            base_url: self.base_url.clone(),
            ..Default::default()
        }
    }
}
