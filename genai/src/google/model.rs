use super::api::{
    Blob, Content, GenerateContentConfig, GenerateContentParameters, GenerateContentResponse,
    GenerateContentResponseUsageMetadata, Part as GooglePart,
};
use crate::{
    client_utils, GenerationError, GenerationInput, GenerationResult, GenerativeModel, ImagePart,
    Message, Modality, ModelResponse, ModelUsage, Part, ResponseFormat, TextPart,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "google";

/// Finish reasons that mean the model declined rather than completed.
const BLOCKED_FINISH_REASONS: [&str; 4] =
    ["SAFETY", "IMAGE_SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST"];

pub struct GoogleModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleModelOptions) -> Self {
        let GoogleModelOptions {
            api_key,
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!("Invalid Google header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GoogleModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: GenerationInput) -> GenerationResult<ModelResponse> {
        crate::opentelemetry::trace_generate(
            self.provider(),
            &self.model_id(),
            input,
            |input| async move {
                let params = convert_to_generate_content_parameters(input, &self.model_id);

                let url = format!(
                    "{}/models/{}:generateContent?key={}",
                    self.base_url, self.model_id, self.api_key
                );

                let headers = self.request_headers()?;
                let response: GenerateContentResponse =
                    client_utils::send_json(&self.client, &url, &params, headers).await?;

                let candidate = response
                    .candidates
                    .and_then(|c| c.into_iter().next())
                    .ok_or_else(|| {
                        GenerationError::Invariant(PROVIDER, "No candidate in response".to_string())
                    })?;

                let parts = candidate.content.and_then(|c| c.parts).unwrap_or_default();

                if parts.is_empty() {
                    if let Some(reason) = candidate.finish_reason.as_deref() {
                        if BLOCKED_FINISH_REASONS.contains(&reason) {
                            return Err(GenerationError::Refusal(format!(
                                "Generation stopped: {reason}"
                            )));
                        }
                    }
                }

                let content = map_google_parts(parts)?;
                let usage = response.usage_metadata.map(map_google_usage_metadata);

                Ok(ModelResponse { content, usage })
            },
        )
        .await
    }
}

fn convert_to_generate_content_parameters(
    input: GenerationInput,
    model_id: &str,
) -> GenerateContentParameters {
    let GenerationInput {
        system_prompt,
        messages,
        response_format,
        modalities,
        temperature,
        max_tokens,
    } = input;

    let mut config = GenerateContentConfig {
        temperature,
        max_output_tokens: max_tokens,
        ..Default::default()
    };

    if let Some(ResponseFormat::Json(json_format)) = response_format {
        config.response_mime_type = Some("application/json".to_string());
        config.response_json_schema = json_format.schema;
    }

    if let Some(modalities) = modalities {
        config.response_modalities = Some(
            modalities
                .into_iter()
                .map(|modality| match modality {
                    Modality::Text => "TEXT".to_string(),
                    Modality::Image => "IMAGE".to_string(),
                })
                .collect(),
        );
    }

    GenerateContentParameters {
        model: model_id.to_string(),
        contents: messages.into_iter().map(convert_to_google_content).collect(),
        system_instruction: system_prompt.map(|text| Content {
            parts: Some(vec![GooglePart {
                text: Some(text),
                ..Default::default()
            }]),
            role: None,
        }),
        generation_config: Some(config),
    }
}

fn convert_to_google_content(message: Message) -> Content {
    let (role, content) = match message {
        Message::User(message) => ("user", message.content),
        Message::Assistant(message) => ("model", message.content),
    };

    Content {
        role: Some(role.to_string()),
        parts: Some(content.into_iter().map(convert_to_google_part).collect()),
    }
}

fn convert_to_google_part(part: Part) -> GooglePart {
    match part {
        Part::Text(text_part) => GooglePart {
            text: Some(text_part.text),
            ..Default::default()
        },
        Part::Image(image_part) => GooglePart {
            inline_data: Some(Blob {
                data: Some(image_part.image_data),
                mime_type: Some(image_part.mime_type),
            }),
            ..Default::default()
        },
    }
}

fn map_google_parts(parts: Vec<GooglePart>) -> GenerationResult<Vec<Part>> {
    parts
        .into_iter()
        .map(|part| {
            if let Some(text) = part.text {
                return Ok(Part::Text(TextPart { text }));
            }
            if let Some(blob) = part.inline_data {
                return Ok(Part::Image(ImagePart {
                    mime_type: blob.mime_type.unwrap_or_else(|| "image/png".to_string()),
                    image_data: blob.data.unwrap_or_default(),
                    width: None,
                    height: None,
                }));
            }
            Err(GenerationError::Invariant(
                PROVIDER,
                "Unrecognized part in candidate content".to_string(),
            ))
        })
        .collect()
}

fn map_google_usage_metadata(usage: GenerateContentResponseUsageMetadata) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_token_count.unwrap_or_default(),
        output_tokens: usage.candidates_token_count.unwrap_or_default(),
    }
}
