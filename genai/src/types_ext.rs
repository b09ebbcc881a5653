use crate::{
    AssistantMessage, GenerationError, GenerationResult, ImagePart, Message, ModelResponse, Part,
    TextPart, UserMessage,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

impl Message {
    pub fn user(content: Vec<Part>) -> Self {
        Self::User(UserMessage { content })
    }

    pub fn assistant(content: Vec<Part>) -> Self {
        Self::Assistant(AssistantMessage { content })
    }
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart { text: text.into() })
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextPart> {
        match self {
            Self::Text(part) => Some(part),
            Self::Image(_) => None,
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImagePart> {
        match self {
            Self::Image(part) => Some(part),
            Self::Text(_) => None,
        }
    }
}

impl ImagePart {
    /// Build an image part from raw bytes, base64-encoding the data.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_data: BASE64_STANDARD.encode(bytes),
            width: None,
            height: None,
        }
    }

    /// Decode the base64 image data back into raw bytes.
    pub fn decode(&self) -> GenerationResult<Vec<u8>> {
        BASE64_STANDARD
            .decode(&self.image_data)
            .map_err(|e| GenerationError::InvalidInput(format!("Invalid base64 image data: {e}")))
    }

    /// Render the image as an RFC 2397 `data:` URL, the form the app hands to
    /// anything that displays the image.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_data)
    }
}

impl ModelResponse {
    /// The concatenated text parts of the response.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.as_text().map(|t| t.text.as_str()))
            .collect()
    }

    /// The first image part of the response, if any.
    #[must_use]
    pub fn first_image(&self) -> Option<&ImagePart> {
        self.content.iter().find_map(Part::as_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_part_round_trips_bytes() {
        let part = ImagePart::from_bytes("image/png", b"not a real png");
        assert_eq!(part.decode().unwrap(), b"not a real png");
    }

    #[test]
    fn image_part_renders_data_url() {
        let part = ImagePart::from_bytes("image/png", b"x");
        assert_eq!(part.to_data_url(), "data:image/png;base64,eA==");
    }

    #[test]
    fn response_text_concatenates_text_parts_only() {
        let response = ModelResponse {
            content: vec![
                Part::text("a"),
                Part::Image(ImagePart::from_bytes("image/png", b"x")),
                Part::text("b"),
            ],
            ..Default::default()
        };
        assert_eq!(response.text(), "ab");
    }
}
