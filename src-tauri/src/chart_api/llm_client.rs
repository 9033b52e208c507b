use serde::Serialize;
use serde_json::Value;

use super::http_client::http_client;
use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text.into()),
        }
    }

    /// User turn with a text part followed by inline images, in order.
    pub fn user_with_images(text: impl Into<String>, image_data_urls: Vec<String>) -> Self {
        let mut parts = vec![ContentPart::Text { text: text.into() }];
        parts.extend(image_data_urls.into_iter().map(|url| ContentPart::ImageUrl {
            image_url: ImageUrl { url },
        }));
        Self {
            role: "user",
            content: MessageContent::Parts(parts),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
}

/// `choices[0].message.content`, or `None` when absent or null.
pub fn extract_message_content(json: &Value) -> Option<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}

/// Base64 payload of the first generated image.
pub fn extract_image_b64(json: &Value) -> Option<&str> {
    json["data"][0]["b64_json"].as_str()
}

/// Client for one OpenAI-compatible endpoint (Groq and OpenAI share the shape).
#[derive(Debug, Clone)]
pub struct ModelClient {
    config: ProviderConfig,
}

impl ModelClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> AppResult<Value> {
        let client = http_client().await?;
        let url = self.config.endpoint(path);

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = self.config.provider, %status, "Model API returned an error");
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Sends a chat/completions request. `Ok(None)` means the model answered without content.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> AppResult<Option<String>> {
        tracing::info!(
            provider = self.config.provider,
            model,
            messages = messages.len(),
            "Sending chat completion"
        );
        let body = ChatCompletionRequest { model, messages };
        let json = self.post_json("chat/completions", &body).await?;
        Ok(extract_message_content(&json))
    }

    /// Generates one image and returns its decoded bytes.
    pub async fn generate_image(&self, model: &str, prompt: &str, size: &str) -> AppResult<Vec<u8>> {
        tracing::info!(provider = self.config.provider, model, size, "Requesting image generation");
        let body = ImageGenerationRequest { model, prompt, size };
        let json = self.post_json("images/generations", &body).await?;
        let b64 = extract_image_b64(&json).ok_or(AppError::MissingContent)?;
        super::image_utils::decode_base64(b64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multimodal_message_serializes_in_openai_shape() {
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::user_with_images(
                "look",
                vec![
                    "data:image/png;base64,AAA".to_string(),
                    "data:image/jpeg;base64,BBB".to_string(),
                ],
            ),
        ];
        let body = ChatCompletionRequest {
            model: "vision",
            messages: &messages,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "vision",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": [
                        {"type": "text", "text": "look"},
                        {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAA"}},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,BBB"}}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn image_request_shape() {
        let body = ImageGenerationRequest {
            model: "gpt-image-1",
            prompt: "p",
            size: "1024x1024",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"model": "gpt-image-1", "prompt": "p", "size": "1024x1024"})
        );
    }

    #[test]
    fn content_extraction() {
        let ok = json!({"choices": [{"message": {"role": "assistant", "content": "**Прогноз: Вниз**"}}]});
        assert_eq!(extract_message_content(&ok).as_deref(), Some("**Прогноз: Вниз**"));

        let null = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        assert_eq!(extract_message_content(&null), None);
        assert_eq!(extract_message_content(&json!({})), None);
    }

    #[test]
    fn image_payload_extraction() {
        let ok = json!({"data": [{"b64_json": "aGVsbG8="}]});
        assert_eq!(extract_image_b64(&ok), Some("aGVsbG8="));
        assert_eq!(extract_image_b64(&json!({"data": []})), None);
    }
}
