use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequestArgs, ImageUrlArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use crate::config::AiConfig;

use super::{AiError, FoodAnalyzer, FoodItemList};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that can help with food tracking.
You can help with the following:
- Identify the food in the image
- Provide nutritional information
- Provide a list of ingredients
";

/// Analyzer backed by an OpenAI-compatible chat endpoint. The provider is
/// pointed at Google's compatibility layer by default (config.rs).
pub struct OpenAiAnalyzer {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalyzer {
    pub fn new(config: &AiConfig) -> Self {
        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_base(&config.api_base)
                .with_api_key(&config.api_key),
        );
        Self {
            client,
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl FoodAnalyzer for OpenAiAnalyzer {
    #[instrument(skip(self, prompt, image))]
    async fn analyze(&self, prompt: &str, image: &str) -> Result<FoodItemList, AiError> {
        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(prompt)
                .build()?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(ImageUrlArgs::default().url(image).build()?)
                .build()?
                .into(),
        ];

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(parts)
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(food_items_schema())
            .build()?;

        tracing::debug!(model = %self.model, "sending chat completion request");
        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)?;

        serde_json::from_str(&content).map_err(AiError::InvalidSchema)
    }
}

/// Strict response schema mirroring [`FoodItemList`]; it keeps the model
/// from answering in prose.
fn food_items_schema() -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: None,
            name: "food_items".into(),
            schema: Some(json!({
                "type": "object",
                "properties": {
                    "reasoning": { "type": "string" },
                    "totalCalories": { "type": "number" },
                    "parts": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "calories": { "type": "number" },
                                "protein": { "type": "number" },
                                "fat": { "type": "number" },
                                "carbs": { "type": "number" }
                            },
                            "required": ["name", "calories", "protein", "fat", "carbs"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["reasoning", "totalCalories", "parts"],
                "additionalProperties": false
            })),
            strict: Some(true),
        },
    }
}

#[cfg(test)]
mod openai_tests {
    use super::*;

    #[test]
    fn schema_is_named_for_the_response_format() {
        let ResponseFormat::JsonSchema { json_schema } = food_items_schema() else {
            panic!("expected a json schema response format");
        };
        assert_eq!(json_schema.name, "food_items");
        assert_eq!(json_schema.strict, Some(true));

        let schema = json_schema.schema.expect("schema body present");
        assert_eq!(schema["required"][1], "totalCalories");
        assert_eq!(
            schema["properties"]["parts"]["items"]["required"][0],
            "name"
        );
    }

    #[test]
    fn model_output_parses_into_the_item_list() {
        let content = r#"{
            "reasoning": "a bowl of ramen with egg",
            "totalCalories": 550,
            "parts": [
                {"name": "noodles", "calories": 380, "protein": 12, "fat": 4, "carbs": 74},
                {"name": "egg", "calories": 70, "protein": 6, "fat": 5, "carbs": 0}
            ]
        }"#;

        let parsed: FoodItemList = serde_json::from_str(content).expect("valid payload");
        assert_eq!(parsed.total_calories, 550.0);
        assert_eq!(parsed.parts.len(), 2);
        assert_eq!(parsed.parts[0].name, "noodles");
    }

    #[test]
    fn prose_output_is_a_schema_error() {
        let err = serde_json::from_str::<FoodItemList>("looks like pasta").unwrap_err();
        assert!(AiError::InvalidSchema(err)
            .to_string()
            .contains("Invalid response format from AI"));
    }
}
