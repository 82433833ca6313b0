use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod openai;

pub use openai::OpenAiAnalyzer;

/// One identified component of a meal, as estimated by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// The schema the model is constrained to. Field names are part of the
/// provider contract; `totalCalories` stays camel-cased on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItemList {
    pub reasoning: String,
    #[serde(rename = "totalCalories")]
    pub total_calories: f64,
    pub parts: Vec<FoodItem>,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("No response from the model")]
    EmptyResponse,

    #[error("Invalid response format from AI")]
    InvalidSchema(#[source] serde_json::Error),
}

/// Seam for the multimodal nutrition-estimation call, so handlers can be
/// exercised with a stub. Exactly one outbound request per `analyze`.
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    async fn analyze(&self, prompt: &str, image: &str) -> Result<FoodItemList, AiError>;
}
