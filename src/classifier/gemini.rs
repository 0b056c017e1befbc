//! Gemini-backed classifier
//!
//! Calls the Gemini `generateContent` endpoint with a prompt that pins the
//! reply to a strict JSON schema, then parses that JSON into the typed
//! payload. Images are sent inline as base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::models::{ClassifiedInput, ExerciseData, NutritionData};

use super::{Classifier, ClassifierError};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TEXT_PROMPT: &str = r#"You are a nutrition and exercise logging assistant.
Classify the user's input as food eaten or exercise performed and reply with
a single JSON object, no markdown, in one of these shapes:

Food:
{"kind":"food","name":"...","calories":0,"protein_grams":0,"carb_grams":0,"fat_grams":0}

Exercise:
{"kind":"exercise","name":"...","calories":0,"summary":"duration/distance, e.g. 30 minutes, 5km"}

If the input is neither food nor exercise, reply with:
{"kind":"error","message":"why it could not be classified"}

User input: "#;

const IMAGE_PROMPT: &str = r#"You are a nutrition logging assistant. Identify the
food in this photo and estimate a single serving's nutrition. Reply with one
JSON object, no markdown:

{"kind":"food","name":"...","calories":0,"protein_grams":0,"carb_grams":0,"fat_grams":0}

If no food is recognizable, reply with:
{"kind":"error","message":"why it could not be classified"}"#;

/// Classifier backed by the Gemini API
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClassifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from `GEMINI_API_KEY` (and optionally `MACROAI_GEMINI_MODEL`)
    pub fn from_env() -> Result<Self, ClassifierError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| ClassifierError::MissingApiKey)?;
        let mut classifier = Self::new(api_key);
        if let Ok(model) = std::env::var("MACROAI_GEMINI_MODEL") {
            classifier.model = model;
        }
        Ok(classifier)
    }

    async fn generate(&self, parts: serde_json::Value) -> Result<ClassifiedInput, ClassifierError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "temperature": 0.1 }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            debug!(%status, "Gemini call failed");
            return Err(ClassifierError::Service(format!(
                "Gemini API returned {}: {}",
                status, detail
            )));
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ClassifierError::Malformed("empty candidate list".to_string()))?;

        parse_reply(&text)
    }
}

#[async_trait::async_trait]
impl Classifier for GeminiClassifier {
    async fn classify_text(&self, input: &str) -> Result<ClassifiedInput, ClassifierError> {
        let prompt = format!("{}{}", TEXT_PROMPT, input);
        self.generate(json!([{ "text": prompt }])).await
    }

    async fn classify_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ClassifiedInput, ClassifierError> {
        let parts = json!([
            { "text": IMAGE_PROMPT },
            { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(image) } }
        ]);
        self.generate(parts).await
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// The JSON shapes the prompt asks the model to produce
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ReplyPayload {
    Food {
        name: String,
        calories: i32,
        #[serde(default)]
        protein_grams: i32,
        #[serde(default)]
        carb_grams: i32,
        #[serde(default)]
        fat_grams: i32,
    },
    Exercise {
        name: String,
        calories: i32,
        #[serde(default)]
        summary: String,
    },
    Error {
        message: String,
    },
}

/// Parse the model's reply text, tolerating markdown code fences
fn parse_reply(text: &str) -> Result<ClassifiedInput, ClassifierError> {
    let stripped = strip_code_fence(text);

    let payload: ReplyPayload = serde_json::from_str(stripped)
        .map_err(|e| ClassifierError::Malformed(format!("{}: {}", e, stripped)))?;

    match payload {
        ReplyPayload::Food {
            name,
            calories,
            protein_grams,
            carb_grams,
            fat_grams,
        } => Ok(ClassifiedInput::Nutrition(NutritionData {
            name,
            calories,
            protein_grams,
            carb_grams,
            fat_grams,
        })),
        ReplyPayload::Exercise {
            name,
            calories,
            summary,
        } => Ok(ClassifiedInput::Exercise(ExerciseData {
            name,
            calories,
            summary,
        })),
        ReplyPayload::Error { message } => Err(ClassifierError::Service(message)),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_food_reply() {
        let reply = r#"{"kind":"food","name":"Boiled Egg","calories":70,"protein_grams":6,"carb_grams":0,"fat_grams":5}"#;
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(
            parsed,
            ClassifiedInput::Nutrition(NutritionData {
                name: "Boiled Egg".to_string(),
                calories: 70,
                protein_grams: 6,
                carb_grams: 0,
                fat_grams: 5,
            })
        );
    }

    #[test]
    fn test_parse_exercise_reply() {
        let reply = r#"{"kind":"exercise","name":"Morning Run","calories":320,"summary":"30 minutes, 5km"}"#;
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(
            parsed,
            ClassifiedInput::Exercise(ExerciseData {
                name: "Morning Run".to_string(),
                calories: 320,
                summary: "30 minutes, 5km".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_reply_with_code_fence() {
        let reply = "```json\n{\"kind\":\"food\",\"name\":\"Rice\",\"calories\":130,\"protein_grams\":3,\"carb_grams\":28,\"fat_grams\":0}\n```";
        assert!(matches!(
            parse_reply(reply).unwrap(),
            ClassifiedInput::Nutrition(_)
        ));
    }

    #[test]
    fn test_parse_error_reply_becomes_service_error() {
        let reply = r#"{"kind":"error","message":"not food or exercise"}"#;
        match parse_reply(reply) {
            Err(ClassifierError::Service(message)) => {
                assert_eq!(message, "not food or exercise");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_reply("no json here"),
            Err(ClassifierError::Malformed(_))
        ));
    }
}
