/*!
 * Parsing of model answers into typed payloads.
 *
 * Models are asked for bare JSON but regularly wrap it in markdown fences or
 * add a sentence before or after. The parser keeps the outermost `{...}`
 * object and hands it to serde.
 */

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::errors::TutorError;
use crate::vocabulary::VocabularyItem;

/// Longest piece of a bad answer quoted in an error message
const PREVIEW_CHARS: usize = 200;

/// Slice out the outermost JSON object of a model answer
pub fn extract_json_object(answer: &str) -> Option<&str> {
    let start = answer.find('{')?;
    let end = answer.rfind('}')?;
    (end > start).then(|| &answer[start..=end])
}

/// Parse a model answer into `T`
pub fn parse_answer<T: DeserializeOwned>(answer: &str) -> Result<T, TutorError> {
    let json = extract_json_object(answer).ok_or_else(|| {
        TutorError::MalformedResponse(format!("no JSON object in answer: {}", preview(answer)))
    })?;

    serde_json::from_str(json).map_err(|e| {
        TutorError::MalformedResponse(format!("{} in answer: {}", e, preview(answer)))
    })
}

fn preview(answer: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.chars().count() > PREVIEW_CHARS {
        format!("{}...", trimmed.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        trimmed.to_string()
    }
}

/// Answer to a generate request
#[derive(Debug, Deserialize)]
pub struct GeneratedPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
}

/// Answer to an analyze request; the text itself is never taken from the model
#[derive(Debug, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
}

/// A difficult word, given either as a bare string or as an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DifficultWord {
    Plain(String),
    Detailed { word: String },
}

impl DifficultWord {
    pub fn into_word(self) -> String {
        match self {
            Self::Plain(word) | Self::Detailed { word } => word,
        }
    }
}

/// Answer to an evaluate request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPayload {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub corrected_translation: String,
    #[serde(default)]
    pub key_improvements: Vec<String>,
    #[serde(default)]
    pub difficult_words: Vec<DifficultWord>,
}

/// Clamp a model score into 0..=100
pub fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        0
    } else {
        score.round().clamp(0.0, 100.0) as u8
    }
}
