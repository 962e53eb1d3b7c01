/*!
 * Vocabulary entries as returned by the tutor and stored in the deck.
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// CEFR proficiency band, ordered from A1 (lowest) to C2 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels in ascending order
    pub const ALL: [CefrLevel; 6] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            other => Err(format!("Invalid CEFR level: {}", other)),
        }
    }
}

/// Accepts any string for `cefr` and keeps only the ones that name a level.
///
/// Models sometimes answer "B1-B2" or "advanced"; that must not sink the
/// whole payload.
fn lenient_cefr<'de, D>(deserializer: D) -> Result<Option<CefrLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// A word or phrase with its learner-facing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// The word or phrase as it appears in the text
    #[serde(default)]
    pub word: String,

    /// Definition, in the learner's native language
    #[serde(default)]
    pub definition: String,

    /// Translation into the learner's native language
    #[serde(default)]
    pub translation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,

    /// Part of speech ("noun", "phrasal verb", ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,

    #[serde(default, deserialize_with = "lenient_cefr", skip_serializing_if = "Option::is_none")]
    pub cefr: Option<CefrLevel>,

    /// Sentence the word was looked up from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl VocabularyItem {
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            translation: translation.into(),
            pronunciation: None,
            part_of_speech: None,
            cefr: None,
            context: None,
        }
    }

    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }

    pub fn with_cefr(mut self, cefr: CefrLevel) -> Self {
        self.cefr = Some(cefr);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Identity key: the lowercase word with collapsed whitespace
    pub fn key(&self) -> String {
        normalize_key(&self.word)
    }

    /// Whether a non-empty context sentence is attached
    pub fn has_context(&self) -> bool {
        self.context.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// Normalize a word or phrase into its lookup key
pub fn normalize_key(word: &str) -> String {
    word.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
