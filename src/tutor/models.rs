/*!
 * Request and result types exchanged with the tutor.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use crate::vocabulary::VocabularyItem;

/// Token usage reported by the provider for one or more calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub response_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, response_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            response_tokens,
            total_tokens: prompt_tokens + response_tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_tokens == 0
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.response_tokens += other.response_tokens;
        self.total_tokens += other.total_tokens;
    }
}

impl fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens ({} prompt, {} response)",
            self.total_tokens, self.prompt_tokens, self.response_tokens
        )
    }
}

/// A tutor result together with the tokens it cost
#[derive(Debug, Clone, PartialEq)]
pub struct Metered<T> {
    pub value: T,
    pub usage: TokenUsage,
}

impl<T> Metered<T> {
    pub fn new(value: T, usage: TokenUsage) -> Self {
        Self { value, usage }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metered<U> {
        Metered {
            value: f(self.value),
            usage: self.usage,
        }
    }
}

/// Difficulty of generated reading material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// CEFR band the generated text should target
    pub fn cefr_band(&self) -> &'static str {
        match self {
            Self::Beginner => "A1-A2",
            Self::Intermediate => "B1-B2",
            Self::Advanced => "C1-C2",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("Invalid difficulty: {}", other)),
        }
    }
}

/// Approximate length of generated reading material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthClass {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthClass {
    /// Target word count
    pub fn target_words(&self) -> usize {
        match self {
            Self::Short => 80,
            Self::Medium => 160,
            Self::Long => 300,
        }
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

/// Parameters for generating a new reading text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub length: LengthClass,
}

impl GenerateRequest {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, length: LengthClass) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            length,
        }
    }
}

/// A reading text with its extracted vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct StudyText {
    pub title: String,
    pub text: String,
    pub vocabulary: Vec<VocabularyItem>,
}

/// Score and feedback for a learner's translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// 0 to 100
    pub score: u8,
    pub feedback: String,
    pub corrected_translation: String,
    #[serde(default)]
    pub key_improvements: Vec<String>,
    #[serde(default)]
    pub difficult_words: Vec<String>,
}
