/*!
 * Practice session data model.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tutor::{Difficulty, Evaluation, LengthClass, StudyText, TokenUsage};
use crate::vocabulary::{VocabularyIndex, VocabularyItem};

/// How the text of a session came to be
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionOrigin {
    /// Written by the tutor on request
    Generated {
        topic: String,
        difficulty: Difficulty,
        length: LengthClass,
    },
    /// Supplied by the learner
    #[default]
    Analyzed,
}

/// One reading text with its vocabulary and, once finished, the learner's
/// translation and its evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    pub date: DateTime<Utc>,
    /// Tokens spent on this session, lookups included
    #[serde(default)]
    pub usage: TokenUsage,
    #[serde(default)]
    pub origin: SessionOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl PracticeSession {
    /// Create a session from tutor output with a fresh id and the current date
    pub fn new(study: StudyText, usage: TokenUsage, origin: SessionOrigin) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: study.title,
            text: study.text,
            vocabulary: study.vocabulary,
            date: Utc::now(),
            usage,
            origin,
            user_translation: None,
            evaluation: None,
        }
    }

    /// First eight characters of the id, for display
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Whether a translation has been evaluated
    pub fn is_finished(&self) -> bool {
        self.evaluation.is_some()
    }

    pub fn vocabulary_index(&self) -> VocabularyIndex {
        VocabularyIndex::from_items(&self.vocabulary)
    }
}
