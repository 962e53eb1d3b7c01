/*!
 * The AI tutor: the four request/response operations the rest of the
 * application relies on.
 *
 * - `generate`: write a new reading text with vocabulary
 * - `analyze`: extract vocabulary from a learner-supplied text
 * - `lookup_word`: define a single word or phrase in context
 * - `evaluate_translation`: score a learner's translation
 *
 * `check_connection` verifies the backend before a learner relies on it.
 *
 * Every operation reports the tokens it consumed.
 */

use async_trait::async_trait;

use crate::errors::TutorError;
use crate::vocabulary::VocabularyItem;

pub mod llm;
pub mod models;
pub mod parse;
pub mod prompts;

pub use llm::LlmTutor;
pub use models::{
    Difficulty, Evaluation, GenerateRequest, LengthClass, Metered, StudyText, TokenUsage,
};

/// The tutor operations, independent of the backend answering them
#[async_trait]
pub trait TutorService: Send + Sync {
    /// Write a new text about a topic at the given level and length
    async fn generate(&self, request: &GenerateRequest) -> Result<Metered<StudyText>, TutorError>;

    /// Extract vocabulary from `text`; the returned text is `text` verbatim
    async fn analyze(&self, text: &str) -> Result<Metered<StudyText>, TutorError>;

    /// Define `word` as used in `context_snippet`. The returned item's `word`
    /// is always `word`.
    async fn lookup_word(
        &self,
        word: &str,
        context_snippet: &str,
    ) -> Result<Metered<VocabularyItem>, TutorError>;

    /// Score `translation` as a rendering of `original`
    async fn evaluate_translation(
        &self,
        original: &str,
        translation: &str,
    ) -> Result<Metered<Evaluation>, TutorError>;

    /// Check that the backend is reachable and accepts the credentials
    async fn check_connection(&self) -> Result<(), TutorError>;
}
