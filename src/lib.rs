/*!
 * # lingotutor - an AI language tutor
 *
 * Reading practice, vocabulary lookups, translation feedback and flashcard
 * review for English learners, backed by a large language model.
 *
 * ## Features
 *
 * - Generate graded reading texts on any topic, or analyze your own text
 * - Highlight known vocabulary, multi-word phrases included
 * - Explain any clicked word or selected phrase in its sentence context
 * - Score translations with feedback and a corrected version
 * - Review saved words as shuffled flashcards that bring hard cards back
 * - Providers:
 *   - Ollama (local LLM)
 *   - OpenAI API (and LM Studio)
 *   - Anthropic API
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `vocabulary`: vocabulary items and the case-insensitive index
 * - `reader`: tokenization, phrase annotation and sentence context
 * - `lookup`: the lookup dispatcher, its cache and the selection bridge
 * - `review`: word filters and the flashcard review queue
 * - `session`: practice sessions and the action-driven `TutorStore`
 * - `storage`: SQLite key-value blob store
 * - `tutor`: the `TutorService` trait, prompts and answer parsing
 * - `providers`: client implementations for the LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 * - `app_config`: configuration management
 * - `app_controller`: main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod lookup;
pub mod providers;
pub mod reader;
pub mod review;
pub mod session;
pub mod storage;
pub mod tutor;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use session::{Action, PracticeSession, TutorStore};
pub use tutor::{LlmTutor, TutorService};
pub use vocabulary::{VocabularyIndex, VocabularyItem};
