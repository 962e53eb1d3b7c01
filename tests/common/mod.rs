/*!
 * Common test utilities for the lingotutor test suite
 */

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use lingotutor::storage::{BlobStore, KvRepository};
use lingotutor::tutor::StudyText;
use lingotutor::vocabulary::{CefrLevel, VocabularyItem};

// Re-export the scripted tutor module
pub mod scripted_tutor;

pub use scripted_tutor::ScriptedTutor;

/// The two-sentence text used across the suite
pub const SAMPLE_TEXT: &str = "The cat sat on the mat. It was happy.";

/// Route library logs to the test output; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// An empty in-memory blob store
pub fn memory_blobs() -> Arc<dyn BlobStore> {
    Arc::new(KvRepository::new_in_memory().expect("in-memory database opens"))
}

/// Study text over `SAMPLE_TEXT` with "sat on" as its only vocabulary
pub fn sample_study() -> StudyText {
    StudyText {
        title: "The cat".to_string(),
        text: SAMPLE_TEXT.to_string(),
        vocabulary: vec![
            VocabularyItem::new("sat on", "se posó sobre", "se sentó en")
                .with_part_of_speech("phrasal verb")
                .with_cefr(CefrLevel::A2),
        ],
    }
}

/// A small deck with distinct words
pub fn sample_deck(size: usize) -> Vec<VocabularyItem> {
    (0..size)
        .map(|i| VocabularyItem::new(format!("word{}", i), format!("definition {}", i), format!("palabra{}", i)))
        .collect()
}
