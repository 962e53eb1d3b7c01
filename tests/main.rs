/*!
 * Main test entry point for the lingotutor test suite
 */

// Import common test utilities
pub mod common;

// Import unit tests
mod unit {
    // Phrase and word highlighting
    pub mod annotator_tests;

    // Configuration defaults and validation
    pub mod app_config_tests;

    // Lookup dispatcher, cache and stale-result guard
    pub mod lookup_tests;

    // Retry bound through the tutor
    pub mod retry_tests;

    // Flashcard queue laws
    pub mod review_queue_tests;

    // Persisted history and saved words
    pub mod session_store_tests;
}

// Import integration tests
mod integration {
    // Practice rounds through the controller
    pub mod reading_workflow_tests;
}
