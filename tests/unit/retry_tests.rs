/*!
 * Tests for the retry bound seen through the tutor
 */

use std::sync::Arc;

use lingotutor::errors::{ProviderError, TutorError};
use lingotutor::providers::RetryPolicy;
use lingotutor::providers::mock::{MockBehavior, MockProvider};
use lingotutor::tutor::llm::TutorSettings;
use lingotutor::tutor::{LlmTutor, TutorService};

const DEFINITION: &str = r#"{"word": "mat", "definition": "alfombrilla", "translation": "estera"}"#;

fn tutor(mock: &MockProvider, retries: u32) -> LlmTutor {
    LlmTutor::new(Arc::new(mock.clone()), RetryPolicy::new(retries, 0), TutorSettings::default())
}

#[tokio::test]
async fn test_lookupWord_withTransientFailuresWithinBound_shouldSucceed() {
    let mock = MockProvider::failing_first(3, MockBehavior::Reply(DEFINITION.to_string()));
    let answer = tutor(&mock, 3).lookup_word("mat", "The mat.").await.unwrap();

    assert_eq!(answer.value.translation, "estera");
    assert_eq!(mock.request_count(), 4);
}

#[tokio::test]
async fn test_lookupWord_withPersistentServerErrors_shouldStopAfterRetryCount() {
    let mock = MockProvider::failing();
    let err = tutor(&mock, 3).lookup_word("mat", "The mat.").await.unwrap_err();

    assert!(matches!(err, TutorError::Provider(ProviderError::ApiError { status_code: 500, .. })));
    assert_eq!(mock.request_count(), 4);
}

#[tokio::test]
async fn test_lookupWord_withAuthFailure_shouldNotRetry() {
    let mock = MockProvider::new(MockBehavior::Unauthorized);
    let err = tutor(&mock, 3).lookup_word("mat", "The mat.").await.unwrap_err();

    assert!(matches!(err, TutorError::Provider(ProviderError::AuthenticationError(_))));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_lookupWord_withUnparseableAnswer_shouldNotRetry() {
    let mock = MockProvider::replying("I am not JSON");
    let err = tutor(&mock, 3).lookup_word("mat", "The mat.").await.unwrap_err();

    assert!(matches!(err, TutorError::MalformedResponse(_)));
    assert_eq!(mock.request_count(), 1);
}
