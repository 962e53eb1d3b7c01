/*!
 * Mock provider for testing.
 *
 * Simulates the failure modes the tutor has to cope with:
 * - `MockProvider::replying(..)` - always answers with the given text
 * - `MockProvider::scripted(..)` - answers with queued replies, in order
 * - `MockProvider::failing()` - always fails with a server error
 * - `MockProvider::failing_first(n, ..)` - fails `n` times, then behaves
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CompletionRequest, CompletionResponse, Provider};
use crate::errors::ProviderError;
use crate::tutor::TokenUsage;

/// Usage reported for every successful mock answer
pub const MOCK_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 10,
    response_tokens: 5,
    total_tokens: 15,
};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always answers with this text
    Reply(String),
    /// Fails intermittently (every Nth request) with a 503
    Intermittent { fail_every: usize },
    /// Always fails with a 500
    Failing,
    /// Always fails with a 401
    Unauthorized,
    /// Answers with an empty body
    Empty,
    /// Waits before answering with the text (for ordering tests)
    Slow { delay_ms: u64, reply: String },
}

/// Mock provider for testing tutor behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Replies served before `behavior` applies
    script: Arc<Mutex<VecDeque<Result<String, u16>>>>,
    /// Last request received, for prompt assertions
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// A provider that always answers with `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(reply.into()))
    }

    /// A provider that answers with `replies` in order, then repeats the last one
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        let last = replies.last().cloned().unwrap_or_default();
        let provider = Self::replying(last);
        provider.script.lock().extend(replies.into_iter().map(Ok));
        provider
    }

    /// A provider failing `failures` times with a 503 before acting as `behavior`
    pub fn failing_first(failures: usize, behavior: MockBehavior) -> Self {
        let provider = Self::new(behavior);
        provider.script.lock().extend(std::iter::repeat_n(Err(503), failures));
        provider
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Number of `complete` calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().clone()
    }

    fn answer(text: impl Into<String>) -> Result<CompletionResponse, ProviderError> {
        Ok(CompletionResponse { text: text.into(), usage: MOCK_USAGE })
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request);

        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(Ok(text)) => return Self::answer(text),
            Some(Err(status_code)) => {
                return Err(ProviderError::from_status(
                    status_code,
                    format!("Simulated failure (request #{})", count + 1),
                ));
            }
            None => {}
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Self::answer(text.clone()),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Self::answer("{}")
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Unauthorized => Err(ProviderError::AuthenticationError("invalid api key".to_string())),

            MockBehavior::Empty => Ok(CompletionResponse::default()),

            MockBehavior::Slow { delay_ms, reply } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Self::answer(reply.clone())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("mock is down".to_string())),
            MockBehavior::Unauthorized => Err(ProviderError::AuthenticationError("invalid api key".to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
