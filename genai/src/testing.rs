//! A mock [`GenerativeModel`] that tracks inputs and yields predefined
//! outputs.

use crate::{
    errors::{GenerationError, GenerationResult},
    model::GenerativeModel,
    GenerationInput, ModelResponse,
};
use std::{collections::VecDeque, sync::Mutex, time::Duration};

/// Result for a mocked `generate` call.
///
/// It can either be a full response or an error to return, optionally
/// delivered after a delay so concurrent calls can be made to complete out of
/// order.
pub struct MockResult {
    outcome: GenerationResult<ModelResponse>,
    delay: Option<Duration>,
}

impl MockResult {
    /// Construct a result that yields the provided response.
    pub fn response(response: ModelResponse) -> Self {
        Self {
            outcome: Ok(response),
            delay: None,
        }
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: GenerationError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    /// Deliver the result only after the given delay.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl From<ModelResponse> for MockResult {
    fn from(response: ModelResponse) -> Self {
        Self::response(response)
    }
}

impl From<GenerationError> for MockResult {
    fn from(error: GenerationError) -> Self {
        Self::error(error)
    }
}

#[derive(Default)]
struct MockModelState {
    queued_results: VecDeque<MockResult>,
    tracked_inputs: Vec<GenerationInput>,
}

/// A mock generative model for testing.
///
/// Results are consumed in the order they were enqueued, matched to calls in
/// the order the calls are issued.
pub struct MockModel {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockModelState>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-model".to_string(),
            state: Mutex::new(MockModelState::default()),
        }
    }
}

impl MockModel {
    /// Construct a new mock model instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the model identifier returned by the mock.
    pub fn set_model_id<S: Into<String>>(&mut self, model_id: S) {
        self.model_id = model_id.into();
    }

    /// Enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockResult>,
    {
        self.enqueue_all(std::iter::once(result.into()))
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_all<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.queued_results.extend(results);
        drop(state);
        self
    }

    /// Retrieve the tracked generate inputs accumulated so far.
    #[must_use]
    pub fn tracked_inputs(&self) -> Vec<GenerationInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_inputs.clone()
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.queued_results.clear();
        state.tracked_inputs.clear();
    }
}

#[async_trait::async_trait]
impl GenerativeModel for MockModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: GenerationInput) -> GenerationResult<ModelResponse> {
        let result = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.tracked_inputs.push(input);

            state.queued_results.pop_front().ok_or_else(|| {
                GenerationError::Invariant(self.provider, "no mocked results available".into())
            })?
        };

        // The sleep happens outside the lock so delayed calls overlap.
        if let Some(delay) = result.delay {
            tokio::time::sleep(delay).await;
        }

        result.outcome
    }
}
