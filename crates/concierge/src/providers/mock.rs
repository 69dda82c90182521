use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing. It
/// records every completion call so tests can assert on the exact
/// conversation each round received and how many tools were offered.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<(Vec<Message>, usize)>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that fails every completion call
    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The conversation and offered tool count seen by each completion call
    pub fn calls(&self) -> Vec<(Vec<Message>, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), tools.len()));

        if let Some(message) = &self.failure {
            return Err(anyhow!("{}", message));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok((Message::assistant().with_text(""), Usage::default()))
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}
