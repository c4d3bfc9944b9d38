//! Text completion collaborator.
//!
//! The pipeline treats the language model as a black box: a system prompt and
//! a user prompt go in, prose comes out. Transport, retries and timeouts are
//! the implementor's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::quiz_engine::error::CompletionError;

/// Per-call sampling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>, // 0.0-2.0
    pub max_tokens: Option<u32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: Some(0.7),
            max_tokens: Some(100),
        }
    }
}

impl CompletionOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Generate prose for the given instructions.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;
}

/// Completion backend that is never reachable. Every strategy takes its
/// deterministic fallback path when wired to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCompletion;

#[async_trait]
impl TextCompletion for UnavailableCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        Err(CompletionError::Unavailable(
            "no text completion backend configured".to_string(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use parking_lot::Mutex;

    use super::*;

    /// Test double that answers prompts by substring match.
    ///
    /// Each rule holds a queue of replies; the last reply repeats once the
    /// queue drains. A prompt no rule matches fails with `Unavailable`.
    #[derive(Default)]
    pub struct ScriptedCompletion {
        rules: Mutex<Vec<(String, VecDeque<String>)>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, needle: &str, replies: &[&str]) -> Self {
            self.rules.lock().push((
                needle.to_string(),
                replies.iter().map(|r| r.to_string()).collect(),
            ));
            self
        }

        /// User prompts seen so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl TextCompletion for ScriptedCompletion {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, CompletionError> {
            self.calls.lock().push(user_prompt.to_string());
            let mut rules = self.rules.lock();
            let queue = rules
                .iter_mut()
                .find(|(needle, _)| user_prompt.contains(needle) || system_prompt.contains(needle))
                .map(|(_, queue)| queue)
                .ok_or_else(|| CompletionError::Unavailable("no scripted reply".to_string()))?;
            match queue.len() {
                0 => Err(CompletionError::EmptyResponse),
                1 => Ok(queue[0].clone()),
                _ => queue.pop_front().ok_or(CompletionError::EmptyResponse),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedCompletion;
    use super::*;

    #[tokio::test]
    async fn unavailable_backend_always_fails() {
        let err = UnavailableCompletion
            .complete("sys", "user", &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn scripted_replies_drain_then_repeat() {
        let llm = ScriptedCompletion::new().reply("word", &["one", "two"]);
        let opts = CompletionOptions::default();
        assert_eq!(llm.complete("", "a word", &opts).await.unwrap(), "one");
        assert_eq!(llm.complete("", "a word", &opts).await.unwrap(), "two");
        assert_eq!(llm.complete("", "a word", &opts).await.unwrap(), "two");
        assert!(llm.complete("", "other", &opts).await.is_err());
        assert_eq!(llm.calls().len(), 4);
    }
}
