//! Mock LLM Provider
//!
//! For testing and offline demos. Replays a fixed script of completions in
//! order, which makes agent behavior fully deterministic.

use std::collections::VecDeque;
use std::sync::Mutex;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider,
        ModelInfo, ProviderInfo, StreamChunk,
    },
};
use async_trait::async_trait;

/// One scripted turn
#[derive(Clone, Debug)]
enum MockReply {
    Answer(String),
    Failure(String),
}

/// Mock provider with a scripted reply queue
pub struct MockProvider {
    script: Mutex<VecDeque<MockReply>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful completion
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(MockReply::Answer(content.into()));
        self
    }

    /// Queue a provider failure
    pub fn failure(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(MockReply::Failure(message.into()));
        self
    }

    fn next_reply(&self) -> Result<String> {
        match self.script.lock().expect("mock script lock").pop_front() {
            Some(MockReply::Answer(content)) => Ok(content),
            Some(MockReply::Failure(message)) => Err(AgentError::Provider(message)),
            None => Err(AgentError::Provider("mock script exhausted".into())),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Mock".into(),
            models: self.list_models().await?,
            supports_streaming: true,
            supports_tools: false,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        _messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let content = self.next_reply()?;

        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn complete_stream(
        &self,
        _messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let content = self.next_reply()?;

        // Emit one chunk per whitespace-separated token, then a final marker
        let mut chunks: Vec<Result<StreamChunk>> = content
            .split_inclusive(' ')
            .map(|piece| {
                Ok(StreamChunk {
                    delta: piece.to_string(),
                    done: false,
                    usage: None,
                })
            })
            .collect();
        chunks.push(Ok(StreamChunk {
            delta: String::new(),
            done: true,
            usage: None,
        }));

        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "mock-model".into(),
            name: "mock-model".into(),
            context_length: None,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_replays_script_in_order() {
        let provider = MockProvider::new().reply("first").reply("second");
        let options = GenerationOptions::default();

        let a = provider.complete(&[], &options).await.unwrap();
        let b = provider.complete(&[], &options).await.unwrap();
        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");

        // Script exhausted
        assert!(provider.complete(&[], &options).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let provider = MockProvider::new().failure("boom");
        let options = GenerationOptions::default();

        let err = provider.complete(&[], &options).await.unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[tokio::test]
    async fn test_stream_reassembles_reply() {
        let provider = MockProvider::new().reply("one two three");
        let options = GenerationOptions::default();

        let mut stream = provider.complete_stream(&[], &options).await.unwrap();
        let mut assembled = String::new();
        let mut saw_done = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            assembled.push_str(&chunk.delta);
            saw_done |= chunk.done;
        }

        assert_eq!(assembled, "one two three");
        assert!(saw_done);
    }
}
