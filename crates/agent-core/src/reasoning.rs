//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::notify::{AgentObserver, NullObserver};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Opaque capability the session manager submits questions to.
///
/// Accepts a question string and returns an answer string or fails with a
/// runtime error. The session never inspects what happens in between.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, question: &str) -> Result<String>;
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Answer a question without reporting intermediate reasoning
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.ask_observed(question, &NullObserver).await
    }

    /// Answer a question, reporting each thought and tool round-trip to the
    /// observer as it happens
    pub async fn ask_observed(
        &self,
        question: &str,
        observer: &dyn AgentObserver,
    ) -> Result<String> {
        let mut messages = vec![
            Message::system(self.build_system_prompt()),
            Message::user(question),
        ];

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            // Get completion from provider
            let completion = self.provider
                .complete(&messages, &self.config.generation)
                .await?;

            let content = completion.content.clone();

            // Add assistant response to working context
            messages.push(Message::assistant(&content));

            // Check for tool calls
            if let Some(tool_call) = self.parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, "Executing tool");

                observer.on_thought(&content);
                observer.on_tool_call(&tool_call);

                // Execute the tool
                let result = self.execute_tool(&tool_call).await;
                observer.on_tool_result(&result);

                // Add tool result to working context
                let tool_message = self.format_tool_result(&result);
                messages.push(Message::tool(tool_message, tool_call.id.clone()));

                // Continue reasoning loop
                continue;
            }

            // No tool call - this is the final response
            return Ok(content);
        }
    }

    /// Parse a tool call from LLM response
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                // Try to parse as ToolCall
                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    // Generate call ID if not present
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: try to find raw JSON with "tool" key
        self.parse_inline_tool_call(content)
    }

    /// Try to parse inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for JSON object with "tool" field
        if !content.contains(r#""tool""#) {
            return None;
        }

        // Find JSON boundaries
        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        serde_json::from_str::<ToolCall>(json_str).ok()
    }

    /// Execute a tool call
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => {
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {}", e),
                }
            }
        }
    }

    /// Format tool result for the working context
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl AgentRunner for Agent {
    async fn run(&self, question: &str) -> Result<String> {
        self.ask(question).await
    }
}

/// Agent plus observer, bundled so callers that stream reasoning can hand a
/// single `AgentRunner` to the session manager.
pub struct ObservedAgent {
    agent: Agent,
    observer: Arc<dyn AgentObserver>,
}

impl ObservedAgent {
    pub fn new(agent: Agent, observer: Arc<dyn AgentObserver>) -> Self {
        Self { agent, observer }
    }
}

#[async_trait]
impl AgentRunner for ObservedAgent {
    async fn run(&self, question: &str) -> Result<String> {
        self.agent.ask_observed(question, self.observer.as_ref()).await
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        Completion, CompletionStream, FinishReason, ModelInfo, ProviderInfo,
    };
    use std::sync::Mutex;

    /// Provider that replays a fixed script of completions
    struct ScriptedProvider {
        replies: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<&str>) -> Self {
            let mut replies: Vec<String> = replies.into_iter().map(String::from).collect();
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "Scripted".into(),
                models: Vec::new(),
                supports_streaming: false,
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
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
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
            Err(AgentError::Provider("streaming not scripted".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct UpperTool;

    #[async_trait]
    impl crate::tool::Tool for UpperTool {
        fn schema(&self) -> crate::tool::ToolSchema {
            crate::tool::ToolSchema {
                name: "upper".into(),
                description: "Uppercase the input".into(),
                parameters: vec![crate::tool::ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Text to uppercase".into(),
                    required: true,
                    default: None,
                }],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call
                .arguments
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(ToolResult::success("upper", text.to_uppercase()))
        }
    }

    fn agent_with(replies: Vec<&str>) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(UpperTool);
        Agent::new(
            Arc::new(ScriptedProvider::new(replies)),
            Arc::new(tools),
            AgentConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tools() {
        let agent = agent_with(vec!["The answer is 4."]);
        let answer = agent.ask("What is 2+2?").await.unwrap();
        assert_eq!(answer, "The answer is 4.");
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let agent = agent_with(vec![
            "Let me check.\n```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"hi\"}}\n```",
            "It says HI.",
        ]);
        let answer = agent.ask("shout hi").await.unwrap();
        assert_eq!(answer, "It says HI.");
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let call = "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"x\"}}\n```";
        let mut tools = ToolRegistry::new();
        tools.register(UpperTool);
        let agent = Agent::new(
            Arc::new(ScriptedProvider::new(vec![call, call, call])),
            Arc::new(tools),
            AgentConfig {
                max_iterations: 2,
                ..Default::default()
            },
        );

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(2)));
    }

    #[tokio::test]
    async fn test_observer_sees_tool_round_trip() {
        #[derive(Default)]
        struct Recorder {
            events: Mutex<Vec<String>>,
        }

        impl AgentObserver for Recorder {
            fn on_thought(&self, _content: &str) {
                self.events.lock().unwrap().push("thought".into());
            }
            fn on_tool_call(&self, call: &ToolCall) {
                self.events.lock().unwrap().push(format!("call:{}", call.name));
            }
            fn on_tool_result(&self, result: &ToolResult) {
                self.events
                    .lock()
                    .unwrap()
                    .push(format!("result:{}", result.success));
            }
        }

        let agent = agent_with(vec![
            "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"hi\"}}\n```",
            "HI it is.",
        ]);
        let recorder = Recorder::default();
        agent.ask_observed("shout hi", &recorder).await.unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, vec!["thought", "call:upper", "result:true"]);
    }

    #[test]
    fn test_parse_tool_call_fenced() {
        let agent = agent_with(vec![]);
        let content = "Let me check that for you.\n```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"2 + 2\"}}\n```";

        let call = agent.parse_tool_call(content).unwrap();
        assert_eq!(call.name, "upper");
        assert_eq!(
            call.arguments.get("text").and_then(|v| v.as_str()),
            Some("2 + 2")
        );
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_tool_call_inline() {
        let agent = agent_with(vec![]);
        let content = r#"{"tool": "upper", "arguments": {"text": "x"}}"#;

        let call = agent.parse_tool_call(content).unwrap();
        assert_eq!(call.name, "upper");
    }

    #[test]
    fn test_parse_tool_call_plain_text() {
        let agent = agent_with(vec![]);
        assert!(agent.parse_tool_call("Just a normal answer.").is_none());
    }
}
