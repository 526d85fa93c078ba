//! Session Management
//!
//! The transcript session manager: owns the ordered message record for one
//! interactive run, appends user/assistant pairs on submission, and signals
//! the rendering surface through a [`Notifier`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AgentError;
use crate::message::{Message, Role, Transcript};
use crate::notify::Notifier;
use crate::reasoning::AgentRunner;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Session title (auto-generated or user-set)
    pub title: Option<String>,

    /// Model used for this session
    pub model: String,

    /// Extra key-value metadata
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self {
            title: None,
            model: "gemma2-9b-it".into(),
            extra: std::collections::HashMap::new(),
        }
    }
}

/// Outcome of a single submission
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The runner answered; the transcript gained a user/assistant pair
    Answered(String),

    /// The question was empty; one warning was signalled, state unchanged
    Empty,

    /// The runner failed; one error was signalled, the transcript kept only
    /// the user message
    Failed(AgentError),
}

impl SubmitOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, SubmitOutcome::Answered(_))
    }
}

/// A complete chat session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Ordered record of displayed messages
    pub transcript: Transcript,

    /// Session metadata
    pub metadata: SessionMetadata,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            transcript: Transcript::new(),
            metadata: SessionMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create with specific ID
    pub fn with_id(id: SessionId) -> Self {
        let mut session = Self::new();
        session.id = id;
        session
    }

    /// Create seeded with an assistant greeting message
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.transcript.append(Message::assistant(greeting));
        session
    }

    /// Add a message to the end of the transcript. Always succeeds.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.append(Message::new(role, content));
        self.touch();
    }

    /// Full ordered message sequence for rendering
    pub fn all(&self) -> &[Message] {
        self.transcript.all()
    }

    /// Submit a question to the agent runner.
    ///
    /// An empty question signals one warning and changes nothing. Otherwise
    /// the user message is appended, the runner is invoked with the question
    /// text, and on success the answer is appended as an assistant message.
    /// A runner failure signals one error and leaves the transcript with the
    /// user message only; the session keeps accepting submissions.
    pub async fn submit(
        &mut self,
        question: &str,
        runner: &dyn AgentRunner,
        notify: &dyn Notifier,
    ) -> SubmitOutcome {
        if question.trim().is_empty() {
            notify.warning("Please enter a question.");
            return SubmitOutcome::Empty;
        }

        self.append(Role::User, question);

        match runner.run(question).await {
            Ok(answer) => {
                self.append(Role::Assistant, answer.clone());
                SubmitOutcome::Answered(answer)
            }
            Err(e) => {
                tracing::error!(error = %e, "Agent runner failed");
                notify.error(&e.user_message());
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Set session title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
        self.touch();
    }

    /// Get or generate title
    pub fn title(&self) -> String {
        self.metadata.title.clone().unwrap_or_else(|| {
            // Generate from first user message
            self.transcript
                .all()
                .iter()
                .find(|m| m.role == Role::User)
                .map(|m| {
                    let preview: String = m.content.chars().take(50).collect();
                    if m.content.len() > 50 {
                        format!("{}...", preview)
                    } else {
                        preview
                    }
                })
                .unwrap_or_else(|| format!("Session {}", &self.id.0[..8]))
        })
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store trait
pub trait SessionStore: Send + Sync {
    /// Save a session
    fn save(&self, session: &Session) -> crate::Result<()>;

    /// Load a session by ID
    fn load(&self, id: &SessionId) -> crate::Result<Option<Session>>;

    /// Delete a session
    fn delete(&self, id: &SessionId) -> crate::Result<()>;

    /// List sessions, most recently active first
    fn list(&self, limit: usize) -> crate::Result<Vec<Session>>;
}

/// In-memory session store. Sessions live for one process run and are
/// discarded on exit.
pub struct MemorySessionStore {
    sessions: std::sync::RwLock<std::collections::HashMap<SessionId, Session>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &Session) -> crate::Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AgentError::Session("session store poisoned".into()))?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn load(&self, id: &SessionId) -> crate::Result<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AgentError::Session("session store poisoned".into()))?;
        Ok(sessions.get(id).cloned())
    }

    fn delete(&self, id: &SessionId) -> crate::Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AgentError::Session("session store poisoned".into()))?;
        sessions.remove(id);
        Ok(())
    }

    fn list(&self, limit: usize) -> crate::Result<Vec<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AgentError::Session("session store poisoned".into()))?;
        let mut result: Vec<_> = sessions.values().cloned().collect();

        // Sort by updated_at descending
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        result.truncate(limit);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Runner that replays a fixed script of answers or failures
    struct StubRunner {
        replies: Mutex<Vec<crate::Result<String>>>,
    }

    impl StubRunner {
        fn answering(answers: Vec<&str>) -> Self {
            let mut replies: Vec<crate::Result<String>> =
                answers.into_iter().map(|a| Ok(a.to_string())).collect();
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }

        fn failing() -> Self {
            Self {
                replies: Mutex::new(vec![Err(AgentError::ProviderUnavailable(
                    "connection refused".into(),
                ))]),
            }
        }
    }

    #[async_trait]
    impl AgentRunner for StubRunner {
        async fn run(&self, _question: &str) -> crate::Result<String> {
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(AgentError::Provider("script exhausted".into())))
        }
    }

    /// Notifier that counts each signal kind
    #[derive(Default)]
    struct SignalCounter {
        infos: AtomicUsize,
        warnings: AtomicUsize,
        errors: AtomicUsize,
    }

    impl Notifier for SignalCounter {
        fn info(&self, _message: &str) {
            self.infos.fetch_add(1, Ordering::SeqCst);
        }
        fn warning(&self, _message: &str) {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
        fn error(&self, _message: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    const GREETING: &str = "Hi, I am a Math Chatbot who can answer all your math questions!";

    #[tokio::test]
    async fn test_successful_submission_appends_pair() {
        let mut session = Session::with_greeting(GREETING);
        let runner = StubRunner::answering(vec!["4"]);
        let signals = SignalCounter::default();

        let outcome = session.submit("What is 2+2?", &runner, &signals).await;

        assert!(outcome.is_answered());
        let messages = session.all();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, GREETING);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "What is 2+2?");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "4");
        assert_eq!(signals.warnings.load(Ordering::SeqCst), 0);
        assert_eq!(signals.errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcript_grows_two_per_submission() {
        let mut session = Session::with_greeting(GREETING);
        let runner = StubRunner::answering(vec!["one", "two", "three"]);
        let signals = SignalCounter::default();

        for question in ["q1", "q2", "q3"] {
            session.submit(question, &runner, &signals).await;
        }

        // greeting + 2N
        assert_eq!(session.message_count(), 1 + 2 * 3);
        let roles: Vec<Role> = session.all().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_submission_warns_and_changes_nothing() {
        let mut session = Session::with_greeting(GREETING);
        let runner = StubRunner::answering(vec![]);
        let signals = SignalCounter::default();

        let outcome = session.submit("   ", &runner, &signals).await;

        assert!(matches!(outcome, SubmitOutcome::Empty));
        assert_eq!(session.message_count(), 1);
        assert_eq!(signals.warnings.load(Ordering::SeqCst), 1);
        assert_eq!(signals.errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runner_failure_keeps_user_message_only() {
        let mut session = Session::with_greeting(GREETING);
        let runner = StubRunner::failing();
        let signals = SignalCounter::default();

        let outcome = session.submit("What is 2+2?", &runner, &signals).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        let messages = session.all();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(signals.errors.load(Ordering::SeqCst), 1);

        // The session keeps accepting submissions afterwards
        let runner = StubRunner::answering(vec!["still here"]);
        let outcome = session.submit("still there?", &runner, &signals).await;
        assert!(outcome.is_answered());
        assert_eq!(session.message_count(), 4);
    }

    #[tokio::test]
    async fn test_title_from_first_user_message() {
        let mut session = Session::with_greeting(GREETING);
        let runner = StubRunner::answering(vec!["4"]);
        session.submit("What is 2+2?", &runner, &NullNotifier).await;

        assert_eq!(session.title(), "What is 2+2?");
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        let session = Session::new();
        let id = session.id.clone();

        store.save(&session).unwrap();

        let loaded = store.load(&id).unwrap();
        assert!(loaded.is_some());
        assert_eq!(loaded.unwrap().id, id);
    }

    #[test]
    fn test_store_lists_most_recent_first() {
        let store = MemorySessionStore::new();
        let first = Session::new();
        store.save(&first).unwrap();

        let mut second = Session::new();
        second.touch();
        store.save(&second).unwrap();

        let listed = store.list(10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
    }
}
