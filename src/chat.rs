use url::Url;

use crate::gemini::{Advice, AdviceError};

/// Fixed user-facing text for a failed advice request. The tagged error
/// stays with the client; the transcript only decides presentation.
pub const ADVICE_ERROR_TEXT: &str =
    "Network connection error. Please ensure you are connected to the internet and try again.";

pub const GREETING: &str = "Hello! I am the Donut SMP Strategy Bot. Ask me about current meta, \
spawner prices, or how to maximize your farm profits!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub text: String,
    pub source_urls: Vec<Url>,
    pub is_error: bool,
}

/// Token handed out by `begin_send`; only the completion carrying the
/// current token is applied, so a stale response can never race a newer
/// conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Append-only chat transcript plus the single-flight request guard.
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    next_token: u64,
    in_flight: Option<RequestToken>,
}

impl Transcript {
    pub fn new() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 0,
            next_token: 0,
            in_flight: None,
        };
        transcript.append(ChatRole::Assistant, GREETING.to_string(), Vec::new(), false);
        transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a send. Whitespace-only input is a no-op, and a second send
    /// while one is outstanding is refused; both return `None`.
    pub fn begin_send(&mut self, text: &str) -> Option<RequestToken> {
        let text = text.trim();
        if text.is_empty() || self.in_flight.is_some() {
            return None;
        }

        self.append(ChatRole::User, text.to_string(), Vec::new(), false);

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.in_flight = Some(token);
        Some(token)
    }

    /// Apply a finished advice request. Completions whose token doesn't
    /// match the outstanding one are dropped.
    pub fn complete(&mut self, token: RequestToken, result: Result<Advice, AdviceError>) {
        if self.in_flight != Some(token) {
            return;
        }
        self.in_flight = None;

        match result {
            Ok(advice) => self.append(ChatRole::Assistant, advice.text, advice.source_urls, false),
            Err(_) => self.append(
                ChatRole::Assistant,
                ADVICE_ERROR_TEXT.to_string(),
                Vec::new(),
                true,
            ),
        }
    }

    fn append(&mut self, role: ChatRole, text: String, source_urls: Vec<Url>, is_error: bool) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            source_urls,
            is_error,
        });
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advice(text: &str, urls: &[&str]) -> Advice {
        Advice {
            text: text.to_string(),
            source_urls: urls.iter().map(|u| Url::parse(u).unwrap()).collect(),
        }
    }

    #[test]
    fn starts_with_the_greeting() {
        let t = Transcript::new();
        assert_eq!(t.len(), 1);
        assert_eq!(t.messages()[0].role, ChatRole::Assistant);
        assert_eq!(t.messages()[0].text, GREETING);
    }

    #[test]
    fn whitespace_only_send_is_a_noop() {
        let mut t = Transcript::new();
        let before = t.len();
        assert!(t.begin_send("").is_none());
        assert!(t.begin_send("   \n\t ").is_none());
        assert_eq!(t.len(), before);
        assert!(!t.is_loading());
    }

    #[test]
    fn successful_send_appends_user_then_assistant_and_clears_loading() {
        let mut t = Transcript::new();
        let before = t.len();

        let token = t.begin_send("what's the spawner meta?").unwrap();
        assert!(t.is_loading());
        assert_eq!(t.len(), before + 1);
        assert_eq!(t.messages().last().unwrap().role, ChatRole::User);

        t.complete(token, Ok(advice("Golems.", &["https://wiki.example/"])));
        assert!(!t.is_loading());
        assert_eq!(t.len(), before + 2);

        let reply = t.messages().last().unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.text, "Golems.");
        assert_eq!(reply.source_urls.len(), 1);
        assert!(!reply.is_error);
    }

    #[test]
    fn failed_send_renders_fixed_error_text_with_error_flag() {
        let mut t = Transcript::new();
        let token = t.begin_send("hello?").unwrap();
        t.complete(token, Err(AdviceError::TaskFailed));

        let reply = t.messages().last().unwrap();
        assert_eq!(reply.text, ADVICE_ERROR_TEXT);
        assert!(reply.source_urls.is_empty());
        assert!(reply.is_error);
        assert!(!t.is_loading());
    }

    #[test]
    fn second_send_while_loading_is_refused() {
        let mut t = Transcript::new();
        let _token = t.begin_send("first").unwrap();
        let len = t.len();
        assert!(t.begin_send("second").is_none());
        assert_eq!(t.len(), len);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut t = Transcript::new();
        let stale = t.begin_send("first").unwrap();
        t.complete(stale, Err(AdviceError::TaskFailed));

        let fresh = t.begin_send("second").unwrap();
        let len = t.len();

        // A late duplicate of the first completion must not append anything.
        t.complete(stale, Ok(advice("late answer", &[])));
        assert_eq!(t.len(), len);
        assert!(t.is_loading());

        t.complete(fresh, Ok(advice("current answer", &[])));
        assert_eq!(t.messages().last().unwrap().text, "current answer");
    }

    #[test]
    fn message_ids_are_unique_and_monotonic() {
        let mut t = Transcript::new();
        let token = t.begin_send("q").unwrap();
        t.complete(token, Ok(advice("a", &[])));

        let ids: Vec<MessageId> = t.messages().iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn user_message_precedes_its_answer() {
        let mut t = Transcript::new();
        let token = t.begin_send("question").unwrap();
        t.complete(token, Ok(advice("answer", &[])));

        let msgs = t.messages();
        let user_pos = msgs.iter().position(|m| m.text == "question").unwrap();
        let reply_pos = msgs.iter().position(|m| m.text == "answer").unwrap();
        assert!(user_pos < reply_pos);
    }
}
