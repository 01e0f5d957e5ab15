//! Client-side chat transcript.
//!
//! The transcript is the only state the client owns outright: it is never
//! persisted and starts empty every time an agent is loaded.

use std::cell::Cell;

use crate::api::ChatReply;

/// Locally generated message identifier, unique and increasing per transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Sources the backend used for an agent answer; empty for user messages.
    pub sources: Vec<String>,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    /// Lines scrolled up from the bottom; 0 follows the newest message.
    scroll_back: usize,
    /// Lines hidden above the viewport at the bottom position, as last drawn.
    scroll_limit: Cell<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.push(ChatMessage {
            id,
            sender: Sender::User,
            text: text.into(),
            sources: Vec::new(),
        });
        id
    }

    pub fn push_agent(&mut self, reply: ChatReply) -> MessageId {
        let id = self.allocate_id();
        self.push(ChatMessage {
            id,
            sender: Sender::Agent,
            text: reply.answer,
            sources: reply.retrieved_sources,
        });
        id
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_back = 0;
    }

    /// Removes the message with `id`; returns whether it was present.
    pub fn retract(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|message| message.id != id);
        self.messages.len() != before
    }

    /// Empties the transcript. Ids keep increasing so stale ids never match.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.scroll_back = 0;
    }

    /// Lines scrolled up from the bottom, never past the oldest line.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back.min(self.scroll_limit.get())
    }

    /// Recorded by the renderer each frame; bounds [`scroll_up`](Self::scroll_up).
    pub fn set_scroll_limit(&self, lines: usize) {
        self.scroll_limit.set(lines);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self
            .scroll_back()
            .saturating_add(lines)
            .min(self.scroll_limit.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back().saturating_sub(lines);
    }
}
