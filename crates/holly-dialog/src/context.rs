//! Conversation context: the dialog stack and per-turn output surface.

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

use crate::types::DialogState;

/// Per-conversation surface the dialog state machine drives.
///
/// The stack is empty while the conversation sits in `Root`.
pub trait ConversationContext {
    /// Dialog on top of the stack, or `Root` when the stack is empty.
    fn active_dialog(&self) -> DialogState;
    /// Queue a message for the user.
    fn send(&mut self, text: String);
    /// Queue a final message and mark the conversation finished.
    fn end_turn(&mut self, text: String);
    fn begin_dialog(&mut self, dialog: DialogState);
    /// Pop the active dialog. No-op on an empty stack.
    fn end_dialog(&mut self);
    fn clear_stack(&mut self);
}

/// One queued reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub text: String,
    /// True for the last message of a conversation.
    pub ends_conversation: bool,
}

/// In-memory conversation state.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    stack: Vec<DialogState>,
    outbox: Vec<OutboundMessage>,
    /// Epoch seconds.
    pub started_at: i64,
    /// Epoch seconds of the last handled turn.
    pub last_active_at: i64,
    pub turn_count: u32,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Local::now().timestamp();
        Self {
            id,
            stack: Vec::new(),
            outbox: Vec::new(),
            started_at: now,
            last_active_at: now,
            turn_count: 0,
        }
    }

    /// Dialog stack, bottom first.
    pub fn stack(&self) -> &[DialogState] {
        &self.stack
    }

    /// Drain the messages queued since the last call.
    pub fn take_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Record that a turn was handled.
    pub fn touch(&mut self) {
        self.last_active_at = Local::now().timestamp();
        self.turn_count += 1;
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext for Conversation {
    fn active_dialog(&self) -> DialogState {
        self.stack.last().copied().unwrap_or(DialogState::Root)
    }

    fn send(&mut self, text: String) {
        self.outbox.push(OutboundMessage {
            text,
            ends_conversation: false,
        });
    }

    fn end_turn(&mut self, text: String) {
        self.outbox.push(OutboundMessage {
            text,
            ends_conversation: true,
        });
    }

    fn begin_dialog(&mut self, dialog: DialogState) {
        self.stack.push(dialog);
    }

    fn end_dialog(&mut self) {
        self.stack.pop();
    }

    fn clear_stack(&mut self) {
        self.stack.clear();
    }
}
