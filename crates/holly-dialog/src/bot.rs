//! Bot front door: validates a message, recognizes it, and routes it
//! through the conversation it belongs to.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use holly_core::{Clock, HolidayCatalog, HollyConfig};

use crate::context::OutboundMessage;
use crate::error::DialogError;
use crate::recognizer::{top_result, PatternRecognizer, Recognizer, RecognizerSet};
use crate::response::ResponseRenderer;
use crate::router::IntentRouter;
use crate::session::ConversationStore;
use crate::types::{DialogState, Intent, IntentResult};

/// Everything produced by one user turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub conversation_id: Uuid,
    pub intent: Intent,
    pub score: f32,
    /// Dialog the conversation rests in after the turn.
    pub dialog: DialogState,
    pub replies: Vec<OutboundMessage>,
    /// True when the turn said goodbye.
    pub ended: bool,
}

/// The holiday bot.
pub struct HollyBot {
    recognizer: Box<dyn Recognizer>,
    router: IntentRouter,
    store: ConversationStore,
    max_message_length: usize,
}

impl HollyBot {
    /// Build a bot using the built-in pattern recognizer.
    pub fn new(config: &HollyConfig, catalog: Arc<HolidayCatalog>, clock: Arc<dyn Clock>) -> Self {
        let recognizer = RecognizerSet::new().with(Box::new(PatternRecognizer::new(&catalog)));
        Self::with_recognizer(config, catalog, clock, Box::new(recognizer))
    }

    pub fn with_recognizer(
        config: &HollyConfig,
        catalog: Arc<HolidayCatalog>,
        clock: Arc<dyn Clock>,
        recognizer: Box<dyn Recognizer>,
    ) -> Self {
        let renderer = ResponseRenderer::new(&config.dialog.bot_name, &config.catalog.label);
        info!(
            recognizer = recognizer.name(),
            holidays = catalog.len(),
            min_score = config.recognizer.min_score,
            "Bot ready"
        );
        Self {
            recognizer,
            router: IntentRouter::new(catalog, clock, renderer, config.recognizer.min_score),
            store: ConversationStore::new(config.dialog.conversation_timeout_minutes),
            max_message_length: config.dialog.max_message_length,
        }
    }

    /// Handle one user message.
    ///
    /// Starts a new conversation when `conversation_id` is `None`, unknown,
    /// or expired.
    pub fn handle_message(
        &self,
        text: &str,
        conversation_id: Option<Uuid>,
    ) -> Result<TurnReply, DialogError> {
        if text.trim().is_empty() {
            return Err(DialogError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_length {
            return Err(DialogError::MessageTooLong(self.max_message_length));
        }

        let result = top_result(self.recognizer.as_ref(), text.trim());
        debug!(intent = %result.intent, score = result.score, "Recognized");
        self.handle_result(&result, conversation_id)
    }

    /// Route an already classified utterance.
    ///
    /// Results scoring below `recognizer.min_score` fall back. A result
    /// deserialized without a score counts as certain.
    pub fn handle_result(
        &self,
        result: &IntentResult,
        conversation_id: Option<Uuid>,
    ) -> Result<TurnReply, DialogError> {
        self.store.with_conversation(conversation_id, |conv| {
            let transition = self.router.handle_turn(result, conv);
            conv.touch();
            TurnReply {
                conversation_id: conv.id,
                intent: result.intent,
                score: result.score,
                dialog: transition.to,
                replies: conv.take_outbox(),
                ended: transition.ends_conversation(),
            }
        })
    }

    pub fn catalog(&self) -> &HolidayCatalog {
        self.router.catalog()
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.store
    }
}
