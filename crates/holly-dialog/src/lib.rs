//! Conversational layer of the Holly holiday bot.
//!
//! Recognizes intents and entities in user utterances, selects answers
//! from the holiday query engine, and drives the stack-based dialog state
//! machine for each conversation.

pub mod answer;
pub mod bot;
pub mod context;
pub mod error;
pub mod machine;
pub mod recognizer;
pub mod response;
pub mod router;
pub mod session;
pub mod types;

pub use answer::{select, Answer, HolidayDetail, WhenField};
pub use bot::{HollyBot, TurnReply};
pub use context::{Conversation, ConversationContext, OutboundMessage};
pub use error::DialogError;
pub use machine::{step, DialogEvent, Output, Transition};
pub use recognizer::{top_result, PatternRecognizer, Recognizer, RecognizerSet};
pub use response::ResponseRenderer;
pub use router::IntentRouter;
pub use session::{ConversationStore, ConversationSummary};
pub use types::{
    DialogState, Entity, Intent, IntentResult, ENTITY_COUNT, ENTITY_HOLIDAY, ENTITY_REMAIN,
    ENTITY_WHEN,
};
