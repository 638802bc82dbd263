//! Intent, entity, and dialog-state types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type naming the kind of date detail asked for.
pub const ENTITY_WHEN: &str = "when";
/// Entity type naming a holiday.
pub const ENTITY_HOLIDAY: &str = "holiday";
/// Entity type marking a request for the remaining holidays.
pub const ENTITY_REMAIN: &str = "remain";
/// Entity type marking a request for a count.
pub const ENTITY_COUNT: &str = "count";

// =============================================================================
// Intent
// =============================================================================

/// Classified user goal.
///
/// Names follow the language-model convention (`nextHoliday`, `None`), so
/// results from an external recognizer deserialize directly. Any name that
/// is not known here becomes [`Intent::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    /// The wake phrase ("holly").
    Wake,
    /// "bye" / "goodbye".
    Goodbye,
    AllHolidays,
    RemainingHolidays,
    NextHoliday,
    WhenHoliday,
    #[serde(rename = "None", other)]
    None,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Wake => "wake",
            Intent::Goodbye => "goodbye",
            Intent::AllHolidays => "allHolidays",
            Intent::RemainingHolidays => "remainingHolidays",
            Intent::NextHoliday => "nextHoliday",
            Intent::WhenHoliday => "whenHoliday",
            Intent::None => "None",
        }
    }

    /// Parse a recognizer intent name, mapping unknown names to `None`.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Intent::None)
    }

    /// Whether a holiday query handler exists for this intent.
    pub fn is_holiday_query(&self) -> bool {
        matches!(
            self,
            Intent::AllHolidays
                | Intent::RemainingHolidays
                | Intent::NextHoliday
                | Intent::WhenHoliday
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wake" => Ok(Intent::Wake),
            "goodbye" => Ok(Intent::Goodbye),
            "allHolidays" => Ok(Intent::AllHolidays),
            "remainingHolidays" => Ok(Intent::RemainingHolidays),
            "nextHoliday" => Ok(Intent::NextHoliday),
            "whenHoliday" => Ok(Intent::WhenHoliday),
            "None" => Ok(Intent::None),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

// =============================================================================
// Entities and recognition results
// =============================================================================

/// A typed value extracted from an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Entity {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// One classification of an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// The utterance that was classified.
    #[serde(default)]
    pub query: String,
    pub intent: Intent,
    /// Recognizer confidence, 0.0 to 1.0. Omitted scores count as certain.
    #[serde(default = "default_score")]
    pub score: f32,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

fn default_score() -> f32 {
    1.0
}

impl IntentResult {
    pub fn new(query: impl Into<String>, intent: Intent, score: f32) -> Self {
        Self {
            query: query.into(),
            intent,
            score,
            entities: Vec::new(),
        }
    }

    /// The "nothing matched" result for an utterance.
    pub fn none(query: impl Into<String>) -> Self {
        Self::new(query, Intent::None, 0.0)
    }

    pub fn with_entity(mut self, kind: &str, value: &str) -> Self {
        self.entities.push(Entity::new(kind, value));
        self
    }

    /// First entity of the given type, if any.
    pub fn find_entity(&self, kind: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == kind)
    }
}

// =============================================================================
// Dialog state
// =============================================================================

/// Named dialogs of the conversation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Idle, waiting for the wake phrase.
    Root,
    /// Lists what the bot can do, then continues into `Process`.
    Help,
    /// Waiting for a classified holiday question.
    Process,
    /// A reply has been sent for this turn.
    Answering,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Root => write!(f, "root"),
            DialogState::Help => write!(f, "help"),
            DialogState::Process => write!(f, "process"),
            DialogState::Answering => write!(f, "answering"),
        }
    }
}
