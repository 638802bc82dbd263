//! Intent router.
//!
//! Decides which [`DialogEvent`] a classified utterance produces given the
//! conversation's active dialog, runs the state machine, and applies the
//! resulting transition to the conversation.

use std::sync::Arc;

use tracing::{debug, warn};

use holly_core::{Clock, HolidayCatalog};

use crate::answer;
use crate::context::ConversationContext;
use crate::machine::{step, DialogEvent, Transition};
use crate::response::ResponseRenderer;
use crate::types::{DialogState, Intent, IntentResult};

/// Routes classified utterances through the dialog state machine.
pub struct IntentRouter {
    catalog: Arc<HolidayCatalog>,
    clock: Arc<dyn Clock>,
    renderer: ResponseRenderer,
    /// Results scoring below this are treated as unrecognized.
    min_score: f32,
}

impl IntentRouter {
    pub fn new(
        catalog: Arc<HolidayCatalog>,
        clock: Arc<dyn Clock>,
        renderer: ResponseRenderer,
        min_score: f32,
    ) -> Self {
        Self {
            catalog,
            clock,
            renderer,
            min_score,
        }
    }

    pub fn catalog(&self) -> &HolidayCatalog {
        &self.catalog
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn renderer(&self) -> &ResponseRenderer {
        &self.renderer
    }

    /// Handle one turn: pick the event, step the state machine, and apply
    /// the transition to `ctx`.
    pub fn handle_turn<C: ConversationContext + ?Sized>(
        &self,
        result: &IntentResult,
        ctx: &mut C,
    ) -> Transition {
        let from = ctx.active_dialog();
        let event = self.event_for(from, result);
        debug!(
            intent = %result.intent,
            score = result.score,
            dialog = %from,
            event = ?event,
            "Routing turn"
        );
        let transition = step(from, event, &self.renderer);
        transition.apply(ctx);
        transition
    }

    /// Event a classified utterance produces while `from` is active.
    ///
    /// Goodbye and the wake phrase apply everywhere. Before the wake phrase
    /// everything else is unrecognized. After it, anything that is not a
    /// confident, answerable holiday question falls back to help.
    pub fn event_for(&self, from: DialogState, result: &IntentResult) -> DialogEvent {
        match result.intent {
            Intent::Goodbye => return DialogEvent::Goodbye,
            Intent::Wake => return DialogEvent::Wake,
            _ => {}
        }

        if from == DialogState::Root {
            return DialogEvent::Unrecognized {
                query: result.query.clone(),
            };
        }

        if !result.intent.is_holiday_query() {
            return DialogEvent::Fallback;
        }
        if result.score < self.min_score {
            debug!(
                score = result.score,
                min_score = self.min_score,
                "Score below threshold"
            );
            return DialogEvent::Fallback;
        }

        match answer::select(result, &self.catalog, self.clock.today()) {
            Some(answer) => DialogEvent::Answered(answer),
            None => {
                warn!(intent = %result.intent, query = %result.query, "Incomplete holiday question");
                DialogEvent::Fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Conversation;
    use crate::types::{ENTITY_COUNT, ENTITY_HOLIDAY, ENTITY_REMAIN, ENTITY_WHEN};
    use holly_core::{FixedClock, HolidayRecord};

    fn router_on(y: i32, m: u32, d: u32) -> IntentRouter {
        let catalog = HolidayCatalog::new(vec![
            HolidayRecord::new("New Year's Day", 1, 1),
            HolidayRecord::new("Independence Day", 7, 4),
            HolidayRecord::new("Labor Day", 9, 4),
            HolidayRecord::new("Christmas", 12, 25),
        ])
        .unwrap();
        IntentRouter::new(
            Arc::new(catalog),
            Arc::new(FixedClock::ymd(y, m, d).unwrap()),
            ResponseRenderer::default(),
            0.3,
        )
    }

    fn router() -> IntentRouter {
        router_on(2023, 8, 1)
    }

    /// Conversation that has already heard the wake phrase.
    fn started(router: &IntentRouter) -> Conversation {
        let mut conv = Conversation::new();
        router.handle_turn(&IntentResult::new("holly", Intent::Wake, 0.99), &mut conv);
        conv.take_outbox();
        conv
    }

    fn texts(conv: &mut Conversation) -> Vec<String> {
        conv.take_outbox().into_iter().map(|m| m.text).collect()
    }

    // ---- Root ----

    #[test]
    fn test_root_wake_greets_and_helps() {
        let r = router();
        let mut conv = Conversation::new();
        let t = r.handle_turn(&IntentResult::new("holly", Intent::Wake, 0.99), &mut conv);
        assert_eq!(t.to, DialogState::Process);
        assert_eq!(conv.active_dialog(), DialogState::Process);
        let out = texts(&mut conv);
        assert_eq!(out[0], "Hi! I'm Holly the Holiday Bot.");
        assert!(out[1].contains("List of all holidays"));
    }

    #[test]
    fn test_root_question_before_wake_not_understood() {
        let r = router();
        let mut conv = Conversation::new();
        let result = IntentResult::new("next holiday", Intent::NextHoliday, 0.95);
        r.handle_turn(&result, &mut conv);
        assert_eq!(conv.active_dialog(), DialogState::Root);
        assert_eq!(
            texts(&mut conv),
            vec!["Sorry, I did not understand 'next holiday'."]
        );
    }

    // ---- Holiday questions ----

    #[test]
    fn test_next_holiday_reply() {
        let r = router();
        let mut conv = started(&r);
        r.handle_turn(&IntentResult::new("next", Intent::NextHoliday, 0.95), &mut conv);
        assert_eq!(texts(&mut conv), vec!["Labor Day is on Monday, 09-04"]);
        assert_eq!(conv.active_dialog(), DialogState::Process);
    }

    #[test]
    fn test_next_holiday_wraps_at_year_end() {
        let r = router_on(2023, 12, 26);
        let mut conv = started(&r);
        r.handle_turn(&IntentResult::new("next", Intent::NextHoliday, 0.95), &mut conv);
        assert_eq!(texts(&mut conv), vec!["New Year's Day is on Monday, 01-01"]);
    }

    #[test]
    fn test_when_month_of_christmas_carries_12() {
        let r = router();
        let mut conv = started(&r);
        let result = IntentResult::new("what month is christmas", Intent::WhenHoliday, 0.9)
            .with_entity(ENTITY_WHEN, "month")
            .with_entity(ENTITY_HOLIDAY, "Christmas");
        r.handle_turn(&result, &mut conv);
        let out = texts(&mut conv);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("12"));
    }

    #[test]
    fn test_remaining_count_and_names() {
        let r = router();
        let mut conv = started(&r);
        let count = IntentResult::new("how many", Intent::RemainingHolidays, 0.9)
            .with_entity(ENTITY_COUNT, "how many");
        r.handle_turn(&count, &mut conv);
        assert_eq!(texts(&mut conv), vec!["The number of Holidays left is 2."]);

        let names = IntentResult::new("which remain", Intent::RemainingHolidays, 0.9)
            .with_entity(ENTITY_REMAIN, "remain");
        r.handle_turn(&names, &mut conv);
        assert_eq!(
            texts(&mut conv),
            vec!["The remaining Holidays are:\n\nLabor Day\n\nChristmas"]
        );
    }

    #[test]
    fn test_remaining_without_entities_falls_back_to_help() {
        let r = router();
        let mut conv = started(&r);
        let t = r.handle_turn(
            &IntentResult::new("holidays?", Intent::RemainingHolidays, 0.9),
            &mut conv,
        );
        assert_eq!(t.path, vec![DialogState::Help]);
        let out = texts(&mut conv);
        assert_eq!(out[0], "Sorry, I didn't understand.");
        assert!(out[1].starts_with("These are some things I can help you with."));
        assert_eq!(conv.active_dialog(), DialogState::Process);
    }

    #[test]
    fn test_all_holidays_reply() {
        let r = router();
        let mut conv = started(&r);
        r.handle_turn(&IntentResult::new("all", Intent::AllHolidays, 0.9), &mut conv);
        assert_eq!(
            texts(&mut conv),
            vec!["These are ALL US Holidays: New Year's Day, Independence Day, Labor Day, Christmas."]
        );
    }

    // ---- Fallbacks ----

    #[test]
    fn test_none_intent_falls_back() {
        let r = router();
        let mut conv = started(&r);
        r.handle_turn(&IntentResult::none("weather?"), &mut conv);
        assert_eq!(texts(&mut conv)[0], "Sorry, I didn't understand.");
    }

    #[test]
    fn test_low_score_falls_back() {
        let r = router();
        let conv = started(&r);
        let event = r.event_for(
            conv.active_dialog(),
            &IntentResult::new("next?", Intent::NextHoliday, 0.1),
        );
        assert_eq!(event, DialogEvent::Fallback);
    }

    #[test]
    fn test_unknown_holiday_falls_back() {
        let r = router();
        let result = IntentResult::new("when is festivus", Intent::WhenHoliday, 0.9)
            .with_entity(ENTITY_WHEN, "when")
            .with_entity(ENTITY_HOLIDAY, "Festivus");
        assert_eq!(
            r.event_for(DialogState::Process, &result),
            DialogEvent::Fallback
        );
    }

    // ---- Goodbye ----

    #[test]
    fn test_goodbye_ends_conversation() {
        let r = router();
        let mut conv = started(&r);
        let t = r.handle_turn(&IntentResult::new("bye", Intent::Goodbye, 0.99), &mut conv);
        assert!(t.ends_conversation());
        assert_eq!(conv.active_dialog(), DialogState::Root);
        assert!(conv.stack().is_empty());
        let out = conv.take_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Ok... See you later.");
        assert!(out[0].ends_conversation);
    }

    #[test]
    fn test_catalog_accessor() {
        let r = router();
        assert_eq!(r.catalog().len(), 4);
        assert_eq!(r.clock().today().to_string(), "2023-08-01");
    }
}
