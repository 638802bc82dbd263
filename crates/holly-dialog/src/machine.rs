//! Dialog state machine.
//!
//! [`step`] is a pure function from (current dialog, event) to a
//! [`Transition`]: the dialogs passed through, the dialog the conversation
//! rests in afterwards, and the ordered outputs that get it there. Applying
//! the outputs to a [`ConversationContext`] performs the stack operations
//! and queues the replies.
//!
//! Root --wake--> Help --> Process
//! Process --answer--> Answering --> Process
//! Process --fallback--> Help --> Process
//! any --goodbye--> Answering --> Root (stack cleared)
//! Root --anything else--> Root

use serde::Serialize;

use crate::answer::Answer;
use crate::context::ConversationContext;
use crate::response::ResponseRenderer;
use crate::types::DialogState;

/// What the router decided about one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Wake,
    Goodbye,
    Answered(Answer),
    /// A recognized turn that could not be answered.
    Fallback,
    /// Input outside a started conversation.
    Unrecognized { query: String },
}

/// One effect on the conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "arg")]
pub enum Output {
    Send(String),
    EndTurn(String),
    BeginDialog(DialogState),
    EndDialog,
    ClearStack,
}

/// Result of one state-machine step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: DialogState,
    /// Transient dialogs entered and left during the step.
    pub path: Vec<DialogState>,
    /// Dialog active once the step completes.
    pub to: DialogState,
    pub outputs: Vec<Output>,
}

impl Transition {
    /// Run the outputs against a conversation, in order.
    pub fn apply<C: ConversationContext + ?Sized>(&self, ctx: &mut C) {
        for output in &self.outputs {
            match output {
                Output::Send(text) => ctx.send(text.clone()),
                Output::EndTurn(text) => ctx.end_turn(text.clone()),
                Output::BeginDialog(dialog) => ctx.begin_dialog(*dialog),
                Output::EndDialog => ctx.end_dialog(),
                Output::ClearStack => ctx.clear_stack(),
            }
        }
    }

    /// Reply texts in send order.
    pub fn messages(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Send(text) | Output::EndTurn(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the step finishes the conversation.
    pub fn ends_conversation(&self) -> bool {
        self.outputs
            .iter()
            .any(|o| matches!(o, Output::EndTurn(_)))
    }
}

/// Compute the transition for `event` arriving while `from` is active.
pub fn step(from: DialogState, event: DialogEvent, renderer: &ResponseRenderer) -> Transition {
    match event {
        DialogEvent::Goodbye => Transition {
            from,
            path: vec![DialogState::Answering],
            to: DialogState::Root,
            outputs: vec![Output::ClearStack, Output::EndTurn(renderer.farewell())],
        },
        DialogEvent::Wake => help_then_process(from, renderer.greeting(), renderer),
        DialogEvent::Unrecognized { query } if from == DialogState::Root => Transition {
            from,
            path: vec![],
            to: DialogState::Root,
            outputs: vec![Output::Send(renderer.not_understood(&query))],
        },
        DialogEvent::Unrecognized { .. } | DialogEvent::Fallback => {
            help_then_process(from, renderer.fallback(), renderer)
        }
        DialogEvent::Answered(answer) => {
            let mut outputs = enter_process(from);
            outputs.extend([
                Output::BeginDialog(DialogState::Answering),
                Output::Send(renderer.render(&answer)),
                Output::EndDialog,
            ]);
            Transition {
                from,
                path: vec![DialogState::Answering],
                to: DialogState::Process,
                outputs,
            }
        }
    }
}

/// Send `lead`, run the help dialog, then rest in `Process`.
fn help_then_process(from: DialogState, lead: String, renderer: &ResponseRenderer) -> Transition {
    let mut outputs = vec![
        Output::Send(lead),
        Output::BeginDialog(DialogState::Help),
        Output::Send(renderer.help()),
        Output::EndDialog,
    ];
    outputs.extend(enter_process(from));
    Transition {
        from,
        path: vec![DialogState::Help],
        to: DialogState::Process,
        outputs,
    }
}

/// Stack operations that make `Process` the active dialog. The stack holds
/// at most `Process` between turns.
fn enter_process(from: DialogState) -> Vec<Output> {
    match from {
        DialogState::Root => vec![Output::BeginDialog(DialogState::Process)],
        DialogState::Process => vec![],
        DialogState::Help | DialogState::Answering => vec![
            Output::ClearStack,
            Output::BeginDialog(DialogState::Process),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Conversation;

    fn renderer() -> ResponseRenderer {
        ResponseRenderer::default()
    }

    fn answer() -> Answer {
        Answer::RemainingCount { count: 2 }
    }

    /// Conversation whose stack rests in `state`.
    fn conversation_in(state: DialogState) -> Conversation {
        let mut conv = Conversation::new();
        match state {
            DialogState::Root => {}
            DialogState::Process => conv.begin_dialog(DialogState::Process),
            other => {
                conv.begin_dialog(DialogState::Process);
                conv.begin_dialog(other);
            }
        }
        conv
    }

    fn all_events() -> Vec<DialogEvent> {
        vec![
            DialogEvent::Wake,
            DialogEvent::Goodbye,
            DialogEvent::Answered(answer()),
            DialogEvent::Fallback,
            DialogEvent::Unrecognized {
                query: "hello".into(),
            },
        ]
    }

    // ---- Root ----

    #[test]
    fn test_wake_from_root() {
        let t = step(DialogState::Root, DialogEvent::Wake, &renderer());
        assert_eq!(t.path, vec![DialogState::Help]);
        assert_eq!(t.to, DialogState::Process);
        let messages = t.messages();
        assert_eq!(messages[0], "Hi! I'm Holly the Holiday Bot.");
        assert!(messages[1].starts_with("These are some things"));
        assert!(!t.ends_conversation());
    }

    #[test]
    fn test_unrecognized_at_root_stays() {
        let t = step(
            DialogState::Root,
            DialogEvent::Unrecognized {
                query: "hello".into(),
            },
            &renderer(),
        );
        assert_eq!(t.to, DialogState::Root);
        assert!(t.path.is_empty());
        assert_eq!(t.messages(), vec!["Sorry, I did not understand 'hello'."]);
    }

    // ---- Process ----

    #[test]
    fn test_answer_from_process() {
        let t = step(DialogState::Process, DialogEvent::Answered(answer()), &renderer());
        assert_eq!(t.path, vec![DialogState::Answering]);
        assert_eq!(t.to, DialogState::Process);
        assert_eq!(t.messages(), vec!["The number of Holidays left is 2."]);
    }

    #[test]
    fn test_fallback_from_process_shows_help() {
        let t = step(DialogState::Process, DialogEvent::Fallback, &renderer());
        assert_eq!(t.path, vec![DialogState::Help]);
        assert_eq!(t.to, DialogState::Process);
        let messages = t.messages();
        assert_eq!(messages[0], "Sorry, I didn't understand.");
        assert!(messages[1].contains("Next holiday"));
    }

    #[test]
    fn test_unrecognized_in_process_is_fallback() {
        let t = step(
            DialogState::Process,
            DialogEvent::Unrecognized { query: "x".into() },
            &renderer(),
        );
        assert_eq!(t, step(DialogState::Process, DialogEvent::Fallback, &renderer()));
    }

    // ---- Goodbye ----

    #[test]
    fn test_goodbye_from_every_state_clears_stack() {
        for state in [
            DialogState::Root,
            DialogState::Help,
            DialogState::Process,
            DialogState::Answering,
        ] {
            let t = step(state, DialogEvent::Goodbye, &renderer());
            assert_eq!(t.to, DialogState::Root);
            assert!(t.ends_conversation());
            assert_eq!(t.messages(), vec!["Ok... See you later."]);

            let mut conv = conversation_in(state);
            t.apply(&mut conv);
            assert!(conv.stack().is_empty());
        }
    }

    // ---- Applying transitions ----

    #[test]
    fn test_apply_lands_in_target_state() {
        for state in [
            DialogState::Root,
            DialogState::Help,
            DialogState::Process,
            DialogState::Answering,
        ] {
            for event in all_events() {
                let t = step(state, event.clone(), &renderer());
                let mut conv = conversation_in(state);
                t.apply(&mut conv);
                assert_eq!(
                    conv.active_dialog(),
                    t.to,
                    "{:?} on {:?} landed in {:?}",
                    event,
                    state,
                    conv.active_dialog()
                );
                assert!(conv.stack().len() <= 1, "stack grew: {:?}", conv.stack());
            }
        }
    }

    #[test]
    fn test_repeated_turns_do_not_grow_stack() {
        let mut conv = Conversation::new();
        let r = renderer();
        step(DialogState::Root, DialogEvent::Wake, &r).apply(&mut conv);
        for _ in 0..10 {
            step(conv.active_dialog(), DialogEvent::Answered(answer()), &r).apply(&mut conv);
            step(conv.active_dialog(), DialogEvent::Fallback, &r).apply(&mut conv);
            step(conv.active_dialog(), DialogEvent::Wake, &r).apply(&mut conv);
        }
        assert_eq!(conv.stack(), &[DialogState::Process]);
    }

    #[test]
    fn test_apply_queues_messages_in_order() {
        let mut conv = Conversation::new();
        step(DialogState::Root, DialogEvent::Wake, &renderer()).apply(&mut conv);
        let out = conv.take_outbox();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Hi! I'm Holly the Holiday Bot.");
        assert!(out[1].text.contains("When is Labor Day?"));
    }
}
