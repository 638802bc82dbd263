//! Conversation store with idle expiry.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use uuid::Uuid;

use crate::context::{Conversation, ConversationContext};
use crate::error::DialogError;
use crate::types::DialogState;

/// Listing view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub dialog: DialogState,
    pub started_at: String,
    pub last_active_at: String,
    pub turn_count: u32,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conv: &Conversation) -> Self {
        Self {
            id: conv.id,
            dialog: conv.active_dialog(),
            started_at: format_epoch(conv.started_at),
            last_active_at: format_epoch(conv.last_active_at),
            turn_count: conv.turn_count,
        }
    }
}

/// Live conversations keyed by id.
///
/// The lock is held for a whole turn, so turns of one conversation never
/// interleave.
pub struct ConversationStore {
    conversations: Mutex<HashMap<Uuid, Conversation>>,
    timeout_minutes: u32,
}

impl ConversationStore {
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            timeout_minutes,
        }
    }

    /// Whether a conversation has been idle longer than the timeout.
    pub fn is_expired(&self, conv: &Conversation) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.timeout_minutes) * 60;
        now - conv.last_active_at > timeout_secs
    }

    /// Run `f` against the requested conversation.
    ///
    /// An unknown or expired id starts a fresh conversation with a new id;
    /// `None` always does. Starting a conversation first drops every expired
    /// one, so abandoned conversations do not accumulate.
    pub fn with_conversation<F, R>(&self, requested: Option<Uuid>, f: F) -> Result<R, DialogError>
    where
        F: FnOnce(&mut Conversation) -> R,
    {
        let mut conversations = self.lock()?;

        let id = match requested {
            Some(id) => match conversations.get(&id) {
                Some(conv) if !self.is_expired(conv) => Some(id),
                Some(_) => {
                    tracing::debug!(conversation = %id, "Conversation expired");
                    conversations.remove(&id);
                    None
                }
                None => None,
            },
            None => None,
        };
        let id = match id {
            Some(id) => id,
            None => {
                let before = conversations.len();
                conversations.retain(|_, conv| !self.is_expired(conv));
                let purged = before - conversations.len();
                if purged > 0 {
                    tracing::debug!(purged, "Expired conversations dropped");
                }
                let conv = Conversation::new();
                let id = conv.id;
                conversations.insert(id, conv);
                id
            }
        };

        let conv = conversations
            .get_mut(&id)
            .ok_or(DialogError::ConversationNotFound(id))?;
        Ok(f(conv))
    }

    pub fn get(&self, id: Uuid) -> Result<ConversationSummary, DialogError> {
        let conversations = self.lock()?;
        conversations
            .get(&id)
            .map(ConversationSummary::from)
            .ok_or(DialogError::ConversationNotFound(id))
    }

    pub fn list(&self) -> Vec<ConversationSummary> {
        match self.lock() {
            Ok(conversations) => conversations.values().map(ConversationSummary::from).collect(),
            Err(_) => vec![],
        }
    }

    pub fn remove(&self, id: Uuid) -> Result<(), DialogError> {
        let mut conversations = self.lock()?;
        conversations
            .remove(&id)
            .map(|_| ())
            .ok_or(DialogError::ConversationNotFound(id))
    }

    /// Drop every expired conversation, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize, DialogError> {
        let mut conversations = self.lock()?;
        let before = conversations.len();
        conversations.retain(|_, conv| !self.is_expired(conv));
        Ok(before - conversations.len())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Conversation>>, DialogError> {
        self.conversations
            .lock()
            .map_err(|e| DialogError::Storage(format!("conversation lock poisoned: {}", e)))
    }
}

/// Format epoch seconds as RFC 3339.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConversationStore {
        ConversationStore::new(30)
    }

    #[test]
    fn test_none_creates_conversation() {
        let s = store();
        let id = s.with_conversation(None, |c| c.id).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(id).unwrap().dialog, DialogState::Root);
    }

    #[test]
    fn test_known_id_reuses_conversation() {
        let s = store();
        let id = s
            .with_conversation(None, |c| {
                c.begin_dialog(DialogState::Process);
                c.id
            })
            .unwrap();
        let (same, dialog) = s
            .with_conversation(Some(id), |c| (c.id, c.active_dialog()))
            .unwrap();
        assert_eq!(same, id);
        assert_eq!(dialog, DialogState::Process);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_unknown_id_starts_fresh() {
        let s = store();
        let requested = Uuid::new_v4();
        let id = s.with_conversation(Some(requested), |c| c.id).unwrap();
        assert_ne!(id, requested);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_expired_conversation_replaced() {
        let s = store();
        let id = s
            .with_conversation(None, |c| {
                c.begin_dialog(DialogState::Process);
                c.last_active_at -= 31 * 60;
                c.id
            })
            .unwrap();
        let (new_id, dialog) = s
            .with_conversation(Some(id), |c| (c.id, c.active_dialog()))
            .unwrap();
        assert_ne!(new_id, id);
        assert_eq!(dialog, DialogState::Root);
        assert!(s.get(id).is_err());
    }

    #[test]
    fn test_purge_expired() {
        let s = store();
        s.with_conversation(None, |c| c.last_active_at -= 3600).unwrap();
        s.with_conversation(None, |_| ()).unwrap();
        assert_eq!(s.purge_expired().unwrap(), 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_new_conversation_sweeps_expired() {
        let s = store();
        for _ in 0..100 {
            s.with_conversation(None, |c| c.last_active_at -= 3600).unwrap();
        }
        let live = s.with_conversation(None, |c| c.id).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.get(live).is_ok());

        s.with_conversation(None, |_| ()).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_resumed_conversation_does_not_sweep() {
        let s = store();
        let stale = s.with_conversation(None, |c| c.id).unwrap();
        let live = s.with_conversation(None, |c| c.id).unwrap();
        s.with_conversation(Some(stale), |c| c.last_active_at -= 3600)
            .unwrap();
        s.with_conversation(Some(live), |_| ()).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.purge_expired().unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let s = store();
        let id = s.with_conversation(None, |c| c.id).unwrap();
        s.remove(id).unwrap();
        assert!(s.is_empty());
        assert!(matches!(
            s.remove(id),
            Err(DialogError::ConversationNotFound(_))
        ));
    }

    #[test]
    fn test_list_summaries() {
        let s = store();
        s.with_conversation(None, |c| c.touch()).unwrap();
        s.with_conversation(None, |_| ()).unwrap();
        let list = s.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().map(|c| c.turn_count).sum::<u32>(), 1);
        assert!(list[0].started_at.contains('T'));
    }
}
