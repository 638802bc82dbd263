//! Error types for the conversational layer.
//!
//! Recognition misses and incomplete entities are never errors; they
//! degrade to the fallback reply. Only infrastructure failures land here.

use holly_core::HollyError;

/// Errors from the bot front door.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("conversation not found: {0}")]
    ConversationNotFound(uuid::Uuid),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<HollyError> for DialogError {
    fn from(err: HollyError) -> Self {
        DialogError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_dialog_error_display() {
        assert_eq!(
            DialogError::EmptyMessage.to_string(),
            "message cannot be empty"
        );
        assert_eq!(
            DialogError::MessageTooLong(500).to_string(),
            "message exceeds maximum length of 500 characters"
        );
        assert_eq!(
            DialogError::Storage("lock poisoned".into()).to_string(),
            "storage error: lock poisoned"
        );
    }

    #[test]
    fn test_conversation_not_found_preserves_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            DialogError::ConversationNotFound(id).to_string(),
            "conversation not found: 550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_from_holly_error() {
        let err: DialogError = HollyError::Catalog("empty".into()).into();
        assert!(matches!(err, DialogError::Storage(_)));
        assert!(err.to_string().contains("empty"));
    }
}
