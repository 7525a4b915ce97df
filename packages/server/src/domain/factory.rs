//! Domain factories for creating domain entities and value objects.

use super::MessageId;

/// Factory for generating MessageId instances.
///
/// Identity is assigned by the conversation store at persistence time; this
/// factory is the only place new ids come from.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    pub fn generate() -> MessageId {
        MessageId::from_uuid(uuid::Uuid::new_v4())
    }
}
