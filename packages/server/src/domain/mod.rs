//! Domain layer for the messaging subsystem.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod identity;
pub mod repository;
pub mod room_router;
pub mod value_object;

pub use entity::{Identity, Message, NewMessage, Role};
pub use error::{AuthError, MessageError, RepositoryError, ValueObjectError};
pub use factory::MessageIdFactory;
pub use identity::IdentityGate;
pub use repository::ConversationRepository;
pub use room_router::RoomRouter;
pub use value_object::{ConnectionId, MessageBody, MessageId, RoomKey, Timestamp, UserId};
