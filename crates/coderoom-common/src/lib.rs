pub mod errors;
pub mod id;
pub mod notifications;
pub mod protocol;

pub use errors::{CoderoomError, ConfigError};
pub use id::{new_id, OriginId};
pub use notifications::{Notification, NotificationLevel, NotificationQueue};
pub use protocol::{Envelope, EventKind, RoomHello, RoomReply, ServerFrame};
