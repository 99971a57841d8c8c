//! Bot API objects that a message is composed of.

mod chat;
mod entity;
mod location;
mod media;
mod user;

pub use chat::{Chat, ChatKind};
pub use entity::{EntityKind, MessageEntity};
pub use location::{Contact, Location, Venue};
pub use media::{Audio, Document, PhotoSize, Sticker, Video, Voice};
pub use user::User;
