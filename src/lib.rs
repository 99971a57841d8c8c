//! Telegram Bot API message objects: decoding, encoding, UTF-16 entity
//! extraction and reply shortcuts.

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod platform;
pub mod text;
pub mod types;
pub mod wire;

pub use client::{BotApi, HttpBot};
pub use error::MessageError;
pub use message::{Media, Message, MessageOptions, MAX_NESTING_DEPTH};
pub use types::{
    Audio, Chat, ChatKind, Contact, Document, EntityKind, Location, MessageEntity, PhotoSize,
    Sticker, User, Venue, Video, Voice,
};
pub use wire::WireObject;
