use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{BotHandle, Media, Message, MAX_NESTING_DEPTH};
use crate::client::BotApi;
use crate::error::{MessageError, Result};
use crate::types::{
    Audio, Chat, Contact, Document, Location, MessageEntity, PhotoSize, Sticker, User, Venue,
    Video, Voice,
};
use crate::wire::{absent_as_none, is_absent, is_false, lenient_integer, null_as_default};

/// The message exactly as the Bot API lays it out. Required fields are
/// optional here so that their absence surfaces as `MissingField` rather
/// than a generic decode error. Nested messages are only filled in on
/// encode; decoding reads them off the raw value one level at a time.
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    message_id: Option<u64>,
    #[serde(
        rename = "from",
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    sender: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<i64>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    chat: Option<Chat>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    forward_from: Option<User>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    forward_from_chat: Option<Chat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forward_date: Option<i64>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    reply_to_message: Option<Box<WireMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edit_date: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    text: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    entities: Vec<MessageEntity>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    audio: Option<Audio>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    document: Option<Document>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    photo: Vec<PhotoSize>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    sticker: Option<Sticker>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    video: Option<Video>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    voice: Option<Voice>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    caption: String,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    contact: Option<Contact>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    location: Option<Location>,
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    venue: Option<Venue>,
    #[serde(
        alias = "new_chat_participant",
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    new_chat_member: Option<User>,
    #[serde(
        alias = "left_chat_participant",
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    left_chat_member: Option<User>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    new_chat_title: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    new_chat_photo: Vec<PhotoSize>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    delete_chat_photo: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    group_chat_created: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    supergroup_chat_created: bool,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    migrate_to_chat_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    migrate_from_chat_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_false"
    )]
    channel_chat_created: bool,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pinned_message: Option<Box<WireMessage>>,
}

fn timestamp(field: &'static str, secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        MessageError::TypeCoercion(format!("`{}` timestamp {} is out of range", field, secs))
    })
}

/// Zero is how the API spells "no timestamp" for optional dates.
fn optional_timestamp(field: &'static str, secs: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    match secs {
        None | Some(0) => Ok(None),
        Some(secs) => timestamp(field, secs).map(Some),
    }
}

fn nonzero(id: i64) -> Option<i64> {
    (id != 0).then_some(id)
}

/// Decodes one message level, checking the depth before touching `data`.
fn decode(data: &Value, bot: &BotHandle, depth: usize) -> Result<Message> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MessageError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let wire = WireMessage::deserialize(data)?;
    let reply_to_message = decode_nested(data, "reply_to_message", bot, depth)?;
    let pinned_message = decode_nested(data, "pinned_message", bot, depth)?;
    wire.into_message(bot, reply_to_message, pinned_message)
}

fn decode_nested(
    data: &Value,
    key: &str,
    bot: &BotHandle,
    depth: usize,
) -> Result<Option<Box<Message>>> {
    match data.get(key) {
        Some(nested) if !is_absent(nested) => Ok(Some(Box::new(decode(nested, bot, depth + 1)?))),
        _ => Ok(None),
    }
}

impl WireMessage {
    fn into_message(
        self,
        bot: &BotHandle,
        reply_to_message: Option<Box<Message>>,
        pinned_message: Option<Box<Message>>,
    ) -> Result<Message> {
        let message_id = self.message_id.ok_or(MessageError::MissingField {
            field: "message_id",
        })?;
        let sender = self
            .sender
            .ok_or(MessageError::MissingField { field: "from" })?;
        let date = self
            .date
            .ok_or(MessageError::MissingField { field: "date" })?;
        let chat = self
            .chat
            .ok_or(MessageError::MissingField { field: "chat" })?;

        let candidates = [
            self.audio.map(Media::Audio),
            self.document.map(Media::Document),
            if self.photo.is_empty() {
                None
            } else {
                Some(Media::Photo(self.photo))
            },
            self.sticker.map(Media::Sticker),
            self.video.map(Media::Video),
            self.voice.map(Media::Voice),
        ];
        let mut media: Option<Media> = None;
        for candidate in candidates.into_iter().flatten() {
            if let Some(first) = &media {
                return Err(MessageError::ConflictingMedia {
                    first: first.wire_key(),
                    second: candidate.wire_key(),
                });
            }
            media = Some(candidate);
        }

        Ok(Message {
            message_id,
            sender,
            date: timestamp("date", date)?,
            chat,
            forward_from: self.forward_from,
            forward_from_chat: self.forward_from_chat,
            forward_date: optional_timestamp("forward_date", self.forward_date)?,
            reply_to_message,
            edit_date: optional_timestamp("edit_date", self.edit_date)?,
            text: self.text,
            entities: self.entities,
            media,
            caption: self.caption,
            contact: self.contact,
            location: self.location,
            venue: self.venue,
            new_chat_member: self.new_chat_member,
            left_chat_member: self.left_chat_member,
            new_chat_title: self.new_chat_title,
            new_chat_photo: self.new_chat_photo,
            delete_chat_photo: self.delete_chat_photo,
            group_chat_created: self.group_chat_created,
            supergroup_chat_created: self.supergroup_chat_created,
            migrate_to_chat_id: self.migrate_to_chat_id.unwrap_or(0),
            migrate_from_chat_id: self.migrate_from_chat_id.unwrap_or(0),
            channel_chat_created: self.channel_chat_created,
            pinned_message,
            bot: bot.clone(),
        })
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        WireMessage {
            message_id: Some(message.message_id),
            sender: Some(message.sender.clone()),
            date: Some(message.date.timestamp()),
            chat: Some(message.chat.clone()),
            forward_from: message.forward_from.clone(),
            forward_from_chat: message.forward_from_chat.clone(),
            forward_date: message.forward_date.map(|d| d.timestamp()),
            reply_to_message: message
                .reply_to_message
                .as_deref()
                .map(|nested| Box::new(WireMessage::from(nested))),
            edit_date: message.edit_date.map(|d| d.timestamp()),
            text: message.text.clone(),
            entities: message.entities.clone(),
            audio: message.audio().cloned(),
            document: message.document().cloned(),
            photo: message.photo().to_vec(),
            sticker: message.sticker().cloned(),
            video: message.video().cloned(),
            voice: message.voice().cloned(),
            caption: message.caption.clone(),
            contact: message.contact.clone(),
            location: message.location,
            venue: message.venue.clone(),
            new_chat_member: message.new_chat_member.clone(),
            left_chat_member: message.left_chat_member.clone(),
            new_chat_title: message.new_chat_title.clone(),
            new_chat_photo: message.new_chat_photo.clone(),
            delete_chat_photo: message.delete_chat_photo,
            group_chat_created: message.group_chat_created,
            supergroup_chat_created: message.supergroup_chat_created,
            migrate_to_chat_id: nonzero(message.migrate_to_chat_id),
            migrate_from_chat_id: nonzero(message.migrate_from_chat_id),
            channel_chat_created: message.channel_chat_created,
            pinned_message: message
                .pinned_message
                .as_deref()
                .map(|nested| Box::new(WireMessage::from(nested))),
        }
    }
}

impl Message {
    /// Decodes a Bot API message object.
    ///
    /// `null` decodes to `None`. Any other value must carry `message_id`,
    /// `from`, `date` and `chat`. `bot` is attached to the message and to
    /// every message nested in it.
    pub fn from_wire(data: &Value, bot: Option<Arc<dyn BotApi>>) -> Result<Option<Message>> {
        if data.is_null() {
            return Ok(None);
        }
        let message = decode(data, &BotHandle::new(bot), 0)?;
        debug!(
            "Decoded message {} in chat {}",
            message.message_id,
            message.chat_id()
        );
        Ok(Some(message))
    }

    pub fn from_json(json: &str, bot: Option<Arc<dyn BotApi>>) -> Result<Option<Message>> {
        let data: Value = serde_json::from_str(json)?;
        Message::from_wire(&data, bot)
    }

    /// Encodes the message as a Bot API object, leaving out every field
    /// without a value.
    pub fn to_wire(&self) -> Result<Value> {
        Ok(serde_json::to_value(WireMessage::from(self))?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&WireMessage::from(self))?)
    }
}
