//! The Telegram message object.

mod reply;
mod wire;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::BotApi;
use crate::error::Result;
use crate::text::slice_utf16;
use crate::types::{
    Audio, Chat, Contact, Document, EntityKind, Location, MessageEntity, PhotoSize, Sticker, User,
    Venue, Video, Voice,
};

/// Replies and pinned messages nested deeper than this are rejected on decode.
pub const MAX_NESTING_DEPTH: usize = 16;

/// The media attached to a message. The Bot API sends at most one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Audio(Audio),
    Document(Document),
    /// Available sizes of the same photo. [`Message::new`] drops a photo
    /// without sizes.
    Photo(Vec<PhotoSize>),
    Sticker(Sticker),
    Video(Video),
    Voice(Voice),
}

impl Media {
    /// Key the payload travels under in the wire mapping.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Media::Audio(_) => "audio",
            Media::Document(_) => "document",
            Media::Photo(_) => "photo",
            Media::Sticker(_) => "sticker",
            Media::Video(_) => "video",
            Media::Voice(_) => "voice",
        }
    }

    /// A photo with no sizes, which the wire mapping cannot tell apart from
    /// no media at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Media::Photo(sizes) if sizes.is_empty())
    }
}

/// Optional parts of a [`Message`]. `Default` leaves every one of them
/// unset: `None`, empty text, no entities, `false` flags and zero migrate ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub forward_from: Option<User>,
    pub forward_from_chat: Option<Chat>,
    pub forward_date: Option<DateTime<Utc>>,
    pub reply_to_message: Option<Message>,
    pub edit_date: Option<DateTime<Utc>>,
    pub text: String,
    pub entities: Vec<MessageEntity>,
    pub media: Option<Media>,
    pub caption: String,
    pub contact: Option<Contact>,
    pub location: Option<Location>,
    pub venue: Option<Venue>,
    pub new_chat_member: Option<User>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: String,
    pub new_chat_photo: Vec<PhotoSize>,
    pub delete_chat_photo: bool,
    pub group_chat_created: bool,
    pub supergroup_chat_created: bool,
    pub migrate_to_chat_id: i64,
    pub migrate_from_chat_id: i64,
    pub channel_chat_created: bool,
    pub pinned_message: Option<Message>,
}

/// The bot a message was received through. It is not part of the message's
/// value, so two messages compare equal regardless of their handles.
#[derive(Clone, Default)]
pub(crate) struct BotHandle(Option<Arc<dyn BotApi>>);

impl BotHandle {
    pub(crate) fn new(bot: Option<Arc<dyn BotApi>>) -> Self {
        Self(bot)
    }
}

impl fmt::Debug for BotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("BotHandle(attached)"),
            None => f.write_str("BotHandle(detached)"),
        }
    }
}

impl PartialEq for BotHandle {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// A Telegram message.
///
/// Build one with [`Message::new`] or decode it with
/// [`Message::from_wire`]. The `sender` field travels as `from` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: u64,
    pub sender: User,
    pub date: DateTime<Utc>,
    pub chat: Chat,
    pub forward_from: Option<User>,
    pub forward_from_chat: Option<Chat>,
    pub forward_date: Option<DateTime<Utc>>,
    pub reply_to_message: Option<Box<Message>>,
    pub edit_date: Option<DateTime<Utc>>,
    pub text: String,
    pub entities: Vec<MessageEntity>,
    pub media: Option<Media>,
    pub caption: String,
    pub contact: Option<Contact>,
    pub location: Option<Location>,
    pub venue: Option<Venue>,
    pub new_chat_member: Option<User>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: String,
    pub new_chat_photo: Vec<PhotoSize>,
    pub delete_chat_photo: bool,
    pub group_chat_created: bool,
    pub supergroup_chat_created: bool,
    pub migrate_to_chat_id: i64,
    pub migrate_from_chat_id: i64,
    pub channel_chat_created: bool,
    pub pinned_message: Option<Box<Message>>,
    bot: BotHandle,
}

impl Message {
    pub fn new(
        message_id: u64,
        sender: User,
        date: DateTime<Utc>,
        chat: Chat,
        options: MessageOptions,
    ) -> Self {
        Self {
            message_id,
            sender,
            date,
            chat,
            forward_from: options.forward_from,
            forward_from_chat: options.forward_from_chat,
            forward_date: options.forward_date,
            reply_to_message: options.reply_to_message.map(Box::new),
            edit_date: options.edit_date,
            text: options.text,
            entities: options.entities,
            media: options.media.filter(|media| !media.is_empty()),
            caption: options.caption,
            contact: options.contact,
            location: options.location,
            venue: options.venue,
            new_chat_member: options.new_chat_member,
            left_chat_member: options.left_chat_member,
            new_chat_title: options.new_chat_title,
            new_chat_photo: options.new_chat_photo,
            delete_chat_photo: options.delete_chat_photo,
            group_chat_created: options.group_chat_created,
            supergroup_chat_created: options.supergroup_chat_created,
            migrate_to_chat_id: options.migrate_to_chat_id,
            migrate_from_chat_id: options.migrate_from_chat_id,
            channel_chat_created: options.channel_chat_created,
            pinned_message: options.pinned_message.map(Box::new),
            bot: BotHandle::default(),
        }
    }

    /// Attaches `bot` to this message and to the messages nested in it.
    pub fn with_bot(mut self, bot: Arc<dyn BotApi>) -> Self {
        self.attach(&BotHandle::new(Some(bot)));
        self
    }

    fn attach(&mut self, bot: &BotHandle) {
        self.bot = bot.clone();
        if let Some(reply) = self.reply_to_message.as_mut() {
            reply.attach(bot);
        }
        if let Some(pinned) = self.pinned_message.as_mut() {
            pinned.attach(bot);
        }
    }

    pub fn bot(&self) -> Option<&Arc<dyn BotApi>> {
        self.bot.0.as_ref()
    }

    /// Short for `self.chat.id`.
    pub fn chat_id(&self) -> i64 {
        self.chat.id
    }

    pub fn audio(&self) -> Option<&Audio> {
        match &self.media {
            Some(Media::Audio(audio)) => Some(audio),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.media {
            Some(Media::Document(document)) => Some(document),
            _ => None,
        }
    }

    /// Photo sizes, empty unless the message is a photo.
    pub fn photo(&self) -> &[PhotoSize] {
        match &self.media {
            Some(Media::Photo(sizes)) => sizes,
            _ => &[],
        }
    }

    pub fn sticker(&self) -> Option<&Sticker> {
        match &self.media {
            Some(Media::Sticker(sticker)) => Some(sticker),
            _ => None,
        }
    }

    pub fn video(&self) -> Option<&Video> {
        match &self.media {
            Some(Media::Video(video)) => Some(video),
            _ => None,
        }
    }

    pub fn voice(&self) -> Option<&Voice> {
        match &self.media {
            Some(Media::Voice(voice)) => Some(voice),
            _ => None,
        }
    }

    /// True when the text opens with a `bot_command` entity.
    pub fn is_command(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == EntityKind::BotCommand && e.offset == 0)
    }

    /// Text covered by `entity`, which should belong to this message.
    ///
    /// Offsets are resolved in UTF-16 code units. A range past the end of
    /// the text is clamped; a range cutting a surrogate pair in half fails
    /// with [`crate::MessageError::InvalidRange`].
    pub fn parse_entity(&self, entity: &MessageEntity) -> Result<String> {
        slice_utf16(&self.text, entity.offset, entity.length)
    }

    /// Maps each entity whose type is in `kinds` to the text it covers.
    /// `None` selects every type in [`EntityKind::all`].
    ///
    /// Entities are keyed by value, so two identical entities in one message
    /// share a single entry.
    pub fn parse_entities(
        &self,
        kinds: Option<&[EntityKind]>,
    ) -> Result<HashMap<&MessageEntity, String>> {
        let kinds = kinds.unwrap_or(EntityKind::all());
        self.entities
            .iter()
            .filter(|entity| kinds.contains(&entity.kind))
            .map(|entity| Ok((entity, self.parse_entity(entity)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatKind;

    pub(crate) fn sample(text: &str, entities: Vec<MessageEntity>) -> Message {
        Message::new(
            7,
            User::new(1, "Ann"),
            DateTime::from_timestamp(1_467_000_000, 0).unwrap(),
            Chat::new(-100, ChatKind::Group),
            MessageOptions {
                text: text.to_string(),
                entities,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_chat_id_follows_chat() {
        let message = Message::new(
            1,
            User::new(2, "Bo"),
            DateTime::from_timestamp(0, 0).unwrap(),
            Chat::private(42),
            MessageOptions::default(),
        );
        assert_eq!(message.chat_id(), 42);
        assert_eq!(message.text, "");
        assert!(message.entities.is_empty());
        assert!(message.bot().is_none());
    }

    #[test]
    fn test_parse_entity_counts_utf16_units() {
        let message = sample("Hello 😀 world", vec![]);
        assert_eq!(
            message.parse_entity(&MessageEntity::new(EntityKind::Bold, 6, 2)).unwrap(),
            "😀"
        );
        assert_eq!(
            message.parse_entity(&MessageEntity::new(EntityKind::Bold, 0, 5)).unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_parse_entity_rejects_split_pair() {
        let message = sample("Hello 😀 world", vec![]);
        let err = message
            .parse_entity(&MessageEntity::new(EntityKind::Bold, 7, 3))
            .unwrap_err();
        assert!(matches!(err, crate::MessageError::InvalidRange { offset: 7, .. }));
    }

    #[test]
    fn test_parse_entities_without_filter() {
        let message = sample(
            "/start @rustbot 😀 #tag",
            vec![
                MessageEntity::new(EntityKind::BotCommand, 0, 6),
                MessageEntity::new(EntityKind::Mention, 7, 8),
                MessageEntity::new(EntityKind::Hashtag, 19, 4),
            ],
        );
        let parsed = message.parse_entities(None).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[&message.entities[0]], "/start");
        assert_eq!(parsed[&message.entities[1]], "@rustbot");
        assert_eq!(parsed[&message.entities[2]], "#tag");
    }

    #[test]
    fn test_parse_entities_filters_by_kind() {
        let message = sample(
            "see https://example.com now",
            vec![
                MessageEntity::new(EntityKind::Url, 4, 19),
                MessageEntity::new(EntityKind::Bold, 24, 3),
                MessageEntity::new("spoiler", 0, 3),
            ],
        );

        let urls = message.parse_entities(Some(&[EntityKind::Url])).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[&message.entities[0]], "https://example.com");

        let all_known = message.parse_entities(None).unwrap();
        assert_eq!(all_known.len(), 2);

        let unknown = message
            .parse_entities(Some(&[EntityKind::from("spoiler")]))
            .unwrap();
        assert_eq!(unknown[&message.entities[2]], "see");
    }

    #[test]
    fn test_parse_entities_merges_identical_entities() {
        let message = sample(
            "#a #a",
            vec![
                MessageEntity::new(EntityKind::Hashtag, 0, 2),
                MessageEntity::new(EntityKind::Hashtag, 0, 2),
                MessageEntity::new(EntityKind::Hashtag, 3, 2),
            ],
        );
        let parsed = message.parse_entities(None).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[&message.entities[2]], "#a");
    }

    #[test]
    fn test_new_drops_photo_without_sizes() {
        let message = Message::new(
            1,
            User::new(2, "Bo"),
            DateTime::from_timestamp(0, 0).unwrap(),
            Chat::private(42),
            MessageOptions {
                media: Some(Media::Photo(Vec::new())),
                ..Default::default()
            },
        );
        assert!(message.media.is_none());
        assert!(message.photo().is_empty());
    }

    #[test]
    fn test_is_command() {
        let command = sample("/help", vec![MessageEntity::new(EntityKind::BotCommand, 0, 5)]);
        assert!(command.is_command());

        let mid = sample("try /help", vec![MessageEntity::new(EntityKind::BotCommand, 4, 5)]);
        assert!(!mid.is_command());
    }

    #[test]
    fn test_media_accessors() {
        let mut message = sample("", vec![]);
        assert!(message.photo().is_empty());

        message.media = Some(Media::Voice(Voice {
            file_id: "AwAD".to_string(),
            duration: 4,
            mime_type: None,
            file_size: None,
        }));
        assert_eq!(message.voice().map(|v| v.duration), Some(4));
        assert!(message.audio().is_none());
        assert_eq!(message.media.as_ref().map(Media::wire_key), Some("voice"));
    }
}
