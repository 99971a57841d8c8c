use serde::{Deserialize, Serialize};

use crate::types::User;
use crate::wire::{absent_as_none, WireObject};

/// The `type` tag of a [`MessageEntity`].
///
/// Tags this crate does not know about are kept verbatim in `Unknown` so
/// that they survive a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Mention,
    Hashtag,
    BotCommand,
    Url,
    Email,
    Bold,
    Italic,
    Code,
    Pre,
    TextLink,
    TextMention,
    Unknown(String),
}

static KNOWN_KINDS: [EntityKind; 11] = [
    EntityKind::Mention,
    EntityKind::Hashtag,
    EntityKind::BotCommand,
    EntityKind::Url,
    EntityKind::Email,
    EntityKind::Bold,
    EntityKind::Italic,
    EntityKind::Code,
    EntityKind::Pre,
    EntityKind::TextLink,
    EntityKind::TextMention,
];

impl EntityKind {
    /// Every tag known to this crate, in Bot API documentation order.
    pub fn all() -> &'static [EntityKind] {
        &KNOWN_KINDS
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Mention => "mention",
            EntityKind::Hashtag => "hashtag",
            EntityKind::BotCommand => "bot_command",
            EntityKind::Url => "url",
            EntityKind::Email => "email",
            EntityKind::Bold => "bold",
            EntityKind::Italic => "italic",
            EntityKind::Code => "code",
            EntityKind::Pre => "pre",
            EntityKind::TextLink => "text_link",
            EntityKind::TextMention => "text_mention",
            EntityKind::Unknown(tag) => tag,
        }
    }
}

impl From<String> for EntityKind {
    fn from(tag: String) -> Self {
        KNOWN_KINDS
            .iter()
            .find(|kind| kind.as_str() == tag)
            .cloned()
            .unwrap_or(EntityKind::Unknown(tag))
    }
}

impl From<&str> for EntityKind {
    fn from(tag: &str) -> Self {
        EntityKind::from(tag.to_string())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotated span of message text. `offset` and `length` count UTF-16
/// code units, not bytes or chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
    /// Target of a `text_link`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Mentioned user of a `text_mention`.
    #[serde(
        default,
        deserialize_with = "absent_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<User>,
}

impl MessageEntity {
    pub fn new(kind: impl Into<EntityKind>, offset: usize, length: usize) -> Self {
        Self {
            kind: kind.into(),
            offset,
            length,
            url: None,
            user: None,
        }
    }
}

impl WireObject for MessageEntity {}
