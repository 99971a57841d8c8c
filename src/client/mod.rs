//! The bot client a [`Message`] delegates its reply shortcuts to.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::message::Message;

pub use http::HttpBot;

/// Bot API methods used by the message shortcuts.
///
/// Every `send_*` receives the destination chat id and a payload carrying
/// the rest of the method's parameters. Implementations return the message
/// the API sent back.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(&self, chat_id: i64, payload: OutgoingText) -> Result<Message>;

    async fn send_photo(&self, chat_id: i64, payload: OutgoingPhoto) -> Result<Message>;

    async fn send_audio(&self, chat_id: i64, payload: OutgoingAudio) -> Result<Message>;

    async fn send_document(&self, chat_id: i64, payload: OutgoingDocument) -> Result<Message>;

    async fn send_sticker(&self, chat_id: i64, payload: OutgoingSticker) -> Result<Message>;

    async fn send_video(&self, chat_id: i64, payload: OutgoingVideo) -> Result<Message>;

    async fn send_voice(&self, chat_id: i64, payload: OutgoingVoice) -> Result<Message>;

    async fn send_location(&self, chat_id: i64, payload: OutgoingLocation) -> Result<Message>;

    async fn send_venue(&self, chat_id: i64, payload: OutgoingVenue) -> Result<Message>;

    async fn send_contact(&self, chat_id: i64, payload: OutgoingContact) -> Result<Message>;

    async fn forward_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: u64,
        disable_notification: bool,
    ) -> Result<Message>;
}

/// Parameters shared by every send method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendOptions {
    #[serde(skip_serializing_if = "crate::wire::is_false")]
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<u64>,
}

/// A file already known to Telegram, or a URL it should fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InputFile {
    FileId(String),
    Url(String),
}

impl InputFile {
    pub fn file_id(id: impl Into<String>) -> Self {
        InputFile::FileId(id.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        InputFile::Url(url.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "crate::wire::is_false")]
    pub disable_web_page_preview: bool,
    #[serde(flatten)]
    pub options: SendOptions,
}

impl OutgoingText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: false,
            options: SendOptions::default(),
        }
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }
}

impl From<&str> for OutgoingText {
    fn from(text: &str) -> Self {
        OutgoingText::new(text)
    }
}

impl From<String> for OutgoingText {
    fn from(text: String) -> Self {
        OutgoingText::new(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingPhoto {
    pub photo: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingAudio {
    pub audio: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingDocument {
    pub document: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingSticker {
    pub sticker: InputFile,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingVideo {
    pub video: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingVoice {
    pub voice: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(flatten)]
    pub options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub options: SendOptions,
}

impl OutgoingLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            options: SendOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingVenue {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foursquare_id: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

impl OutgoingVenue {
    pub fn new(
        latitude: f64,
        longitude: f64,
        title: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            title: title.into(),
            address: address.into(),
            foursquare_id: None,
            options: SendOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingContact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub options: SendOptions,
}

impl OutgoingContact {
    pub fn new(phone_number: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            first_name: first_name.into(),
            last_name: None,
            options: SendOptions::default(),
        }
    }
}

// File-based payloads are built straight from the file to send.
macro_rules! file_payload {
    ($payload:ident { $file:ident $(, $extra:ident)* }) => {
        impl $payload {
            pub fn new($file: InputFile) -> Self {
                Self {
                    $file,
                    $($extra: None,)*
                    options: SendOptions::default(),
                }
            }
        }

        impl From<InputFile> for $payload {
            fn from($file: InputFile) -> Self {
                $payload::new($file)
            }
        }
    };
}

file_payload!(OutgoingPhoto { photo, caption });
file_payload!(OutgoingAudio { audio, duration, performer, title });
file_payload!(OutgoingDocument { document, caption });
file_payload!(OutgoingSticker { sticker });
file_payload!(OutgoingVideo { video, duration, width, height, caption });
file_payload!(OutgoingVoice { voice, duration });

/// Builder-style setter for the shared [`SendOptions`] of any payload.
pub trait WithSendOptions: Sized {
    fn options_mut(&mut self) -> &mut SendOptions;

    fn silent(mut self) -> Self {
        self.options_mut().disable_notification = true;
        self
    }

    fn in_reply_to(mut self, message_id: u64) -> Self {
        self.options_mut().reply_to_message_id = Some(message_id);
        self
    }
}

macro_rules! with_send_options {
    ($($payload:ty),* $(,)?) => {
        $(
            impl WithSendOptions for $payload {
                fn options_mut(&mut self) -> &mut SendOptions {
                    &mut self.options
                }
            }
        )*
    };
}

with_send_options!(
    OutgoingText,
    OutgoingPhoto,
    OutgoingAudio,
    OutgoingDocument,
    OutgoingSticker,
    OutgoingVideo,
    OutgoingVoice,
    OutgoingLocation,
    OutgoingVenue,
    OutgoingContact,
);
