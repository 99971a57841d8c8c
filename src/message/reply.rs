use std::sync::Arc;

use tracing::debug;

use super::Message;
use crate::client::{
    BotApi, OutgoingAudio, OutgoingContact, OutgoingDocument, OutgoingLocation, OutgoingPhoto,
    OutgoingSticker, OutgoingText, OutgoingVenue, OutgoingVideo, OutgoingVoice,
};
use crate::error::MessageError;

/// Shortcuts sending into the chat this message came from. Each one hands
/// off to the attached bot and returns whatever the bot returns.
impl Message {
    fn client(&self) -> Result<&Arc<dyn BotApi>, MessageError> {
        self.bot().ok_or(MessageError::Detached)
    }

    /// Short for `bot.send_message(self.chat_id(), ...)`.
    pub async fn reply_text(&self, payload: impl Into<OutgoingText>) -> anyhow::Result<Message> {
        let bot = self.client()?;
        debug!("Replying with text in chat {}", self.chat_id());
        bot.send_message(self.chat_id(), payload.into()).await
    }

    pub async fn reply_photo(&self, payload: impl Into<OutgoingPhoto>) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_photo(self.chat_id(), payload.into()).await
    }

    pub async fn reply_audio(&self, payload: impl Into<OutgoingAudio>) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_audio(self.chat_id(), payload.into()).await
    }

    pub async fn reply_document(
        &self,
        payload: impl Into<OutgoingDocument>,
    ) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_document(self.chat_id(), payload.into()).await
    }

    pub async fn reply_sticker(
        &self,
        payload: impl Into<OutgoingSticker>,
    ) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_sticker(self.chat_id(), payload.into()).await
    }

    pub async fn reply_video(&self, payload: impl Into<OutgoingVideo>) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_video(self.chat_id(), payload.into()).await
    }

    pub async fn reply_voice(&self, payload: impl Into<OutgoingVoice>) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_voice(self.chat_id(), payload.into()).await
    }

    pub async fn reply_location(&self, payload: OutgoingLocation) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_location(self.chat_id(), payload).await
    }

    pub async fn reply_venue(&self, payload: OutgoingVenue) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_venue(self.chat_id(), payload).await
    }

    pub async fn reply_contact(&self, payload: OutgoingContact) -> anyhow::Result<Message> {
        let bot = self.client()?;
        bot.send_contact(self.chat_id(), payload).await
    }

    /// Forwards this message into `chat_id`.
    pub async fn forward(
        &self,
        chat_id: i64,
        disable_notification: bool,
    ) -> anyhow::Result<Message> {
        let bot = self.client()?;
        debug!(
            "Forwarding message {} from chat {} to {}",
            self.message_id,
            self.chat_id(),
            chat_id
        );
        bot.forward_message(chat_id, self.chat_id(), self.message_id, disable_notification)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::DateTime;
    use serde_json::{json, Value};

    use super::*;
    use crate::client::{InputFile, WithSendOptions};
    use crate::message::MessageOptions;
    use crate::types::{Chat, User};

    /// Records every call and answers with a fixed message.
    #[derive(Default)]
    struct RecordingBot {
        calls: Mutex<Vec<(&'static str, i64, Value)>>,
        fail: bool,
    }

    impl RecordingBot {
        fn record(&self, method: &'static str, chat_id: i64, payload: Value) -> Result<Message> {
            self.calls.lock().unwrap().push((method, chat_id, payload));
            if self.fail {
                anyhow::bail!("Bot API error in {} (400): Bad Request", method);
            }
            Ok(Message::new(
                500,
                User::new(99, "bot"),
                DateTime::from_timestamp(1_467_000_500, 0).unwrap(),
                Chat::private(chat_id),
                MessageOptions::default(),
            ))
        }

        fn calls(&self) -> Vec<(&'static str, i64, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BotApi for RecordingBot {
        async fn send_message(&self, chat_id: i64, payload: OutgoingText) -> Result<Message> {
            self.record("sendMessage", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_photo(&self, chat_id: i64, payload: OutgoingPhoto) -> Result<Message> {
            self.record("sendPhoto", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_audio(&self, chat_id: i64, payload: OutgoingAudio) -> Result<Message> {
            self.record("sendAudio", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_document(&self, chat_id: i64, payload: OutgoingDocument) -> Result<Message> {
            self.record("sendDocument", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_sticker(&self, chat_id: i64, payload: OutgoingSticker) -> Result<Message> {
            self.record("sendSticker", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_video(&self, chat_id: i64, payload: OutgoingVideo) -> Result<Message> {
            self.record("sendVideo", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_voice(&self, chat_id: i64, payload: OutgoingVoice) -> Result<Message> {
            self.record("sendVoice", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_location(&self, chat_id: i64, payload: OutgoingLocation) -> Result<Message> {
            self.record("sendLocation", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_venue(&self, chat_id: i64, payload: OutgoingVenue) -> Result<Message> {
            self.record("sendVenue", chat_id, serde_json::to_value(payload)?)
        }

        async fn send_contact(&self, chat_id: i64, payload: OutgoingContact) -> Result<Message> {
            self.record("sendContact", chat_id, serde_json::to_value(payload)?)
        }

        async fn forward_message(
            &self,
            chat_id: i64,
            from_chat_id: i64,
            message_id: u64,
            disable_notification: bool,
        ) -> Result<Message> {
            self.record(
                "forwardMessage",
                chat_id,
                json!({
                    "from_chat_id": from_chat_id,
                    "message_id": message_id,
                    "disable_notification": disable_notification
                }),
            )
        }
    }

    fn received(bot: &Arc<RecordingBot>) -> Message {
        Message::new(
            31,
            User::new(1, "Ann"),
            DateTime::from_timestamp(1_467_000_000, 0).unwrap(),
            Chat::private(4242),
            MessageOptions {
                text: "ping".to_string(),
                ..Default::default()
            },
        )
        .with_bot(bot.clone())
    }

    #[tokio::test]
    async fn test_reply_text_targets_own_chat() {
        let bot = Arc::new(RecordingBot::default());
        let message = received(&bot);

        let sent = message.reply_text("hi").await.unwrap();

        assert_eq!(sent.message_id, 500);
        assert_eq!(sent.chat_id(), 4242);
        assert_eq!(bot.calls(), vec![("sendMessage", 4242, json!({"text": "hi"}))]);
    }

    #[tokio::test]
    async fn test_forward_passes_origin() {
        let bot = Arc::new(RecordingBot::default());
        let message = received(&bot);

        message.forward(42, false).await.unwrap();

        assert_eq!(
            bot.calls(),
            vec![(
                "forwardMessage",
                42,
                json!({"from_chat_id": 4242, "message_id": 31, "disable_notification": false})
            )]
        );
    }

    #[tokio::test]
    async fn test_every_shortcut_delegates() {
        let bot = Arc::new(RecordingBot::default());
        let message = received(&bot);

        message
            .reply_photo(InputFile::file_id("photo-id"))
            .await
            .unwrap();
        message
            .reply_audio(InputFile::url("https://example.com/a.mp3"))
            .await
            .unwrap();
        message
            .reply_document(OutgoingDocument::new(InputFile::file_id("doc")).silent())
            .await
            .unwrap();
        message
            .reply_sticker(InputFile::file_id("sticker"))
            .await
            .unwrap();
        message.reply_video(InputFile::file_id("video")).await.unwrap();
        message.reply_voice(InputFile::file_id("voice")).await.unwrap();
        message
            .reply_location(OutgoingLocation::new(52.5, 13.4))
            .await
            .unwrap();
        message
            .reply_venue(OutgoingVenue::new(52.5, 13.4, "Cafe", "Main St 1"))
            .await
            .unwrap();
        message
            .reply_contact(OutgoingContact::new("+100", "Cy").in_reply_to(31))
            .await
            .unwrap();

        let calls = bot.calls();
        let methods: Vec<&str> = calls.iter().map(|(method, _, _)| *method).collect();
        assert_eq!(
            methods,
            vec![
                "sendPhoto",
                "sendAudio",
                "sendDocument",
                "sendSticker",
                "sendVideo",
                "sendVoice",
                "sendLocation",
                "sendVenue",
                "sendContact"
            ]
        );
        assert!(calls.iter().all(|(_, chat_id, _)| *chat_id == 4242));
        assert_eq!(calls[0].2, json!({"photo": "photo-id"}));
        assert_eq!(calls[2].2["disable_notification"], true);
        assert_eq!(calls[7].2["title"], "Cafe");
        assert_eq!(calls[8].2["reply_to_message_id"], 31);
    }

    #[tokio::test]
    async fn test_client_error_is_returned_unchanged() {
        let bot = Arc::new(RecordingBot {
            fail: true,
            ..Default::default()
        });
        let message = received(&bot);

        let err = message.reply_text("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Bot API error in sendMessage (400): Bad Request");
    }

    #[tokio::test]
    async fn test_detached_message_cannot_reply() {
        let message = Message::new(
            1,
            User::new(1, "Ann"),
            DateTime::from_timestamp(0, 0).unwrap(),
            Chat::private(1),
            MessageOptions::default(),
        );
        let err = message.reply_text("hi").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<MessageError>(),
            Some(&MessageError::Detached)
        );
    }

    #[tokio::test]
    async fn test_decoded_replies_share_the_bot() {
        let bot = Arc::new(RecordingBot::default());
        let message = Message::from_wire(
            &json!({
                "message_id": 2,
                "from": {"id": 1, "first_name": "Ann"},
                "date": 1467000000,
                "chat": {"id": 8, "type": "private"},
                "reply_to_message": {
                    "message_id": 1,
                    "from": {"id": 1, "first_name": "Ann"},
                    "date": 1466999999,
                    "chat": {"id": 8, "type": "private"}
                }
            }),
            Some(bot.clone() as Arc<dyn BotApi>),
        )
        .unwrap()
        .unwrap();

        let original = message.reply_to_message.as_deref().unwrap();
        original.forward(9, true).await.unwrap();
        assert_eq!(bot.calls()[0].2["message_id"], 1);
        assert_eq!(bot.calls()[0].2["from_chat_id"], 8);
    }
}
