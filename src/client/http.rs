use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{
    BotApi, OutgoingAudio, OutgoingContact, OutgoingDocument, OutgoingLocation, OutgoingPhoto,
    OutgoingSticker, OutgoingText, OutgoingVenue, OutgoingVideo, OutgoingVoice,
};
use crate::message::Message;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// The `{ok, result}` envelope every Bot API response comes in.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    result: Option<Value>,
    description: Option<String>,
    error_code: Option<i32>,
}

/// [`BotApi`] over plain HTTPS with JSON bodies.
#[derive(Clone)]
pub struct HttpBot {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBot {
    pub fn new(token: &str) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    pub fn with_api_url(api_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.endpoint, method)
    }

    async fn call(&self, method: &str, body: &Value) -> Result<Message> {
        debug!("Calling Bot API method {}", method);

        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", method))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response", method))?;
        self.read_response(method, status.as_u16(), &text)
    }

    /// Unwraps the response envelope into the message it carries.
    fn read_response(&self, method: &str, status: u16, text: &str) -> Result<Message> {
        let envelope: ApiResponse = serde_json::from_str(text)
            .with_context(|| format!("Bot API error ({}): {}", status, text))?;

        if !envelope.ok {
            anyhow::bail!(
                "Bot API error in {} ({}): {}",
                method,
                envelope.error_code.unwrap_or(i32::from(status)),
                envelope.description.unwrap_or_default()
            );
        }

        let result = envelope
            .result
            .with_context(|| format!("Bot API returned no result for {}", method))?;
        let bot: Arc<dyn BotApi> = Arc::new(self.clone());
        Message::from_wire(&result, Some(bot))?
            .with_context(|| format!("Bot API returned an empty message for {}", method))
    }

    async fn send<P: Serialize>(&self, method: &str, chat_id: i64, payload: &P) -> Result<Message> {
        let body = request_body(chat_id, payload)?;
        self.call(method, &body).await
    }
}

/// Payload fields plus the destination chat.
pub(crate) fn request_body<P: Serialize>(chat_id: i64, payload: &P) -> Result<Value> {
    let mut body = serde_json::to_value(payload).context("Failed to encode request body")?;
    match body.as_object_mut() {
        Some(map) => {
            map.insert("chat_id".to_string(), json!(chat_id));
        }
        None => anyhow::bail!("Request payload must encode to a JSON object"),
    }
    Ok(body)
}

#[async_trait]
impl BotApi for HttpBot {
    async fn send_message(&self, chat_id: i64, payload: OutgoingText) -> Result<Message> {
        self.send("sendMessage", chat_id, &payload).await
    }

    async fn send_photo(&self, chat_id: i64, payload: OutgoingPhoto) -> Result<Message> {
        self.send("sendPhoto", chat_id, &payload).await
    }

    async fn send_audio(&self, chat_id: i64, payload: OutgoingAudio) -> Result<Message> {
        self.send("sendAudio", chat_id, &payload).await
    }

    async fn send_document(&self, chat_id: i64, payload: OutgoingDocument) -> Result<Message> {
        self.send("sendDocument", chat_id, &payload).await
    }

    async fn send_sticker(&self, chat_id: i64, payload: OutgoingSticker) -> Result<Message> {
        self.send("sendSticker", chat_id, &payload).await
    }

    async fn send_video(&self, chat_id: i64, payload: OutgoingVideo) -> Result<Message> {
        self.send("sendVideo", chat_id, &payload).await
    }

    async fn send_voice(&self, chat_id: i64, payload: OutgoingVoice) -> Result<Message> {
        self.send("sendVoice", chat_id, &payload).await
    }

    async fn send_location(&self, chat_id: i64, payload: OutgoingLocation) -> Result<Message> {
        self.send("sendLocation", chat_id, &payload).await
    }

    async fn send_venue(&self, chat_id: i64, payload: OutgoingVenue) -> Result<Message> {
        self.send("sendVenue", chat_id, &payload).await
    }

    async fn send_contact(&self, chat_id: i64, payload: OutgoingContact) -> Result<Message> {
        self.send("sendContact", chat_id, &payload).await
    }

    async fn forward_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: u64,
        disable_notification: bool,
    ) -> Result<Message> {
        let body = json!({
            "chat_id": chat_id,
            "from_chat_id": from_chat_id,
            "message_id": message_id,
            "disable_notification": disable_notification,
        });
        self.call("forwardMessage", &body).await
    }
}
