use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::message::Message as ApiMessage;
use crate::platform::{describe_entities, InspectorState};

/// Packs summary lines into replies of at most `limit` bytes. A line that
/// alone exceeds the limit is cut on char boundaries.
fn chunk_lines(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        let mut rest = line;
        while !rest.is_empty() {
            if current.len() + rest.len() <= limit {
                current.push_str(rest);
                break;
            }
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                continue;
            }

            let mut cut = limit.min(rest.len());
            while cut > 0 && !rest.is_char_boundary(cut) {
                cut -= 1;
            }
            if cut == 0 {
                cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
            }
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Run the inspector on Telegram's long-polling dispatcher
pub async fn run(token: &str, state: Arc<InspectorState>) -> Result<()> {
    let bot = Bot::new(token);

    info!("Starting Telegram inspector...");

    let allowed_users = state.allowed_user_ids.clone();

    let handler = Update::filter_message()
        .filter_map(move |msg: Message| {
            let user = msg.from.as_ref()?;
            if allowed_users.contains(&user.id.0) {
                Some(msg)
            } else {
                None
            }
        })
        .endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("inspector"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(msg: Message, state: Arc<InspectorState>) -> ResponseResult<()> {
    // Re-read the update through the Bot API wire format
    let raw = match serde_json::to_value(&msg) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to encode update message {}: {}", msg.id.0, e);
            return Ok(());
        }
    };

    let message = match ApiMessage::from_wire(&raw, Some(state.api.clone())) {
        Ok(Some(message)) => message,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!("Skipping message {}: {}", msg.id.0, e);
            return Ok(());
        }
    };

    info!(
        "Message {} from {} ({}) with {} entities",
        message.message_id,
        message.sender.full_name(),
        message.sender.id,
        message.entities.len()
    );

    if message.is_command() && message.text.starts_with("/start") {
        if let Err(e) = message
            .reply_text(
                "Hello! Send me any message and I'll list the entities Telegram found in it.",
            )
            .await
        {
            error!("Failed to send greeting: {:#}", e);
        }
        return Ok(());
    }

    if let Some(target) = state.inspector.forward_chat_id {
        if let Err(e) = message.forward(target, true).await {
            error!("Failed to forward message {}: {:#}", message.message_id, e);
        }
    }

    if !state.inspector.reply_with_entities {
        return Ok(());
    }

    let summary = match describe_entities(&message, &state.inspector.entity_types) {
        Ok(summary) => summary,
        Err(e) => format!("Error: {}", e),
    };

    for chunk in chunk_lines(&summary, 4000) {
        if let Err(e) = message.reply_text(chunk).await {
            error!("Failed to reply in chat {}: {:#}", message.chat_id(), e);
            break;
        }
    }

    Ok(())
}
