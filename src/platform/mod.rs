pub mod telegram;

use std::sync::Arc;

use crate::client::BotApi;
use crate::config::InspectorConfig;
use crate::error::Result;
use crate::message::Message;
use crate::types::EntityKind;

/// Shared state of the inspector bot
pub struct InspectorState {
    pub api: Arc<dyn BotApi>,
    pub allowed_user_ids: Vec<u64>,
    pub inspector: InspectorConfig,
}

/// Lists the entities of `message` whose type is in `kinds`, in text order.
pub fn describe_entities(message: &Message, kinds: &[EntityKind]) -> Result<String> {
    let mut entries: Vec<_> = message.parse_entities(Some(kinds))?.into_iter().collect();
    if entries.is_empty() {
        return Ok("No entities found.".to_string());
    }
    entries.sort_by_key(|(entity, _)| (entity.offset, entity.length));

    let mut out = String::from("Entities:\n\n");
    for (entity, text) in entries {
        out.push_str(&format!(
            "  - {} [{}+{}]: {}\n",
            entity.kind, entity.offset, entity.length, text
        ));
    }
    Ok(out)
}
