use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::client::http::DEFAULT_API_URL;
use crate::types::EntityKind;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub inspector: InspectorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub allowed_user_ids: Vec<u64>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InspectorConfig {
    /// Entity types listed in replies. Unrecognized names are kept and
    /// matched verbatim.
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<EntityKind>,
    /// Every inspected message is also forwarded here when set.
    #[serde(default)]
    pub forward_chat_id: Option<i64>,
    #[serde(default = "default_true")]
    pub reply_with_entities: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
            forward_chat_id: None,
            reply_with_entities: true,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_entity_types() -> Vec<EntityKind> {
    EntityKind::all().to_vec()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid TOML")?;

        if config.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("telegram.bot_token must not be empty");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            allowed_user_ids = [111, 222]
            "#,
        )
        .unwrap();

        assert_eq!(config.telegram.allowed_user_ids, vec![111, 222]);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.inspector.entity_types.len(), 11);
        assert!(config.inspector.reply_with_entities);
        assert!(config.inspector.forward_chat_id.is_none());
    }

    #[test]
    fn test_inspector_section() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            allowed_user_ids = [1]
            api_url = "http://localhost:8081"

            [inspector]
            entity_types = ["url", "hashtag", "spoiler"]
            forward_chat_id = -1001234
            reply_with_entities = false
            "#,
        )
        .unwrap();

        assert_eq!(config.telegram.api_url, "http://localhost:8081");
        assert_eq!(
            config.inspector.entity_types,
            vec![
                EntityKind::Url,
                EntityKind::Hashtag,
                EntityKind::Unknown("spoiler".to_string())
            ]
        );
        assert_eq!(config.inspector.forward_chat_id, Some(-1001234));
        assert!(!config.inspector.reply_with_entities);
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = Config::parse(
            r#"
            [telegram]
            bot_token = "  "
            allowed_user_ids = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_missing_telegram_section_is_rejected() {
        assert!(Config::parse("[inspector]\nreply_with_entities = true\n").is_err());
    }
}
