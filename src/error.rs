use thiserror::Error;

/// Errors raised while decoding, encoding or slicing a [`crate::Message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("Missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("Entity range (offset {offset}, length {length}) splits a surrogate pair in text of {text_len} UTF-16 units")]
    InvalidRange {
        offset: usize,
        length: usize,
        text_len: usize,
    },

    #[error("Failed to coerce wire value: {0}")]
    TypeCoercion(String),

    #[error("Message carries both `{first}` and `{second}` media payloads")]
    ConflictingMedia {
        first: &'static str,
        second: &'static str,
    },

    #[error("Nested messages exceed the depth limit of {limit}")]
    NestingTooDeep { limit: usize },

    #[error("Message has no bot attached")]
    Detached,
}

impl From<serde_json::Error> for MessageError {
    fn from(error: serde_json::Error) -> Self {
        MessageError::TypeCoercion(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
