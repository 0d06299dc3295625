use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;
use serde_json::Value;

// -----------------------------------------------------------------------------
// Payload

/// The data exchanged with conversion functions.
///
/// Deserialization functions receive a payload and serialization functions
/// return one. The wire encoding itself belongs to the pipeline; a payload is
/// what is left once the body has been read, or what has to be written.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use vc_convert::{Payload, PayloadKind};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct User {
///     id: u32,
/// }
///
/// let payload = Payload::json(&User { id: 7 }).unwrap();
/// assert_eq!(payload.kind(), PayloadKind::Json);
///
/// let user: User = payload.deserialize_json().unwrap();
/// assert_eq!(user, User { id: 7 });
///
/// // Raw bodies are parsed on demand.
/// let raw = Payload::from(r#"{"id":8}"#.to_string());
/// assert_eq!(raw.deserialize_json::<User>().unwrap(), User { id: 8 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A decoded JSON document.
    Json(Value),
    /// A text body.
    Text(String),
    /// A binary body.
    Bytes(Vec<u8>),
}

/// The kind of a [`Payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Json,
    Text,
    Bytes,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Bytes => "bytes",
        })
    }
}

impl Payload {
    /// Serializes `value` into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Returns the kind of the payload.
    #[inline]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Json(_) => PayloadKind::Json,
            Self::Text(_) => PayloadKind::Text,
            Self::Bytes(_) => PayloadKind::Bytes,
        }
    }

    /// Returns the JSON document, if this is a JSON payload.
    #[inline]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text, if this is a text payload.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the bytes of a text or binary payload.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(text) => Some(text.as_bytes()),
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) => None,
        }
    }

    /// Converts the payload into a JSON document.
    ///
    /// Text and binary payloads are parsed.
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Text(text) => serde_json::from_str(&text),
            Self::Bytes(bytes) => serde_json::from_slice(&bytes),
        }
    }

    /// Deserializes the payload as JSON into `T`.
    pub fn deserialize_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Json(value) => <T as serde_core::Deserialize>::deserialize(value),
            Self::Text(text) => serde_json::from_str(text),
            Self::Bytes(bytes) => serde_json::from_slice(bytes),
        }
    }
}

impl From<Value> for Payload {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Payload {
    #[inline]
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
