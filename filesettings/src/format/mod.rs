//! Format adapters
//!
//! Each adapter is a decode/encode pair for one file format, working on that
//! format's own document type. Keys the settings type does not declare are
//! carried through a read-modify-write cycle as native values, so a TOML
//! datetime stays a datetime and a YAML `.inf` stays infinite.

mod json;
mod toml;
mod yaml;

pub use self::json::Json;
pub use self::toml::{Toml, TomlParseError, TomlValueError};
pub use self::yaml::Yaml;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Value type of format `F` documents
pub type Value<F> = <<F as Format>::Document as Table>::Value;

/// A settings document: string keys mapped to format-native values.
///
/// Implemented for `serde_json::Map`, `toml::Table` and `serde_yaml::Mapping`.
pub trait Table: Default + Clone + std::fmt::Debug {
    /// Native value type of the format
    type Value: Clone + std::fmt::Debug + PartialEq;

    /// Value stored under `key`
    fn get(&self, key: &str) -> Option<&Self::Value>;

    /// Store `value` under `key`, replacing any previous value
    fn insert(&mut self, key: &str, value: Self::Value);

    /// Remove `key`, returning its value if it was present
    fn remove(&mut self, key: &str) -> Option<Self::Value>;

    /// Number of keys
    fn len(&self) -> usize;

    /// Whether the document has no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode/encode pair for a settings file format.
///
/// Adapters perform no validation beyond their parser: whatever `decode`
/// rejects with [`Format::ParseError`] is treated as a corrupt file.
pub trait Format {
    /// Human readable format name (used in error messages and logs)
    const NAME: &'static str;

    /// File extension used for the default file name (`settings.<ext>`)
    const EXTENSION: &'static str;

    /// Decoded top-level mapping
    type Document: Table;

    /// Error returned by [`Format::decode`] on malformed input
    type ParseError: std::error::Error + Send + Sync + 'static;

    /// Error returned by [`Format::encode`] when a document cannot be rendered
    type EncodeError: std::error::Error + Send + Sync + 'static;

    /// Error converting between Rust values and document values
    type ValueError: std::error::Error + Send + Sync + 'static;

    /// Decode raw file content.
    ///
    /// Returns `Ok(None)` when the content parses but its top level is not a
    /// mapping.
    fn decode(bytes: &[u8]) -> Result<Option<Self::Document>, Self::ParseError>;

    /// Encode a document as file content.
    fn encode(document: &Self::Document) -> Result<String, Self::EncodeError>;

    /// Convert a Rust value into a document value.
    fn to_value<T: Serialize + ?Sized>(
        value: &T,
    ) -> Result<<Self::Document as Table>::Value, Self::ValueError>;

    /// Deserialize a document value as `T`.
    fn from_value<T: DeserializeOwned>(
        value: &<Self::Document as Table>::Value,
    ) -> Result<T, Self::ValueError>;

    /// Whether `value` is the format's null
    fn is_null(value: &<Self::Document as Table>::Value) -> bool;
}

/// Whether `value` serializes to null (`None`, `()`).
///
/// TOML has no null, so this is decided independently of any format.
pub(crate) fn serializes_to_null<T: Serialize + ?Sized>(value: &T) -> bool {
    matches!(serde_json::to_value(value), Ok(serde_json::Value::Null))
}
