use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Format, Table};

/// TOML settings files.
///
/// TOML has no null; assigning `None` to an optional field removes its key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

/// Malformed TOML input.
#[derive(Debug, thiserror::Error)]
pub enum TomlParseError {
    /// The file is not valid UTF-8
    #[error("TOML document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The file is not valid TOML
    #[error(transparent)]
    Syntax(#[from] ::toml::de::Error),
}

/// A value that has no TOML representation, or a TOML value of the wrong shape.
#[derive(Debug, thiserror::Error)]
pub enum TomlValueError {
    /// The value has no TOML representation (null, out-of-range integers)
    #[error(transparent)]
    Serialize(#[from] ::toml::ser::Error),

    /// The TOML value does not match the requested type
    #[error(transparent)]
    Deserialize(#[from] ::toml::de::Error),
}

impl Table for ::toml::Table {
    type Value = ::toml::Value;

    fn get(&self, key: &str) -> Option<&::toml::Value> {
        ::toml::Table::get(self, key)
    }

    fn insert(&mut self, key: &str, value: ::toml::Value) {
        ::toml::Table::insert(self, key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<::toml::Value> {
        ::toml::Table::remove(self, key)
    }

    fn len(&self) -> usize {
        ::toml::Table::len(self)
    }
}

impl Format for Toml {
    const NAME: &'static str = "TOML";
    const EXTENSION: &'static str = "toml";

    type Document = ::toml::Table;
    type ParseError = TomlParseError;
    type EncodeError = ::toml::ser::Error;
    type ValueError = TomlValueError;

    // A TOML document is always a table
    fn decode(bytes: &[u8]) -> Result<Option<Self::Document>, Self::ParseError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Some(::toml::from_str(text)?))
    }

    fn encode(document: &Self::Document) -> Result<String, Self::EncodeError> {
        ::toml::to_string(document)
    }

    fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<::toml::Value, Self::ValueError> {
        Ok(::toml::Value::try_from(value)?)
    }

    fn from_value<T: DeserializeOwned>(value: &::toml::Value) -> Result<T, Self::ValueError> {
        Ok(::toml::Value::try_into(value.clone())?)
    }

    fn is_null(_value: &::toml::Value) -> bool {
        false
    }
}
