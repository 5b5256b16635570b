use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::{Format, Table};

/// JSON settings files, written with 4-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Table for Map<String, Value> {
    type Value = Value;

    fn get(&self, key: &str) -> Option<&Value> {
        Map::get(self, key)
    }

    fn insert(&mut self, key: &str, value: Value) {
        Map::insert(self, key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        Map::remove(self, key)
    }

    fn len(&self) -> usize {
        Map::len(self)
    }
}

impl Format for Json {
    const NAME: &'static str = "JSON";
    const EXTENSION: &'static str = "json";

    type Document = Map<String, Value>;
    type ParseError = serde_json::Error;
    type EncodeError = serde_json::Error;
    type ValueError = serde_json::Error;

    fn decode(bytes: &[u8]) -> Result<Option<Self::Document>, Self::ParseError> {
        match serde_json::from_slice(bytes)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    fn encode(document: &Self::Document) -> Result<String, Self::EncodeError> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Self::ValueError> {
        serde_json::to_value(value)
    }

    fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, Self::ValueError> {
        T::deserialize(value)
    }

    fn is_null(value: &Value) -> bool {
        value.is_null()
    }
}
