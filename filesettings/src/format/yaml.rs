use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::{Format, Table};

/// YAML settings files.
///
/// Decoding goes through serde, so tags never construct arbitrary objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Table for Mapping {
    type Value = Value;

    fn get(&self, key: &str) -> Option<&Value> {
        Mapping::get(self, key)
    }

    fn insert(&mut self, key: &str, value: Value) {
        Mapping::insert(self, Value::String(key.to_string()), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        Mapping::remove(self, key)
    }

    fn len(&self) -> usize {
        Mapping::len(self)
    }
}

impl Format for Yaml {
    const NAME: &'static str = "YAML";
    const EXTENSION: &'static str = "yaml";

    type Document = Mapping;
    type ParseError = serde_yaml::Error;
    type EncodeError = serde_yaml::Error;
    type ValueError = serde_yaml::Error;

    fn decode(bytes: &[u8]) -> Result<Option<Self::Document>, Self::ParseError> {
        match serde_yaml::from_slice(bytes)? {
            Value::Mapping(map) => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    fn encode(document: &Self::Document) -> Result<String, Self::EncodeError> {
        serde_yaml::to_string(document)
    }

    fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Self::ValueError> {
        serde_yaml::to_value(value)
    }

    fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, Self::ValueError> {
        serde_yaml::from_value(value.clone())
    }

    fn is_null(value: &Value) -> bool {
        value.is_null()
    }
}
