//! Declared settings fields
//!
//! A [`FieldRegistry`] is the explicit schema of a settings type: the name,
//! declared type and default of every field. `#[derive(Settings)]` produces
//! the declarations; a hand-written [`Settings`](crate::Settings) impl can
//! build them with [`FieldDecl`] directly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SettingsError;
use crate::format::{self, Format, Value};

type Validator<F> = fn(&Value<F>) -> Result<(), <F as Format>::ValueError>;

fn validate<F: Format, T: DeserializeOwned>(value: &Value<F>) -> Result<(), F::ValueError> {
    F::from_value::<T>(value).map(drop)
}

/// Declaration of a single settings field stored in format `F`.
pub struct FieldDecl<F: Format> {
    name: String,
    type_name: &'static str,
    optional: bool,
    default: Option<Value<F>>,
    validator: Validator<F>,
}

impl<F: Format> FieldDecl<F> {
    /// Declare a field holding a `T`.
    ///
    /// A field without a default reads as `None` until it is assigned.
    pub fn new<T: DeserializeOwned>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: std::any::type_name::<T>(),
            optional: false,
            default: None,
            validator: validate::<F, T>,
        }
    }

    /// Declare an `Option<T>` field: assigning `None` removes the key.
    pub fn optional<T: DeserializeOwned>(name: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::new::<T>(name)
        }
    }

    /// Attach a default value, written to the file the first time the field
    /// is read without a valid stored value.
    ///
    /// A value that serializes to null (`None`) leaves the field without a
    /// default.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Default`] if `value` cannot be represented in the
    /// format, or does not match the declared type.
    pub fn default_value<T: Serialize>(mut self, value: T) -> Result<Self, SettingsError> {
        if format::serializes_to_null(&value) {
            self.default = None;
            return Ok(self);
        }

        let value = F::to_value(&value).map_err(|e| SettingsError::Default {
            name: self.name.clone(),
            message: e.to_string(),
        })?;
        (self.validator)(&value).map_err(|e| SettingsError::Default {
            name: self.name.clone(),
            message: format!("not a valid {}: {e}", self.type_name),
        })?;
        self.default = Some(value);
        Ok(self)
    }

    /// Field name, used as the document key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the declared type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the field is declared as `Option<T>`
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Declared default, if any
    pub fn default(&self) -> Option<&Value<F>> {
        self.default.as_ref()
    }

    /// Check a stored or assigned value against the declared type.
    pub fn check(&self, value: &Value<F>) -> Result<(), SettingsError> {
        (self.validator)(value).map_err(|e| SettingsError::type_check(&self.name, self.type_name, e))
    }
}

impl<F: Format> Clone for FieldDecl<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_name: self.type_name,
            optional: self.optional,
            default: self.default.clone(),
            validator: self.validator,
        }
    }
}

impl<F: Format> std::fmt::Debug for FieldDecl<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("optional", &self.optional)
            .field("default", &self.default)
            .finish()
    }
}

/// The validated set of fields of one settings type.
pub struct FieldRegistry<F: Format> {
    fields: Vec<FieldDecl<F>>,
}

impl<F: Format> FieldRegistry<F> {
    /// Build a registry for the settings type `settings`.
    ///
    /// # Errors
    ///
    /// - No fields are declared
    /// - A field name starts with `_`
    /// - A field name is declared twice
    pub fn new(settings: &str, fields: Vec<FieldDecl<F>>) -> Result<Self, SettingsError> {
        if fields.is_empty() {
            return Err(SettingsError::NoFields {
                settings: settings.to_string(),
            });
        }

        for (i, field) in fields.iter().enumerate() {
            if field.name.starts_with('_') {
                return Err(SettingsError::PrivateField {
                    name: field.name.clone(),
                });
            }
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SettingsError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        Ok(Self { fields })
    }

    /// Look up a declared field.
    ///
    /// Names starting with `_` are never declared fields.
    pub fn get(&self, name: &str) -> Option<&FieldDecl<F>> {
        if name.starts_with('_') {
            return None;
        }
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a declared field
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declared fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDecl<F>> {
        self.fields.iter()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false` for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<F: Format> Clone for FieldRegistry<F> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<F: Format> std::fmt::Debug for FieldRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Json, Toml};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Window {
        width: u32,
        height: u32,
    }

    fn registry(fields: Vec<FieldDecl<Json>>) -> Result<FieldRegistry<Json>, SettingsError> {
        FieldRegistry::new("TestSettings", fields)
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let result = registry(vec![]);
        assert!(matches!(result, Err(SettingsError::NoFields { settings }) if settings == "TestSettings"));
    }

    #[test]
    fn test_underscore_field_is_rejected() {
        let result = registry(vec![
            FieldDecl::new::<i64>("_key").default_value(1).unwrap(),
            FieldDecl::new::<String>("key2").default_value("default").unwrap(),
        ]);
        assert!(matches!(result, Err(SettingsError::PrivateField { name }) if name == "_key"));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result = registry(vec![
            FieldDecl::new::<String>("key1"),
            FieldDecl::new::<i64>("key1"),
        ]);
        assert!(matches!(result, Err(SettingsError::DuplicateField { name }) if name == "key1"));
    }

    #[test]
    fn test_lookup() {
        let reg = registry(vec![
            FieldDecl::new::<String>("key1").default_value("default1").unwrap(),
            FieldDecl::optional::<i64>("key2"),
        ])
        .unwrap();

        assert_eq!(reg.len(), 2);
        assert!(reg.contains("key1"));
        assert!(!reg.contains("key3"));
        assert_eq!(reg.get("key1").unwrap().default(), Some(&json!("default1")));
        assert!(reg.get("key2").unwrap().is_optional());
        assert_eq!(reg.get("key2").unwrap().default(), None);
        assert_eq!(
            reg.iter().map(FieldDecl::name).collect::<Vec<_>>(),
            vec!["key1", "key2"]
        );
    }

    #[test]
    fn test_null_default_means_no_default() {
        let field = FieldDecl::<Json>::new::<Option<i64>>("x")
            .default_value(None::<i64>)
            .unwrap();
        assert_eq!(field.default(), None);

        let field = FieldDecl::<Toml>::new::<Option<i64>>("x")
            .default_value(None::<i64>)
            .unwrap();
        assert_eq!(field.default(), None);

        let field = FieldDecl::<Toml>::new::<Option<i64>>("x")
            .default_value(Some(3))
            .unwrap();
        assert_eq!(field.default(), Some(&::toml::Value::Integer(3)));
    }

    #[test]
    fn test_default_must_match_declared_type() {
        let result = FieldDecl::<Json>::new::<i64>("n").default_value("s");
        assert!(matches!(result, Err(SettingsError::Default { name, .. }) if name == "n"));

        let result = FieldDecl::<Toml>::new::<u16>("port").default_value(70000);
        assert!(matches!(result, Err(SettingsError::Default { .. })));

        assert!(FieldDecl::<Json>::new::<f64>("ratio").default_value(1).is_ok());
    }

    #[test]
    fn test_default_without_format_representation() {
        let result = FieldDecl::<Toml>::new::<u64>("big").default_value(u64::MAX);
        assert!(matches!(result, Err(SettingsError::Default { name, .. }) if name == "big"));
    }

    #[test]
    fn test_check_scalar_types() {
        let field = FieldDecl::<Json>::new::<String>("key1");
        assert!(field.check(&json!("value")).is_ok());
        assert!(matches!(field.check(&json!(true)), Err(SettingsError::TypeCheck { .. })));
        assert!(field.check(&json!(1)).is_err());

        let port = FieldDecl::<Json>::new::<u16>("port");
        assert!(port.check(&json!(8080)).is_ok());
        assert!(port.check(&json!(70000)).is_err());
        assert!(port.check(&json!(-1)).is_err());

        let ratio = FieldDecl::<Json>::new::<f64>("ratio");
        assert!(ratio.check(&json!(1)).is_ok());
        assert!(ratio.check(&json!(0.5)).is_ok());
    }

    #[test]
    fn test_check_collection_and_struct_types() {
        let tags = FieldDecl::<Json>::new::<Vec<String>>("tags");
        assert!(tags.check(&json!(["a", "b"])).is_ok());
        assert!(tags.check(&json!(["a", 1])).is_err());

        let window = FieldDecl::<Json>::new::<Window>("window");
        assert!(window.check(&json!({"width": 800, "height": 600})).is_ok());
        assert!(window.check(&json!({"width": 800})).is_err());
    }

    #[test]
    fn test_check_native_toml_values() {
        let created = FieldDecl::<Toml>::new::<::toml::value::Datetime>("created");
        let value = ::toml::Value::Datetime("1979-05-27T07:32:00Z".parse().unwrap());
        assert!(created.check(&value).is_ok());
        assert!(created.check(&::toml::Value::Integer(1)).is_err());
    }
}
