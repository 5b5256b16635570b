//! Field-level access to a settings file

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SettingsError;
use crate::format::{self, Format, Table, Value};
use crate::registry::{FieldDecl, FieldRegistry};
use crate::store::FileStore;
use crate::Settings;

/// A handle on the settings file of `S`.
///
/// Every declared-field access is a full read of the file (or of the cached
/// document when `always_read` is off), and assignments are read-modify-write
/// cycles. Names that are not declared fields, including any starting with
/// `_`, are rejected with [`SettingsError::UnknownField`] before touching the
/// file.
pub struct SettingsFile<S: Settings> {
    registry: FieldRegistry<S::Format>,
    store: FileStore<S::Format>,
    _settings: PhantomData<fn() -> S>,
}

impl<S: Settings> SettingsFile<S> {
    /// Open the settings file configured for `S`.
    ///
    /// Uses [`Config::file`](crate::Config::file) when set, otherwise
    /// `settings.<ext>` in the current directory.
    ///
    /// # Errors
    ///
    /// - The field declarations of `S` are invalid (see [`FieldRegistry::new`])
    /// - The current directory cannot be determined
    pub fn open() -> Result<Self, SettingsError> {
        let path = match S::config().file {
            Some(path) => path,
            None => FileStore::<S::Format>::default_path()?,
        };
        Self::with_path(path)
    }

    /// Open the settings file of `S` at `path`, ignoring the configured one.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let registry = FieldRegistry::new(std::any::type_name::<S>(), S::fields()?)?;
        let store = FileStore::new(path).always_read(S::config().always_read);
        Ok(Self {
            registry,
            store,
            _settings: PhantomData,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Declared fields
    pub fn fields(&self) -> &FieldRegistry<S::Format> {
        &self.registry
    }

    /// The whole current document, including keys that are not declared fields.
    pub fn document(&self) -> Result<<S::Format as Format>::Document, SettingsError> {
        self.store.read()
    }

    /// Drop the in-memory document when `always_read` is off.
    pub fn reload(&self) {
        self.store.invalidate();
    }

    /// Read a declared field.
    ///
    /// A stored value that does not match the declared type is ignored. When
    /// the value is missing or ignored and the field has a default, the
    /// default is written to the file and returned.
    pub fn get_value(&self, name: &str) -> Result<Option<Value<S::Format>>, SettingsError> {
        let field = self.field(name)?;
        let doc = self.store.read()?;

        if let Some(value) = doc.get(name) {
            match field.check(value) {
                Ok(()) => return Ok(Some(value.clone())),
                Err(e) => {
                    tracing::debug!(
                        path = %self.path().display(),
                        field = name,
                        error = %e,
                        "Ignoring stored settings value"
                    );
                }
            }
        }

        match field.default() {
            Some(default) => {
                tracing::debug!(
                    path = %self.path().display(),
                    field = name,
                    "Writing default settings value"
                );
                self.store_value(name, default.clone())?;
                Ok(Some(default.clone()))
            }
            None => Ok(None),
        }
    }

    /// Assign a declared field.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownField`] if `name` is not a declared field
    /// - [`SettingsError::TypeCheck`] if `value` does not match the declared
    ///   type; the file is left untouched
    pub fn set_value(&self, name: &str, value: Value<S::Format>) -> Result<(), SettingsError> {
        let field = self.field(name)?;
        if S::Format::is_null(&value) && field.is_optional() {
            return self.remove_value(name);
        }
        field.check(&value)?;
        self.store_value(name, value)
    }

    /// Read a declared field as `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SettingsError> {
        self.get_value(name)?
            .map(|value| {
                S::Format::from_value::<T>(&value)
                    .map_err(|e| SettingsError::type_check(name, std::any::type_name::<T>(), e))
            })
            .transpose()
    }

    /// Read a declared field that has a default.
    ///
    /// # Errors
    ///
    /// [`SettingsError::MissingDefault`] if the field has neither a valid
    /// stored value nor a default.
    pub fn get_or_default<T: DeserializeOwned>(&self, name: &str) -> Result<T, SettingsError> {
        self.get(name)?.ok_or_else(|| SettingsError::MissingDefault {
            name: name.to_string(),
        })
    }

    /// Assign a declared field from any serializable value.
    ///
    /// `None` removes the key of an optional field.
    pub fn set<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), SettingsError> {
        let field = self.field(name)?;
        if field.is_optional() && format::serializes_to_null(value) {
            return self.remove_value(name);
        }
        let value = S::Format::to_value(value)
            .map_err(|e| SettingsError::type_check(name, field.type_name(), e))?;
        self.set_value(name, value)
    }

    fn field(&self, name: &str) -> Result<&FieldDecl<S::Format>, SettingsError> {
        self.registry
            .get(name)
            .ok_or_else(|| SettingsError::unknown_field(name))
    }

    fn store_value(&self, name: &str, value: Value<S::Format>) -> Result<(), SettingsError> {
        let mut doc = self.store.read()?;
        doc.insert(name, value);
        self.store.write(&doc)
    }

    fn remove_value(&self, name: &str) -> Result<(), SettingsError> {
        let mut doc = self.store.read()?;
        if doc.remove(name).is_some() {
            self.store.write(&doc)?;
        }
        Ok(())
    }
}

impl<S: Settings> std::fmt::Debug for SettingsFile<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsFile")
            .field("settings", &std::any::type_name::<S>())
            .field("path", &self.store.path())
            .field("always_read", &self.store.is_always_read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Json;
    use crate::Config;
    use crate::format::Toml;
    use serde_json::{json, Value};
    use std::fs;

    struct TestSettings;

    impl Settings for TestSettings {
        type Format = Json;

        fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError> {
            Ok(vec![
                FieldDecl::new::<String>("key1").default_value("default1")?,
                FieldDecl::new::<String>("key2").default_value("default2")?,
                FieldDecl::optional::<i64>("count"),
            ])
        }
    }

    struct Cached;

    impl Settings for Cached {
        type Format = Json;

        fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError> {
            Ok(vec![FieldDecl::new::<String>("key1").default_value("default1")?])
        }

        fn config() -> Config {
            Config {
                file: None,
                always_read: false,
            }
        }
    }

    fn open_in(dir: &tempfile::TempDir) -> SettingsFile<TestSettings> {
        SettingsFile::with_path(dir.path().join("settings.json")).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_default_is_written_on_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);

        assert_eq!(settings.get_value("key1").unwrap(), Some(json!("default1")));
        assert_eq!(read_json(settings.path()), json!({"key1": "default1"}));
    }

    #[test]
    fn test_missing_without_default_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);

        assert_eq!(settings.get::<i64>("count").unwrap(), None);
        assert!(!settings.path().exists());
    }

    #[test]
    fn test_unknown_and_private_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);

        assert!(matches!(
            settings.get_value("key3"),
            Err(SettingsError::UnknownField { .. })
        ));
        assert!(matches!(
            settings.set_value("_registry", json!(1)),
            Err(SettingsError::UnknownField { .. })
        ));
        assert!(!settings.path().exists());
    }

    #[test]
    fn test_set_rejects_wrong_type_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);
        fs::write(settings.path(), r#"{"key1": "value1"}"#).unwrap();

        let result = settings.set("key1", &true);
        assert!(matches!(result, Err(SettingsError::TypeCheck { .. })));
        assert_eq!(
            fs::read_to_string(settings.path()).unwrap(),
            r#"{"key1": "value1"}"#
        );
    }

    #[test]
    fn test_mismatched_stored_value_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);
        fs::write(settings.path(), r#"{"key1": 1, "key2": "value2"}"#).unwrap();

        assert_eq!(settings.get::<String>("key1").unwrap().as_deref(), Some("default1"));
        assert_eq!(
            read_json(settings.path()),
            json!({"key1": "default1", "key2": "value2"})
        );
    }

    #[test]
    fn test_set_preserves_undeclared_keys() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);
        fs::write(settings.path(), r#"{"other": [1, 2]}"#).unwrap();

        settings.set("key2", "value2").unwrap();
        assert_eq!(
            read_json(settings.path()),
            json!({"other": [1, 2], "key2": "value2"})
        );
        assert_eq!(settings.document().unwrap().len(), 2);
    }

    #[test]
    fn test_setting_optional_to_null_removes_key() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);

        settings.set("count", &Some(3)).unwrap();
        assert_eq!(settings.get::<i64>("count").unwrap(), Some(3));

        settings.set::<Option<i64>>("count", &None).unwrap();
        assert_eq!(settings.get::<i64>("count").unwrap(), None);
        assert_eq!(read_json(settings.path()), json!({}));
    }

    #[test]
    fn test_cached_handle_serves_stale_values_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"key1": "value1"}"#).unwrap();

        let settings = SettingsFile::<Cached>::with_path(&path).unwrap();
        assert_eq!(settings.get::<String>("key1").unwrap().as_deref(), Some("value1"));

        fs::write(&path, r#"{"key1": "newvalue1"}"#).unwrap();
        assert_eq!(settings.get::<String>("key1").unwrap().as_deref(), Some("value1"));

        settings.reload();
        assert_eq!(settings.get::<String>("key1").unwrap().as_deref(), Some("newvalue1"));
    }

    #[test]
    fn test_get_or_default_without_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = open_in(&dir);

        assert!(matches!(
            settings.get_or_default::<i64>("count"),
            Err(SettingsError::MissingDefault { .. })
        ));
        assert_eq!(settings.get_or_default::<String>("key2").unwrap(), "default2");
    }

    struct NullDefault;

    impl Settings for NullDefault {
        type Format = Toml;

        fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError> {
            Ok(vec![
                FieldDecl::new::<Option<i64>>("x").default_value(None::<i64>)?,
                FieldDecl::new::<String>("key1").default_value("default1")?,
            ])
        }
    }

    #[test]
    fn test_null_default_is_never_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsFile::<NullDefault>::with_path(dir.path().join("settings.toml")).unwrap();

        assert_eq!(settings.get::<Option<i64>>("x").unwrap(), None);
        assert!(!settings.path().exists());

        assert_eq!(settings.get::<String>("key1").unwrap().as_deref(), Some("default1"));
        assert_eq!(
            fs::read_to_string(settings.path()).unwrap(),
            "key1 = \"default1\"\n"
        );

        settings.set("x", &Some(4)).unwrap();
        assert_eq!(settings.get::<Option<i64>>("x").unwrap(), Some(Some(4)));
    }
}
