//! Error types for file-backed settings

use std::path::PathBuf;

/// Errors that can occur when declaring, reading or writing settings.
///
/// Corrupt settings files are not errors: they are removed and treated as
/// empty. What remains falls into three groups:
/// - Schema problems detected when a handle is constructed
/// - Values rejected by the declared field type on assignment
/// - I/O and encoding failures while touching the backing file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading, writing or removing the backing file failed.
    #[error("Failed to access settings file '{}': {source}", .path.display())]
    Io {
        /// Path of the backing file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The document could not be encoded in the configured format.
    ///
    /// TOML, for instance, cannot represent null values.
    #[error("Failed to encode settings file '{}' as {format}: {message}", .path.display())]
    Encode {
        /// Path of the backing file
        path: PathBuf,
        /// Name of the format adapter
        format: &'static str,
        /// Error message from the encoder
        message: String,
    },

    /// The settings type declares no fields.
    #[error("Settings type '{settings}' declares no fields")]
    NoFields {
        /// Fully qualified name of the settings type
        settings: String,
    },

    /// A declared field name starts with an underscore.
    #[error("Settings field '{name}' must not start with '_'")]
    PrivateField {
        /// Offending field name
        name: String,
    },

    /// The same field name was declared twice.
    #[error("Settings field '{name}' is declared more than once")]
    DuplicateField {
        /// Offending field name
        name: String,
    },

    /// The requested name is not a declared field.
    #[error("'{name}' is not a declared settings field")]
    UnknownField {
        /// Requested name
        name: String,
    },

    /// A value does not match the declared field type.
    #[error("Value for settings field '{name}' is not a valid {type_name}: {message}")]
    TypeCheck {
        /// Field name
        name: String,
        /// Declared type of the field
        type_name: &'static str,
        /// Error message from the type check
        message: String,
    },

    /// A declared default has no representation in the file format, or does
    /// not match the declared type.
    #[error("Default value for settings field '{name}' cannot be stored: {message}")]
    Default {
        /// Field name
        name: String,
        /// Error message from the serializer
        message: String,
    },

    /// A field without a default has no value.
    #[error("Settings field '{name}' has no value and no default")]
    MissingDefault {
        /// Field name
        name: String,
    },
}

impl SettingsError {
    /// Create an I/O error for the given path
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a type check error
    pub(crate) fn type_check(
        name: impl Into<String>,
        type_name: &'static str,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::TypeCheck {
            name: name.into(),
            type_name,
            message: message.to_string(),
        }
    }

    /// Create an unknown field error
    pub(crate) fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_check_message() {
        let err = SettingsError::type_check("key1", "alloc::string::String", "invalid type: boolean");
        assert_eq!(
            err.to_string(),
            "Value for settings field 'key1' is not a valid alloc::string::String: invalid type: boolean"
        );
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = SettingsError::io(
            "/tmp/settings.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/settings.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
