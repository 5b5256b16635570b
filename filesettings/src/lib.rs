//! Typed settings backed by a JSON, TOML or YAML file
//!
//! `filesettings` maps the fields of a struct onto keys of a settings file.
//! Nothing is loaded up front: every getter reads the file, every setter
//! rewrites it. A damaged file never stops the application; it is removed
//! and the declared defaults take over.
//!
//! # Features
//!
//! - **Declarative**: Generate typed accessors with `#[derive(Settings)]`
//! - **Lazy**: Values are read on access and written on assignment
//! - **Defaults**: Missing or mistyped values fall back to declared defaults,
//!   which are written to the file on first read
//! - **Self-healing**: Unparsable files, or files that do not hold a
//!   mapping, are deleted and treated as empty
//! - **Formats**: JSON (4-space indent), TOML and YAML. Each file is edited
//!   in its own data model, so keys outside the struct keep their exact
//!   values (TOML datetimes, YAML `.inf`)
//!
//! # Example
//!
//! ```rust
//! use filesettings::Settings;
//!
//! #[derive(Settings)]
//! #[settings(format = "json")]
//! struct Prefs {
//!     #[settings(default = "dark".to_string())]
//!     pub theme: String,
//!
//!     #[settings(default = 12)]
//!     pub font_size: u32,
//!
//!     // No default: reads as None until assigned
//!     pub last_file: Option<String>,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     let dir = tempfile::tempdir()?;
//! let prefs = PrefsFile::with_path(dir.path().join("prefs.json"))?;
//!
//! assert_eq!(prefs.theme()?, "dark");
//! assert_eq!(prefs.last_file()?, None);
//!
//! prefs.set_font_size(14)?;
//! assert_eq!(prefs.font_size()?, 14);
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[settings(format = "...", file = "...", always_read = ...)]`
//!
//! Struct-level configuration:
//! - `format`: `"json"` (default), `"toml"` or `"yaml"`
//! - `file`: path of the settings file; defaults to `settings.<ext>` in the
//!   current directory when the handle is opened
//! - `always_read`: `true` (default) re-reads the file on every access;
//!   `false` keeps the last document in memory
//! - `handle`: name of the generated handle type (default `<Struct>File`)
//!
//! ## `#[settings(default = value)]` / `#[settings(default)]`
//!
//! Default for a field, either an explicit expression or
//! `Default::default()`. Every non-`Option` field needs one.
//!
//! ```rust
//! # use filesettings::Settings;
//! #[derive(Settings)]
//! #[settings(format = "toml", file = "app.toml")]
//! struct App {
//!     #[settings(default)]
//!     pub verbose: bool,
//!
//!     #[settings(default = vec!["main".to_string()])]
//!     pub branches: Vec<String>,
//! }
//! ```
//!
//! ## `#[settings(name = "key")]`
//!
//! Store the field under a key different from the field name.
//!
//! ```rust
//! # use filesettings::Settings;
//! #[derive(Settings)]
//! struct Window {
//!     #[settings(name = "window-width", default = 800)]
//!     pub width: u32,
//! }
//! ```
//!
//! # Dynamic access
//!
//! The generated handle dereferences to [`SettingsFile`], which also offers
//! access by field name with the same validation rules:
//!
//! ```rust
//! # use filesettings::{Settings, SettingsError};
//! # #[derive(Settings)]
//! # struct Prefs {
//! #     #[settings(default = "dark".to_string())]
//! #     pub theme: String,
//! # }
//! # fn main() -> anyhow::Result<()> {
//! #     let dir = tempfile::tempdir()?;
//! let prefs = PrefsFile::with_path(dir.path().join("settings.json"))?;
//!
//! let result = prefs.set("theme", &true);
//! assert!(matches!(result, Err(SettingsError::TypeCheck { .. })));
//! #     Ok(())
//! # }
//! ```

// Lets macro-generated `::filesettings` paths resolve inside this crate's tests
extern crate self as filesettings;

mod error;
pub mod format;
mod proxy;
pub mod registry;
pub mod store;

use std::path::PathBuf;

pub use error::SettingsError;
pub use filesettings_derive::Settings;
pub use format::{Format, Table};
pub use proxy::SettingsFile;
pub use registry::{FieldDecl, FieldRegistry};

/// Where and how a settings type is stored.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing file; `None` means `settings.<ext>` in the current directory
    pub file: Option<PathBuf>,

    /// Re-read the file on every access instead of keeping it in memory
    pub always_read: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            always_read: true,
        }
    }
}

/// Schema of a file-backed settings type.
///
/// Usually implemented with `#[derive(Settings)]`. A manual implementation
/// lists its fields with [`FieldDecl`]:
///
/// ```rust
/// use filesettings::{format::Yaml, FieldDecl, Settings, SettingsError, SettingsFile};
///
/// struct Server;
///
/// impl Settings for Server {
///     type Format = Yaml;
///
///     fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError> {
///         Ok(vec![
///             FieldDecl::new::<String>("host").default_value("127.0.0.1")?,
///             FieldDecl::optional::<u16>("port"),
///         ])
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// #     let dir = tempfile::tempdir()?;
/// let server = SettingsFile::<Server>::with_path(dir.path().join("server.yaml"))?;
/// assert_eq!(server.get::<String>("host")?.as_deref(), Some("127.0.0.1"));
/// assert_eq!(server.get::<u16>("port")?, None);
/// #     Ok(())
/// # }
/// ```
pub trait Settings {
    /// File format of the backing file
    type Format: Format;

    /// Declared fields, in declaration order.
    fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError>;

    /// Storage configuration
    fn config() -> Config {
        Config::default()
    }
}
