//! Derive macro implementation for filesettings

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod expand;

/// `Settings` derive macro
///
/// Implements `filesettings::Settings` for the struct and generates a handle
/// type (`<Struct>File` by default) with a getter and a `set_` method per
/// field.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[settings(format = "json" | "toml" | "yaml")]`: File format (JSON by default)
/// - `#[settings(file = "path")]`: Backing file (`settings.<ext>` in the current directory by default)
/// - `#[settings(always_read = false)]`: Keep the document in memory between accesses
/// - `#[settings(handle = "Name")]`: Name of the generated handle type
///
/// **Field-level**:
/// - `#[settings(name = "key")]`: Custom document key
/// - `#[settings(default)]`: Use `Default::default()` when the file has no valid value
/// - `#[settings(default = value)]`: Use an explicit default value
///
/// # Example
///
/// See the `filesettings` crate documentation for usage examples.
#[proc_macro_derive(Settings, attributes(settings))]
pub fn derive_settings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
