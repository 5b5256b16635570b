//! Attribute parsing for `#[settings(...)]` annotations.
//!
//! This module extracts and validates configuration attributes from the
//! settings struct and its fields during macro expansion.

use syn::{Attribute, Field, Ident, Lit};

/// Format adapter selected with `#[settings(format = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatKind {
    #[default]
    Json,
    Toml,
    Yaml,
}

impl FormatKind {
    /// Name of the adapter type in `filesettings::format`
    pub fn adapter(self) -> &'static str {
        match self {
            Self::Json => "Json",
            Self::Toml => "Toml",
            Self::Yaml => "Yaml",
        }
    }
}

/// Parsed struct-level `#[settings(...)]` attributes.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// File format, JSON unless specified.
    pub format: FormatKind,

    /// Backing file path.
    ///
    /// If `None`, `settings.<ext>` in the current directory is used.
    pub file: Option<String>,

    /// Caching policy; `None` keeps the library default (always read).
    pub always_read: Option<bool>,

    /// Name of the generated handle type; `<Struct>File` if `None`.
    pub handle: Option<Ident>,
}

impl StructAttrs {
    /// Extract and parse struct-level `#[settings(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("settings") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // format = "json" | "toml" | "yaml"
                if meta.path.is_ident("format") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    parsed.format = match value.value().to_ascii_lowercase().as_str() {
                        "json" => FormatKind::Json,
                        "toml" => FormatKind::Toml,
                        "yaml" | "yml" => FormatKind::Yaml,
                        other => {
                            return Err(syn::Error::new_spanned(
                                &value,
                                format!("unknown settings format `{other}`, expected \"json\", \"toml\" or \"yaml\""),
                            ))
                        }
                    };
                    return Ok(());
                }

                // file = "path"
                if meta.path.is_ident("file") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    parsed.file = Some(value.value());
                    return Ok(());
                }

                // always_read = bool
                if meta.path.is_ident("always_read") {
                    let value: syn::LitBool = meta.value()?.parse()?;
                    parsed.always_read = Some(value.value);
                    return Ok(());
                }

                // handle = "TypeName"
                if meta.path.is_ident("handle") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    parsed.handle = Some(value.parse()?);
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level settings attribute"))
            })?;
        }

        Ok(parsed)
    }
}

/// Parsed `#[settings(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Custom document key override.
    ///
    /// If `None`, the field name is used as is.
    pub name: Option<String>,

    /// Default value strategy:
    /// - `None`: No default (only valid for `Option<T>`)
    /// - `Some(None)`: Use `Default::default()`
    /// - `Some(Some(tokens))`: Use explicit token stream as default value
    pub default: Option<Option<proc_macro2::TokenStream>>,
}

impl FieldAttrs {
    /// Extract and parse `#[settings(...)]` attributes from a struct field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("settings") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let name: Lit = value.parse()?;
                    match name {
                        Lit::Str(s) => attrs.name = Some(s.value()),
                        other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
                    }
                    return Ok(());
                }

                // default or default = value
                if meta.path.is_ident("default") {
                    if meta.input.peek(syn::Token![=]) {
                        let value = meta.value()?;
                        let expr: syn::Expr = value.parse()?;
                        attrs.default = Some(Some(quote::ToTokens::to_token_stream(&expr)));
                    } else {
                        attrs.default = Some(None);
                    }
                    return Ok(());
                }

                Err(meta.error("unsupported settings attribute"))
            })?;
        }

        Ok(attrs)
    }
}
