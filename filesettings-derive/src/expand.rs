//! Code generation for `#[derive(Settings)]`

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, Ident, Type};

use crate::attrs::{FieldAttrs, StructAttrs};

/// Method names the generated handle defines itself
const RESERVED: &[&str] = &["open", "with_path", "into_inner", "snapshot", "store"];

/// Extract inner type from Option<T>
fn option_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
        if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
            return Some(inner);
        }
    }
    None
}

/// A validated settings field
struct SettingsField<'a> {
    ident: &'a Ident,
    key: String,
    ty: &'a Type,
    kind: FieldKind<'a>,
}

enum FieldKind<'a> {
    /// `Option<T>` without a default
    Optional(&'a Type),
    /// Explicit default expression
    Default(TokenStream),
    /// `Default::default()`
    DefaultTrait,
}

impl<'a> SettingsField<'a> {
    fn parse(field: &'a Field) -> syn::Result<Self> {
        // Only named fields reach this point
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let attrs = FieldAttrs::from_field(field)?;
        let key = attrs.name.unwrap_or_else(|| ident.unraw().to_string());

        if key.starts_with('_') {
            return Err(syn::Error::new_spanned(
                ident,
                "settings field names must not start with `_`",
            ));
        }
        if RESERVED.contains(&ident.unraw().to_string().as_str()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("`{ident}` is reserved for the generated settings handle"),
            ));
        }

        let kind = match (option_inner_type(&field.ty), attrs.default) {
            (Some(_), Some(_)) => {
                return Err(syn::Error::new_spanned(
                    field,
                    "Option<T> fields cannot have default attribute (they default to None automatically)",
                ))
            }
            (Some(inner), None) => FieldKind::Optional(inner),
            (None, Some(Some(expr))) => FieldKind::Default(expr),
            (None, Some(None)) => FieldKind::DefaultTrait,
            (None, None) => {
                return Err(syn::Error::new_spanned(
                    field,
                    "settings fields without a default must be Option<T>; add #[settings(default)] or #[settings(default = value)]",
                ))
            }
        };

        Ok(Self {
            ident,
            key,
            ty: &field.ty,
            kind,
        })
    }

    /// `FieldDecl` expression for `Settings::fields()`
    fn decl(&self) -> TokenStream {
        let key = &self.key;
        let ty = self.ty;
        match &self.kind {
            FieldKind::Optional(inner) => quote! {
                ::filesettings::FieldDecl::<Self::Format>::optional::<#inner>(#key)
            },
            FieldKind::Default(expr) => quote! {
                ::filesettings::FieldDecl::<Self::Format>::new::<#ty>(#key)
                    .default_value::<#ty>(#expr)?
            },
            FieldKind::DefaultTrait => quote! {
                ::filesettings::FieldDecl::<Self::Format>::new::<#ty>(#key)
                    .default_value::<#ty>(<#ty as ::core::default::Default>::default())?
            },
        }
    }

    /// Getter and setter on the handle type
    fn accessors(&self) -> TokenStream {
        let key = &self.key;
        let ty = self.ty;
        let getter = self.ident;
        let setter = format_ident!("set_{}", self.ident.unraw());
        let get_doc = format!("Read `{key}` from the settings file.");
        let set_doc = format!("Write `{key}` to the settings file.");

        match &self.kind {
            FieldKind::Optional(inner) => quote! {
                #[doc = #get_doc]
                pub fn #getter(&self) -> ::core::result::Result<#ty, ::filesettings::SettingsError> {
                    self.inner.get::<#inner>(#key)
                }

                #[doc = #set_doc]
                ///
                /// Assigning `None` removes the key.
                pub fn #setter(&self, value: #ty) -> ::core::result::Result<(), ::filesettings::SettingsError> {
                    self.inner.set(#key, &value)
                }
            },
            FieldKind::Default(_) | FieldKind::DefaultTrait => quote! {
                #[doc = #get_doc]
                pub fn #getter(&self) -> ::core::result::Result<#ty, ::filesettings::SettingsError> {
                    self.inner.get_or_default::<#ty>(#key)
                }

                #[doc = #set_doc]
                pub fn #setter(&self, value: #ty) -> ::core::result::Result<(), ::filesettings::SettingsError> {
                    self.inner.set(#key, &value)
                }
            },
        }
    }
}

/// Expand `#[derive(Settings)]` for `input`.
pub fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Settings only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Settings only supports structs",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Settings does not support generic structs",
        ));
    }

    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Settings structs must declare at least one field",
        ));
    }

    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;
    let fields = fields
        .iter()
        .map(SettingsField::parse)
        .collect::<syn::Result<Vec<_>>>()?;

    let adapter = Ident::new(struct_attrs.format.adapter(), Span::call_site());
    let decls = fields.iter().map(SettingsField::decl);
    let accessors = fields.iter().map(SettingsField::accessors);
    let idents: Vec<_> = fields.iter().map(|f| f.ident).collect();
    let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();

    let mut overrides = Vec::new();
    if let Some(file) = &struct_attrs.file {
        overrides.push(quote! {
            file: ::core::option::Option::Some(::std::path::PathBuf::from(#file))
        });
    }
    if let Some(always_read) = struct_attrs.always_read {
        overrides.push(quote! { always_read: #always_read });
    }
    let config_fn = if overrides.is_empty() {
        quote! {}
    } else {
        quote! {
            fn config() -> ::filesettings::Config {
                ::filesettings::Config {
                    #(#overrides,)*
                    ..::core::default::Default::default()
                }
            }
        }
    };

    let handle = struct_attrs
        .handle
        .unwrap_or_else(|| format_ident!("{}File", struct_name));
    let snapshot_doc = format!("Read every field into a [`{struct_name}`] value.");
    let handle_doc = format!("File-backed handle on [`{struct_name}`] settings.");

    Ok(quote! {
        impl ::filesettings::Settings for #struct_name {
            type Format = ::filesettings::format::#adapter;

            fn fields() -> ::core::result::Result<
                ::std::vec::Vec<::filesettings::FieldDecl<Self::Format>>,
                ::filesettings::SettingsError,
            > {
                ::core::result::Result::Ok(::std::vec![#(#decls),*])
            }

            #config_fn
        }

        #[doc = #handle_doc]
        #[derive(Debug)]
        #vis struct #handle {
            inner: ::filesettings::SettingsFile<#struct_name>,
        }

        impl #handle {
            /// Open the configured settings file.
            ///
            /// # Errors
            ///
            /// Fails if the field declarations are invalid or the default
            /// location cannot be resolved. The file itself is not read.
            pub fn open() -> ::core::result::Result<Self, ::filesettings::SettingsError> {
                ::core::result::Result::Ok(Self {
                    inner: ::filesettings::SettingsFile::open()?,
                })
            }

            /// Open the settings file at `path`, ignoring the configured one.
            pub fn with_path(
                path: impl ::core::convert::Into<::std::path::PathBuf>,
            ) -> ::core::result::Result<Self, ::filesettings::SettingsError> {
                ::core::result::Result::Ok(Self {
                    inner: ::filesettings::SettingsFile::with_path(path)?,
                })
            }

            /// Unwrap the untyped settings file handle.
            pub fn into_inner(self) -> ::filesettings::SettingsFile<#struct_name> {
                self.inner
            }

            #[doc = #snapshot_doc]
            pub fn snapshot(&self) -> ::core::result::Result<#struct_name, ::filesettings::SettingsError> {
                ::core::result::Result::Ok(#struct_name {
                    #(#idents: self.#idents()?,)*
                })
            }

            /// Write every field of `settings` to the file.
            pub fn store(&self, settings: &#struct_name) -> ::core::result::Result<(), ::filesettings::SettingsError> {
                #(self.inner.set(#keys, &settings.#idents)?;)*
                ::core::result::Result::Ok(())
            }

            #(#accessors)*
        }

        impl ::core::ops::Deref for #handle {
            type Target = ::filesettings::SettingsFile<#struct_name>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    })
}
