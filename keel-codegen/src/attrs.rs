//! Parsing of `#[keel(...)]` attributes.

use syn::{DeriveInput, Expr, Ident, LitStr, Path, Type};

/// Column kinds, matching the descriptor constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Boolean,
    Integer,
    Float,
    Text,
}

impl Kind {
    /// Name of the `FieldDescriptor` constructor.
    pub fn constructor(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
        }
    }

    pub fn can_be_primary_key(&self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Float)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" | "bool" => Some(Self::Boolean),
            "integer" | "int" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Infer the kind from a field type, looking through `Option<T>`.
    pub fn infer(ty: &Type) -> Option<Self> {
        let ident = last_segment(option_inner(ty).unwrap_or(ty))?;
        match ident.to_string().as_str() {
            "String" => Some(Self::String),
            "bool" => Some(Self::Boolean),
            "i64" | "i32" | "u32" => Some(Self::Integer),
            "f64" | "f32" => Some(Self::Float),
            _ => None,
        }
    }
}

/// Struct-level attributes.
#[derive(Debug, Default)]
pub struct StructAttrs {
    pub table: Option<String>,
}

/// Parse struct-level `#[keel(...)]` attributes.
pub fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs, syn::Error> {
    let mut attrs = StructAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("keel") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown model attribute, expected `table`"))
            }
        })?;
    }

    Ok(attrs)
}

/// Default declared on a field.
#[derive(Debug)]
pub enum DefaultAttr {
    /// `default = <expr>`
    Value(Expr),
    /// `default_fn = <path>`
    Generator(Path),
    /// `no_default`
    Disabled,
}

/// A mapped (or skipped) field.
#[derive(Debug)]
pub struct FieldInfo {
    pub ident: Ident,
    /// Attribute name used by the schema and the accessors.
    pub attribute: String,
    pub column: Option<String>,
    pub column_type: Option<String>,
    pub kind: Option<Kind>,
    pub primary_key: bool,
    pub default: Option<DefaultAttr>,
    pub skip: bool,
}

/// Parse a field and its `#[keel(...)]` attributes.
pub fn parse_field(field: &syn::Field) -> Result<FieldInfo, syn::Error> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Fields must be named"))?;

    let attribute = ident.to_string().trim_start_matches("r#").to_string();
    let mut info = FieldInfo {
        ident,
        attribute,
        column: None,
        column_type: None,
        kind: Kind::infer(&field.ty),
        primary_key: false,
        default: None,
        skip: false,
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("keel") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") || meta.path.is_ident("id") {
                info.primary_key = true;
            } else if meta.path.is_ident("skip") {
                info.skip = true;
            } else if meta.path.is_ident("text") {
                info.kind = Some(Kind::Text);
            } else if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                info.kind = Some(Kind::from_name(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        "expected one of: string, boolean, integer, float, text",
                    )
                })?);
            } else if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                info.column = Some(value.value());
            } else if meta.path.is_ident("column_type") {
                let value: LitStr = meta.value()?.parse()?;
                info.column_type = Some(value.value());
            } else if meta.path.is_ident("default") {
                info.default = Some(DefaultAttr::Value(meta.value()?.parse()?));
            } else if meta.path.is_ident("default_fn") {
                info.default = Some(DefaultAttr::Generator(meta.value()?.parse()?));
            } else if meta.path.is_ident("no_default") {
                info.default = Some(DefaultAttr::Disabled);
            } else {
                return Err(meta.error("unknown field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(info)
}

/// The `T` of an `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn last_segment(ty: &Type) -> Option<&Ident> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last().map(|s| &s.ident),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_infer_kind() {
        let ty: Type = parse_quote!(Option<String>);
        assert_eq!(Kind::infer(&ty), Some(Kind::String));

        let ty: Type = parse_quote!(i32);
        assert_eq!(Kind::infer(&ty), Some(Kind::Integer));

        let ty: Type = parse_quote!(std::option::Option<f64>);
        assert_eq!(Kind::infer(&ty), Some(Kind::Float));

        let ty: Type = parse_quote!(Vec<u8>);
        assert_eq!(Kind::infer(&ty), None);
    }

    #[test]
    fn test_parse_field_attrs() {
        let field: syn::Field = parse_quote! {
            #[keel(column = "body", text, default = "")]
            content: Option<String>
        };
        let info = parse_field(&field).unwrap();

        assert_eq!(info.attribute, "content");
        assert_eq!(info.column.as_deref(), Some("body"));
        assert_eq!(info.kind, Some(Kind::Text));
        assert!(matches!(info.default, Some(DefaultAttr::Value(_))));
    }

    #[test]
    fn test_parse_field_rejects_unknown() {
        let field: syn::Field = parse_quote! {
            #[keel(unique)]
            email: String
        };
        assert!(parse_field(&field).is_err());
    }

    #[test]
    fn test_raw_identifier_attribute() {
        let field: syn::Field = parse_quote! {
            r#type: Option<String>
        };
        assert_eq!(parse_field(&field).unwrap().attribute, "type");
    }
}
