//! Implementation of the `#[derive(Model)]` macro.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

use crate::attrs::{DefaultAttr, FieldInfo, Kind, parse_field, parse_struct_attrs};

/// Parse and generate code for the `#[derive(Model)]` macro.
pub fn derive_model_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Model derive only supports structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(input)?;
    let field_infos: Vec<FieldInfo> = fields.iter().map(parse_field).collect::<Result<_, _>>()?;
    let mapped: Vec<&FieldInfo> = field_infos.iter().filter(|f| !f.skip).collect();

    let keys: Vec<&FieldInfo> = mapped.iter().copied().filter(|f| f.primary_key).collect();
    match keys.as_slice() {
        [] => {
            return Err(syn::Error::new_spanned(
                input,
                "Model must have exactly one field marked with #[keel(primary_key)]",
            ));
        }
        [_] => {}
        [_, second, ..] => {
            return Err(syn::Error::new_spanned(
                &second.ident,
                "Model must have exactly one primary key, found a second one here",
            ));
        }
    }

    let descriptors = mapped
        .iter()
        .map(|f| descriptor(f))
        .collect::<Result<Vec<_>, _>>()?;

    let model_name = name.to_string();
    let table = struct_attrs.table.map(|table| quote! { .table(#table) });

    let attributes: Vec<&str> = mapped.iter().map(|f| f.attribute.as_str()).collect();
    let idents: Vec<_> = mapped.iter().map(|f| &f.ident).collect();
    let columns: Vec<&str> = mapped
        .iter()
        .map(|f| f.column.as_deref().unwrap_or(f.attribute.as_str()))
        .collect();
    let skipped: Vec<_> = field_infos
        .iter()
        .filter(|f| f.skip)
        .map(|f| &f.ident)
        .collect();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::keel::Model for #name #ty_generics #where_clause {
            fn define() -> ::keel::SchemaBuilder {
                ::keel::ModelSchema::builder(#model_name)
                    #table
                    #( .field(#attributes, #descriptors) )*
            }

            fn get_value(&self, field: &str) -> ::core::option::Option<::keel::Value> {
                match field {
                    #( #attributes => ::keel::FieldValue::to_field_value(&self.#idents), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_value(
                &mut self,
                field: &str,
                value: ::keel::Value,
            ) -> ::core::result::Result<(), ::keel::RowError> {
                match field {
                    #(
                        #attributes => {
                            self.#idents = ::keel::FromValue::from_value(value)
                                .map_err(|e| ::keel::RowError::conversion(field, e))?;
                        }
                    )*
                    _ => {
                        return ::core::result::Result::Err(
                            ::keel::RowError::UnknownField(field.to_string()),
                        );
                    }
                }
                ::core::result::Result::Ok(())
            }

            fn from_row(row: &::keel::Row) -> ::core::result::Result<Self, ::keel::RowError> {
                ::core::result::Result::Ok(Self {
                    #( #idents: row.get(#columns)?, )*
                    #( #skipped: ::core::default::Default::default(), )*
                })
            }
        }
    })
}

/// Build the `FieldDescriptor` expression for one field.
fn descriptor(field: &FieldInfo) -> Result<TokenStream, syn::Error> {
    let kind = field.kind.ok_or_else(|| {
        syn::Error::new_spanned(
            &field.ident,
            "cannot infer the column kind of this field, add #[keel(kind = \"...\")]",
        )
    })?;

    if field.primary_key && !kind.can_be_primary_key() {
        return Err(syn::Error::new_spanned(
            &field.ident,
            format!("a {} field cannot be the primary key", kind.constructor()),
        ));
    }

    let constructor = format_ident!("{}", kind.constructor());
    let mut tokens = quote! { ::keel::FieldDescriptor::#constructor() };

    if let Some(column) = &field.column {
        tokens.extend(quote! { .name(#column) });
    }
    if let Some(column_type) = &field.column_type {
        tokens.extend(quote! { .column_type(#column_type) });
    }
    if field.primary_key {
        tokens.extend(quote! { .primary_key() });
    }
    match &field.default {
        Some(DefaultAttr::Value(expr)) => tokens.extend(quote! { .default_value(#expr) }),
        Some(DefaultAttr::Generator(path)) => tokens.extend(quote! {
            .default_with(|| ::keel::Value::from(#path()))
        }),
        Some(DefaultAttr::Disabled) => tokens.extend(quote! { .no_default() }),
        None => {}
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> String {
        derive_model_impl(&input).unwrap().to_string()
    }

    #[test]
    fn test_derive_simple_model() {
        let code = expand(parse_quote! {
            struct User {
                #[keel(primary_key)]
                id: i64,
                name: Option<String>,
                email: Option<String>,
            }
        });

        assert!(code.contains("impl :: keel :: Model for User"));
        assert!(code.contains(":: keel :: ModelSchema :: builder (\"User\")"));
        assert!(code.contains(". field (\"id\" , :: keel :: FieldDescriptor :: integer () . primary_key ())"));
        assert!(code.contains(". field (\"name\" , :: keel :: FieldDescriptor :: string ())"));
        assert!(!code.contains(". table ("));
    }

    #[test]
    fn test_derive_with_overrides() {
        let code = expand(parse_quote! {
            #[keel(table = "blogs")]
            struct Blog {
                #[keel(primary_key, column_type = "varchar(50)", default_fn = next_id)]
                id: Option<String>,
                #[keel(column = "body", text)]
                content: Option<String>,
                #[keel(default = 0.5)]
                rating: Option<f64>,
                #[keel(skip)]
                cached: Vec<u8>,
            }
        });

        assert!(code.contains(". table (\"blogs\")"));
        assert!(code.contains(". column_type (\"varchar(50)\") . primary_key () . default_with (|| :: keel :: Value :: from (next_id ()))"));
        assert!(code.contains(":: keel :: FieldDescriptor :: text () . name (\"body\")"));
        assert!(code.contains(". default_value (0.5)"));
        assert!(code.contains("content : row . get (\"body\") ?"));
        assert!(code.contains("cached : :: core :: default :: Default :: default ()"));
        assert!(!code.contains("\"cached\""));
    }

    #[test]
    fn test_derive_requires_one_primary_key() {
        let none: DeriveInput = parse_quote! {
            struct NoKey {
                name: String,
            }
        };
        assert!(derive_model_impl(&none).is_err());

        let two: DeriveInput = parse_quote! {
            struct TwoKeys {
                #[keel(primary_key)]
                a: i64,
                #[keel(primary_key)]
                b: i64,
            }
        };
        let err = derive_model_impl(&two).unwrap_err();
        assert!(err.to_string().contains("exactly one primary key"));
    }

    #[test]
    fn test_derive_rejects_text_primary_key() {
        let input: DeriveInput = parse_quote! {
            struct Note {
                #[keel(primary_key, text)]
                body: String,
            }
        };
        let err = derive_model_impl(&input).unwrap_err();
        assert_eq!(err.to_string(), "a text field cannot be the primary key");
    }

    #[test]
    fn test_derive_requires_known_kind() {
        let input: DeriveInput = parse_quote! {
            struct Blob {
                #[keel(primary_key)]
                id: i64,
                data: Vec<u8>,
            }
        };
        assert!(derive_model_impl(&input).is_err());
    }

    #[test]
    fn test_derive_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i64, String);
        };
        assert!(derive_model_impl(&input).is_err());
    }
}
