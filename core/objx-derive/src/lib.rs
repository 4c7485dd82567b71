//! OBJX Derive: procedural macros for the OBJX object store.
//!
//! Provides `#[derive(Record)]`, which turns a struct's comparable fields
//! into queryable attributes at compile time.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro implementing `objx_core::Record`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Record)]
/// #[objx(name = "users")]
/// pub struct User {
///     #[objx(identity)]
///     pub id: i64,
///     pub name: String,
///     pub email: Option<String>,
///     #[objx(skip)]
///     pub avatar: Vec<u8>,
/// }
/// ```
///
/// Generates:
/// - `TYPE_NAME` (default: lower-cased struct name)
/// - `IDENTITY` (the single `#[objx(identity)]` field)
/// - `declared_fields()` with one accessor per non-skipped field
#[proc_macro_derive(Record, attributes(objx))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct FieldOptions {
    identity: bool,
    skip: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let type_name = extract_type_name(input)?.unwrap_or_else(|| name.to_string().to_lowercase());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut identity = None;
    let mut descriptors = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.to_string();
        let field_type = &field.ty;
        let options = field_options(field)?;

        if options.identity {
            if options.skip {
                return Err(syn::Error::new_spanned(
                    ident,
                    "identity field cannot be skipped",
                ));
            }
            if identity.replace(field_name.clone()).is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "only one field may be marked #[objx(identity)]",
                ));
            }
        }

        descriptors.push(if options.skip {
            quote! {
                ::objx_core::record::FieldDescriptor {
                    name: #field_name,
                    ty: ::objx_core::value::FieldType::Opaque,
                    nullable: false,
                    accessor: ::std::option::Option::None,
                }
            }
        } else {
            quote! {
                ::objx_core::record::FieldDescriptor {
                    name: #field_name,
                    ty: <#field_type as ::objx_core::record::AttributeValue>::FIELD_TYPE,
                    nullable: <#field_type as ::objx_core::record::AttributeValue>::NULLABLE,
                    accessor: ::std::option::Option::Some(|record: &Self| {
                        ::objx_core::record::AttributeValue::to_value(&record.#ident)
                    }),
                }
            }
        });
    }

    let Some(identity) = identity else {
        return Err(syn::Error::new_spanned(
            name,
            "Record requires one field marked #[objx(identity)]",
        ));
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::objx_core::record::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const IDENTITY: &'static str = #identity;

            fn declared_fields() -> ::std::vec::Vec<::objx_core::record::FieldDescriptor<Self>> {
                ::std::vec![
                    #(#descriptors),*
                ]
            }
        }
    })
}

fn extract_type_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut type_name = None;
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("objx")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                type_name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[objx] attribute on struct, expected `name`"))
            }
        })?;
    }
    Ok(type_name)
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("objx")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("identity") {
                options.identity = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported #[objx] attribute on field, expected `identity` or `skip`"))
            }
        })?;
    }
    Ok(options)
}
