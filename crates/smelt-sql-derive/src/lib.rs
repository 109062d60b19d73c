//! Derive macro for smelt-sql record types.
//!
//! This crate provides `#[derive(Record)]` for structs whose fields are
//! `Settable<T>` wrappers, generating the schema reflection the builder
//! and migrator consume.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Lit, Meta,
    PathArguments, Type,
};

/// Derives the `Record` trait for a struct of `Settable<T>` fields.
///
/// # Attributes
///
/// - `#[table(name = "table_name")]` - SQL table name (optional, defaults
///   to snake_case of the struct name)
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - SQL column name (optional,
///   defaults to the field identifier)
/// - `#[column(primary_key)]` - marks the column as primary key
/// - `#[column(autoincrement)]` - marks the primary key as auto-incrementing
/// - `#[column(nullable)]` - marks the column as nullable
/// - `#[column(max_length = 100)]` - VARCHAR length for string columns
/// - `#[column(sql_type = "DECIMAL(12,2)")]` - verbatim SQL type override
/// - `#[column(default = "expr")]` - raw SQL default expression
///
/// # Generated Items
///
/// For a struct `User`, this macro generates:
///
/// - `impl Record for User` with `table_name()` and declaration-order
///   `fields()`
/// - a `Field` accessor per column (`User::id()`, `User::user_name()`, ...)
#[proc_macro_derive(Record, attributes(table, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_record_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, &struct_name.to_string())?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record derive only supports structs",
            ));
        }
    };

    let mut meta_exprs: Vec<TokenStream2> = Vec::new();
    let mut accessors: Vec<TokenStream2> = Vec::new();

    for field in fields {
        let field_ident = field.ident.as_ref().unwrap();
        let attrs = parse_column_attrs(&field.attrs)?;
        let column_name = attrs
            .name
            .clone()
            .unwrap_or_else(|| field_ident.to_string());

        let inner = settable_inner_type(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &field.ty,
                "Record fields must be Settable<T> so unset fields can be \
                 distinguished from zero values",
            )
        })?;
        let (sql_type, type_nullable) = map_sql_type(inner, &attrs)?;
        let nullable = attrs.nullable || type_nullable;

        let mut builder_calls = TokenStream2::new();
        if nullable {
            builder_calls.extend(quote! { .nullable() });
        }
        if attrs.primary_key {
            builder_calls.extend(quote! { .primary_key() });
        }
        if attrs.autoincrement {
            builder_calls.extend(quote! { .auto_increment() });
        }
        if let Some(expr) = &attrs.default_expr {
            builder_calls.extend(quote! { .default_expr(#expr) });
        }

        meta_exprs.push(quote! {
            {
                let mut meta =
                    ::smelt_sql_core::schema::FieldMeta::new(#column_name, #sql_type)
                        #builder_calls;
                meta.value = self.#field_ident.sql_value();
                meta.is_set = self.#field_ident.is_set();
                meta
            }
        });

        accessors.push(quote! {
            /// Returns a field reference for this column.
            #[must_use]
            pub fn #field_ident() -> ::smelt_sql_core::field::Field {
                ::smelt_sql_core::field::col(#column_name)
            }
        });
    }

    if meta_exprs.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "Record derive requires at least one field",
        ));
    }

    let expanded = quote! {
        impl ::smelt_sql_core::schema::Record for #struct_name {
            fn table_name(&self) -> ::std::string::String {
                ::std::string::String::from(#table_name)
            }

            fn fields(&self) -> ::std::vec::Vec<::smelt_sql_core::schema::FieldMeta> {
                ::std::vec![#(#meta_exprs),*]
            }
        }

        impl #struct_name {
            #(#accessors)*
        }
    };

    Ok(expanded)
}

struct ColumnAttrs {
    name: Option<String>,
    primary_key: bool,
    nullable: bool,
    autoincrement: bool,
    max_length: Option<u32>,
    sql_type: Option<String>,
    default_expr: Option<String>,
}

fn get_table_name(attrs: &[Attribute], struct_name: &str) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("table") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            table_name = Some(s.value());
                        }
                    }
                }
                Ok(())
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    // Default to snake_case of the struct name
    Ok(to_snake_case(struct_name))
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs {
        name: None,
        primary_key: false,
        nullable: false,
        autoincrement: false,
        max_length: None,
        sql_type: None,
        default_expr: None,
    };

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    result.primary_key = true;
                } else if meta.path.is_ident("nullable") {
                    result.nullable = true;
                } else if meta.path.is_ident("autoincrement") {
                    result.autoincrement = true;
                } else if meta.path.is_ident("name") {
                    if let Some(s) = parse_str_value(meta.value()?.parse()?) {
                        result.name = Some(s);
                    }
                } else if meta.path.is_ident("sql_type") {
                    if let Some(s) = parse_str_value(meta.value()?.parse()?) {
                        result.sql_type = Some(s);
                    }
                } else if meta.path.is_ident("default") {
                    if let Some(s) = parse_str_value(meta.value()?.parse()?) {
                        result.default_expr = Some(s);
                    }
                } else if meta.path.is_ident("max_length") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Int(n) = lit.lit {
                            result.max_length = Some(n.base10_parse()?);
                        }
                    }
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_str_value(expr: Expr) -> Option<String> {
    if let Expr::Lit(lit) = expr {
        if let Lit::Str(s) = lit.lit {
            return Some(s.value());
        }
    }
    None
}

/// Extracts `T` from a `Settable<T>` field type.
fn settable_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Settable" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Maps a Rust value type to its declared SQL type.
///
/// Returns the `SqlType` constructor tokens and whether the type itself
/// implies nullability (`Option<T>`).
fn map_sql_type(ty: &Type, attrs: &ColumnAttrs) -> syn::Result<(TokenStream2, bool)> {
    if let Some(custom) = &attrs.sql_type {
        return Ok((
            quote! {
                ::smelt_sql_core::schema::SqlType::Custom(
                    ::std::string::String::from(#custom)
                )
            },
            is_option(ty),
        ));
    }

    let (base, nullable) = match unwrap_option(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    };

    let Type::Path(type_path) = base else {
        return Err(unmappable(base));
    };
    let Some(segment) = type_path.path.segments.last() else {
        return Err(unmappable(base));
    };

    let name = segment.ident.to_string();
    let tokens = match name.as_str() {
        "bool" => quote! { ::smelt_sql_core::schema::SqlType::Boolean },
        "i8" | "i16" | "u8" => quote! { ::smelt_sql_core::schema::SqlType::SmallInt },
        "i32" | "u16" => quote! { ::smelt_sql_core::schema::SqlType::Integer },
        "i64" | "u32" | "u64" => quote! { ::smelt_sql_core::schema::SqlType::BigInt },
        "f32" => quote! { ::smelt_sql_core::schema::SqlType::Real },
        "f64" => quote! { ::smelt_sql_core::schema::SqlType::Double },
        "String" => {
            let len = attrs.max_length.unwrap_or(255);
            quote! { ::smelt_sql_core::schema::SqlType::Varchar(#len) }
        }
        "Vec" => quote! { ::smelt_sql_core::schema::SqlType::Blob },
        "NaiveDate" => quote! { ::smelt_sql_core::schema::SqlType::Date },
        "NaiveTime" => quote! { ::smelt_sql_core::schema::SqlType::Time },
        "NaiveDateTime" | "DateTime" => {
            quote! { ::smelt_sql_core::schema::SqlType::Timestamp }
        }
        _ => return Err(unmappable(base)),
    };
    Ok((tokens, nullable))
}

fn unmappable(ty: &Type) -> syn::Error {
    syn::Error::new_spanned(
        ty,
        "cannot map this type to a SQL type; add #[column(sql_type = \"...\")]",
    )
}

fn is_option(ty: &Type) -> bool {
    unwrap_option(ty).is_some()
}

/// Extracts `T` from `Option<T>`, if the type is an option.
fn unwrap_option(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
