//! Procedural macros for replica graphs
//!
//! This crate provides two derives, re-exported by `replica-value`:
//! - `#[derive(Reflect)]` - Field enumerator for structs and unit enums
//! - `#[derive(FromValue)]` - Typed materialization from a `Value`

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod from_value;
mod model;
mod reflect;

/// Derive the field enumerator.
///
/// Structs with named fields become records whose members are listed in
/// declaration order. Tuple structs become records with members `"0"`,
/// `"1"`, ... and unit structs become empty records. Enums whose variants
/// carry no data become string scalars.
///
/// # Attributes
///
/// - `#[replica(rename_all = "...")]` - `PascalCase`, `camelCase`, `snake_case`
///   or `SCREAMING_SNAKE_CASE`, applied to fields or variants
/// - `#[replica(rename = "...")]` - Explicit member or variant name
/// - `#[replica(skip)]` - Leave the field out of the record
///
/// # Example
///
/// ```ignore
/// #[derive(Reflect)]
/// #[replica(rename_all = "PascalCase")]
/// struct ClassC {
///     id: i32,       // "Id"
///     name: String,  // "Name"
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(replica))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    reflect::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive typed materialization.
///
/// Reads members by the names `#[derive(Reflect)]` would produce; skipped
/// fields are filled with `Default::default()`.
#[proc_macro_derive(FromValue, attributes(replica))]
pub fn derive_from_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_value::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
