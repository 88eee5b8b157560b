//! Derive input reduced to what both macros need

use crate::attrs;
use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Index};

/// One struct field
pub(crate) struct Member {
    /// `ident` for named fields, position for tuple fields
    pub(crate) access: TokenStream,
    /// Member name in the record
    pub(crate) name: String,
    pub(crate) skip: bool,
}

/// Deriving type's layout
pub(crate) enum Layout {
    /// Struct with named fields
    Named(Vec<Member>),
    /// Tuple struct
    Tuple(Vec<Member>),
    /// Unit struct
    Unit,
    /// Enum of unit variants: `(ident, scalar name)`
    UnitEnum(Vec<(Ident, String)>),
}

pub(crate) fn layout(input: &DeriveInput, derive: &str) -> syn::Result<Layout> {
    let container = attrs::container_attrs(&input.attrs)?;
    let mut taken = HashSet::new();
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .map(|field| -> syn::Result<Member> {
                    let member = attrs::member_attrs(&field.attrs)?;
                    let ident = field
                        .ident
                        .as_ref()
                        .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
                    let name = attrs::field_name(ident, &member, container.rename_all);
                    if !member.skip {
                        claim(&mut taken, &name, field)?;
                    }
                    Ok(Member {
                        access: ident.to_token_stream(),
                        name,
                        skip: member.skip,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()
                .map(Layout::Named),
            Fields::Unnamed(fields) => fields
                .unnamed
                .iter()
                .enumerate()
                .map(|(position, field)| -> syn::Result<Member> {
                    let member = attrs::member_attrs(&field.attrs)?;
                    let name = member.rename.unwrap_or_else(|| position.to_string());
                    if !member.skip {
                        claim(&mut taken, &name, field)?;
                    }
                    Ok(Member {
                        access: Index::from(position).to_token_stream(),
                        name,
                        skip: member.skip,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()
                .map(Layout::Tuple),
            Fields::Unit => Ok(Layout::Unit),
        },
        Data::Enum(data) => data
            .variants
            .iter()
            .map(|variant| -> syn::Result<(Ident, String)> {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        format!("{derive} can only be derived for enums whose variants carry no data"),
                    ));
                }
                let member = attrs::member_attrs(&variant.attrs)?;
                let name = attrs::variant_name(&variant.ident, &member, container.rename_all);
                claim(&mut taken, &name, variant)?;
                Ok((variant.ident.clone(), name))
            })
            .collect::<syn::Result<Vec<_>>>()
            .map(Layout::UnitEnum),
        Data::Union(_) => Err(syn::Error::new(
            Span::call_site(),
            format!("{derive} cannot be derived for unions"),
        )),
    }
}

/// Names must be unique within a record or enum
fn claim(taken: &mut HashSet<String>, name: &str, origin: impl ToTokens) -> syn::Result<()> {
    if taken.insert(name.to_string()) {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            origin,
            format!("duplicate member name `{name}`"),
        ))
    }
}

/// Add `bound` to every type parameter
pub(crate) fn with_bound(generics: &Generics, bound: &TokenStream) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(#bound));
    }
    generics
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quote::quote;
    use syn::parse_quote;

    fn names(layout: &Layout) -> Vec<String> {
        match layout {
            Layout::Named(members) | Layout::Tuple(members) => {
                members.iter().map(|m| m.name.clone()).collect()
            }
            Layout::Unit => Vec::new(),
            Layout::UnitEnum(variants) => variants.iter().map(|(_, n)| n.clone()).collect(),
        }
    }

    #[test]
    fn named_struct_members_renamed() {
        let input: DeriveInput = parse_quote! {
            #[replica(rename_all = "PascalCase")]
            struct ClassC {
                id: i32,
                #[replica(rename = "Label")]
                name: String,
                #[replica(skip)]
                cache: Vec<u8>,
            }
        };
        let layout = layout(&input, "Reflect").unwrap();
        assert_eq!(names(&layout), vec!["Id", "Label", "Cache"]);
        let Layout::Named(members) = layout else {
            panic!("expected named layout");
        };
        assert!(members[2].skip);
        assert!(!members[0].skip);
    }

    #[test]
    fn tuple_members_are_positions() {
        let input: DeriveInput = parse_quote!(struct Pair(i32, String););
        assert_eq!(names(&layout(&input, "Reflect").unwrap()), vec!["0", "1"]);
    }

    #[test]
    fn unit_enum_variants() {
        let input: DeriveInput = parse_quote! {
            #[replica(rename_all = "snake_case")]
            enum Status { InProgress, Done }
        };
        assert_eq!(
            names(&layout(&input, "Reflect").unwrap()),
            vec!["in_progress", "done"]
        );
    }

    #[test]
    fn data_enums_rejected() {
        let input: DeriveInput = parse_quote!(enum Shape { Circle(f64), Empty });
        let err = layout(&input, "FromValue").err().unwrap();
        assert!(err.to_string().contains("FromValue can only be derived"));
    }

    #[test]
    fn duplicate_renames_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Dup {
                #[replica(rename = "A")]
                first: i32,
                #[replica(rename = "A")]
                second: i32,
            }
        };
        let err = layout(&input, "Reflect").err().unwrap();
        assert_eq!(err.to_string(), "duplicate member name `A`");
    }

    #[test]
    fn rename_colliding_with_rule_rejected() {
        let input: DeriveInput = parse_quote! {
            #[replica(rename_all = "PascalCase")]
            struct Collide {
                property_a: i32,
                #[replica(rename = "PropertyA")]
                other: i32,
            }
        };
        let err = layout(&input, "FromValue").err().unwrap();
        assert!(err.to_string().contains("`PropertyA`"));
    }

    #[test]
    fn skipped_members_may_share_names() {
        let input: DeriveInput = parse_quote! {
            struct Cached {
                value: i32,
                #[replica(skip, rename = "value")]
                shadow: i32,
            }
        };
        assert_eq!(names(&layout(&input, "Reflect").unwrap()), vec!["value", "value"]);
    }

    #[test]
    fn duplicate_tuple_rename_rejected() {
        let input: DeriveInput = parse_quote!(struct Pair(i32, #[replica(rename = "0")] i32););
        assert!(layout(&input, "Reflect").is_err());
    }

    #[test]
    fn bounds_added_to_type_params() {
        let input: DeriveInput = parse_quote!(struct Wrapper<T, U> { a: T, b: U });
        let generics = with_bound(&input.generics, &quote!(::replica_value::Reflect));
        assert_eq!(generics.type_params().filter(|p| p.bounds.len() == 1).count(), 2);
    }
}
