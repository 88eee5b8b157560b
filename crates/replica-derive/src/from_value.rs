//! Implementation of #[derive(FromValue)]

use crate::model::{self, Layout, Member};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let generics = model::with_bound(&input.generics, &quote!(::replica_value::FromValue));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match model::layout(input, "FromValue")? {
        Layout::Named(members) => {
            let fields = members.iter().map(|member| {
                let access = &member.access;
                let init = init(member);
                quote!(#access: #init)
            });
            quote! {
                let record = ::replica_value::__private::expect_record(value, path)?;
                ::std::result::Result::Ok(Self { #(#fields),* })
            }
        }
        Layout::Tuple(members) => {
            let fields = members.iter().map(init);
            quote! {
                let record = ::replica_value::__private::expect_record(value, path)?;
                ::std::result::Result::Ok(Self(#(#fields),*))
            }
        }
        Layout::Unit => quote! {
            ::replica_value::__private::expect_record(value, path)?;
            ::std::result::Result::Ok(Self)
        },
        Layout::UnitEnum(variants) => {
            let arms = variants.iter().map(|(ident, scalar)| {
                quote!(#scalar => ::std::result::Result::Ok(Self::#ident),)
            });
            quote! {
                match ::replica_value::__private::expect_variant(value, path)? {
                    #(#arms)*
                    other => ::std::result::Result::Err(
                        ::replica_value::__private::unknown_variant(other, path)
                    ),
                }
            }
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::replica_value::FromValue for #name #ty_generics #where_clause {
            fn from_value(
                value: &::replica_value::Value,
                path: &::replica_value::FieldPath,
            ) -> ::std::result::Result<Self, ::replica_value::ValueError> {
                #body
            }
        }
    })
}

/// Expression producing one field from `record`
fn init(member: &Member) -> TokenStream {
    if member.skip {
        return quote!(::std::default::Default::default());
    }
    let name = &member.name;
    quote! {{
        let path = path.member(#name);
        let member = ::replica_value::__private::member(record, #name, &path)?;
        ::replica_value::FromValue::from_value(member, &path)?
    }}
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn skipped_fields_use_default() {
        let input: DeriveInput = parse_quote! {
            struct Item {
                id: i32,
                #[replica(skip)]
                cache: Vec<u8>,
            }
        };
        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("Default :: default"));
        assert!(tokens.contains("\"id\""));
    }

    #[test]
    fn unit_enum_matches_names() {
        let input: DeriveInput = parse_quote! {
            #[replica(rename_all = "camelCase")]
            enum Status { InProgress }
        };
        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("\"inProgress\""));
        assert!(tokens.contains("unknown_variant"));
    }
}
