//! Implementation of #[derive(Reflect)]

use crate::model::{self, Layout, Member};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let generics = model::with_bound(&input.generics, &quote!(::replica_value::Reflect));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match model::layout(input, "Reflect")? {
        Layout::Named(members) | Layout::Tuple(members) => record(&members),
        Layout::Unit => quote! {
            ::replica_value::Node::Record(::std::vec::Vec::new())
        },
        Layout::UnitEnum(variants) => {
            let arms = variants.iter().map(|(ident, scalar)| {
                quote! {
                    Self::#ident => ::replica_value::Node::Scalar(
                        ::replica_value::Scalar::Str(#scalar)
                    ),
                }
            });
            quote! {
                match *self {
                    #(#arms)*
                }
            }
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::replica_value::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> ::replica_value::Node<'_> {
                #body
            }
        }
    })
}

fn record(members: &[Member]) -> TokenStream {
    let entries = members.iter().filter(|m| !m.skip).map(|member| {
        let access = &member.access;
        let name = &member.name;
        quote! {
            (#name, &self.#access as &dyn ::replica_value::Reflect)
        }
    });
    quote! {
        ::replica_value::Node::Record(::std::vec![#(#entries),*])
    }
}
