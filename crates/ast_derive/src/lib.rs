//! Derives shared by the syntax tree and the codec.
//!
//! - `WalkAst` generates `crate::walk::Walk` for tree nodes (structs and enums).
//! - `NodeTag` generates `crate::registry::NodeTag` for fieldless kind enums:
//!   the wire tag of every variant plus the `ALL` table the registry is built from.

use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, Index};

#[proc_macro_derive(WalkAst)]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match generate_walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl<'ast> crate::walk::Walk<'ast> for #name {
            #[inline(always)]
            fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                &self,
                a: &'ast crate::ast::AstArena,
                v: &mut V
            ) {
                #walk_body
            }
        }
    };

    expanded.into()
}

/// Tag table for a fieldless kind enum. The variant name is the wire tag.
#[proc_macro_derive(NodeTag)]
pub fn derive_node_tag(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let data_enum = match &input.data {
        Data::Enum(e) => e,
        _ => {
            return syn::Error::new_spanned(&input.ident, "NodeTag can only be derived for enums")
                .into_compile_error()
                .into();
        }
    };

    let mut variants = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(variant, "NodeTag variants must be fieldless")
                .into_compile_error()
                .into();
        }
        variants.push(&variant.ident);
    }

    let tags = variants.iter().map(|v| v.to_string());

    let expanded = quote! {
        impl crate::registry::NodeTag for #name {
            const ALL: &'static [Self] = &[#(Self::#variants),*];

            #[inline]
            fn tag(self) -> &'static str {
                match self {
                    #(Self::#variants => #tags,)*
                }
            }
        }
    };

    expanded.into()
}

fn generate_walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => Ok(generate_fields_walk(&data_struct.fields)),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields));

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

fn generate_fields_walk(fields: &Fields) -> proc_macro2::TokenStream {
    let walk_calls = fields.iter().enumerate().map(|(i, field)| {
        let field_access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        quote! { crate::walk::Walk::walk(#field_access, a, v); }
    });

    quote! { #(#walk_calls)* }
}

fn generate_variant_arm(variant_name: &syn::Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! { Self::#variant_name => {} },
        Fields::Named(named) => {
            let bindings: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            quote! {
                Self::#variant_name { #(#bindings),* } => {
                    #(crate::walk::Walk::walk(#bindings, a, v);)*
                }
            }
        }
        Fields::Unnamed(unnamed) => {
            let bindings: Vec<_> = (0..unnamed.unnamed.len())
                .map(|i| format_ident!("f{}", i))
                .collect();
            quote! {
                Self::#variant_name(#(#bindings),*) => {
                    #(crate::walk::Walk::walk(#bindings, a, v);)*
                }
            }
        }
    }
}
