//! Derives for the `tessera-ecs` marker traits. The generated impls name the traits unqualified,
//! so the trait must be in scope where the derive is used (the prelude brings all of them in).
//!
//! Types that need lifecycle hooks implement the traits by hand instead.

use proc_macro::TokenStream;
use quote::quote;

#[proc_macro_derive(Component)]
pub fn component(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    impl_component(&ast)
}

fn impl_component(ast: &syn::DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let gen = quote! {
        impl #impl_generics Component for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
        }
    };
    gen.into()
}

#[proc_macro_derive(Resource)]
pub fn resource(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    impl_resource(&ast)
}

fn impl_resource(ast: &syn::DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let gen = quote! {
        impl #impl_generics Resource for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
        }
    };
    gen.into()
}

#[proc_macro_derive(Event)]
pub fn event(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    impl_event(&ast)
}

fn impl_event(ast: &syn::DeriveInput) -> TokenStream {
    let name = &ast.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let gen = quote! {
        impl #impl_generics Event for #name #ty_generics #where_clause {
            const DEBUG_NAME: &'static str = #name_str;
        }
    };
    gen.into()
}
