mod attrs;
mod bean;
mod component;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use syn::{Error as SynError, Result as SynResult};

#[proc_macro_derive(Bean, attributes(bean, resource, base))]
pub fn derive_bean(item: TokenStream) -> TokenStream {
    match bean::expand_derive(item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    match component_impl(attr, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn component_impl(attr: TokenStream, item: TokenStream) -> SynResult<TokenStream2> {
    if !attr.is_empty() {
        return Err(SynError::new(
            Span::call_site(),
            "`#[component]` doesn't take any argument",
        ));
    }
    component::expand_implementation(item)
}
