use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Error as SynError, Fields, Index, LitStr, Result as SynResult};

use crate::attrs::{self, BeanAttributes, FieldRole};

struct FieldData {
    accessor: TokenStream2,
    name: String,
    role: FieldRole,
}

pub fn expand_derive(item: TokenStream) -> SynResult<TokenStream2> {
    let input = syn::parse::<DeriveInput>(item)?;
    let attr_data = attrs::parse_bean_attributes(&input.attrs)?;

    let Data::Struct(data) = &input.data else {
        return Err(SynError::new(
            input.ident.span(),
            "`#[derive(Bean)]` only supports structs",
        ));
    };
    let fields = parse_fields(&data.fields)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let capabilities = expand_capabilities(&attr_data);
    let inject = expand_inject(&fields);
    let post_construct = expand_post_construct(&attr_data, &fields);

    Ok(quote! {
        impl #impl_generics ::minidi::bean::Bean for #ident #ty_generics #where_clause {
            #capabilities
            #inject
            #post_construct
        }
    })
}

fn parse_fields(fields: &Fields) -> SynResult<Vec<FieldData>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let role = attrs::parse_field_role(&field.attrs)?;
            let (accessor, name) = match &field.ident {
                Some(ident) => (ident.to_token_stream(), ident.to_string()),
                None => {
                    let index = Index {
                        index: i as u32,
                        span: field.span(),
                    };
                    (index.to_token_stream(), i.to_string())
                }
            };
            Ok(FieldData {
                accessor,
                name,
                role,
            })
        })
        .collect()
}

fn expand_capabilities(attr_data: &BeanAttributes) -> TokenStream2 {
    if attr_data.provides.is_empty() {
        return TokenStream2::new();
    }

    let provides = attr_data.provides.iter().map(|capability| {
        quote! {
            capabilities.provide::<#capability>(
                |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#capability> { this }
            );
        }
    });

    quote! {
        fn capabilities(capabilities: &mut ::minidi::bean::Capabilities<Self>) {
            #(#provides)*
        }
    }
}

fn expand_inject(fields: &[FieldData]) -> TokenStream2 {
    let own = fields.iter().filter_map(|field| {
        let accessor = &field.accessor;
        match &field.role {
            FieldRole::Resource { mapped_name: None } => Some(quote! {
                self.#accessor = injector.resolve()?;
            }),
            FieldRole::Resource {
                mapped_name: Some(mapped_name),
            } => {
                let field_name = LitStr::new(&field.name, mapped_name.span());
                Some(quote! {
                    ::minidi::bean::reject_mapped_name::<Self>(#field_name, #mapped_name)?;
                })
            }
            FieldRole::Plain | FieldRole::Base => None,
        }
    });

    let bases = base_accessors(fields).map(|accessor| {
        quote! {
            ::minidi::bean::Bean::inject(&mut self.#accessor, injector)?;
        }
    });

    let statements: TokenStream2 = own.chain(bases).collect();
    if statements.is_empty() {
        return TokenStream2::new();
    }

    quote! {
        fn inject<__I>(
            &mut self,
            injector: &__I,
        ) -> ::std::result::Result<(), ::minidi::container::injector::InjectorError>
        where
            __I: ::minidi::container::injector::TypedInjector + ?Sized,
        {
            #statements
            ::std::result::Result::Ok(())
        }
    }
}

fn expand_post_construct(attr_data: &BeanAttributes, fields: &[FieldData]) -> TokenStream2 {
    let bases = base_accessors(fields).map(|accessor| {
        quote! {
            ::minidi::bean::Bean::post_construct(&mut self.#accessor)?;
        }
    });

    let hooks = attr_data.post_construct.iter().map(|hook| {
        let hook_name = LitStr::new(&hook.to_string(), hook.span());
        quote! {
            ::minidi::bean::HookOutcome::into_hook_result(
                self.#hook(),
                ::std::any::type_name::<Self>(),
                #hook_name,
            )?;
        }
    });

    let statements: TokenStream2 = bases.chain(hooks).collect();
    if statements.is_empty() {
        return TokenStream2::new();
    }

    quote! {
        fn post_construct(
            &mut self,
        ) -> ::std::result::Result<(), ::minidi::container::injector::InjectorError> {
            #statements
            ::std::result::Result::Ok(())
        }
    }
}

fn base_accessors(fields: &[FieldData]) -> impl Iterator<Item = &TokenStream2> {
    fields
        .iter()
        .filter(|field| matches!(field.role, FieldRole::Base))
        .map(|field| &field.accessor)
}
