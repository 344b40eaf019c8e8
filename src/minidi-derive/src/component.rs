use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::spanned::Spanned;
use syn::visit_mut::{self, VisitMut};
use syn::{
    AngleBracketedGenericArguments, Attribute, Error as SynError, FnArg, GenericArgument, Ident,
    ImplItem, ImplItemFn, ItemImpl, PathArguments, Result as SynResult, ReturnType, Signature,
    Type, TypePath,
};

const RETURN_TYPE_MESSAGE: &str = "a constructor's return type should be `Self` or `Result<Self, E>`";

#[derive(Debug)]
enum ConstructorData {
    Default,
    Injected {
        identifier: Ident,
        arguments: Vec<Span>,
        return_type: ReturnTypeData,
    },
    Ambiguous {
        count: usize,
    },
}

#[derive(Debug)]
enum ReturnTypeData {
    Infallible,
    Result { error_type: Type },
}

struct AttributeRemovalVisitor;

impl AttributeRemovalVisitor {
    fn is_custom_attribute(attr: &Attribute) -> bool {
        attr.path().is_ident("inject")
    }
}

impl VisitMut for AttributeRemovalVisitor {
    fn visit_attributes_mut(&mut self, attrs: &mut Vec<Attribute>) {
        attrs.retain(|attr| !Self::is_custom_attribute(attr));
        attrs
            .iter_mut()
            .for_each(|attr| visit_mut::visit_attribute_mut(self, attr));
    }
}

pub fn expand_implementation(impls: TokenStream) -> SynResult<TokenStream2> {
    let mut impls = match syn::parse::<ItemImpl>(impls) {
        Ok(impls) => impls,
        Err(err) => {
            return Err(SynError::new(
                err.span(),
                "`#[component]` should be annotated on the `impl` block",
            ))
        }
    };

    if let Some((_, path, _)) = &impls.trait_ {
        return Err(SynError::new(
            path.span(),
            "`#[component]` should be annotated on an inherent `impl` block",
        ));
    }

    let self_type = get_self_type(&impls)?;
    let ctor_data = parse_constructors(&impls.items)?;
    let expanded = expand_component_implementation(&impls, &self_type, ctor_data);

    let mut visitor = AttributeRemovalVisitor;
    visitor.visit_item_impl_mut(&mut impls);

    Ok(quote! {
        #impls
        #expanded
    })
}

fn get_self_type(impls: &ItemImpl) -> SynResult<TypePath> {
    if let Type::Path(ty) = impls.self_ty.as_ref() {
        Ok(ty.clone())
    } else {
        Err(SynError::new(impls.self_ty.span(), "invalid self type"))
    }
}

fn parse_constructors(items: &[ImplItem]) -> SynResult<ConstructorData> {
    let ctors: Vec<_> = items
        .iter()
        .filter_map(filter_and_map_item_fn)
        .filter(is_annotated_with_inject)
        .collect();

    for ctor in &ctors {
        if let Some(FnArg::Receiver(rec)) = ctor.sig.inputs.first() {
            return Err(SynError::new(
                rec.span(),
                "method is not allowed to be annotated with `#[inject]`",
            ));
        }
    }

    match ctors.as_slice() {
        [] => Ok(ConstructorData::Default),
        [ctor] => parse_constructor(&ctor.sig),
        _ => Ok(ConstructorData::Ambiguous { count: ctors.len() }),
    }
}

fn filter_and_map_item_fn(item: &ImplItem) -> Option<&ImplItemFn> {
    if let ImplItem::Fn(impl_fn) = item {
        Some(impl_fn)
    } else {
        None
    }
}

fn is_annotated_with_inject(item_fn: &&ImplItemFn) -> bool {
    item_fn
        .attrs
        .iter()
        .any(AttributeRemovalVisitor::is_custom_attribute)
}

fn parse_constructor(signature: &Signature) -> SynResult<ConstructorData> {
    let arguments = signature.inputs.iter().map(Spanned::span).collect();
    let return_type = parse_constructor_return_type(&signature.output)?;

    Ok(ConstructorData::Injected {
        identifier: signature.ident.clone(),
        arguments,
        return_type,
    })
}

fn parse_constructor_return_type(output: &ReturnType) -> SynResult<ReturnTypeData> {
    let ReturnType::Type(_, return_type) = output else {
        return Err(SynError::new(output.span(), RETURN_TYPE_MESSAGE));
    };
    let Type::Path(return_type) = return_type.as_ref() else {
        return Err(SynError::new(return_type.span(), RETURN_TYPE_MESSAGE));
    };

    let segments = &return_type.path.segments;
    let last = segments
        .last()
        .ok_or_else(|| SynError::new(return_type.span(), RETURN_TYPE_MESSAGE))?;

    if last.ident == "Result" {
        parse_result_return_type(&last.arguments)
    } else {
        // Anything else must name the component itself, which the generated
        // `Ok(Ok(..))` checks.
        Ok(ReturnTypeData::Infallible)
    }
}

fn parse_result_return_type(type_args: &PathArguments) -> SynResult<ReturnTypeData> {
    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) = type_args
    else {
        return Err(SynError::new(type_args.span(), RETURN_TYPE_MESSAGE));
    };

    let mut iter = args.iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(GenericArgument::Type(_)), Some(GenericArgument::Type(error_type)), None) => {
            Ok(ReturnTypeData::Result {
                error_type: error_type.clone(),
            })
        }
        _ => Err(SynError::new(args.span(), RETURN_TYPE_MESSAGE)),
    }
}

fn expand_component_implementation(
    impls: &ItemImpl,
    self_type: &TypePath,
    ctor_data: ConstructorData,
) -> TokenStream2 {
    let (impl_generics, _, where_clause) = impls.generics.split_for_impl();

    let (associated_type_error, body) = match ctor_data {
        ConstructorData::Default => (
            quote! { type Error = ::std::convert::Infallible; },
            quote! {
                let _ = injector;
                ::std::result::Result::Ok(::std::result::Result::Ok(
                    <Self as ::std::default::Default>::default()
                ))
            },
        ),
        ConstructorData::Ambiguous { count } => (
            quote! { type Error = ::std::convert::Infallible; },
            quote! {
                let _ = injector;
                ::std::result::Result::Err(
                    ::minidi::container::injector::InjectorError::ambiguous_constructor(
                        ::std::any::type_name::<Self>(),
                        #count,
                    )
                )
            },
        ),
        ConstructorData::Injected {
            identifier,
            arguments,
            return_type,
        } => {
            let deps: Vec<_> = arguments
                .iter()
                .enumerate()
                .map(|(i, span)| Ident::new(&format!("dep{i}"), *span))
                .collect();

            let call = quote! { <#self_type>::#identifier(#(#deps),*) };
            let (error_type, wire_deps) = match return_type {
                ReturnTypeData::Infallible => (
                    quote! { ::std::convert::Infallible },
                    quote! { ::std::result::Result::Ok(::std::result::Result::Ok(#call)) },
                ),
                ReturnTypeData::Result { error_type } => (
                    quote! { #error_type },
                    quote! { ::std::result::Result::Ok(#call) },
                ),
            };

            (
                quote! { type Error = #error_type; },
                quote! {
                    #(let #deps = ::minidi::container::injector::TypedInjector::resolve(injector)?;)*
                    #wire_deps
                },
            )
        }
    };

    quote! {
        impl #impl_generics ::minidi::bean::Component for #self_type #where_clause {
            #associated_type_error

            fn construct<__I>(injector: &__I) -> ::std::result::Result<
                ::std::result::Result<Self, Self::Error>,
                ::minidi::container::injector::InjectorError
            >
            where
                __I: ::minidi::container::injector::TypedInjector + ?Sized
            {
                #body
            }
        }
    }
}
