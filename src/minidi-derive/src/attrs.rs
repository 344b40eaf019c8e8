use syn::parse::Parse;
use syn::spanned::Spanned;
use syn::{parenthesized, Attribute, Error as SynError, Ident, LitStr, Meta, Result as SynResult, Token, Type};

#[derive(Debug, Default)]
pub struct BeanAttributes {
    pub provides: Vec<Type>,
    pub post_construct: Vec<Ident>,
}

#[derive(Debug)]
pub enum FieldRole {
    Plain,
    Resource { mapped_name: Option<LitStr> },
    Base,
}

/// Parses every `#[bean(provides(...), post_construct(...))]` on the struct.
pub fn parse_bean_attributes(attrs: &[Attribute]) -> SynResult<BeanAttributes> {
    let mut data = BeanAttributes::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("provides") {
                let content;
                parenthesized!(content in meta.input);
                data.provides
                    .extend(content.parse_terminated(Type::parse, Token![,])?);
                Ok(())
            } else if meta.path.is_ident("post_construct") {
                let content;
                parenthesized!(content in meta.input);
                data.post_construct
                    .extend(content.parse_terminated(Ident::parse, Token![,])?);
                Ok(())
            } else {
                Err(meta.error("expects `provides(...)` or `post_construct(...)`"))
            }
        })?;
    }

    Ok(data)
}

pub fn parse_field_role(attrs: &[Attribute]) -> SynResult<FieldRole> {
    let mut role = FieldRole::Plain;

    for attr in attrs {
        let next = if attr.path().is_ident("resource") {
            parse_resource_attribute(attr)?
        } else if attr.path().is_ident("base") {
            attr.meta.require_path_only()?;
            FieldRole::Base
        } else {
            continue;
        };

        if !matches!(role, FieldRole::Plain) {
            return Err(SynError::new(
                attr.span(),
                "a field can only carry one of `#[resource]` and `#[base]`",
            ));
        }
        role = next;
    }

    Ok(role)
}

fn parse_resource_attribute(attr: &Attribute) -> SynResult<FieldRole> {
    match &attr.meta {
        Meta::Path(_) => Ok(FieldRole::Resource { mapped_name: None }),
        Meta::List(_) => {
            let mut mapped_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("mapped_name") {
                    let name: LitStr = meta.value()?.parse()?;
                    if !name.value().is_empty() {
                        mapped_name = Some(name);
                    }
                    Ok(())
                } else {
                    Err(meta.error("expects `mapped_name = \"...\"`"))
                }
            })?;
            Ok(FieldRole::Resource { mapped_name })
        }
        Meta::NameValue(nv) => Err(SynError::new(
            nv.span(),
            "expects `#[resource]` or `#[resource(mapped_name = \"...\")]`",
        )),
    }
}
