use crate::load::incompatible_error;
use crate::model::{
    Binding, Convert, DeriveParameter, DeriveValue, IntermediateAttributes, ParameterType,
};
use quote::{quote, ToTokens};

const KINDS: [&str; 4] = ["option", "arguments", "delegate", "inject"];
const COLLECTIONS: [&str; 3] = ["Vec", "HashSet", "BTreeSet"];

impl DeriveParameter {
    /// Load a named field, or `None` when the field carries no `#[gantry(..)]` attribute.
    pub(crate) fn load(value: &syn::Field) -> Result<Option<Self>, syn::Error> {
        let field_name = match &value.ident {
            Some(ident) => ident.clone(),
            None => {
                return Err(syn::Error::new_spanned(
                    value,
                    "Invalid - fields must be named.",
                ))
            }
        };
        let attributes = IntermediateAttributes::collect(&value.attrs)?;

        if attributes == IntermediateAttributes::default() {
            return Ok(None);
        }

        let kinds: Vec<&str> = KINDS
            .into_iter()
            .filter(|kind| attributes.has(kind))
            .collect();

        let parameter_type = match kinds.as_slice() {
            ["option"] => load_option(&field_name, &attributes, &value.ty)?,
            ["arguments"] => load_arguments(&field_name, &attributes, &value.ty)?,
            ["delegate"] => {
                attributes.allow_only(&field_name, &["delegate"], &[])?;

                match generic(&value.ty) {
                    Some(("Option", inner)) => ParameterType::Delegate {
                        lazy: true,
                        delegate: tokens(inner),
                    },
                    _ => ParameterType::Delegate {
                        lazy: false,
                        delegate: tokens(&value.ty),
                    },
                }
            }
            ["inject"] => {
                attributes.allow_only(&field_name, &["inject"], &[])?;

                match generic(&value.ty) {
                    Some(("Option", inner)) => ParameterType::Inject {
                        metadata: tokens(inner),
                    },
                    _ => {
                        return Err(syn::Error::new(
                            field_name.span(),
                            format!(
                                "Invalid - `{field_name}` must be an `Option<Arc<..>>` to receive an injection."
                            ),
                        ))
                    }
                }
            }
            [] => {
                return Err(syn::Error::new(
                    field_name.span(),
                    format!(
                        "Invalid - `{field_name}` must be one of `#[gantry(option)]`, `#[gantry(arguments)]`, `#[gantry(delegate)]` or `#[gantry(inject)]`."
                    ),
                ))
            }
            [kind] => unreachable!("internal error - unknown parameter kind `{kind}`"),
            [left, right, ..] => {
                return Err(incompatible_error(
                    &field_name,
                    format!("#[gantry({left})]"),
                    format!("#[gantry({right})]"),
                ))
            }
        };

        Ok(Some(DeriveParameter {
            field_name,
            parameter_type,
        }))
    }
}

fn load_option(
    field_name: &syn::Ident,
    attributes: &IntermediateAttributes,
    ty: &syn::Type,
) -> Result<ParameterType, syn::Error> {
    attributes.allow_only(
        field_name,
        &["option", "required", "hidden"],
        &[
            "flag",
            "title",
            "description",
            "scope",
            "arity",
            "allowed",
            "convert",
        ],
    )?;

    let scope = match attributes.single(field_name, "scope")? {
        Some(value) => match value.tokens.to_string().as_str() {
            "global" => quote! { ::gantry::Scope::Global },
            "group" => quote! { ::gantry::Scope::Group },
            "command" => quote! { ::gantry::Scope::Command },
            other => {
                return Err(syn::Error::new(
                    field_name.span(),
                    format!(
                        "Invalid - `{field_name}` scope must be `global`, `group` or `command`, found `{other}`."
                    ),
                ))
            }
        },
        None => quote! { ::gantry::Scope::Command },
    };
    let mut flags = attributes.repeated("flag");

    if flags.is_empty() {
        let flag = format!(
            "--{}",
            field_name.to_string().trim_start_matches("r#").replace('_', "-")
        );
        flags.push(DeriveValue {
            tokens: quote! { #flag },
        });
    }

    Ok(ParameterType::Option {
        scope: DeriveValue { tokens: scope },
        flags,
        title: attributes.single(field_name, "title")?,
        description: attributes.single(field_name, "description")?,
        arity: attributes.single(field_name, "arity")?,
        required: attributes.has("required"),
        hidden: attributes.has("hidden"),
        allowed: attributes.repeated("allowed"),
        convert: load_convert(field_name, attributes)?,
        binding: binding(ty),
    })
}

fn load_arguments(
    field_name: &syn::Ident,
    attributes: &IntermediateAttributes,
    ty: &syn::Type,
) -> Result<ParameterType, syn::Error> {
    attributes.allow_only(
        field_name,
        &["arguments", "required"],
        &["title", "description", "usage", "convert"],
    )?;

    Ok(ParameterType::Arguments {
        title: attributes.single(field_name, "title")?,
        description: attributes.single(field_name, "description")?,
        usage: attributes.single(field_name, "usage")?,
        required: attributes.has("required"),
        convert: load_convert(field_name, attributes)?,
        binding: binding(ty),
    })
}

fn load_convert(
    field_name: &syn::Ident,
    attributes: &IntermediateAttributes,
) -> Result<Option<Convert>, syn::Error> {
    match attributes.single(field_name, "convert")? {
        Some(value) => match value.tokens.to_string().as_str() {
            "parse" => Ok(Some(Convert::Parse)),
            "value_of" => Ok(Some(Convert::ValueOf)),
            "construct" => Ok(Some(Convert::Construct)),
            other => Err(syn::Error::new(
                field_name.span(),
                format!(
                    "Invalid - `{field_name}` convert must be `parse`, `value_of` or `construct`, found `{other}`."
                ),
            )),
        },
        None => Ok(None),
    }
}

fn binding(ty: &syn::Type) -> Binding {
    match generic(ty) {
        Some(("Option", inner)) => match generic(inner) {
            Some((container, element)) if COLLECTIONS.contains(&container) => {
                Binding::OptionalCollection {
                    container: tokens(inner),
                    element: tokens(element),
                }
            }
            _ => Binding::Optional {
                element: tokens(inner),
            },
        },
        Some((container, element)) if COLLECTIONS.contains(&container) => Binding::Collection {
            container: tokens(ty),
            element: tokens(element),
        },
        _ => Binding::Scalar {
            element: tokens(ty),
        },
    }
}

/// The wrapper name and first type argument of `ty` (ex: `Option<u32>` -> `("Option", u32)`).
fn generic(ty: &syn::Type) -> Option<(&'static str, &syn::Type)> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let syn::PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    let wrapper = ["Option"]
        .into_iter()
        .chain(COLLECTIONS)
        .find(|w| segment.ident == w)?;

    match arguments.args.first()? {
        syn::GenericArgument::Type(inner) => Some((wrapper, inner)),
        _ => None,
    }
}

fn tokens(ty: &syn::Type) -> DeriveValue {
    DeriveValue {
        tokens: ty.to_token_stream(),
    }
}
