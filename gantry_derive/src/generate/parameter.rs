use crate::model::{Binding, Convert, DeriveParameter, DeriveValue, ParameterType};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

impl DeriveParameter {
    pub(crate) fn generate(self) -> TokenStream2 {
        let DeriveParameter {
            field_name,
            parameter_type,
        } = self;
        let field_name_str = field_name.to_string().trim_start_matches("r#").to_string();

        match parameter_type {
            ParameterType::Option {
                scope,
                flags,
                title,
                description,
                arity,
                required,
                hidden,
                allowed,
                convert,
                binding,
            } => {
                let value_type = value_type(convert, binding.element());
                let slot = slot(&field_name, &field_name_str, &binding);
                let title = title.map(|t| quote! { .title(#t) });
                let description = description.map(|d| quote! { .description(#d) });
                let arity = arity.map(|a| quote! { .arity(#a) });
                let required = required.then(|| quote! { .required(true) });
                let hidden = hidden.then(|| quote! { .hidden(true) });
                let allowed =
                    (!allowed.is_empty()).then(|| quote! { .allowed_values([ #( #allowed ),* ]) });

                quote! {
                    declarations.option(
                        ::gantry::OptionMetadata::builder(#scope, #value_type)
                            #( .flag(#flags) )*
                            #title
                            #description
                            #arity
                            #required
                            #hidden
                            #allowed
                            .accessor(path.leaf(#slot))
                            .build()?,
                    );
                }
            }
            ParameterType::Arguments {
                title,
                description,
                usage,
                required,
                convert,
                binding,
            } => {
                let value_type = value_type(convert, binding.element());
                let slot = slot(&field_name, &field_name_str, &binding);
                let title = title.map(|t| quote! { .title(#t) });
                let description = description.map(|d| quote! { .description(#d) });
                let usage = usage.map(|u| quote! { .usage(#u) });
                let required = required.then(|| quote! { .required(true) });

                quote! {
                    declarations.arguments(
                        ::gantry::ArgumentsMetadata::builder(#value_type)
                            #title
                            #description
                            #usage
                            #required
                            .accessor(path.leaf(#slot))
                            .build()?,
                    );
                }
            }
            ParameterType::Delegate { lazy, delegate } => {
                let step = if lazy {
                    quote! { ::gantry::Step::optional::<Self, #delegate> }
                } else {
                    quote! { ::gantry::Step::field::<Self, #delegate> }
                };

                quote! {
                    <#delegate as ::gantry::Options>::declare(
                        declarations,
                        &path.child(#step(#field_name_str, |target| &mut target.#field_name)),
                    )?;
                }
            }
            ParameterType::Inject { metadata } => {
                quote! {
                    declarations.inject(::gantry::Injection::new(path.leaf(
                        ::gantry::Slot::optional::<Self, #metadata>(#field_name_str, |target| &mut target.#field_name),
                    ))?);
                }
            }
        }
    }
}

fn value_type(convert: Option<Convert>, element: &DeriveValue) -> TokenStream2 {
    match convert {
        Some(Convert::Parse) => quote! { ::gantry::ValueType::parsed::<#element>() },
        Some(Convert::ValueOf) => quote! { ::gantry::ValueType::value_of::<#element>() },
        Some(Convert::Construct) => quote! { ::gantry::ValueType::constructed::<#element>() },
        None => quote! { <#element as ::gantry::Typed>::value_type() },
    }
}

fn slot(field_name: &syn::Ident, field_name_str: &str, binding: &Binding) -> TokenStream2 {
    let constructor = match binding {
        Binding::Scalar { element } => quote! { ::gantry::Slot::scalar::<Self, #element> },
        Binding::Optional { element } => quote! { ::gantry::Slot::optional::<Self, #element> },
        Binding::Collection { container, element } => {
            quote! { ::gantry::Slot::collection::<Self, #container, #element> }
        }
        Binding::OptionalCollection { container, element } => {
            quote! { ::gantry::Slot::optional_collection::<Self, #container, #element> }
        }
    };

    quote! {
        #constructor(#field_name_str, |target| &mut target.#field_name)
    }
}
