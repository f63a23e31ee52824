use crate::model::{DeriveCommand, DeriveOptions, DeriveParameter, IntermediateAttributes};

fn load_parameters(value: &syn::DeriveInput) -> Result<Vec<DeriveParameter>, syn::Error> {
    match &value.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => Ok(fields
            .named
            .iter()
            .map(DeriveParameter::load)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect()),
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Unit,
            ..
        }) => Ok(Vec::default()),
        _ => Err(syn::Error::new(
            value.ident.span(),
            format!(
                "Invalid - `{}` must be a struct with named fields.",
                value.ident
            ),
        )),
    }
}

impl TryFrom<syn::DeriveInput> for DeriveOptions {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        attributes.allow_only(&value.ident, &[], &[])?;

        Ok(DeriveOptions {
            struct_name: value.ident.clone(),
            parameters: load_parameters(&value)?,
        })
    }
}

impl TryFrom<syn::DeriveInput> for DeriveCommand {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let context = &value.ident;
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        attributes.allow_only(
            context,
            &["hidden"],
            &["name", "description", "discussion", "example"],
        )?;

        let name = match attributes.single(context, "name")? {
            Some(name) => name,
            None => {
                return Err(syn::Error::new(
                    context.span(),
                    format!("Invalid - `{context}` must declare `#[gantry(name = ..)]`."),
                ))
            }
        };

        Ok(DeriveCommand {
            options: DeriveOptions {
                struct_name: context.clone(),
                parameters: load_parameters(&value)?,
            },
            name,
            description: attributes.single(context, "description")?,
            discussion: attributes.single(context, "discussion")?,
            examples: attributes.repeated("example"),
            hidden: attributes.has("hidden"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binding, DeriveValue, ParameterType};
    use proc_macro2::Span;
    use quote::quote;

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }

    fn value(tokens: proc_macro2::TokenStream) -> DeriveValue {
        DeriveValue { tokens }
    }

    #[test]
    fn construct_options_empty() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Default, Options)]
                struct Common { }
            "#,
        )
        .unwrap();

        // Execute
        let options = DeriveOptions::try_from(input).unwrap();

        // Verify
        assert_eq!(
            options,
            DeriveOptions {
                struct_name: ident("Common"),
                parameters: vec![],
            }
        );
    }

    #[test]
    fn construct_options_unit() {
        let input: syn::DeriveInput = syn::parse_str("struct Common;").unwrap();

        let options = DeriveOptions::try_from(input).unwrap();

        assert!(options.parameters.is_empty());
    }

    #[test]
    fn construct_options() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Default, Options)]
                struct Common {
                    #[gantry(option, scope = global)]
                    verbose: bool,
                    cache: Vec<String>,
                }
            "#,
        )
        .unwrap();

        // Execute
        let options = DeriveOptions::try_from(input).unwrap();

        // Verify
        assert_eq!(options.struct_name, ident("Common"));
        assert_eq!(options.parameters.len(), 1);
        assert_eq!(options.parameters[0].field_name, ident("verbose"));
        assert_matches_option(&options.parameters[0].parameter_type);
    }

    fn assert_matches_option(parameter_type: &ParameterType) {
        match parameter_type {
            ParameterType::Option { scope, binding, .. } => {
                assert_eq!(scope, &value(quote! { ::gantry::Scope::Global }));
                assert_eq!(
                    binding,
                    &Binding::Scalar {
                        element: value(quote! { bool })
                    }
                );
            }
            other => panic!("expected an option, found {other:?}"),
        }
    }

    #[test]
    fn construct_command() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(Default, Command)]
                #[gantry(name = "build", description = "Build it.", example = "build -o a", example = "build -o b", hidden)]
                struct Build {
                    #[gantry(arguments)]
                    files: Vec<String>,
                }
            "#,
        )
        .unwrap();

        // Execute
        let command = DeriveCommand::try_from(input).unwrap();

        // Verify
        assert_eq!(command.options.struct_name, ident("Build"));
        assert_eq!(command.options.parameters.len(), 1);
        assert_eq!(command.name, value(quote! { "build" }));
        assert_eq!(command.description, Some(value(quote! { "Build it." })));
        assert_eq!(command.discussion, None);
        assert_eq!(
            command.examples,
            vec![value(quote! { "build -o a" }), value(quote! { "build -o b" })]
        );
        assert!(command.hidden);
    }

    #[test]
    fn construct_command_nameless() {
        let input: syn::DeriveInput = syn::parse_str("struct Build { }").unwrap();

        let error = DeriveCommand::try_from(input).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid - `Build` must declare `#[gantry(name = ..)]`."
        );
    }

    #[test]
    fn construct_options_struct_attribute() {
        let input: syn::DeriveInput =
            syn::parse_str(r#"#[gantry(name = "common")] struct Common { }"#).unwrap();

        let error = DeriveOptions::try_from(input).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid - `Common` does not support `#[gantry(name)]`."
        );
    }

    #[test]
    fn construct_tuple() {
        let input: syn::DeriveInput = syn::parse_str("struct Common(u32);").unwrap();

        let error = DeriveOptions::try_from(input).unwrap_err();

        assert_eq!(
            error.to_string(),
            "Invalid - `Common` must be a struct with named fields."
        );
    }
}
