use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveCommand, DeriveOptions};

impl From<DeriveOptions> for TokenStream2 {
    fn from(value: DeriveOptions) -> Self {
        let DeriveOptions {
            struct_name,
            parameters,
        } = value;
        let fields = parameters
            .into_iter()
            .map(|parameter| parameter.generate())
            .collect::<Vec<_>>();

        quote! {
            impl ::gantry::Options for #struct_name {
                #[allow(unused_variables)]
                fn declare(
                    declarations: &mut ::gantry::Declarations,
                    path: &::gantry::AccessorPath,
                ) -> ::std::result::Result<(), ::gantry::DefinitionError> {
                    #( #fields )*
                    ::std::result::Result::Ok(())
                }
            }
        }
    }
}

impl From<DeriveCommand> for TokenStream2 {
    fn from(value: DeriveCommand) -> Self {
        let DeriveCommand {
            options,
            name,
            description,
            discussion,
            examples,
            hidden,
        } = value;
        let struct_name = options.struct_name.clone();
        let options = TokenStream2::from(options);
        let description = description.map(|d| quote! { .description(#d) });
        let discussion = discussion.map(|d| quote! { .discussion(#d) });
        let hidden = hidden.then(|| quote! { .hidden(true) });

        quote! {
            #options

            impl ::gantry::Command for #struct_name {
                fn details() -> ::gantry::CommandDetails {
                    ::gantry::CommandDetails::new(#name)
                        #description
                        #discussion
                        #( .example(#examples) )*
                        #hidden
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binding, DeriveParameter, DeriveValue, ParameterType};
    use proc_macro2::Span;

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }

    fn value(tokens: TokenStream2) -> DeriveValue {
        DeriveValue { tokens }
    }

    #[test]
    fn render_options_empty() {
        // Setup
        let options = DeriveOptions {
            struct_name: ident("Common"),
            parameters: vec![],
        };

        // Execute
        let token_stream = TokenStream2::from(options);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                impl ::gantry::Options for Common {
                    #[allow(unused_variables)]
                    fn declare(
                        declarations: &mut ::gantry::Declarations,
                        path: &::gantry::AccessorPath,
                    ) -> ::std::result::Result<(), ::gantry::DefinitionError> {
                        ::std::result::Result::Ok(())
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_command() {
        // Setup
        let command = DeriveCommand {
            options: DeriveOptions {
                struct_name: ident("Build"),
                parameters: vec![DeriveParameter {
                    field_name: ident("common"),
                    parameter_type: ParameterType::Delegate {
                        lazy: false,
                        delegate: value(quote! { Common }),
                    },
                }],
            },
            name: value(quote! { "build" }),
            description: Some(value(quote! { "Build it." })),
            discussion: None,
            examples: vec![value(quote! { "build -o a" })],
            hidden: true,
        };

        // Execute
        let token_stream = TokenStream2::from(command);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                impl ::gantry::Options for Build {
                    #[allow(unused_variables)]
                    fn declare(
                        declarations: &mut ::gantry::Declarations,
                        path: &::gantry::AccessorPath,
                    ) -> ::std::result::Result<(), ::gantry::DefinitionError> {
                        <Common as ::gantry::Options>::declare(
                            declarations,
                            &path.child(::gantry::Step::field::<Self, Common>("common", |target| &mut target.common)),
                        )?;
                        ::std::result::Result::Ok(())
                    }
                }

                impl ::gantry::Command for Build {
                    fn details() -> ::gantry::CommandDetails {
                        ::gantry::CommandDetails::new("build")
                            .description("Build it.")
                            .example("build -o a")
                            .hidden(true)
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_options_scalar() {
        let options = DeriveOptions {
            struct_name: ident("Common"),
            parameters: vec![DeriveParameter {
                field_name: ident("level"),
                parameter_type: ParameterType::Option {
                    scope: value(quote! { ::gantry::Scope::Command }),
                    flags: vec![value(quote! { "--level" })],
                    title: None,
                    description: None,
                    arity: None,
                    required: false,
                    hidden: false,
                    allowed: vec![],
                    convert: None,
                    binding: Binding::Optional {
                        element: value(quote! { u8 }),
                    },
                },
            }],
        };

        let token_stream = TokenStream2::from(options).to_string();

        assert!(token_stream.contains(
            &quote! { ::gantry::Slot::optional::<Self, u8>("level", |target| &mut target.level) }
                .to_string()
        ));
    }
}
