use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let mut attributes = IntermediateAttributes::default();

        for expression in value.parse_args_with(attributes_parser)? {
            attributes.absorb(expression)?;
        }

        Ok(attributes)
    }
}

impl IntermediateAttributes {
    /// Collect every `#[gantry(..)]` attribute of an item, ignoring foreign attributes.
    pub(crate) fn collect(attrs: &[syn::Attribute]) -> Result<Self, syn::Error> {
        let mut attributes = IntermediateAttributes::default();

        for attribute in attrs {
            if attribute.path().is_ident("gantry") {
                let other = IntermediateAttributes::try_from(attribute)?;
                attributes.singletons.extend(other.singletons);

                for (name, values) in other.pairs {
                    attributes.pairs.entry(name).or_default().extend(values);
                }
            }
        }

        Ok(attributes)
    }

    fn absorb(&mut self, expression: syn::Expr) -> Result<(), syn::Error> {
        if let syn::Expr::Assign(assignment) = &expression {
            let left = assignment.left.to_token_stream();
            self.pairs
                .entry(left.to_string())
                .or_default()
                .push(DeriveValue {
                    tokens: assignment.right.to_token_stream(),
                });
            return Ok(());
        }

        if let syn::Expr::Path(path) = &expression {
            if let Some(ident) = path.path.get_ident() {
                self.singletons.insert(ident.to_string());
                return Ok(());
            }
        }

        Err(syn::Error::new_spanned(
            &expression,
            format!("Unparseable attribute: {}", expression.to_token_stream()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Literal;
    use std::collections::{HashMap, HashSet};
    use syn::parse_quote;

    #[test]
    fn construct_attributes_empty() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[gantry()]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(attributes, IntermediateAttributes::default());
    }

    #[test]
    fn construct_attributes() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[gantry(option, flag = "-v", flag = "--verbose")]
        };

        // Execute
        let attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            attributes,
            IntermediateAttributes {
                singletons: HashSet::from(["option".to_string()]),
                pairs: HashMap::from([(
                    "flag".to_string(),
                    vec![
                        DeriveValue {
                            tokens: Literal::string("-v").into_token_stream(),
                        },
                        DeriveValue {
                            tokens: Literal::string("--verbose").into_token_stream(),
                        },
                    ]
                )]),
            }
        );
    }

    #[test]
    fn collect_attributes() {
        // Setup
        let item: syn::ItemStruct = parse_quote! {
            #[derive(Default)]
            #[gantry(name = "build")]
            #[gantry(hidden, example = "build -o dist")]
            struct Build {}
        };

        // Execute
        let attributes = IntermediateAttributes::collect(&item.attrs).unwrap();

        // Verify
        assert_eq!(attributes.singletons, HashSet::from(["hidden".to_string()]));
        assert_eq!(attributes.pairs.len(), 2);
        assert_eq!(attributes.pairs["name"].len(), 1);
        assert_eq!(attributes.pairs["example"].len(), 1);
    }

    #[test]
    fn construct_attributes_invalid() {
        let attribute: syn::Attribute = parse_quote! {
            #[gantry]
        };

        assert!(IntermediateAttributes::try_from(&attribute).is_err());
    }

    #[test]
    fn construct_attributes_invalid_expression() {
        let attribute: syn::Attribute = parse_quote! {
            #[gantry(1 + 2)]
        };

        let error = IntermediateAttributes::try_from(&attribute).unwrap_err();

        assert_eq!(error.to_string(), "Unparseable attribute: 1 + 2");
    }
}
