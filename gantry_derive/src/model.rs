use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub(crate) struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.to_string() == other.tokens.to_string()
    }
}

impl Eq for DeriveValue {}

/// The raw content of the `#[gantry(..)]` attributes on one item.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

/// How a field holds its element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    Scalar {
        element: DeriveValue,
    },
    Optional {
        element: DeriveValue,
    },
    Collection {
        container: DeriveValue,
        element: DeriveValue,
    },
    OptionalCollection {
        container: DeriveValue,
        element: DeriveValue,
    },
}

impl Binding {
    pub(crate) fn element(&self) -> &DeriveValue {
        match self {
            Binding::Scalar { element }
            | Binding::Optional { element }
            | Binding::Collection { element, .. }
            | Binding::OptionalCollection { element, .. } => element,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Convert {
    Parse,
    ValueOf,
    Construct,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParameterType {
    Option {
        scope: DeriveValue,
        flags: Vec<DeriveValue>,
        title: Option<DeriveValue>,
        description: Option<DeriveValue>,
        arity: Option<DeriveValue>,
        required: bool,
        hidden: bool,
        allowed: Vec<DeriveValue>,
        convert: Option<Convert>,
        binding: Binding,
    },
    Arguments {
        title: Option<DeriveValue>,
        description: Option<DeriveValue>,
        usage: Option<DeriveValue>,
        required: bool,
        convert: Option<Convert>,
        binding: Binding,
    },
    Delegate {
        lazy: bool,
        delegate: DeriveValue,
    },
    Inject {
        metadata: DeriveValue,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DeriveParameter {
    pub field_name: syn::Ident,
    pub parameter_type: ParameterType,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DeriveOptions {
    pub struct_name: syn::Ident,
    pub parameters: Vec<DeriveParameter>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DeriveCommand {
    pub options: DeriveOptions,
    pub name: DeriveValue,
    pub description: Option<DeriveValue>,
    pub discussion: Option<DeriveValue>,
    pub examples: Vec<DeriveValue>,
    pub hidden: bool,
}
