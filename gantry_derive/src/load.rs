use crate::model::{DeriveValue, IntermediateAttributes};

mod attribute;
mod parameter;
mod parser;

pub(self) fn incompatible_error(
    context: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        context.span(),
        format!(
            "Invalid - `{context}` cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

impl IntermediateAttributes {
    /// Reject any attribute outside of `singletons`/`pairs`.
    pub(self) fn allow_only(
        &self,
        context: &syn::Ident,
        singletons: &[&str],
        pairs: &[&str],
    ) -> Result<(), syn::Error> {
        let mut unknown: Vec<&String> = self
            .singletons
            .iter()
            .filter(|s| !singletons.contains(&s.as_str()))
            .chain(self.pairs.keys().filter(|p| !pairs.contains(&p.as_str())))
            .collect();
        unknown.sort();

        match unknown.first() {
            Some(name) => Err(syn::Error::new(
                context.span(),
                format!("Invalid - `{context}` does not support `#[gantry({name})]`."),
            )),
            None => Ok(()),
        }
    }

    /// The value of a pair which may be given at most once.
    pub(self) fn single(
        &self,
        context: &syn::Ident,
        name: &str,
    ) -> Result<Option<DeriveValue>, syn::Error> {
        match self.pairs.get(name).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([value]) => Ok(Some(value.clone())),
            Some(_) => Err(syn::Error::new(
                context.span(),
                format!("Invalid - `{context}` cannot repeat `#[gantry({name} = ..)]`."),
            )),
        }
    }

    /// Every value of a repeatable pair, in declaration order.
    pub(self) fn repeated(&self, name: &str) -> Vec<DeriveValue> {
        self.pairs.get(name).cloned().unwrap_or_default()
    }

    pub(self) fn has(&self, name: &str) -> bool {
        self.singletons.contains(name)
    }
}
