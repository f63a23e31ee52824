use crate::model::DeriveValue;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;

mod parameter;
mod parser;

impl ToTokens for DeriveValue {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        self.tokens.to_tokens(tokens);
    }
}
