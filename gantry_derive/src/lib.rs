extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::{DeriveCommand, DeriveOptions};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Implement `gantry::Options`, declaring the annotated fields of a struct.
#[proc_macro_derive(Options, attributes(gantry))]
pub fn options(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveOptions::try_from(derive_input) {
        Ok(options) => TokenStream2::from(options).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Implement `gantry::Command` (and `gantry::Options`) for a struct.
#[proc_macro_derive(Command, attributes(gantry))]
pub fn command(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveCommand::try_from(derive_input) {
        Ok(command) => TokenStream2::from(command).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
