//! Builder module for `gantry`.
//! See [documentation root](https://docs.rs/gantry/latest/gantry/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod error;
mod metadata;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use error::*;
pub use metadata::*;
pub use model::*;
pub use parser::{InstanceBuilder, ParseState, ParsedOption, Parser, Validator};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
