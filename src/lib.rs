//! `gantry` is a declarative command line parser for Rust.
//!
//! A program is described as a grammar of *global options*, optional *command groups*, *commands*, their *options* and their positional *arguments*:
//! ```console
//! program [global options] [group [group options]] command [options] [arguments]
//! ```
//! Each command is a plain struct.
//! `gantry` parses the command line tokens into an instance of that struct, or a single structured [`ParseError`].
//!
//! `gantry` attempts to prioritize the following design concerns:
//! * *Declarative configuration*:
//! The grammar lives on the structs themselves, via the [derive Api](./derive/index.html), or is assembled by hand via the builder Api.
//! * *Type safe values*:
//! The user never converts a `&str` to `T` directly.
//! Values convert at parse time, via [`Typed`] for the common types, or [`std::str::FromStr`], [`TryFrom<String>`] and [`From<String>`] for your own.
//! * *Shared options*:
//! Options may be declared on reusable structs (*delegates*), embedded in many commands.
//! Declarations of the same flags in the same scope merge into one logical option, written to every delegate.
//! * *Conventional syntax*:
//! `--name value`, `--name=value` and combined short flags `-abc` are all supported, along with the `--` separator.
//!
//! Help rendering, shell completion and process exit codes are left to the caller.
//! They consume the read-only metadata ([`Cli::metadata`]) and parse state ([`Cli::parse_state`]).
//!
//! # Usage
//! via [derive Api](./derive/index.html):
//! ```
//! use gantry::derive::*;
//! use gantry::Cli;
//!
//! #[derive(Debug, Default, Options)]
//! struct Common {
//!     #[gantry(option, flag = "-v", flag = "--verbose", scope = global)]
//!     verbose: bool,
//! }
//!
//! #[derive(Debug, Default, Command)]
//! #[gantry(name = "sum", description = "Sum the items.")]
//! struct Sum {
//!     #[gantry(delegate)]
//!     common: Common,
//!     #[gantry(arguments, required)]
//!     items: Vec<u32>,
//! }
//!
//! let cli = Cli::<Sum>::builder("summer")
//!     .command(|sum: Sum| sum)
//!     .build()
//!     .expect("the program definition must be valid");
//!
//! let sum = cli.parse(&["-v", "sum", "1", "2", "3"]).unwrap();
//! assert!(sum.common.verbose);
//! assert_eq!(sum.items.iter().sum::<u32>(), 6);
//!
//! let error = cli.parse(&["sum", "1", "blah"]).unwrap_err();
//! assert_eq!(error.to_string(), "'blah' cannot convert to u32 for 'items'.");
//! ```
//!
//! # Builder Api
//! The derive Api generates implementations of the [`Options`] and [`Command`] traits.
//! These traits may be implemented by hand, describing each option via [`OptionMetadata::builder`] and each arguments definition via [`ArgumentsMetadata::builder`].
//! Every value is written through an [`Accessor`]: the path from the command struct, down through its delegates, to the field receiving the value.
//! Commands may also be described without any trait, via [`CommandMetadata::builder`] and [`CliBuilder::command_with`].
//!
//! ### Scopes
//! Each option declares a [`Scope`]:
//! * [`Scope::Global`] options are legal anywhere on the command line.
//! * [`Scope::Group`] options are legal after the group token.
//! * [`Scope::Command`] options are legal only after the command token.
//!
//! ### Defaults
//! [`CliBuilder::default_command`] names the command used when no command token is given.
//! Each group may also have its own default command, via [`GroupBuilder::default_command`].
//!
//! ### Metadata
//! A command may receive the metadata it was parsed against (ex: for rendering its own help).
//! Declare an `Option<Arc<GlobalMetadata>>`, `Option<Arc<CommandGroupMetadata>>` or `Option<Arc<CommandMetadata>>` field as an [`Injection`].
//!
//! # Features
//! * `tracing_debug`: emit `tracing::debug!` events for the grammar transitions and option merging.
#![deny(missing_docs)]

pub use gantry_builder::*;

pub mod derive;
