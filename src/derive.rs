//! Derive Api for `gantry` configuration.
//!
//! ### Getting Started
//! Instrument each command struct with `#[derive(Default, Command)]`, and each reusable group of options with `#[derive(Default, Options)]`.
//! The derived [`Command`] also implements [`Options`](../trait.Options.html); do not derive both on the same struct.
//! Then, register the commands on a [`Cli`](../struct.Cli.html).
//!
//! ```
//! use gantry::derive::*;
//! use gantry::{Cli, CommandMetadata};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, Options)]
//! struct Common {
//!     #[gantry(option, flag = "-v", flag = "--verbose", scope = global)]
//!     verbose: bool,
//! }
//!
//! #[derive(Debug, Default, Command)]
//! #[gantry(name = "add", description = "Add a remote.")]
//! struct Add {
//!     #[gantry(delegate)]
//!     common: Common,
//!     #[gantry(option, flag = "-t", flag = "--track")]
//!     track: Vec<String>,
//!     #[gantry(arguments, title = "NAME", required)]
//!     name: Option<String>,
//! }
//!
//! #[derive(Debug, Default, Command)]
//! #[gantry(name = "list")]
//! struct List {
//!     #[gantry(delegate)]
//!     common: Common,
//!     #[gantry(inject)]
//!     command: Option<Arc<CommandMetadata>>,
//! }
//!
//! #[derive(Debug)]
//! enum Remote {
//!     Add(Add),
//!     List(List),
//! }
//!
//! let cli = Cli::<Remote>::builder("git")
//!     .group("remote", |group| {
//!         group
//!             .command(Remote::Add)
//!             .default_command(Remote::List)
//!     })
//!     .build()
//!     .unwrap();
//!
//! match cli.parse(&["remote", "add", "-t", "main", "-v", "origin"]).unwrap() {
//!     Remote::Add(add) => {
//!         assert!(add.common.verbose);
//!         assert_eq!(add.track, vec!["main".to_string()]);
//!         assert_eq!(add.name, Some("origin".to_string()));
//!     }
//!     Remote::List(_) => unreachable!(),
//! }
//!
//! match cli.parse(&["remote"]).unwrap() {
//!     Remote::List(list) => assert_eq!(list.command.unwrap().name(), "list"),
//!     Remote::Add(_) => unreachable!(),
//! }
//! ```
//!
//! ### Command Configuration
//! Struct attributes of a [`Command`]:
//! * `#[gantry(name = "..")]` (required) the command token.
//! * `#[gantry(description = "..")]`, `#[gantry(discussion = "..")]` help texts.
//! * `#[gantry(example = "..")]` a usage example; may be repeated.
//! * `#[gantry(hidden)]` hides the command from help renderers.
//!
//! [`Options`] structs take no struct attributes.
//!
//! ### Field Configuration
//! Each field is one of the following, and unannotated fields are left untouched.
//!
//! `#[gantry(option, ..)]` declares an option:
//! * `flag = "-x"`: a spelling; may be repeated. Defaults to the field name (ex: `dry_run` is `--dry-run`).
//! * `scope = global|group|command`: where the option is legal. Defaults to `command`.
//! * `arity = N`: the number of values per occurrence. Defaults to `0` for `bool`, and `1` otherwise.
//! * `required`, `hidden`.
//! * `allowed = ".."`: a closed set of allowed raw values; may be repeated.
//! * `title = ".."`, `description = ".."`.
//! * `convert = parse|value_of|construct`: convert via `FromStr`, `TryFrom<String>` or `From<String>`.
//! Without it, the element type must implement [`Typed`](../trait.Typed.html).
//!
//! `#[gantry(arguments, ..)]` declares the positional arguments (at most one definition per command):
//! * `required`, `title = ".."`, `description = ".."`, `usage = ".."`, `convert = ..` as above.
//!
//! The field type decides how values are written:
//! ```console
//! Type                 | Written
//! -----------------------------------------------
//! T                    | the last value
//! Option<T>            | Some(the last value)
//! Vec<T>, HashSet<T>,  | every value, appended
//!   BTreeSet<T>        |
//! Option<Vec<T>>, ..   | every value, appended to a lazily created collection
//! ```
//!
//! `#[gantry(delegate)]` declares a nested [`Options`] struct `T`.
//! When the field is an `Option<T>`, `T` is only created once one of its values is written.
//!
//! `#[gantry(inject)]` receives metadata: `Option<Arc<GlobalMetadata>>`, `Option<Arc<CommandGroupMetadata>>` or `Option<Arc<CommandMetadata>>`.
pub use gantry_derive::{Command, Options};
