mod command;
mod merge;
mod option;
mod program;

pub use command::*;
pub(crate) use merge::*;
pub use option::*;
pub use program::*;
