mod base;
mod instance;
mod matcher;
mod state;
mod validate;

pub use base::*;
pub use instance::*;
pub use state::*;
pub use validate::*;
