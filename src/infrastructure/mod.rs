pub mod command;
pub mod decode;
pub mod diagnostics;
pub mod executor;

pub use command::{OutputMode, PsCommand, MODULE_CHECK_COMMAND, MODULE_INSTALLED_MARKER};
pub use decode::*;
pub use diagnostics::*;
pub use executor::*;
