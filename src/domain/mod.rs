pub mod gpo;
pub mod options;
pub mod selector;

pub use gpo::*;
pub use options::*;
pub use selector::*;
