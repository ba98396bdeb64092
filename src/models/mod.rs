pub mod diagnostic;
pub mod document;
pub mod merge;

pub use diagnostic::*;
pub use document::*;
pub use merge::*;
