pub mod document;
pub mod xml;

pub use document::*;
pub use xml::*;
