//! Conversion between Unicode script codes and OpenType script tags

pub mod resolver;
pub mod table;

pub use resolver::ScriptResolver;
pub use table::{TagTable, UnicodeTagTable};
