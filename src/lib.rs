//! feaLab: tools for OpenType Layout FEA code and the HarfBuzz utilities.
//!
//! - [`script`] converts between ISO 15924 script codes and OpenType script tags
//! - [`fea`] keeps the `languagesystem` declarations of FEA code in sync with a font
//! - [`shaper`] wraps the `hb-shape` and `hb-view` command line tools

pub mod cli;
pub mod error;
pub mod fea;
pub mod font;
pub mod models;
pub mod script;
pub mod shaper;
pub mod utils;

pub use error::{Error, Result};
pub use fea::LanguageSystemSync;
pub use models::{LanguageSystem, ScriptTag, ShapeOptions};
pub use script::{ScriptResolver, TagTable, UnicodeTagTable};
pub use shaper::HarfBuzzRenderer;
