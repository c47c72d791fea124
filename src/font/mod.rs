//! Font file access: character maps and installed font lookup

pub mod cmap;
pub mod source;

pub use cmap::{cmap_codepoints, is_valid_font_file, load_codepoints, CharacterMap, CMAP_PRIORITY};
pub use source::{postscript_name, resolve_system_font, FontLocation};
