//! Wrappers around the HarfBuzz `hb-shape` and `hb-view` utilities

pub mod args;
pub mod output;
pub mod renderer;

pub use args::{common_args, shape_args, view_args};
pub use output::{parse_glyph_records, Glyph, GlyphRecord, ImageOutput, ShapedLine};
pub use renderer::{select_os_shaper, HarfBuzzRenderer};
