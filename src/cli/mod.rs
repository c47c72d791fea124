//! Command-line interface handling

mod args;
mod commands;

pub use args::{parse_font_size, parse_unicodes, CliArgs, Command, ShapingArgs};
pub use commands::run;
