use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::models::{Config, Direction, FontSize, ImageFormat};

/// Tools for OpenType Layout FEA code and the HarfBuzz utilities
#[derive(Parser, Debug)]
#[command(name = "fealab", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Enable debug output
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add languagesystem declarations for the scripts a font covers
    Sync {
        /// FEA file to update
        fea: PathBuf,
        /// Font whose cmap lists the supported characters
        #[arg(long)]
        font: Option<PathBuf>,
        /// Face index within a font collection
        #[arg(long, default_value_t = 0)]
        face_index: u32,
        /// Extra code points, e.g. "U+0041,0x20AC,0400-04FF"
        #[arg(long)]
        unicodes: Option<String>,
        /// Write here instead of printing to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace an existing output file
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Synchronize every FEA file listed in a batch file, in parallel
    Batch {
        /// One job per line: input.fea [font.ttf] [-> output.fea]
        file: PathBuf,
        /// Replace existing output files
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Print OpenType script tags for ISO 15924 or OpenType tags (all scripts when none given)
    Scripts {
        tags: Vec<String>,
    },
    /// Shape text with hb-shape and print the glyph records as JSON
    Shape {
        text: String,
        #[command(flatten)]
        shaping: ShapingArgs,
    },
    /// Render text with hb-view
    Render {
        text: String,
        #[command(flatten)]
        shaping: ShapingArgs,
        #[arg(long, value_enum, default_value_t = ImageFormat::Svg)]
        format: ImageFormat,
        /// Font size in points, or "upem"
        #[arg(long)]
        font_size: Option<String>,
        /// Write the image here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the shapers hb-shape supports
    Shapers,
}

/// Font and shaping options shared by `shape` and `render`
#[derive(Args, Debug, Clone, Default)]
pub struct ShapingArgs {
    /// Font file
    #[arg(long, conflicts_with = "family")]
    pub font: Option<PathBuf>,
    /// Installed font family name
    #[arg(long)]
    pub family: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub face_index: u32,
    /// JSON file with shaping options
    #[arg(long)]
    pub options: Option<PathBuf>,
    /// Comma separated feature settings, e.g. "+kern,-liga,aalt[3:5]=2"
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,
    #[arg(long, value_enum)]
    pub direction: Option<Direction>,
    /// ISO 15924 script tag
    #[arg(long)]
    pub script: Option<String>,
    /// BCP 47 language tag
    #[arg(long)]
    pub language: Option<String>,
    /// Print glyph indices instead of names
    #[arg(long, default_value_t = false)]
    pub glyph_indexes: bool,
}

impl CliArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let overwrite = match &self.command {
            Command::Sync { overwrite, .. } | Command::Batch { overwrite, .. } => *overwrite,
            _ => false,
        };
        Config {
            overwrite,
            ..Config::new(self.debug)
        }
    }
}

/// Parse a font size argument
pub fn parse_font_size(value: &str) -> Result<FontSize> {
    value.parse()
}

fn parse_codepoint(value: &str) -> Result<u32> {
    let hex = value
        .trim()
        .trim_start_matches("U+")
        .trim_start_matches("u+")
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    let codepoint = u32::from_str_radix(hex, 16)
        .map_err(|_| Error::Config(format!("Invalid code point '{}'", value)))?;
    if codepoint > 0x10FFFF {
        return Err(Error::Config(format!("Code point '{}' is out of range", value)));
    }
    Ok(codepoint)
}

/// Parse a comma separated list of hex code points and ranges,
/// e.g. `U+0041,0x20AC,0400-04FF`
pub fn parse_unicodes(value: &str) -> Result<BTreeSet<u32>> {
    let mut codepoints = BTreeSet::new();
    for item in value.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        match item.split_once('-') {
            Some((start, end)) => {
                let start = parse_codepoint(start)?;
                let end = parse_codepoint(end)?;
                if start > end {
                    return Err(Error::Config(format!("Empty code point range '{}'", item)));
                }
                codepoints.extend(start..=end);
            }
            None => {
                codepoints.insert(parse_codepoint(item)?);
            }
        }
    }
    Ok(codepoints)
}
