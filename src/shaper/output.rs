use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Glyph identifier in `hb-shape` output: a name, or an index when glyph
/// names are turned off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Glyph {
    Index(u32),
    Name(String),
}

/// One shaped glyph as printed by `hb-shape --output-format=json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    /// Glyph name or index
    #[serde(rename = "g")]
    pub glyph: Glyph,
    /// Cluster index
    #[serde(rename = "cl", default)]
    pub cluster: u32,
    #[serde(rename = "dx", default)]
    pub x_offset: f64,
    #[serde(rename = "dy", default)]
    pub y_offset: f64,
    #[serde(rename = "ax", default)]
    pub x_advance: f64,
    #[serde(rename = "ay", default)]
    pub y_advance: f64,
}

/// Glyph records of one input line
pub type ShapedLine = Vec<GlyphRecord>;

/// Parse `hb-shape` JSON output. HarfBuzz prints one array per input line.
pub fn parse_glyph_records(output: &str) -> Result<Vec<ShapedLine>> {
    let mut lines = Vec::new();
    for line in serde_json::Deserializer::from_str(output).into_iter::<ShapedLine>() {
        lines.push(line?);
    }
    Ok(lines)
}

/// What `hb-view` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutput {
    /// The image was written to this file
    File(PathBuf),
    /// Raw image data from stdout
    Bytes(Vec<u8>),
}
