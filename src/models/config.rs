use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a feaLab run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable debug output
    pub debug_mode: bool,
    /// Replace existing output files
    pub overwrite: bool,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new(debug_mode: bool) -> Self {
        Self {
            debug_mode,
            overwrite: false,
        }
    }
}

/// Text direction passed to the shaper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
    Ttb,
    Btt,
    #[default]
    Auto,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ltr => write!(f, "ltr"),
            Direction::Rtl => write!(f, "rtl"),
            Direction::Ttb => write!(f, "ttb"),
            Direction::Btt => write!(f, "btt"),
            Direction::Auto => write!(f, "auto"),
        }
    }
}

/// Font size for shaping and rendering
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// Units per em of the font
    #[default]
    Upem,
    #[serde(untagged)]
    Points(f32),
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Upem => write!(f, "upem"),
            FontSize::Points(size) => write!(f, "{}", size),
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("upem") {
            return Ok(FontSize::Upem);
        }
        s.parse::<f32>()
            .map(FontSize::Points)
            .map_err(|_| Error::Config(format!("Invalid font size '{}'", s)))
    }
}

/// Margin around rendered output, one to four numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Margin {
    Uniform(u32),
    Sides(Vec<u32>),
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Sides(vec![16, 16, 16, 16])
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Margin::Uniform(margin) => write!(f, "{}", margin),
            Margin::Sides(sides) => {
                let sides: Vec<String> = sides.iter().map(|side| side.to_string()).collect();
                write!(f, "{}", sides.join(" "))
            }
        }
    }
}

/// Output formats understood by `hb-view`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Svg,
    Png,
    Pdf,
    Ps,
    Eps,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Svg => write!(f, "svg"),
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Pdf => write!(f, "pdf"),
            ImageFormat::Ps => write!(f, "ps"),
            ImageFormat::Eps => write!(f, "eps"),
        }
    }
}

/// Options for `hb-shape` and `hb-view`.
///
/// Field defaults mirror the defaults of the HarfBuzz utilities, except for
/// `language` which defaults to English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    /// Shapers to try, in order
    pub shapers: Vec<String>,
    pub font_file: Option<PathBuf>,
    pub face_index: u32,
    pub font_size: FontSize,
    /// Input text
    pub text: String,
    /// Read input text from a file instead of `text`
    pub text_file: Option<PathBuf>,
    pub direction: Direction,
    /// BCP 47 language tag
    pub language: String,
    /// ISO 15924 script tag; `None` lets the shaper guess
    pub script: Option<String>,
    /// Feature settings such as `aalt[3:5]=2`, `+kern`, `-liga`
    pub features: Vec<String>,
    /// Treat text as beginning of paragraph
    pub bot: bool,
    /// Treat text as end of paragraph
    pub eot: bool,
    pub text_before: String,
    pub text_after: String,
    pub preserve_default_ignorables: bool,
    /// Cluster indices are UTF-8 byte offsets instead of char offsets
    pub utf8_clusters: bool,
    /// Cluster merging level, 0 to 2
    pub cluster_level: u8,
    pub normalize_glyphs: bool,
    pub num_iterations: u32,
    /// Output glyph indices instead of glyph names
    pub use_glyph_indexes: bool,
    pub annotate: bool,
    pub background: String,
    pub foreground: String,
    pub line_space: i32,
    pub margin: Margin,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            shapers: vec!["ot".to_string()],
            font_file: None,
            face_index: 0,
            font_size: FontSize::Upem,
            text: String::new(),
            text_file: None,
            direction: Direction::Auto,
            language: "en".to_string(),
            script: None,
            features: Vec::new(),
            bot: false,
            eot: false,
            text_before: String::new(),
            text_after: String::new(),
            preserve_default_ignorables: false,
            utf8_clusters: false,
            cluster_level: 0,
            normalize_glyphs: false,
            num_iterations: 1,
            use_glyph_indexes: false,
            annotate: false,
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
            line_space: 0,
            margin: Margin::default(),
        }
    }
}

impl ShapeOptions {
    /// Load options from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: ShapeOptions = serde_json::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject option values the HarfBuzz utilities would refuse
    pub fn validate(&self) -> Result<()> {
        if self.cluster_level > 2 {
            return Err(Error::Config(format!(
                "cluster_level must be 0, 1 or 2, got {}",
                self.cluster_level
            )));
        }
        if self.num_iterations == 0 {
            return Err(Error::Config("num_iterations must be at least 1".to_string()));
        }
        if let Margin::Sides(sides) = &self.margin {
            if sides.is_empty() || sides.len() > 4 {
                return Err(Error::Config(format!(
                    "margin takes one to four numbers, got {}",
                    sides.len()
                )));
            }
        }
        if self.shapers.is_empty() {
            return Err(Error::Config("at least one shaper is required".to_string()));
        }
        Ok(())
    }
}
