use std::path::PathBuf;

use font_kit::family_name::FamilyName;
use font_kit::font::Font;
use font_kit::handle::Handle;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use log::debug;

use crate::error::{Error, Result};

/// A font file on disk plus the face to use within it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLocation {
    pub path: PathBuf,
    pub face_index: u32,
}

/// Find an installed font by family name.
///
/// The HarfBuzz utilities only take file paths, so in-memory system fonts
/// are reported as errors.
pub fn resolve_system_font(family: &str) -> Result<FontLocation> {
    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Title(family.to_string())], &Properties::new())
        .map_err(|e| Error::Font(format!("No installed font for family '{}': {}", family, e)))?;

    match handle {
        Handle::Path { path, font_index } => {
            debug!("Resolved family '{}' to {} (face {})", family, path.display(), font_index);
            Ok(FontLocation {
                path,
                face_index: font_index,
            })
        }
        Handle::Memory { .. } => Err(Error::Font(format!(
            "Font family '{}' is only available in memory",
            family
        ))),
    }
}

/// PostScript name of a font file, for log output
pub fn postscript_name(location: &FontLocation) -> Option<String> {
    Font::from_path(&location.path, location.face_index)
        .ok()
        .and_then(|font| font.postscript_name())
}
