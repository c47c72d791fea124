use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;
use ttf_parser::{Face, PlatformId};

use crate::error::{Error, Result};

/// cmap subtables to read code points from, as (platform, encoding) pairs.
/// The first subtable that exists and is non-empty wins.
pub const CMAP_PRIORITY: [(u16, u16); 4] = [
    // Windows, Unicode full repertoire
    (3, 10),
    // Windows, Unicode BMP
    (3, 1),
    // Unicode 2.0 BMP
    (0, 3),
    // Windows, Symbol
    (3, 0),
];

/// Access to a font's character-to-glyph mapping
pub trait CharacterMap {
    /// Code points mapped by the subtable for `(platform_id, encoding_id)`,
    /// or `None` when the font has no such subtable
    fn codepoints(&self, platform_id: u16, encoding_id: u16) -> Option<BTreeSet<u32>>;
}

fn platform_number(platform_id: PlatformId) -> u16 {
    match platform_id {
        PlatformId::Unicode => 0,
        PlatformId::Macintosh => 1,
        PlatformId::Iso => 2,
        PlatformId::Windows => 3,
        PlatformId::Custom => 4,
    }
}

impl CharacterMap for Face<'_> {
    fn codepoints(&self, platform_id: u16, encoding_id: u16) -> Option<BTreeSet<u32>> {
        let cmap = self.tables().cmap?;
        let subtable = cmap.subtables.into_iter().find(|subtable| {
            platform_number(subtable.platform_id) == platform_id && subtable.encoding_id == encoding_id
        })?;

        let mut codepoints = BTreeSet::new();
        subtable.codepoints(|codepoint| {
            codepoints.insert(codepoint);
        });
        Some(codepoints)
    }
}

/// Code points of the preferred cmap subtable; empty when none exists
pub fn cmap_codepoints(cmap: &impl CharacterMap) -> BTreeSet<u32> {
    for (platform_id, encoding_id) in CMAP_PRIORITY {
        if let Some(codepoints) = cmap.codepoints(platform_id, encoding_id) {
            if !codepoints.is_empty() {
                debug!(
                    "Using cmap subtable ({}, {}) with {} code points",
                    platform_id,
                    encoding_id,
                    codepoints.len()
                );
                return codepoints;
            }
        }
    }
    debug!("No usable cmap subtable, no code points");
    BTreeSet::new()
}

/// Check if a file looks like an OpenType font or collection
pub fn is_valid_font_file(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_str().unwrap_or("").to_lowercase();
    if !matches!(ext.as_str(), "ttf" | "otf" | "ttc" | "otc") {
        debug!("Not a font file extension: {}", path.display());
        return false;
    }

    let Ok(mut file) = fs::File::open(path) else {
        return false;
    };
    let mut header = [0u8; 4];
    if file.read_exact(&mut header).is_err() {
        return false;
    }

    let is_valid_magic = header == [0x00, 0x01, 0x00, 0x00] // TrueType
        || &header == b"OTTO"
        || &header == b"true"
        || &header == b"ttcf";
    if !is_valid_magic {
        debug!("Invalid font header: {}", path.display());
    }
    is_valid_magic
}

/// Read the preferred cmap code points of face `face_index` in a font file
pub fn load_codepoints(path: &Path, face_index: u32) -> Result<BTreeSet<u32>> {
    if !path.is_file() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }
    if !is_valid_font_file(path) {
        return Err(Error::Font(format!("{} is not an OpenType font", path.display())));
    }

    let data = fs::read(path)?;
    let face = Face::parse(&data, face_index)
        .map_err(|e| Error::Font(format!("Failed to parse {}: {}", path.display(), e)))?;
    debug!("Loaded font {} (face {})", path.display(), face_index);
    Ok(cmap_codepoints(&face))
}
