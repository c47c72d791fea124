//! Unicode / OpenType script tag tables
//!
//! The conversion rules follow HarfBuzz
//! <https://github.com/harfbuzz/harfbuzz/blob/main/src/hb-ot-tag.cc>
//! and the fontTools `OTTags` tables.

use std::collections::BTreeSet;

use rayon::prelude::*;
use unicode_script::{Script, UnicodeScript};

use crate::models::ScriptTag;

/// Lookups between Unicode scripts and OpenType script tags.
///
/// Implementors are passed explicitly to [`ScriptResolver`](super::ScriptResolver),
/// so a different Unicode version or a test double can be swapped in.
pub trait TagTable {
    /// Resolve an OpenType (or ISO) tag to its ISO 15924 script code
    fn tag_to_script(&self, tag: &ScriptTag) -> Option<ScriptTag>;

    /// OpenType tags for an ISO 15924 script code, primary tag first
    fn script_to_tags(&self, script: &ScriptTag) -> Vec<ScriptTag>;

    /// Unicode Script property of a code point, as ISO 15924 code
    fn script_of_codepoint(&self, codepoint: u32) -> ScriptTag;

    /// Every ISO 15924 script code the table knows about, sorted
    fn known_scripts(&self) -> Vec<ScriptTag>;
}

// Sorted by key; looked up with binary search.
static SCRIPT_EXCEPTIONS: &[(&[u8; 4], &[u8; 4])] = &[
    (b"Hira", b"kana"),
    (b"Hrkt", b"kana"),
    (b"Laoo", b"lao "),
    (b"Nkoo", b"nko "),
    (b"Vaii", b"vai "),
    (b"Yiii", b"yi  "),
    (b"Zinh", b"DFLT"),
    (b"Zmth", b"math"),
    (b"Zyyy", b"DFLT"),
    (b"Zzzz", b"DFLT"),
];

static NEW_SCRIPT_TAGS: &[(&[u8; 4], &[u8; 4])] = &[
    (b"Beng", b"bng2"),
    (b"Deva", b"dev2"),
    (b"Gujr", b"gjr2"),
    (b"Guru", b"gur2"),
    (b"Knda", b"knd2"),
    (b"Mlym", b"mlm2"),
    (b"Mymr", b"mym2"),
    (b"Orya", b"ory2"),
    (b"Taml", b"tml2"),
    (b"Telu", b"tel2"),
];

static NEW_SCRIPTS: &[(&[u8; 4], &[u8; 4])] = &[
    (b"bng2", b"Beng"),
    (b"dev2", b"Deva"),
    (b"gjr2", b"Gujr"),
    (b"gur2", b"Guru"),
    (b"knd2", b"Knda"),
    (b"mlm2", b"Mlym"),
    (b"mym2", b"Mymr"),
    (b"ory2", b"Orya"),
    (b"tel2", b"Telu"),
    (b"tml2", b"Taml"),
];

fn lookup(table: &[(&[u8; 4], &[u8; 4])], key: &[u8; 4]) -> Option<[u8; 4]> {
    table
        .binary_search_by_key(key, |entry| *entry.0)
        .ok()
        .map(|ix| *table[ix].1)
}

/// The default tag table, backed by the Unicode Character Database shipped
/// with the `unicode-script` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTagTable;

impl UnicodeTagTable {
    pub fn new() -> Self {
        UnicodeTagTable
    }

    fn is_known(code: &[u8; 4]) -> bool {
        if code == b"Zmth" {
            return true;
        }
        std::str::from_utf8(code)
            .ok()
            .and_then(Script::from_short_name)
            .is_some()
    }

    fn old_tag(script: &[u8; 4]) -> [u8; 4] {
        if let Some(tag) = lookup(SCRIPT_EXCEPTIONS, script) {
            return tag;
        }
        let mut tag = *script;
        tag[0] = tag[0].to_ascii_lowercase();
        tag
    }
}

impl TagTable for UnicodeTagTable {
    fn tag_to_script(&self, tag: &ScriptTag) -> Option<ScriptTag> {
        let mut bytes = tag.to_bytes()?;
        match &bytes {
            b"DFLT" => return None,
            b"math" => return Some(ScriptTag::new("Zmth")),
            _ => {}
        }

        // 'dev2' and 'dev3' both name Devanagari
        if bytes[3] == b'2' || bytes[3] == b'3' {
            let mut new_tag = bytes;
            new_tag[3] = b'2';
            return lookup(NEW_SCRIPTS, &new_tag).map(ScriptTag::from_bytes);
        }

        // Trailing spaces repeat the previous letter: 'nko ' -> 'Nkoo'
        if bytes[2] == b' ' {
            bytes[2] = bytes[1];
        }
        if bytes[3] == b' ' {
            bytes[3] = bytes[2];
        }
        bytes[0] = bytes[0].to_ascii_uppercase();

        if Self::is_known(&bytes) {
            Some(ScriptTag::from_bytes(bytes))
        } else {
            None
        }
    }

    fn script_to_tags(&self, script: &ScriptTag) -> Vec<ScriptTag> {
        let bytes = match script.to_bytes() {
            Some(bytes) if Self::is_known(&bytes) => bytes,
            _ => return vec![ScriptTag::default_script()],
        };
        let old_tag = ScriptTag::from_bytes(Self::old_tag(&bytes));
        if old_tag == ScriptTag::default_script() {
            return vec![old_tag];
        }
        match lookup(NEW_SCRIPT_TAGS, &bytes) {
            Some(new_tag) => vec![ScriptTag::from_bytes(new_tag), old_tag],
            None => vec![old_tag, ScriptTag::default_script()],
        }
    }

    fn script_of_codepoint(&self, codepoint: u32) -> ScriptTag {
        match char::from_u32(codepoint) {
            Some(c) => ScriptTag::new(c.script().short_name()),
            None => ScriptTag::unknown(),
        }
    }

    fn known_scripts(&self) -> Vec<ScriptTag> {
        let scripts: BTreeSet<&'static str> = (0..=0x10FFFFu32)
            .into_par_iter()
            .filter_map(char::from_u32)
            .map(|c| c.script().short_name())
            .collect();
        scripts.into_iter().map(ScriptTag::new).collect()
    }
}
