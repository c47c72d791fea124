use std::fmt;

/// A four character script identifier.
///
/// Holds either an ISO 15924 script code (`Latn`) or an OpenType script
/// tag (`latn`, `DFLT`). Input is space padded or truncated to exactly four
/// characters; comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptTag(String);

impl ScriptTag {
    /// Normalize `tag` to four characters
    pub fn new(tag: &str) -> Self {
        let mut normalized: String = tag.chars().take(4).collect();
        while normalized.chars().count() < 4 {
            normalized.push(' ');
        }
        ScriptTag(normalized)
    }

    /// The OpenType default script, `DFLT`
    pub fn default_script() -> Self {
        ScriptTag::new("DFLT")
    }

    /// The ISO 15924 code for undetermined (common) script, `Zyyy`
    pub fn undetermined() -> Self {
        ScriptTag::new("Zyyy")
    }

    /// The ISO 15924 code for unknown script, `Zzzz`
    pub fn unknown() -> Self {
        ScriptTag::new("Zzzz")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 15924 special codes (`Zinh`, `Zyyy`, `Zzzz`, ...) all start with `Z`
    pub fn is_special(&self) -> bool {
        self.0.starts_with('Z')
    }

    /// The tag as four raw bytes, if it is plain ASCII
    pub fn to_bytes(&self) -> Option<[u8; 4]> {
        let bytes = self.0.as_bytes();
        if bytes.len() != 4 {
            return None;
        }
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Build a tag from four raw bytes
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        ScriptTag::new(&String::from_utf8_lossy(&bytes))
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScriptTag {
    fn from(tag: &str) -> Self {
        ScriptTag::new(tag)
    }
}

impl PartialEq<&str> for ScriptTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A `languagesystem <script> <language>;` declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageSystem {
    /// OpenType script tag
    pub script: ScriptTag,
    /// OpenType language tag, or `dflt`
    pub language: String,
}

impl LanguageSystem {
    pub fn new(script: impl Into<ScriptTag>, language: &str) -> Self {
        Self {
            script: script.into(),
            language: language.to_string(),
        }
    }

    /// A declaration for the default language of `script`
    pub fn dflt(script: ScriptTag) -> Self {
        Self {
            script,
            language: "dflt".to_string(),
        }
    }
}

impl fmt::Display for LanguageSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // FEA pads short tags itself: 'yi  ' is written as 'yi'
        write!(f, "languagesystem {} {};", self.script.as_str().trim_end(), self.language)
    }
}
