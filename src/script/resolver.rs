use std::collections::BTreeMap;

use log::debug;

use crate::models::ScriptTag;
use super::table::{TagTable, UnicodeTagTable};

/// Converts between Unicode script identifiers and OpenType script tags.
///
/// None of the lookups fail: anything that cannot be resolved falls back to
/// the undetermined script `Zyyy`, which in turn maps to `DFLT`.
#[derive(Debug, Clone)]
pub struct ScriptResolver<T = UnicodeTagTable> {
    table: T,
}

impl ScriptResolver<UnicodeTagTable> {
    /// Resolver backed by the bundled Unicode Character Database
    pub fn new() -> Self {
        Self {
            table: UnicodeTagTable::new(),
        }
    }
}

impl Default for ScriptResolver<UnicodeTagTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TagTable> ScriptResolver<T> {
    pub fn with_table(table: T) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// ISO 15924 script code for any OpenType or ISO tag
    pub fn iso_script_of(&self, tag: &str) -> ScriptTag {
        let tag = ScriptTag::new(tag);
        match self.table.tag_to_script(&tag) {
            Some(script) => script,
            None => {
                debug!("No script for tag '{}', using Zyyy", tag);
                ScriptTag::undetermined()
            }
        }
    }

    /// All OpenType script tags for a script, preferred tag first
    pub fn open_type_scripts_of(&self, script: &str) -> Vec<ScriptTag> {
        let iso = self.iso_script_of(script);
        if iso.is_special() {
            return vec![ScriptTag::default_script()];
        }

        let mut tags = self.table.script_to_tags(&iso);
        if tags.is_empty() {
            return vec![ScriptTag::default_script()];
        }
        // A DFLT second slot only means "no alternate tag"
        if tags.get(1) == Some(&ScriptTag::default_script()) {
            tags.truncate(1);
        }
        tags
    }

    /// The preferred OpenType script tag for a script
    pub fn primary_open_type_script_of(&self, script: &str) -> ScriptTag {
        self.open_type_scripts_of(script)
            .into_iter()
            .next()
            .unwrap_or_else(ScriptTag::default_script)
    }

    /// Unicode Script property of a code point, as ISO 15924 code
    pub fn script_of_character(&self, codepoint: u32) -> ScriptTag {
        self.table.script_of_codepoint(codepoint)
    }

    /// OpenType tags for every script in the tag table
    pub fn iso_to_open_type_map(&self) -> BTreeMap<ScriptTag, Vec<ScriptTag>> {
        self.table
            .known_scripts()
            .into_iter()
            .map(|iso| {
                let tags = self.open_type_scripts_of(iso.as_str());
                (iso, tags)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table that knows a single script, for checking the resolver rules in isolation
    struct FixedTable;

    impl TagTable for FixedTable {
        fn tag_to_script(&self, tag: &ScriptTag) -> Option<ScriptTag> {
            match tag.as_str() {
                "grek" | "Grek" => Some(ScriptTag::new("Grek")),
                "zzzz" => Some(ScriptTag::new("Zzzz")),
                _ => None,
            }
        }

        fn script_to_tags(&self, _script: &ScriptTag) -> Vec<ScriptTag> {
            vec![ScriptTag::new("grek"), ScriptTag::new("grk2"), ScriptTag::new("DFLT")]
        }

        fn script_of_codepoint(&self, _codepoint: u32) -> ScriptTag {
            ScriptTag::new("Grek")
        }

        fn known_scripts(&self) -> Vec<ScriptTag> {
            vec![ScriptTag::new("Grek")]
        }
    }

    #[test]
    fn iso_script_never_fails() {
        let resolver = ScriptResolver::new();
        for tag in ["", "a", "latn", "dev2", "DFLT", "????", "l\u{e4}tn", "toolongtag"] {
            let iso = resolver.iso_script_of(tag);
            assert_eq!(iso.as_str().chars().count(), 4, "{}", tag);
        }
        assert_eq!(resolver.iso_script_of("DFLT"), "Zyyy");
        assert_eq!(resolver.iso_script_of("qqqq"), "Zyyy");
        assert_eq!(resolver.iso_script_of("dev2"), "Deva");
        assert_eq!(resolver.iso_script_of("latnx"), "Latn");
    }

    #[test]
    fn undetermined_scripts_map_to_dflt() {
        let resolver = ScriptResolver::new();
        for tag in ["Zyyy", "Zinh", "Zzzz", "DFLT", "bogus"] {
            let iso = resolver.iso_script_of(tag);
            assert_eq!(resolver.open_type_scripts_of(iso.as_str()), vec!["DFLT"], "{}", tag);
        }
    }

    #[test]
    fn drops_dflt_placeholder() {
        let resolver = ScriptResolver::new();
        assert_eq!(resolver.open_type_scripts_of("Latn"), vec!["latn"]);
        assert_eq!(resolver.open_type_scripts_of("latn"), vec!["latn"]);
        assert_eq!(resolver.open_type_scripts_of("Deva"), vec!["dev2", "deva"]);
        assert_eq!(resolver.open_type_scripts_of("dev3"), vec!["dev2", "deva"]);
    }

    #[test]
    fn primary_tags() {
        let resolver = ScriptResolver::new();
        assert_eq!(resolver.primary_open_type_script_of("Latn"), "latn");
        assert_eq!(resolver.primary_open_type_script_of("Grek"), "grek");
        assert_eq!(resolver.primary_open_type_script_of("Beng"), "bng2");
        assert_eq!(resolver.primary_open_type_script_of("Zinh"), "DFLT");
        assert_eq!(resolver.primary_open_type_script_of("Hira"), "kana");
    }

    #[test]
    fn only_second_slot_dflt_is_dropped() {
        let resolver = ScriptResolver::with_table(FixedTable);
        assert_eq!(
            resolver.open_type_scripts_of("grek"),
            vec!["grek", "grk2", "DFLT"]
        );
        assert_eq!(resolver.open_type_scripts_of("zzzz"), vec!["DFLT"]);
        assert_eq!(resolver.open_type_scripts_of("latn"), vec!["DFLT"]);
    }

    #[test]
    fn character_scripts() {
        let resolver = ScriptResolver::new();
        assert_eq!(resolver.script_of_character('a' as u32), "Latn");
        assert_eq!(resolver.script_of_character(0x0416), "Cyrl");
        assert_eq!(resolver.script_of_character(0x0995), "Beng");
        assert_eq!(resolver.script_of_character(0x20AC), "Zyyy");
    }

    #[test]
    fn iso_map_covers_known_scripts() {
        let resolver = ScriptResolver::with_table(FixedTable);
        let map = resolver.iso_to_open_type_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ScriptTag::new("Grek")], vec!["grek", "grk2", "DFLT"]);
    }
}
