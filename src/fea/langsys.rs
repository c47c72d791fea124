use std::collections::BTreeSet;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::font::{cmap_codepoints, CharacterMap};
use crate::models::{LanguageSystem, ScriptTag};
use crate::script::{ScriptResolver, TagTable, UnicodeTagTable};

lazy_static! {
    static ref LANGSYS_PATTERN: Regex =
        Regex::new(r"^.*?languagesystem\s+([A-Za-z]{2,4})\s+([A-Z]+|dflt)\s*;").unwrap();
}

/// The declarations every synchronized file starts with, in this order
pub fn leading_language_systems() -> [LanguageSystem; 2] {
    [
        LanguageSystem::new("DFLT", "dflt"),
        LanguageSystem::new("latn", "dflt"),
    ]
}

/// FEA source split into `languagesystem` declarations and everything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource<'a> {
    /// Declarations in source order, duplicates included
    pub declarations: Vec<LanguageSystem>,
    /// Non-declaration lines, verbatim and in order
    pub lines: Vec<&'a str>,
}

impl<'a> RuleSource<'a> {
    pub fn parse(fea_text: &'a str) -> Self {
        let mut declarations = Vec::new();
        let mut lines = Vec::new();

        for line in fea_text.lines() {
            // The pattern is anchored, but keep the last match if that ever changes
            let langsys = LANGSYS_PATTERN
                .captures_iter(line)
                .last()
                .map(|caps| LanguageSystem::new(&caps[1], &caps[2]));
            match langsys {
                Some(langsys) => declarations.push(langsys),
                None => lines.push(line),
            }
        }

        Self { declarations, lines }
    }
}

/// Rewrites the `languagesystem` declarations of FEA code so they cover
/// every script used by a set of code points.
#[derive(Debug, Clone)]
pub struct LanguageSystemSync<T = UnicodeTagTable> {
    resolver: ScriptResolver<T>,
}

impl LanguageSystemSync<UnicodeTagTable> {
    pub fn new() -> Self {
        Self {
            resolver: ScriptResolver::new(),
        }
    }
}

impl Default for LanguageSystemSync<UnicodeTagTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TagTable> LanguageSystemSync<T> {
    pub fn with_resolver(resolver: ScriptResolver<T>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ScriptResolver<T> {
        &self.resolver
    }

    /// Default-language declarations for the scripts of `codepoints`
    pub fn derive_language_systems<I>(&self, codepoints: I) -> BTreeSet<LanguageSystem>
    where
        I: IntoIterator<Item = u32>,
    {
        codepoints
            .into_iter()
            .map(|codepoint| {
                let script = self.resolver.script_of_character(codepoint);
                self.resolver.primary_open_type_script_of(script.as_str())
            })
            .collect::<BTreeSet<ScriptTag>>()
            .into_iter()
            .map(LanguageSystem::dflt)
            .collect()
    }

    /// Rewrite `fea_text` so its declarations are the existing ones plus one
    /// `dflt` declaration per script in `codepoints`.
    ///
    /// `DFLT dflt` and `latn dflt` always come first; the remaining
    /// declarations follow sorted and without duplicates, then all other
    /// lines in their original order.
    pub fn synchronize<I>(&self, fea_text: &str, codepoints: I) -> String
    where
        I: IntoIterator<Item = u32>,
    {
        let source = RuleSource::parse(fea_text);
        let derived = self.derive_language_systems(codepoints);
        debug!(
            "Found {} declarations in source, {} derived from code points",
            source.declarations.len(),
            derived.len()
        );

        let leading = leading_language_systems();
        let rest: BTreeSet<LanguageSystem> = source
            .declarations
            .into_iter()
            .chain(derived)
            .filter(|langsys| !leading.contains(langsys))
            .collect();

        let mut output: Vec<String> = leading
            .iter()
            .chain(rest.iter())
            .map(|langsys| langsys.to_string())
            .collect();
        output.extend(source.lines.iter().map(|line| line.to_string()));

        let mut text = output.join("\n");
        // `str::lines` drops a final empty line; keep it so the output parses back unchanged
        if source.lines.last() == Some(&"") {
            text.push('\n');
        }
        text
    }

    /// [`synchronize`](Self::synchronize) with the code points of a font's cmap
    pub fn synchronize_with_font(&self, fea_text: &str, cmap: &impl CharacterMap) -> String {
        self.synchronize(fea_text, cmap_codepoints(cmap))
    }
}
