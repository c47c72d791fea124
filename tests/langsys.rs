use std::collections::BTreeSet;
use std::fs;

use fealab::fea::{leading_language_systems, parse_batch_file, sync_files, RuleSource};
use fealab::models::Config;
use fealab::{LanguageSystem, LanguageSystemSync, ScriptResolver};
use pretty_assertions::assert_eq;

const SAMPLE_FEA: &str = "
languagesystem DFLT dflt;
languagesystem latn dflt;
languagesystem latn PLK;
languagesystem cyrl dflt;
languagesystem cyrl SRB;
# Comment
feature smcp {
  sub a by a.sc;
} smcp;
";

fn all_codepoint_samples() -> Vec<BTreeSet<u32>> {
    vec![
        BTreeSet::new(),
        BTreeSet::from([0x41]),
        BTreeSet::from([0x010A, 0x20AC, 0x063C]),
        BTreeSet::from([0x0915, 0x0995, 0x0B95, 0x1000, 0x3042, 0x30A2, 0x4E00]),
        BTreeSet::from([0x0300, 0x05D0, 0x0E01, 0xA000, 0x10FFFF, 0xD800]),
    ]
}

#[test]
fn scenario_with_existing_declaration() {
    let sync = LanguageSystemSync::new();
    let output = sync.synchronize(
        "languagesystem cyrl dflt;\nfeature smcp { sub a by a.sc; } smcp;",
        BTreeSet::from([0x010A, 0x20AC, 0x063C]),
    );
    let source = RuleSource::parse(&output);
    assert_eq!(
        source.declarations,
        vec![
            LanguageSystem::new("DFLT", "dflt"),
            LanguageSystem::new("latn", "dflt"),
            LanguageSystem::new("arab", "dflt"),
            LanguageSystem::new("cyrl", "dflt"),
        ]
    );
    assert_eq!(source.lines, vec!["feature smcp { sub a by a.sc; } smcp;"]);
}

#[test]
fn empty_text_and_code_points() {
    let sync = LanguageSystemSync::new();
    assert_eq!(
        sync.synchronize("", BTreeSet::new()),
        "languagesystem DFLT dflt;\nlanguagesystem latn dflt;"
    );
}

#[test]
fn properties_hold_for_sample_inputs() {
    let sync = LanguageSystemSync::new();
    let texts = ["", SAMPLE_FEA, "feature liga { sub f i by fi; } liga;\n\n", "languagesystem arab URD;"];

    for text in texts {
        for codepoints in all_codepoint_samples() {
            let once = sync.synchronize(text, codepoints.iter().copied());
            let twice = sync.synchronize(&once, codepoints.iter().copied());
            assert_eq!(once, twice, "not idempotent for {:?}", text);

            let source = RuleSource::parse(&once);
            assert_eq!(&source.declarations[..2], &leading_language_systems()[..]);
            let rest = &source.declarations[2..];
            assert!(rest.windows(2).all(|pair| pair[0] < pair[1]), "unsorted: {:?}", rest);
            assert!(!rest.iter().any(|langsys| leading_language_systems().contains(langsys)));

            let original = RuleSource::parse(text);
            assert_eq!(source.lines, original.lines);
        }
    }
}

#[test]
fn undetermined_scripts_resolve_to_dflt() {
    let resolver = ScriptResolver::new();
    for tag in ["Zyyy", "Zinh", "Zzzz", "DFLT", "????", ""] {
        let iso = resolver.iso_script_of(tag);
        assert_eq!(iso.as_str().len(), 4);
        if iso.is_special() {
            assert_eq!(resolver.open_type_scripts_of(iso.as_str()), vec!["DFLT"]);
        }
    }
}

#[test]
fn batch_updates_files_in_place_and_to_outputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.fea"), SAMPLE_FEA).unwrap();
    fs::write(dir.path().join("b.fea"), "feature kern {} kern;").unwrap();
    fs::write(
        dir.path().join("jobs.txt"),
        "# in place\na.fea\n\nb.fea -> build/b.fea\n",
    )
    .unwrap();

    let jobs = parse_batch_file(&dir.path().join("jobs.txt")).unwrap();
    let sync = LanguageSystemSync::new();
    let reports = sync_files(&jobs, &sync, &Config::default());
    assert!(reports.iter().all(|report| report.result.is_ok()));

    let a = fs::read_to_string(dir.path().join("a.fea")).unwrap();
    assert!(a.starts_with(
        "languagesystem DFLT dflt;\nlanguagesystem latn dflt;\nlanguagesystem cyrl SRB;\n\
         languagesystem cyrl dflt;\nlanguagesystem latn PLK;\n"
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("build/b.fea")).unwrap(),
        "languagesystem DFLT dflt;\nlanguagesystem latn dflt;\nfeature kern {} kern;"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("b.fea")).unwrap(),
        "feature kern {} kern;"
    );
}
