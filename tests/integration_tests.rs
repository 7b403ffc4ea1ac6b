//! Integration tests for the localize export pipeline
//!
//! These tests drive the public API end to end: records are ingested,
//! flattened, exported and packaged, and the resulting archives are opened
//! again to check their layout.

use serde_json::json;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

use localize_export::export::export;
use localize_export::{
    ingest, BuildRequest, Config, Language, LanguageRegistry, Localizer, Packager, Platform,
    RawRecord,
};

// ==================== Test Helpers ====================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn languages(codes: &[&str]) -> Vec<Language> {
    codes.iter().map(|c| Language::from_code(c).unwrap()).collect()
}

fn sample_records() -> Vec<RawRecord> {
    vec![
        RawRecord::plain("greeting", [("en", "Hello"), ("de", "Hallo")]),
        RawRecord::namespace(
            "errors",
            json!({
                "en": {"notfound": "Not Found", "forbidden": "Forbidden"},
                "de": {"notfound": "Nicht gefunden", "status": 404}
            }),
        ),
        RawRecord::plain("farewell", [("en", "Bye")]),
    ]
}

fn localizer(work_dir: &Path) -> Localizer {
    init_tracing();
    let config = Config {
        work_dir: work_dir.to_path_buf(),
        ..Config::default()
    };
    Localizer::new(config).expect("embedded registry should load")
}

/// Read every entry of a zip into name -> bytes.
fn unzip(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.insert(file.name().to_string(), content);
    }
    entries
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ==================== Catalog Build Tests ====================

#[test]
fn test_build_language_unknown_codes_fail() {
    let catalog = ingest(&sample_records(), &languages(&["en", "de"])).unwrap();

    for code in ["xx", "english", "", "ro"] {
        let err = catalog.build_language(code).unwrap_err();
        assert!(err.is_not_found(), "{} should be unknown", code);
    }
}

#[test]
fn test_plain_and_namespace_flatten_together() {
    let records = vec![
        RawRecord::plain("greeting", [("en", "Hello")]),
        RawRecord::namespace("errors", json!({"en": {"notfound": "Not Found"}})),
    ];
    let catalog = ingest(&records, &languages(&["en"])).unwrap();

    let mapping = catalog.build_language("en").unwrap();
    let flattened: BTreeMap<_, _> = mapping.iter().collect();
    assert_eq!(
        flattened,
        BTreeMap::from([("greeting", "Hello"), ("notfound", "Not Found")])
    );
}

#[test]
fn test_plain_wins_over_namespace_key() {
    let records = vec![
        RawRecord::plain("notfound", [("en", "X")]),
        RawRecord::namespace("errors", json!({"en": {"notfound": "Y"}})),
    ];
    let catalog = ingest(&records, &languages(&["en"])).unwrap();

    let mapping = catalog.build_language("en").unwrap();
    assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![("notfound", "X")]);
}

#[test]
fn test_exports_follow_registration_order() {
    let catalog = ingest(&sample_records(), &languages(&["en"])).unwrap();
    let mapping = catalog.build_language("en").unwrap();

    let strings = String::from_utf8(export("IOS", &mapping).unwrap()).unwrap();
    assert_eq!(
        strings,
        "\"notfound\" = \"Not Found\";\n\
         \"forbidden\" = \"Forbidden\";\n\
         \"greeting\" = \"Hello\";\n\
         \"farewell\" = \"Bye\";"
    );
}

#[test]
fn test_missing_plain_value_exports_as_blank_android_string() {
    let catalog = ingest(&sample_records(), &languages(&["de"])).unwrap();
    let mapping = catalog.build_language("de").unwrap();

    let xml = String::from_utf8(export("ANDROID", &mapping).unwrap()).unwrap();
    assert!(xml.contains("\t<string name=\"farewell\"> </string>\n"));
    // Non-string namespace values never reach the export
    assert!(!xml.contains("status"));
}

// ==================== Packaging Tests ====================

#[test]
fn test_rebuild_produces_identical_files() {
    let dir = TempDir::new().unwrap();
    let packager = Packager::new(dir.path());
    let langs = languages(&["en", "de"]);

    for platform in Platform::ALL {
        for language in &langs {
            let first = ingest(&sample_records(), &langs)
                .unwrap()
                .build_language(language.code())
                .unwrap();
            let second = ingest(&sample_records(), &langs)
                .unwrap()
                .build_language(language.code())
                .unwrap();

            let first = std::fs::read(packager.write_file(platform, &first).unwrap()).unwrap();
            let second = std::fs::read(packager.write_file(platform, &second).unwrap()).unwrap();
            assert_eq!(first, second, "{} / {}", platform, language);
        }
    }
}

#[test]
fn test_all_platform_bundle_layout_and_cleanup() {
    let dir = TempDir::new().unwrap();
    let packager = Packager::new(dir.path());
    let catalog = ingest(&sample_records(), &languages(&["en", "de"])).unwrap();
    let mappings: Vec<_> = catalog
        .languages()
        .iter()
        .map(|l| catalog.build_language(l.code()).unwrap())
        .collect();

    let outer = packager.bundle_all(&mappings, "1700000000").unwrap();

    assert_eq!(listing(dir.path()), vec!["1700000000.zip"]);

    let inner = unzip(&std::fs::read(&outer).unwrap());
    assert_eq!(
        inner.keys().collect::<Vec<_>>(),
        vec!["Localizable.zip", "locales.zip", "strings.zip"]
    );

    let expected = [
        ("strings.zip", ["values-de/strings.xml", "values-en/strings.xml"]),
        (
            "Localizable.zip",
            ["de.lproj/Localizable.strings", "en.lproj/Localizable.strings"],
        ),
        ("locales.zip", ["de/locales.json", "en/locales.json"]),
    ];
    for (archive, files) in expected {
        let entries = unzip(&inner[archive]);
        assert_eq!(entries.keys().collect::<Vec<_>>(), files, "{}", archive);
    }
}

// ==================== Localizer Tests ====================

#[test]
fn test_localizer_bundle_contains_three_platform_archives() {
    let work = TempDir::new().unwrap();
    let localizer = localizer(work.path());
    let request = BuildRequest::new(sample_records()).with_languages(["en", "de"]);

    let bytes = localizer.build_bundle_zip(&request).unwrap();

    let inner = unzip(&bytes);
    assert_eq!(inner.len(), 3);
    for archive in inner.values() {
        assert_eq!(unzip(archive).len(), 2);
    }
    assert!(listing(work.path()).is_empty());
}

#[test]
fn test_localizer_web_file_round_trips() {
    let work = TempDir::new().unwrap();
    let localizer = localizer(work.path());
    let request = BuildRequest::new(sample_records()).with_languages(["en", "de"]);

    let bytes = localizer.build_file(&request, "DE", "web").unwrap();
    let decoded: BTreeMap<String, String> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        decoded,
        BTreeMap::from([
            ("farewell".to_string(), String::new()),
            ("greeting".to_string(), "Hallo".to_string()),
            ("notfound".to_string(), "Nicht gefunden".to_string()),
        ])
    );
}

#[test]
fn test_localizer_rejects_unknown_platform_before_building() {
    let work = TempDir::new().unwrap();
    let localizer = localizer(work.path());
    let request = BuildRequest::new(sample_records());

    let err = localizer.build_platform_zip(&request, "TIZEN").unwrap_err();
    assert!(err.is_not_found());
    assert!(listing(work.path()).is_empty());
}

#[tokio::test]
async fn test_localizer_async_bundle_defaults_to_all_languages() {
    let work = TempDir::new().unwrap();
    let localizer = localizer(work.path());
    let supported = LanguageRegistry::get().unwrap().supported_languages().len();

    let bytes = localizer
        .bundle_zip(BuildRequest::new(sample_records()))
        .await
        .unwrap();

    let inner = unzip(&bytes);
    let web = unzip(&inner["locales.zip"]);
    assert_eq!(web.len(), supported);
    assert!(listing(work.path()).is_empty());
}
