//! Behavioural properties of extraction and correction.
//!
//! Each test drives the public API end to end: extract, locate, correct, re-extract.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::thread;

use redline_document::{
    CorrectionRequest, ExtractOptions, Extraction, Method, SourceRef, correct, correct_all,
    extract, is_rich_text, locate, text::char_len,
};
use serde_json::{Value, json};

fn text(s: &str) -> Value {
    json!({"type": "text", "text": s})
}

fn paragraph(s: &str) -> Value {
    json!({"type": "paragraph", "children": [text(s)]})
}

fn richtext(children: Vec<Value>) -> Value {
    json!({"root": {"type": "root", "children": children}})
}

/// A page exercising every kind of segment source.
fn page() -> Value {
    json!({
        "id": "65a1f0c2e4b0a1b2c3d4e5f6",
        "title": "Nos services",
        "slug": "nos-services",
        "hero": {
            "type": "highImpact",
            "richText": richtext(vec![
                json!({"type": "heading", "tag": "h1", "children": [text("Bienvenue")]}),
                paragraph("Une équipe à votre écoute."),
            ]),
        },
        "content": richtext(vec![
            paragraph("Nous intervenons partout."),
            json!({"type": "code", "language": "sh", "children": [text("rm -rf SECRET_CODE")]}),
            json!({"type": "list", "listType": "bullet", "children": [
                {"type": "listitem", "value": 1, "children": [text("Conseil")]},
                {"type": "listitem", "value": 2, "children": [
                    text("Suivi "),
                    {"type": "link", "fields": {"url": "https://example.com"}, "children": [
                        text("personnalisé"),
                    ]},
                ]},
            ]}),
        ]),
        "layout": [
            {
                "blockType": "cta",
                "id": "b1",
                "richText": richtext(vec![paragraph("Contactez-nous.")]),
                "links": [{"link": {"label": "Écrire", "url": "/contact", "type": "custom"}}],
            },
            {
                "blockType": "mediaBlock",
                "media": {"alt": "Photo", "caption": "Ignorée"},
                "caption": "Notre atelier",
                "description": "2024-01-15",
            },
        ],
        "updatedAt": "2024-02-01T10:00:00.000Z",
    })
}

fn content_text(doc: &Value) -> String {
    let extraction = extract(doc, &ExtractOptions::default());
    extraction
        .segments()
        .iter()
        .find(|s| s.source.top_field() == "content")
        .map(|s| s.text.trim_end().to_string())
        .unwrap_or_default()
}

#[test]
fn test_round_trip_join() {
    let extraction = extract(&page(), &ExtractOptions::default());
    let joined: Vec<&str> = extraction.segments().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(extraction.flat_text(), joined.join("\n").trim());
    assert_eq!(
        extraction.flat_text(),
        "Nos services\nBienvenue\nUne équipe à votre écoute.\n\n\
         Nous intervenons partout.\nConseil\nSuivi personnalisé\n\n\
         Contactez-nous.\n\nÉcrire\nNotre atelier"
    );
}

#[test]
fn test_extraction_is_deterministic() {
    let doc = page();
    let options = ExtractOptions::default();
    let first = extract(&doc, &options);
    let second = extract(&doc, &options);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn test_every_segment_is_addressable() {
    let doc = page();
    let extraction = extract(&doc, &ExtractOptions::default());
    let last = extraction.segments().len() - 1;

    for (i, segment) in extraction.segments().iter().enumerate() {
        let start = extraction.start_of(i).unwrap() - extraction.trim_delta();
        let expected = if i == last {
            segment.text.trim_end()
        } else {
            segment.text.as_str()
        };
        assert_eq!(extraction.slice(start, char_len(expected)), Some(expected));

        let located = locate(&extraction, start, 1).unwrap();
        assert_eq!(located.index, i);
        assert_eq!(located.local_offset, 0);

        match &segment.source {
            SourceRef::Title { field } => assert_eq!(doc[field.as_str()], segment.text),
            SourceRef::RichText { handle, .. } => {
                assert!(is_rich_text(handle.resolve(&doc).unwrap()));
            }
            SourceRef::PlainField { parent, key, .. } => {
                assert_eq!(parent.resolve(&doc).unwrap()[key.as_str()], segment.text);
            }
        }
    }
}

#[test]
fn test_skipped_nodes_never_checked_or_corrected() {
    let mut doc = page();
    let extraction = extract(&doc, &ExtractOptions::default());
    assert!(!extraction.flat_text().contains("SECRET_CODE"));
    assert!(!extraction.flat_text().contains("Ignorée"));
    assert!(!extraction.flat_text().contains("2024"));

    let before = doc.clone();
    let result = correct(
        &mut doc,
        &CorrectionRequest::unlocated("SECRET_CODE", "x"),
        &ExtractOptions::default(),
    );
    assert!(!result.applied);
    assert_eq!(doc, before);
}

#[test]
fn test_exact_fix() {
    let mut doc = json!({
        "title": "Titre",
        "content": richtext(vec![paragraph("Ceci est une test.")]),
    });
    let options = ExtractOptions::default();
    assert_eq!(extract(&doc, &options).flat_text(), "Titre\nCeci est une test.");

    let request: CorrectionRequest = serde_json::from_value(json!({
        "offset": 15, "length": 3, "original": "une", "replacement": "un",
    }))
    .unwrap();
    let result = correct(&mut doc, &request, &options);

    assert!(result.applied);
    assert_eq!(result.method, Method::Offset);
    assert_eq!(result.modified_field.as_deref(), Some("content"));
    assert_eq!(content_text(&doc), "Ceci est un test.");
    assert_eq!(doc["title"], "Titre");
}

#[test]
fn test_drift_of_one_character() {
    let mut doc = json!({
        "title": "Titre",
        "content": richtext(vec![paragraph("Ceci est une test.")]),
    });
    let options = ExtractOptions::default();
    let checked: Extraction = extract(&doc, &options);
    assert_eq!(checked.slice(15, 3), Some("une"));

    // The document changes between check and fix.
    doc["content"]["root"]["children"][0]["children"][0]["text"] = json!("Ceci est  une test.");

    let result = correct(&mut doc, &CorrectionRequest::at(15, "une", "un"), &options);
    assert!(result.applied);
    assert_eq!(result.method, Method::Search);
    assert_eq!(content_text(&doc), "Ceci est  un test.");
}

#[test]
fn test_ambiguous_drift_picks_nearest() {
    let mut doc = json!({
        "title": "Titre",
        "content": richtext(vec![paragraph("une fois et une autre.")]),
    });
    let result = correct(
        &mut doc,
        &CorrectionRequest::at(17, "une", "un"),
        &ExtractOptions::default(),
    );
    assert!(result.applied);
    assert_eq!(result.method, Method::Search);
    assert_eq!(content_text(&doc), "une fois et un autre.");
}

#[test]
fn test_not_found_leaves_document_unchanged() {
    let options = ExtractOptions::default();
    for request in [
        CorrectionRequest::at(4, "absent", "présent"),
        CorrectionRequest::at(10_000, "absent", "présent"),
        CorrectionRequest::unlocated("absent", "présent"),
    ] {
        let mut doc = page();
        let before = doc.clone();
        let result = correct(&mut doc, &request, &options);
        assert!(!result.applied);
        assert!(result.modified_field.is_none());
        assert_eq!(doc, before);
    }
}

#[test]
fn test_corrections_land_in_every_source_kind() {
    let mut doc = page();
    let options = ExtractOptions::default();
    let extraction = extract(&doc, &options);
    let flat = extraction.flat_text();
    let at = |needle: &str| {
        let byte = flat.find(needle).unwrap();
        char_len(&flat[..byte])
    };

    let requests = vec![
        CorrectionRequest::at(at("services"), "services", "prestations"),
        CorrectionRequest::at(at("écoute"), "écoute", "service"),
        CorrectionRequest::at(at("personnalisé"), "personnalisé", "sur mesure"),
        CorrectionRequest::at(at("atelier"), "atelier", "studio"),
    ];
    let results = correct_all(&mut doc, &requests, &options);

    assert!(results.iter().all(|r| r.applied && r.method == Method::Offset));
    let fields: Vec<_> = results.iter().map(|r| r.modified_field.as_deref()).collect();
    assert_eq!(
        fields,
        vec![Some("title"), Some("hero"), Some("content"), Some("layout")]
    );
    assert_eq!(doc["title"], "Nos prestations");
    assert_eq!(doc["layout"][1]["caption"], "Notre studio");
    let link = &doc["content"]["root"]["children"][2]["children"][1]["children"][1];
    assert_eq!(link["children"][0]["text"], "sur mesure");
    assert_eq!(link["fields"]["url"], "https://example.com");
}

#[test]
fn test_deep_structures_are_truncated() {
    // Building and dropping a 1000-level `Value` recurses in serde_json itself, so the fixture
    // gets a roomier stack than the default test thread.
    let worker = thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let mut node = text("tout au fond");
            for _ in 0..1000 {
                node = json!({"type": "paragraph", "children": [node]});
            }
            let mut block = json!({"heading": "tout au fond"});
            for _ in 0..1000 {
                block = json!({"inner": [block]});
            }
            let doc = json!({
                "title": "Profond",
                "content": {"root": node},
                "layout": [block],
            });
            extract(&doc, &ExtractOptions::default())
        })
        .unwrap();

    let extraction = worker.join().unwrap();
    assert_eq!(extraction.flat_text(), "Profond");
}
