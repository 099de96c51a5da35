//! Test utilities and helpers for unit tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Write bytes into a named file inside a temp dir
pub fn write_temp_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Build a one-page PDF containing the given text
pub fn minimal_pdf_bytes(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Opportunity JSON in the wire shape
pub fn opportunity_json(id: i64, title: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "test opportunity",
        "type": kind,
        "technologies": ["Rust"],
        "postedBy": "owner@campus.edu",
        "status": "ACTIVE",
        "createdAt": "2025-11-02T10:00:00Z"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_pdf_parses_back() {
        let bytes = minimal_pdf_bytes("Round trip");
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page = *pages.keys().next().unwrap();
        let text = doc.extract_text(&[page]).unwrap();
        assert!(text.contains("Round trip"));
    }

    #[test]
    fn test_opportunity_json_deserializes() {
        let value = opportunity_json(3, "Parser crate", "OPEN_SOURCE");
        let opp: converge_protocol::common::Opportunity =
            serde_json::from_value(value).unwrap();
        assert_eq!(opp.id, 3);
    }
}
