use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use xml_tree_core::{parse_file, ParseError};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_attributes_empty_and_nested_elements() {
    let node = parse_file(&fixture("fixtures/simple.xml")).expect("parse should succeed");
    assert_eq!(node.tag, "config");

    let settings = node.get_child("settings").expect("settings should exist");
    assert!(settings.has(&["enabled"]));

    let items = node.get_child("items").expect("items should exist");
    let item_nodes = items.get_children("item");
    assert_eq!(item_nodes.len(), 3);
    assert_eq!(item_nodes[0].attributes.get("id"), Some(&"1".to_string()));
    assert_eq!(item_nodes[2].text_at(&[]), None);
    assert_eq!(item_nodes[1].get_text(&["name"]), Some("second"));
}

#[test]
fn parses_real_world_root() {
    let opn = parse_file(&fixture("fixtures/opnsense-base.xml")).expect("OPNsense fixture parse");

    assert_eq!(opn.tag, "opnsense");
    assert!(opn.find(&["system", "hostname"]).is_some());
    assert!(opn.get_child("filter").is_some());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = parse_file(&dir.path().join("absent.xml")).expect_err("missing file");
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn truncated_file_reports_open_elements() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("truncated.xml");
    fs::write(&path, "<opnsense><system><hostname>fw</hostname>").expect("write");

    let err = parse_file(&path).expect_err("truncated");
    assert_eq!(err.to_string(), "unclosed element(s) at end of document: opnsense.system");
}
