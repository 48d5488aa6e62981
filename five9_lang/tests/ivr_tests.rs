//! Tests for extracting script functions from IVR definitions

use std::io::Write;

use assert_matches::assert_matches;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};

use five9_lang::ivr::{IvrError, extract_functions};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn zlib_body(source: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(source.as_bytes()).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

fn gzip_body(source: &str) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(source.as_bytes()).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

fn entry(name: &str, arguments: &[&str], body: &str) -> String {
    let arguments: String = arguments
        .iter()
        .map(|a| format!("<arguments><name>{}</name></arguments>", a))
        .collect();
    format!(
        "<entry><key>{name}</key><value><name>{name}</name>\
         <arguments>{arguments}</arguments>\
         <functionBody>\n  {body}\n</functionBody></value></entry>"
    )
}

fn script(entries: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ivrScript><modules/><functions>{}</functions></ivrScript>",
        entries.concat()
    )
}

#[test]
fn test_extract_zlib_function() {
    let xml = script(&[entry("add", &["a", "b"], &zlib_body("return a + b;"))]);
    let functions = extract_functions(&xml).unwrap();

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "add");
    assert_eq!(functions[0].arguments, vec!["a", "b"]);
    assert_eq!(
        functions[0].to_javascript(),
        "function add(a, b) {\nreturn a + b;\n}\n"
    );
}

#[test]
fn test_extract_gzip_function() {
    let xml = script(&[entry("greet", &["name"], &gzip_body("return 'hi ' + name;"))]);
    let functions = extract_functions(&xml).unwrap();

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].body, "return 'hi ' + name;");
}

#[test]
fn test_undecodable_function_is_skipped() {
    init_logging();
    let xml = script(&[
        entry("broken", &[], &STANDARD.encode("not compressed")),
        entry("ok", &[], &zlib_body("return 1;")),
    ]);
    let functions = extract_functions(&xml).unwrap();

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "ok");
    assert!(functions[0].arguments.is_empty());
}

#[test]
fn test_malformed_xml_is_an_error() {
    assert_matches!(
        extract_functions("<ivrScript><functions><entry>"),
        Err(IvrError::Xml(_))
    );
}
