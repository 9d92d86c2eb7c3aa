//! Tests for schematic parsing across dialects

use schemasvg::{parse, Dialect, ParseWarning, Record, RenderConfig, SchematicError};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture readable")
}

fn write_file(path: &std::path::Path, content: &str) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

#[test]
fn geda_fixture_parses_with_bounds() {
    let config = RenderConfig::default();
    let parsed = parse(&fixture("voltage_divider.sch"), &config).expect("should parse");

    assert_eq!(parsed.dialect, Dialect::Geda);
    assert!(parsed.warnings.is_empty());
    // One embedded component, two nets, one free text.
    assert_eq!(parsed.records.len(), 4);

    let component = parsed
        .records
        .iter()
        .find_map(|r| match r {
            Record::Component(c) => Some(c),
            _ => None,
        })
        .expect("component record");
    let symbol = component.symbol.as_ref().expect("embedded symbol");
    assert!(symbol.embedded);
    assert_eq!(symbol.records.len(), 2);
    assert_eq!(component.attributes[0].key, "refdes");

    // Embedded geometry folds in place; nets and text extend to the right.
    assert_eq!(parsed.bounds.min_x, 0.0);
    assert_eq!(parsed.bounds.min_y, 0.0);
    assert_eq!(parsed.bounds.max_x, 1600.0);
    assert_eq!(parsed.bounds.max_y, 1000.0);
}

#[test]
fn legacy_fixture_parses_components_and_wires() {
    let config = RenderConfig::default();
    let parsed = parse(&fixture("legacy_rc.sch"), &config).expect("should parse");

    assert_eq!(parsed.dialect, Dialect::LegacyEeschema);
    // Two wires, one bus, one note, one component.
    assert_eq!(parsed.records.len(), 5);

    let component = parsed
        .records
        .iter()
        .find_map(|r| match r {
            Record::Component(c) => Some(c),
            _ => None,
        })
        .expect("component record");
    assert_eq!(component.name, "Device:R");
    let refdes = component.attributes.iter().find(|a| a.key == "refdes").unwrap();
    assert_eq!(refdes.value, "R1");
}

#[test]
fn kicad_fixture_parses_fractional_coordinates() {
    let config = RenderConfig::default();
    let parsed = parse(&fixture("divider.kicad_sch"), &config).expect("should parse");

    assert_eq!(parsed.dialect, Dialect::KicadSexp);
    assert_eq!(parsed.records.len(), 4);

    let wire = parsed
        .records
        .iter()
        .find_map(|r| match r {
            Record::Net(n) => Some(n),
            _ => None,
        })
        .expect("wire record");
    assert_eq!(wire.segment.start.x, 127.0);
    assert_eq!(wire.segment.end.y, 63.5);
}

#[test]
fn first_symbol_directory_wins() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_file(&a.path().join("res.sym"), "B 0 0 100 100 3 10\n");
    write_file(&b.path().join("res.sym"), "B 0 0 900 900 3 10\n");

    let config = RenderConfig {
        symbol_paths: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        ..RenderConfig::default()
    };
    let parsed = parse("C 0 0 1 0 0 res.sym\n", &config).expect("should parse");
    assert_eq!(parsed.bounds.max_x, 100.0);

    let config = RenderConfig {
        symbol_paths: vec![b.path().to_path_buf(), a.path().to_path_buf()],
        ..RenderConfig::default()
    };
    let parsed = parse("C 0 0 1 0 0 res.sym\n", &config).expect("should parse");
    assert_eq!(parsed.bounds.max_x, 900.0);
}

#[test]
fn mutually_referencing_symbols_are_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("a.sym"), "C 0 0 1 0 0 b.sym\n");
    write_file(&dir.path().join("b.sym"), "C 0 0 1 0 0 a.sym\n");

    let config = RenderConfig {
        symbol_paths: vec![dir.path().to_path_buf()],
        ..RenderConfig::default()
    };
    let err = parse("C 0 0 1 0 0 a.sym\n", &config).unwrap_err();
    assert!(matches!(err, SchematicError::CyclicSymbolReference(_)));
}

#[test]
fn missing_symbol_is_a_warning_not_an_error() {
    let config = RenderConfig::default();
    let parsed = parse("C 500 500 1 0 0 ghost.sym\nN 0 0 100 100 4\n", &config)
        .expect("should parse");
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(
        parsed.warnings,
        vec![ParseWarning::UnresolvedSymbol("ghost.sym".to_string())]
    );
}
