//! End-to-end conversion tests

use schemasvg::{convert_to_svg, RenderConfig};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture readable")
}

#[test]
fn pin_endpoints_project_with_margin() {
    let config = RenderConfig::default();
    let svg = convert_to_svg("P 0 0 100 0 1 0 0\n", &config);

    // Bounds are (0,0)..(100,0); the default margin shifts everything by 1000.
    assert!(svg.contains("x1=\"1000\" y1=\"1000\" x2=\"1100\" y2=\"1000\""));

    // Both pin endpoints are unpaired, so each gets a 60x60 marker centered
    // on the endpoint.
    assert!(svg.contains("<rect x=\"970\" y=\"970\" width=\"60\" height=\"60\" fill=\"#ff0000\""));
    assert!(svg.contains("<rect x=\"1070\" y=\"970\" width=\"60\" height=\"60\" fill=\"#ff0000\""));
}

#[test]
fn three_nets_meeting_form_a_junction() {
    let config = RenderConfig::default();
    let content = "N 0 0 100 0 4\nN 100 0 200 0 4\nN 100 0 100 100 4\n";
    let svg = convert_to_svg(content, &config);
    assert!(svg.contains("<circle cx=\"1100\" cy=\"1100\" r=\"25\" fill=\"#ffff00\""));
}

#[test]
fn chained_nets_get_no_markers() {
    let config = RenderConfig::default();
    let svg = convert_to_svg("N 0 0 100 0 4\nN 100 0 100 100 4\nN 100 100 0 0 4\n", &config);
    assert!(!svg.contains("#ff0000"));
    assert!(!svg.contains("#ffff00"));
}

#[test]
fn conversion_is_deterministic() {
    let config = RenderConfig::default();
    let content = fixture("voltage_divider.sch");
    let first = convert_to_svg(&content, &config);
    let second = convert_to_svg(&content, &config);
    assert_eq!(first, second);
}

#[test]
fn unparseable_input_degrades_to_error_svg() {
    let config = RenderConfig::default();
    let svg = convert_to_svg("this is not a schematic at all", &config);
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn grids_render_when_enabled() {
    let config = RenderConfig {
        minor_grid: true,
        major_grid: true,
        ..RenderConfig::default()
    };
    let svg = convert_to_svg("N 0 0 400 400 4\n", &config);
    assert!(svg.contains("#171717")); // minor grid color
    assert!(svg.contains("#1e1e1e")); // major grid color

    let plain = convert_to_svg("N 0 0 400 400 4\n", &RenderConfig::default());
    assert!(!plain.contains("#171717"));
}

#[test]
fn legacy_fixture_renders_wires() {
    let config = RenderConfig::default();
    let svg = convert_to_svg(&fixture("legacy_rc.sch"), &config);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<line"));
    assert!(svg.contains("input filter"));
}

#[test]
fn kicad_fixture_renders() {
    let config = RenderConfig::default();
    let svg = convert_to_svg(&fixture("divider.kicad_sch"), &config);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("divider tap"));
    assert!(svg.contains("R1"));
}

#[test]
fn overline_markup_survives_to_output() {
    let config = RenderConfig::default();
    let svg = convert_to_svg("T 0 0 9 10 1 0 0 0 1\n\\_RESET\\_\n", &config);
    assert!(svg.contains("<tspan text-decoration=\"overline\">RESET</tspan>"));
}
