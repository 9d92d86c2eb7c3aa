//! Conversion entry points, configuration, and error types.
//!
//! `parse` and `render` are pure; `convert_to_svg` composes them and upholds
//! the output contract: whatever goes wrong, the caller still gets a minimal
//! valid SVG carrying the error message instead of nothing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::ColorTable;
use crate::parser;
use crate::render;
use crate::render::text::xml_escape;

#[derive(Debug, thiserror::Error)]
pub enum SchematicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("content matches no supported schematic dialect")]
    UnsupportedDialect,
    #[error("cyclic symbol reference while resolving '{0}'")]
    CyclicSymbolReference(String),
    #[error("render error: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Injected configuration for parsing and rendering. All knobs the reference
/// tool took as module constants or flags live here so `parse`/`render` stay
/// pure functions of their inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directories searched (recursively, in order) for symbol files.
    pub symbol_paths: Vec<PathBuf>,
    /// Minimum stroke width for any line.
    pub min_thickness: f64,
    /// Spacing between lines of multiline text, as a multiple of font size.
    pub line_spacing: f64,
    /// Padding added on each side of the accumulated bounds.
    pub margin: f64,
    /// Drawing palette; index 15 is the lock override.
    pub palette: ColorTable,
    /// Symbol resolution depth limit; exceeding it is a cyclic reference.
    pub max_symbol_depth: usize,
    /// Emit minor grid lines every 100 units.
    pub minor_grid: bool,
    /// Emit major grid lines every 500 units.
    pub major_grid: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            symbol_paths: Vec::new(),
            min_thickness: 12.0,
            line_spacing: 1.0,
            margin: 1000.0,
            palette: ColorTable::default(),
            max_symbol_depth: 32,
            minor_grid: false,
            major_grid: false,
        }
    }
}

/// Convert schematic text to an SVG document.
///
/// Never fails: parse or render errors degrade to a minimal valid SVG
/// containing the error message.
pub fn convert_to_svg(content: &str, config: &RenderConfig) -> String {
    match parser::parse(content, config) {
        Ok(parsed) => {
            let mut out = String::new();
            match render::render(&parsed.records, &parsed.bounds, config, &mut out) {
                Ok(()) => out,
                Err(err) => {
                    tracing::error!(%err, "rendering failed");
                    error_svg(&err.to_string(), config)
                }
            }
        }
        Err(err) => {
            tracing::error!(%err, "parsing failed");
            error_svg(&err.to_string(), config)
        }
    }
}

/// Read a schematic file and write its SVG to the given output path. The SVG
/// itself follows the `convert_to_svg` contract; only filesystem failures
/// surface as errors.
pub fn convert_file(input: &Path, output: &Path, config: &RenderConfig) -> Result<(), SchematicError> {
    let content = fs::read_to_string(input)?;
    let svg = convert_to_svg(&content, config);
    fs::write(output, svg)?;
    Ok(())
}

/// Minimal valid SVG carrying an error message.
fn error_svg(message: &str, config: &RenderConfig) -> String {
    let size = config.margin * 2.0;
    format!(
        concat!(
            "<svg width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {s} {s}\" ",
            "xmlns=\"http://www.w3.org/2000/svg\">\n",
            "<rect x=\"0\" y=\"0\" width=\"{s}\" height=\"{s}\" fill=\"{bg}\"/>\n",
            "<text x=\"{m}\" y=\"{m}\" fill=\"#ff0000\" font-size=\"40\" ",
            "text-anchor=\"middle\">{msg}</text>\n",
            "</svg>\n"
        ),
        s = size,
        bg = config.palette.background(),
        m = config.margin,
        msg = xml_escape(message),
    )
}

/// Recursively discover schematic files under a directory. Hidden
/// directories and build trees are skipped.
pub fn discover_schematic_files(dir: &Path) -> Result<Vec<PathBuf>, SchematicError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), SchematicError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "target" || name == "build" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                match ext {
                    "sch" | "sym" | "kicad_sch" => files.push(path),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_constants() {
        let config = RenderConfig::default();
        assert_eq!(config.min_thickness, 12.0);
        assert_eq!(config.line_spacing, 1.0);
        assert_eq!(config.margin, 1000.0);
        assert_eq!(config.palette.len(), 24);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RenderConfig {
            min_thickness: 20.0,
            symbol_paths: vec![PathBuf::from("/usr/share/gEDA/sym")],
            ..RenderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"min_thickness": 6.0}"#).unwrap();
        assert_eq!(config.min_thickness, 6.0);
        assert_eq!(config.margin, 1000.0);
    }

    #[test]
    fn unparseable_content_still_yields_valid_svg() {
        let config = RenderConfig::default();
        let svg = convert_to_svg("complete nonsense, no records", &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("dialect"));
    }
}
