//! Schematic parsing: dialect detection and the sub-parsers behind it.
//!
//! All three dialects produce the same `Record` list plus independently
//! tracked `Bounds`, so everything downstream (transforms, endpoint pairing,
//! rendering) is dialect-agnostic.

pub mod legacy;
pub mod schema;
pub mod sexp;
pub mod tokenizer;

pub use schema::*;

use crate::core::{RenderConfig, SchematicError};
use crate::geometry::Bounds;
use tokenizer::GedaParser;

/// The three recognized schematic text grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// gEDA/gschem object stream (`.sch`/`.sym`), the fallback grammar.
    Geda,
    /// EESchema line grammar, KiCad 4-5 (`EESchema Schematic` header).
    LegacyEeschema,
    /// KiCad 6+ S-expression flavor (`(kicad_sch` header).
    KicadSexp,
}

/// Result of one parse: immutable records, their accumulated bounds, the
/// dialect that produced them, and any non-fatal warnings.
#[derive(Debug, Clone)]
pub struct ParsedSchematic {
    pub records: Vec<Record>,
    pub bounds: Bounds,
    pub dialect: Dialect,
    pub warnings: Vec<ParseWarning>,
}

/// Deterministic content-prefix dialect routing.
pub fn detect_dialect(content: &str) -> Dialect {
    let head = content.trim_start();
    if head.starts_with("EESchema Schematic") {
        Dialect::LegacyEeschema
    } else if head.starts_with("(kicad_sch") {
        Dialect::KicadSexp
    } else {
        Dialect::Geda
    }
}

/// Parse one schematic. Pure in its inputs; safe to call concurrently
/// across independent files. The symbol search path in `config` is treated
/// as read-only shared state.
pub fn parse(content: &str, config: &RenderConfig) -> Result<ParsedSchematic, SchematicError> {
    match detect_dialect(content) {
        Dialect::LegacyEeschema => {
            let (records, bounds, warnings) = legacy::parse_legacy(content);
            Ok(ParsedSchematic {
                records,
                bounds,
                dialect: Dialect::LegacyEeschema,
                warnings,
            })
        }
        Dialect::KicadSexp => match sexp::parse_kicad(content) {
            Ok((records, bounds, warnings)) => Ok(ParsedSchematic {
                records,
                bounds,
                dialect: Dialect::KicadSexp,
                warnings,
            }),
            Err(err) => {
                tracing::warn!(%err, "kicad_sch extraction failed, retrying as gEDA");
                parse_geda(content, config)
            }
        },
        Dialect::Geda => parse_geda(content, config),
    }
}

fn parse_geda(content: &str, config: &RenderConfig) -> Result<ParsedSchematic, SchematicError> {
    let mut parser = GedaParser::new(config);
    let (records, bounds) = parser.parse_objects(content, 0)?;
    if records.is_empty() {
        // The gEDA grammar is the catch-all; producing nothing means the
        // content matched none of the three grammars.
        return Err(SchematicError::UnsupportedDialect);
    }
    Ok(ParsedSchematic {
        records,
        bounds,
        dialect: Dialect::Geda,
        warnings: parser.into_warnings(),
    })
}
