//! schemasvg - electronic schematic to SVG conversion library
//!
//! Parses gEDA/gschem schematics (with best-effort support for KiCad legacy
//! and S-expression files), resolves symbol references, and renders the
//! result as a standalone SVG document.
//!
//! # Quick Start
//!
//! ```no_run
//! use schemasvg::{convert_to_svg, RenderConfig};
//! use std::path::PathBuf;
//!
//! let config = RenderConfig {
//!     symbol_paths: vec![PathBuf::from("/usr/share/gEDA/sym")],
//!     ..RenderConfig::default()
//! };
//! let content = std::fs::read_to_string("board.sch").unwrap();
//! let svg = convert_to_svg(&content, &config);
//! println!("{svg}");
//! ```
//!
//! # Guarantees
//!
//! - **Always valid output**: conversion never fails; unparseable input
//!   degrades to a minimal SVG carrying the error message
//! - **Deterministic**: the same input and configuration produce
//!   byte-identical SVG
//! - **Pure conversion**: no global state; independent files convert
//!   concurrently

pub mod color;
pub mod core;
pub mod endpoints;
pub mod geometry;
pub mod parser;
pub mod render;
pub mod symbols;

// Re-export main types
pub use color::{ColorTable, LOCK_COLOR_INDEX};
pub use crate::core::{
    convert_file, convert_to_svg, discover_schematic_files, RenderConfig, SchematicError,
};
pub use geometry::{Bounds, Point, Segment};
pub use parser::{detect_dialect, parse, Dialect, ParseWarning, ParsedSchematic, Record};
pub use symbols::SymbolLibrary;
