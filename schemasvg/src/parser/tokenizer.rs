//! Tokenizer for the gEDA/gschem object stream.
//!
//! The grammar is line oriented: the first token of a line names the record
//! kind, the rest are positional parameters. A record may be followed by a
//! verbatim `[`..`]` block (embedded symbol source), a `{`..`}` block
//! (attributes), and, for text-bearing kinds (`T`, `H`), a payload of N raw
//! lines where N is the last parameter.
//!
//! Parameter parsing never fails: integers fall back decimal -> hex ->
//! default. Malformed records are logged and skipped; the rest of the file
//! still parses. Component records are resolved (embedded or via the symbol
//! search path) while tokenizing, with a depth guard that turns cyclic
//! references into a hard error instead of unbounded recursion.

use crate::core::{RenderConfig, SchematicError};
use crate::geometry::{Bounds, Point, Segment};
use crate::parser::schema::*;
use crate::symbols::SymbolLibrary;

/// gEDA basename prefix marking an inlined symbol definition.
const EMBEDDED_PREFIX: &str = "EMBEDDED";

pub(crate) struct GedaParser<'a> {
    config: &'a RenderConfig,
    library: SymbolLibrary<'a>,
    warnings: Vec<ParseWarning>,
}

impl<'a> GedaParser<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            library: SymbolLibrary::new(&config.symbol_paths),
            warnings: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }

    /// Tokenize one object stream into records plus their accumulated
    /// bounds. `depth` counts nested symbol resolutions.
    pub fn parse_objects(
        &mut self,
        content: &str,
        depth: usize,
    ) -> Result<(Vec<Record>, Bounds), SchematicError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut records = Vec::new();
        let mut bounds = Bounds::EMPTY;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            i += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('$') || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let head = fields[0];
            let params = &fields[1..];
            let header_line = i; // 1-based line number of the header

            // Sub-blocks follow the header line: brackets first, then braces.
            let brackets = match capture_block(&lines, &mut i, '[', ']') {
                Ok(block) => block,
                Err(reason) => {
                    self.skip_malformed(head, header_line, reason);
                    break;
                }
            };
            let braces = match capture_block(&lines, &mut i, '{', '}') {
                Ok(block) => block,
                Err(reason) => {
                    self.skip_malformed(head, header_line, reason);
                    break;
                }
            };

            // Text-bearing kinds: the last parameter is the payload line count.
            let mut payload = String::new();
            if head == "T" || head == "H" {
                let count = params.last().map(|s| loose_int(s)).unwrap_or(0).max(0) as usize;
                for _ in 0..count {
                    if i >= lines.len() {
                        break;
                    }
                    payload.push_str(lines[i]);
                    payload.push('\n');
                    i += 1;
                }
            }

            let attributes = parse_attributes(&braces);
            let record = match head {
                "P" => Some(Record::Pin(PinRecord {
                    segment: segment_params(params),
                    color: color_index(int_param(params, 4)),
                    pin_type: int_param(params, 5),
                    which_end: int_param(params, 6),
                    attributes,
                })),
                "N" => Some(Record::Net(NetRecord {
                    segment: segment_params(params),
                    color: color_index(int_param(params, 4)),
                    attributes,
                })),
                "W" => Some(Record::Wire(LineRecord {
                    segment: segment_params(params),
                    color: color_index(int_param(params, 4)),
                    width: int_param(params, 5) as f64,
                    attributes,
                })),
                "L" => Some(Record::Label(LineRecord {
                    segment: segment_params(params),
                    color: color_index(int_param(params, 4)),
                    width: int_param(params, 5) as f64,
                    attributes,
                })),
                "U" => Some(Record::Bus(BusRecord {
                    segment: segment_params(params),
                    color: color_index(int_param(params, 4)),
                    attributes,
                })),
                "B" => Some(Record::Box(BoxRecord {
                    origin: point_params(params, 0),
                    width: int_param(params, 2) as f64,
                    height: int_param(params, 3) as f64,
                    color: color_index(int_param(params, 4)),
                    stroke_width: int_param(params, 5) as f64,
                    attributes,
                })),
                "T" => Some(Record::Text(TextRecord {
                    position: point_params(params, 0),
                    color: color_index(int_param(params, 2)),
                    size: int_param(params, 3),
                    visible: int_param(params, 4) != 0,
                    show: ShowMode::from_code(int_param(params, 5)),
                    rotation: int_param(params, 6) as i32,
                    alignment: int_param(params, 7).clamp(0, 8) as u8,
                    payload,
                    attributes,
                })),
                "A" => Some(Record::Arc(ArcRecord {
                    center: point_params(params, 0),
                    radius: int_param(params, 2) as f64,
                    start_angle: int_param(params, 3) as f64,
                    sweep_angle: int_param(params, 4) as f64,
                    color: color_index(int_param(params, 5)),
                    stroke_width: int_param(params, 6) as f64,
                    attributes,
                })),
                "V" => Some(Record::Circle(CircleRecord {
                    center: point_params(params, 0),
                    radius: int_param(params, 2) as f64,
                    color: color_index(int_param(params, 3)),
                    stroke_width: int_param(params, 4) as f64,
                    fill_opacity: int_param(params, 9) as f64,
                    attributes,
                })),
                "H" => Some(Record::Path(PathRecord {
                    color: color_index(int_param(params, 0)),
                    data: payload,
                    attributes,
                })),
                "C" => {
                    let name = params.last().copied().unwrap_or_default().to_string();
                    let symbol = self.resolve_component(&name, &brackets, depth)?;
                    Some(Record::Component(ComponentRecord {
                        position: point_params(params, 0),
                        locked: int_param(params, 2) == 0,
                        rotation: int_param(params, 3) as i32,
                        mirror: int_param(params, 4) == 1,
                        name,
                        symbol,
                        attributes,
                    }))
                }
                other => {
                    tracing::debug!(kind = other, line = header_line, "skipping unknown record");
                    None
                }
            };

            if let Some(record) = record {
                record.fold_into(&mut bounds);
                records.push(record);
            }
        }

        Ok((records, bounds))
    }

    /// Resolve a component's symbol sub-tree: from its bracket block when
    /// embedded, otherwise from the first match on the search path. A miss
    /// is non-fatal; exceeding the depth limit is a cycle and aborts the
    /// whole parse.
    fn resolve_component(
        &mut self,
        name: &str,
        brackets: &str,
        depth: usize,
    ) -> Result<Option<ResolvedSymbol>, SchematicError> {
        if depth >= self.config.max_symbol_depth {
            return Err(SchematicError::CyclicSymbolReference(name.to_string()));
        }
        if !brackets.is_empty() || name.starts_with(EMBEDDED_PREFIX) {
            let (records, bounds) = self.parse_objects(brackets, depth + 1)?;
            return Ok(Some(ResolvedSymbol {
                records,
                bounds,
                embedded: true,
                source: None,
            }));
        }
        let Some((path, content)) = self.library.load(name) else {
            tracing::warn!(component = name, "component not found on symbol search path");
            self.warnings
                .push(ParseWarning::UnresolvedSymbol(name.to_string()));
            return Ok(None);
        };
        let (records, bounds) = self.parse_objects(&content, depth + 1)?;
        Ok(Some(ResolvedSymbol {
            records,
            bounds,
            embedded: false,
            source: Some(path),
        }))
    }

    fn skip_malformed(&mut self, kind: &str, line: usize, reason: String) {
        tracing::warn!(kind, line, %reason, "skipping malformed record");
        self.warnings.push(ParseWarning::MalformedRecord {
            kind: kind.to_string(),
            line,
            reason,
        });
    }
}

/// Capture a delimited sub-block if the next line opens one. Returns the
/// block content without the delimiter lines, or an error for an unterminated
/// block (the caller skips the record).
fn capture_block(
    lines: &[&str],
    i: &mut usize,
    open: char,
    close: char,
) -> Result<String, String> {
    if *i >= lines.len() || !lines[*i].trim_start().starts_with(open) {
        return Ok(String::new());
    }
    *i += 1;
    let mut block = String::new();
    while *i < lines.len() {
        let line = lines[*i];
        *i += 1;
        if line.trim_start().starts_with(close) {
            return Ok(block);
        }
        block.push_str(line);
        block.push('\n');
    }
    Err(format!("unterminated '{open}' block"))
}

/// Parse a brace sub-block into attributes. Each attribute is a `T` header
/// line followed by `key=value` plus any continuation lines declared by the
/// header's trailing line count.
pub(crate) fn parse_attributes(source: &str) -> Vec<Attribute> {
    let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut attrs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let header: Vec<&str> = lines[i].split_whitespace().collect();
        i += 1;
        let params = if header.first() == Some(&"T") {
            &header[1..]
        } else {
            &header[..]
        };
        let count = params.last().map(|s| loose_int(s)).unwrap_or(0).max(0) as usize;
        if count == 0 {
            continue;
        }
        if i >= lines.len() {
            break;
        }
        let Some((key, first_value)) = lines[i].split_once('=') else {
            tracing::debug!(line = lines[i], "attribute line without '='");
            i += 1;
            continue;
        };
        let mut value = first_value.to_string();
        i += 1;
        for _ in 1..count {
            if i >= lines.len() {
                break;
            }
            value.push_str(lines[i]);
            i += 1;
        }
        attrs.push(Attribute {
            key: key.to_string(),
            value,
            position: point_params(params, 0),
            color: color_index(int_param(params, 2)),
            size: int_param(params, 3),
            visible: int_param(params, 4) != 0,
            show: ShowMode::from_code(int_param(params, 5)),
            rotation: int_param(params, 6) as i32,
            alignment: int_param(params, 7).clamp(0, 8) as u8,
        });
    }
    attrs
}

/// Lenient integer parse: decimal, then hex, then 0.
fn loose_int(s: &str) -> i64 {
    s.parse::<i64>()
        .or_else(|_| i64::from_str_radix(s, 16))
        .unwrap_or(0)
}

fn int_param(params: &[&str], idx: usize) -> i64 {
    params.get(idx).map(|s| loose_int(s)).unwrap_or(0)
}

fn point_params(params: &[&str], idx: usize) -> Point {
    Point::new(int_param(params, idx) as f64, int_param(params, idx + 1) as f64)
}

fn segment_params(params: &[&str]) -> Segment {
    Segment::new(point_params(params, 0), point_params(params, 2))
}

fn color_index(value: i64) -> usize {
    value.max(0) as usize
}
