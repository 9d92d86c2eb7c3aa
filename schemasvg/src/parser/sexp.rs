//! Targeted extraction from KiCad 6+ `.kicad_sch` S-expression files.
//!
//! This is deliberately not a general S-expression layer: a minimal internal
//! reader builds the tree and the extraction walks only the forms the
//! renderer can use: `(wire (pts (xy ..) (xy ..)))`, `(symbol (lib_id ..)
//! (at ..) (property ..))`, and `(text .. (at ..))`. Reader failures
//! propagate so the dispatcher can fall back to the gEDA grammar.

use crate::core::SchematicError;
use crate::geometry::{Bounds, Point, Segment};
use crate::parser::schema::*;

const NET_COLOR: usize = 4;
const ATTRIBUTE_COLOR: usize = 5;
const TEXT_COLOR: usize = 9;

/// Default text size for extracted records; the dialect sizes text in mm,
/// which the renderer's point-based sizing does not model.
const DEFAULT_TEXT_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
enum SExp {
    Atom(String),
    List(Vec<SExp>),
}

impl SExp {
    fn as_atom(&self) -> Option<&str> {
        match self {
            SExp::Atom(s) => Some(s),
            _ => None,
        }
    }

    fn items(&self) -> &[SExp] {
        match self {
            SExp::List(items) => items,
            _ => &[],
        }
    }

    fn head(&self) -> Option<&str> {
        self.items().first().and_then(SExp::as_atom)
    }

    /// First child list whose head is `key`.
    fn child(&self, key: &str) -> Option<&SExp> {
        self.items().iter().find(|item| item.head() == Some(key))
    }

    /// All child lists whose head is `key`.
    fn children<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a SExp> {
        self.items().iter().filter(move |item| item.head() == Some(key))
    }

    /// Numeric argument at position `idx` (after the head), defaulting to 0.
    fn number(&self, idx: usize) -> f64 {
        self.items()
            .get(idx + 1)
            .and_then(SExp::as_atom)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }

    fn string(&self, idx: usize) -> Option<&str> {
        self.items().get(idx + 1).and_then(SExp::as_atom)
    }
}

struct Reader {
    input: Vec<char>,
    pos: usize,
}

impl Reader {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<SExp, SchematicError> {
        self.skip_whitespace();
        if self.eof() {
            return Err(SchematicError::UnsupportedDialect);
        }
        if self.peek() == '(' {
            self.parse_list()
        } else {
            self.parse_atom()
        }
    }

    fn parse_list(&mut self) -> Result<SExp, SchematicError> {
        self.pos += 1; // consume '('
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eof() {
                return Err(SchematicError::UnsupportedDialect);
            }
            if self.peek() == ')' {
                self.pos += 1;
                return Ok(SExp::List(items));
            }
            items.push(self.parse()?);
        }
    }

    fn parse_atom(&mut self) -> Result<SExp, SchematicError> {
        if self.peek() == '"' {
            return self.parse_string();
        }
        let mut s = String::new();
        while !self.eof() {
            let ch = self.peek();
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            s.push(ch);
            self.pos += 1;
        }
        Ok(SExp::Atom(s))
    }

    fn parse_string(&mut self) -> Result<SExp, SchematicError> {
        self.pos += 1; // consume opening quote
        let mut s = String::new();
        let mut escaped = false;
        while !self.eof() {
            let ch = self.peek();
            self.pos += 1;
            if escaped {
                match ch {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => s.push(other),
                }
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                return Ok(SExp::Atom(s));
            } else {
                s.push(ch);
            }
        }
        Err(SchematicError::UnsupportedDialect)
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.peek().is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> char {
        self.input[self.pos]
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

pub(crate) fn parse_kicad(
    content: &str,
) -> Result<(Vec<Record>, Bounds, Vec<ParseWarning>), SchematicError> {
    let root = Reader::new(content).parse()?;
    if root.head() != Some("kicad_sch") {
        return Err(SchematicError::UnsupportedDialect);
    }

    let mut records = Vec::new();
    let mut bounds = Bounds::EMPTY;
    let warnings = Vec::new();

    for item in root.items() {
        match item.head() {
            Some("wire") => {
                if let Some(segment) = extract_wire(item) {
                    let record = Record::Net(NetRecord {
                        segment,
                        color: NET_COLOR,
                        attributes: vec![],
                    });
                    record.fold_into(&mut bounds);
                    records.push(record);
                }
            }
            Some("symbol") => {
                if let Some(record) = extract_symbol(item) {
                    record.fold_into(&mut bounds);
                    if let Record::Component(c) = &record {
                        bounds.include(c.position);
                    }
                    records.push(record);
                }
            }
            Some("text") => {
                if let Some(record) = extract_text(item) {
                    record.fold_into(&mut bounds);
                    records.push(record);
                }
            }
            _ => {}
        }
    }

    Ok((records, bounds, warnings))
}

fn extract_wire(wire: &SExp) -> Option<Segment> {
    let pts = wire.child("pts")?;
    let mut points = pts.children("xy").map(|xy| Point::new(xy.number(0), xy.number(1)));
    let start = points.next()?;
    let end = points.next()?;
    Some(Segment::new(start, end))
}

fn extract_symbol(symbol: &SExp) -> Option<Record> {
    let lib_id = symbol.child("lib_id")?.string(0)?.to_string();
    let at = symbol.child("at")?;
    let position = Point::new(at.number(0), at.number(1));
    let rotation = at.number(2) as i32;

    let mut attributes = Vec::new();
    for property in symbol.children("property") {
        let (Some(key), Some(value)) = (property.string(0), property.string(1)) else {
            continue;
        };
        let attr_pos = property
            .child("at")
            .map(|at| Point::new(at.number(0), at.number(1)))
            .unwrap_or(position);
        attributes.push(Attribute {
            key: key.to_string(),
            value: value.to_string(),
            position: attr_pos,
            color: ATTRIBUTE_COLOR,
            size: DEFAULT_TEXT_SIZE,
            visible: matches!(key, "Reference" | "Value"),
            show: ShowMode::Value,
            rotation: 0,
            alignment: 0,
        });
    }

    Some(Record::Component(ComponentRecord {
        position,
        locked: false,
        rotation,
        mirror: false,
        name: lib_id,
        symbol: None,
        attributes,
    }))
}

fn extract_text(text: &SExp) -> Option<Record> {
    let payload = text.string(0)?.to_string();
    if payload.is_empty() {
        return None;
    }
    let at = text.child("at")?;
    Some(Record::Text(TextRecord {
        position: Point::new(at.number(0), at.number(1)),
        color: TEXT_COLOR,
        size: DEFAULT_TEXT_SIZE,
        visible: true,
        show: ShowMode::NameValue,
        rotation: at.number(2) as i32,
        alignment: 0,
        payload,
        attributes: vec![],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(kicad_sch (version 20211123) (generator eeschema)
  (wire (pts (xy 127 63.5) (xy 152.4 63.5)) (stroke (width 0)) (uuid aa))
  (symbol (lib_id "Device:R") (at 127 63.5 90) (unit 1)
    (property "Reference" "R1" (at 129.5 62.2 0))
    (property "Value" "10k" (at 129.5 64.7 0))
    (property "Footprint" "" (at 127 63.5 0))
  )
  (text "power stage" (at 140 50 0) (effects (font (size 1.27 1.27))))
)"#;

    #[test]
    fn extracts_wires_symbols_and_text() {
        let (records, bounds, warnings) = parse_kicad(SAMPLE).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(records.len(), 3);

        match &records[0] {
            Record::Net(net) => {
                assert_eq!(net.segment.start, Point::new(127.0, 63.5));
                assert_eq!(net.segment.end, Point::new(152.4, 63.5));
            }
            other => panic!("expected net, got {other:?}"),
        }

        match &records[1] {
            Record::Component(c) => {
                assert_eq!(c.name, "Device:R");
                assert_eq!(c.position, Point::new(127.0, 63.5));
                assert_eq!(c.rotation, 90);
                let reference = c.attributes.iter().find(|a| a.key == "Reference").unwrap();
                assert_eq!(reference.value, "R1");
                assert!(reference.visible);
                let footprint = c.attributes.iter().find(|a| a.key == "Footprint").unwrap();
                assert!(!footprint.visible);
            }
            other => panic!("expected component, got {other:?}"),
        }

        match &records[2] {
            Record::Text(t) => {
                assert_eq!(t.payload, "power stage");
                assert_eq!(t.position, Point::new(140.0, 50.0));
            }
            other => panic!("expected text, got {other:?}"),
        }

        assert_eq!(bounds.min_x, 127.0);
        assert_eq!(bounds.max_x, 152.4);
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(parse_kicad("(kicad_sch (wire (pts").is_err());
    }

    #[test]
    fn non_kicad_root_is_an_error() {
        assert!(parse_kicad("(something_else)").is_err());
    }

    #[test]
    fn quoted_strings_and_escapes() {
        let sexp = Reader::new(r#"(property "a \"b\" c")"#).parse().unwrap();
        assert_eq!(sexp.child("property").is_none(), true);
        assert_eq!(sexp.string(0), Some(r#"a "b" c"#));
    }
}
