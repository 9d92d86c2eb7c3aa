//! Parsed schematic data model.
//!
//! Each schematic element becomes one strongly-typed `Record` variant,
//! populated at tokenization time so the renderer never touches positional
//! parameter lists. Records are immutable once a parse completes; the
//! renderer only reads them.

use std::path::PathBuf;

use crate::geometry::{Bounds, Point, Segment, TransformContext};

/// How an attribute (or `key=value` text) is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowMode {
    /// `key=value`
    #[default]
    NameValue,
    /// value only
    Value,
    /// key only
    Name,
}

impl ShowMode {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ShowMode::Value,
            2 => ShowMode::Name,
            _ => ShowMode::NameValue,
        }
    }
}

/// A key/value annotation attached to a record via its brace sub-block.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub position: Point,
    pub color: usize,
    pub size: i64,
    pub visible: bool,
    pub show: ShowMode,
    pub rotation: i32,
    pub alignment: u8,
}

/// A component's resolved symbol sub-tree: either inlined (embedded) or read
/// from the first matching file on the search path. Resolved once at parse
/// time and owned by the component record.
#[derive(Debug, Clone)]
pub struct ResolvedSymbol {
    pub records: Vec<Record>,
    pub bounds: Bounds,
    pub embedded: bool,
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PinRecord {
    pub segment: Segment,
    pub color: usize,
    pub pin_type: i64,
    pub which_end: i64,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct NetRecord {
    pub segment: Segment,
    pub color: usize,
    pub attributes: Vec<Attribute>,
}

/// Shared shape of wire and label records: a colored stroke segment.
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub segment: Segment,
    pub color: usize,
    pub width: f64,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct BusRecord {
    pub segment: Segment,
    pub color: usize,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct BoxRecord {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub color: usize,
    pub stroke_width: f64,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct TextRecord {
    pub position: Point,
    pub color: usize,
    pub size: i64,
    pub visible: bool,
    pub show: ShowMode,
    pub rotation: i32,
    pub alignment: u8,
    pub payload: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct ArcRecord {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub color: usize,
    pub stroke_width: f64,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct CircleRecord {
    pub center: Point,
    pub radius: f64,
    pub color: usize,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub attributes: Vec<Attribute>,
}

/// Free-form path record (gEDA `H`): SVG path data in the payload.
#[derive(Debug, Clone)]
pub struct PathRecord {
    pub color: usize,
    pub data: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub position: Point,
    pub locked: bool,
    pub rotation: i32,
    pub mirror: bool,
    pub name: String,
    pub symbol: Option<ResolvedSymbol>,
    pub attributes: Vec<Attribute>,
}

impl ComponentRecord {
    /// Placement context for the component's symbol sub-tree. Embedded
    /// symbols are authored in absolute coordinates: no offset, rotation
    /// forced to 0.
    pub fn context(&self) -> TransformContext {
        let embedded = self.symbol.as_ref().map(|s| s.embedded).unwrap_or(false);
        TransformContext {
            offset: if embedded {
                Point::new(0.0, 0.0)
            } else {
                self.position
            },
            rotation: self.rotation,
            mirror: self.mirror,
            embedded,
        }
    }
}

/// One parsed schematic element.
#[derive(Debug, Clone)]
pub enum Record {
    Pin(PinRecord),
    Net(NetRecord),
    Wire(LineRecord),
    Label(LineRecord),
    Bus(BusRecord),
    Box(BoxRecord),
    Text(TextRecord),
    Arc(ArcRecord),
    Circle(CircleRecord),
    Path(PathRecord),
    Component(ComponentRecord),
}

impl Record {
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Record::Pin(r) => &r.attributes,
            Record::Net(r) => &r.attributes,
            Record::Wire(r) | Record::Label(r) => &r.attributes,
            Record::Bus(r) => &r.attributes,
            Record::Box(r) => &r.attributes,
            Record::Text(r) => &r.attributes,
            Record::Arc(r) => &r.attributes,
            Record::Circle(r) => &r.attributes,
            Record::Path(r) => &r.attributes,
            Record::Component(r) => &r.attributes,
        }
    }

    /// Widen `bounds` by this record's extent. Line kinds fold both
    /// endpoints, boxes the opposite corners, arcs and circles the center
    /// plus/minus the radius, text its anchor point. Components fold the four
    /// corners of their resolved symbol bounds transformed through the
    /// component's placement; unresolved components contribute nothing. Path
    /// records do not fold.
    pub fn fold_into(&self, bounds: &mut Bounds) {
        match self {
            Record::Pin(PinRecord { segment, .. })
            | Record::Net(NetRecord { segment, .. })
            | Record::Wire(LineRecord { segment, .. })
            | Record::Label(LineRecord { segment, .. })
            | Record::Bus(BusRecord { segment, .. }) => {
                bounds.include(segment.start);
                bounds.include(segment.end);
            }
            Record::Box(b) => {
                bounds.include(b.origin);
                bounds.include(Point::new(b.origin.x + b.width, b.origin.y + b.height));
            }
            Record::Text(t) => {
                bounds.include(t.position);
            }
            Record::Arc(a) => {
                bounds.include(Point::new(a.center.x - a.radius, a.center.y - a.radius));
                bounds.include(Point::new(a.center.x + a.radius, a.center.y + a.radius));
            }
            Record::Circle(c) => {
                bounds.include(Point::new(c.center.x - c.radius, c.center.y - c.radius));
                bounds.include(Point::new(c.center.x + c.radius, c.center.y + c.radius));
            }
            Record::Component(c) => {
                if let Some(symbol) = &c.symbol {
                    if !symbol.bounds.is_empty() {
                        let ctx = c.context();
                        bounds.include(
                            ctx.apply(Point::new(symbol.bounds.min_x, symbol.bounds.min_y)),
                        );
                        bounds.include(
                            ctx.apply(Point::new(symbol.bounds.max_x, symbol.bounds.max_y)),
                        );
                    }
                }
            }
            Record::Path(_) => {}
        }
    }
}

/// Non-fatal problems collected during a parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    #[error("component not found: '{0}'")]
    UnresolvedSymbol(String),
    #[error("malformed '{kind}' record at line {line}: {reason}")]
    MalformedRecord {
        kind: String,
        line: usize,
        reason: String,
    },
}
