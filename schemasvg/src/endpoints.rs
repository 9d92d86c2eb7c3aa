//! Endpoint pairing for dangling-connection and junction detection.
//!
//! Every pin and net endpoint is registered by exact coordinate. An endpoint
//! seen exactly once is dangling; one seen more than twice is a junction.
//! Coordinate equality is exact: a hash-map version would be behavior
//! compatible only with the same non-tolerant comparison, so the registry
//! keeps the simple linear scan, which is fine at schematic scale.

use crate::geometry::{Point, Segment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointEntry {
    pub position: Point,
    pub count: u32,
}

/// Classification of an endpoint after all records are registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointMark {
    /// Registered exactly once: unpaired connection.
    Dangling(Point),
    /// More than two connections meet here.
    Junction(Point),
}

#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    entries: Vec<EndpointEntry>,
    segments: Vec<Segment>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one connection at `p`, incrementing an existing entry on
    /// exact match or appending a fresh one with count 1.
    pub fn register(&mut self, p: Point) {
        for entry in &mut self.entries {
            if entry.position == p {
                entry.count += 1;
                return;
            }
        }
        self.entries.push(EndpointEntry {
            position: p,
            count: 1,
        });
    }

    /// Record a net segment so endpoints landing on its interior are counted
    /// as connected in both directions.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Connection count registered at `p` (0 if never seen).
    pub fn count(&self, p: Point) -> u32 {
        self.entries
            .iter()
            .find(|e| e.position == p)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn entries(&self) -> &[EndpointEntry] {
        &self.entries
    }

    /// Classify every endpoint, in registration order. An endpoint on the
    /// interior of a net segment gains +2 because the segment continues on
    /// both sides of it.
    pub fn classify(&self) -> Vec<EndpointMark> {
        let mut marks = Vec::new();
        for entry in &self.entries {
            let mut count = entry.count;
            for seg in &self.segments {
                if on_segment_interior(seg, entry.position) {
                    count += 2;
                }
            }
            if count == 1 {
                marks.push(EndpointMark::Dangling(entry.position));
            } else if count > 2 {
                marks.push(EndpointMark::Junction(entry.position));
            }
        }
        marks
    }
}

/// True when `p` lies on `seg` but is not one of its endpoints.
fn on_segment_interior(seg: &Segment, p: Point) -> bool {
    let (s, e) = (seg.start, seg.end);
    let collinear = (e.y - s.y) * (p.x - s.x) == (p.y - s.y) * (e.x - s.x);
    if !collinear {
        return false;
    }
    let within_x = s.x.min(e.x) <= p.x && p.x <= s.x.max(e.x);
    let within_y = s.y.min(e.y) <= p.y && p.y <= s.y.max(e.y);
    if !within_x || !within_y {
        return false;
    }
    let at_endpoint = (p.x == s.x || p.x == e.x) && (p.y == s.y || p.y == e.y);
    !at_endpoint
}
