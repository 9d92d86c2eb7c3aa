//! Legacy EESchema (KiCad 4-5) schematic sub-parser.
//!
//! A reduced line grammar: `Wire Wire Line` / `Wire Bus Line` headers
//! followed by a coordinate line, `$Comp`..`$EndComp` blocks with `L` / `P` /
//! `F` field lines, and `Text` blocks whose payload is the next line. The
//! output is the same record set the gEDA tokenizer produces, with its own
//! independent bounds.

use crate::geometry::{Bounds, Point, Segment};
use crate::parser::schema::*;

/// Palette slots assigned to legacy records (the dialect carries no colors).
const NET_COLOR: usize = 4;
const ATTRIBUTE_COLOR: usize = 5;
const TEXT_COLOR: usize = 9;
const BUS_COLOR: usize = 10;

pub(crate) fn parse_legacy(content: &str) -> (Vec<Record>, Bounds, Vec<ParseWarning>) {
    let lines: Vec<&str> = content.lines().collect();
    let mut records = Vec::new();
    let mut bounds = Bounds::EMPTY;
    let warnings = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if line.starts_with("Wire Wire Line") || line.starts_with("Wire Bus Line") {
            let is_bus = line.starts_with("Wire Bus Line");
            i += 1;
            if i < lines.len() {
                if let Some(segment) = parse_segment_line(lines[i]) {
                    let record = if is_bus {
                        Record::Bus(BusRecord {
                            segment,
                            color: BUS_COLOR,
                            attributes: vec![],
                        })
                    } else {
                        Record::Net(NetRecord {
                            segment,
                            color: NET_COLOR,
                            attributes: vec![],
                        })
                    };
                    record.fold_into(&mut bounds);
                    records.push(record);
                }
                i += 1;
            }
        } else if line.starts_with("Text ") {
            if let Some(record) = parse_text_block(&lines, &mut i) {
                record.fold_into(&mut bounds);
                records.push(record);
            }
        } else if line == "$Comp" {
            i += 1;
            if let Some(record) = parse_component_block(&lines, &mut i) {
                record.fold_into(&mut bounds);
                // Component position is the only geometry the dialect gives us.
                if let Record::Component(c) = &record {
                    bounds.include(c.position);
                }
                records.push(record);
            }
        } else if line == "$EndSCHEMATC" {
            break;
        } else {
            i += 1;
        }
    }

    (records, bounds, warnings)
}

/// `x1 y1 x2 y2` on its own (possibly indented) line.
fn parse_segment_line(line: &str) -> Option<Segment> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }
    let coord = |idx: usize| parts[idx].parse::<f64>().unwrap_or(0.0);
    Some(Segment::new(
        Point::new(coord(0), coord(1)),
        Point::new(coord(2), coord(3)),
    ))
}

/// `Text Label x y orient size ...` (also GLabel/HLabel/Notes); the next line
/// is the text payload.
fn parse_text_block(lines: &[&str], i: &mut usize) -> Option<Record> {
    let header: Vec<&str> = lines[*i].trim().split_whitespace().collect();
    *i += 1;
    if header.len() < 4 {
        return None;
    }
    let num = |idx: usize| {
        header
            .get(idx)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let position = Point::new(num(2), num(3));
    let rotation = match header.get(4).and_then(|s| s.parse::<i64>().ok()).unwrap_or(0) {
        1 => 90,
        2 => 180,
        3 => 270,
        _ => 0,
    };
    let size = header
        .get(5)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(50);
    let payload = if *i < lines.len() {
        let text = lines[*i].trim().to_string();
        *i += 1;
        text
    } else {
        String::new()
    };
    if payload.is_empty() {
        return None;
    }
    Some(Record::Text(TextRecord {
        position,
        color: TEXT_COLOR,
        size,
        visible: true,
        show: ShowMode::NameValue,
        rotation,
        alignment: 0,
        payload,
        attributes: vec![],
    }))
}

/// `$Comp`..`$EndComp`: `L lib ref`, `P x y`, and `F n "value" orient x y
/// size flags ...` field lines. Fields become attributes; field 0 is the
/// reference, field 1 the value.
fn parse_component_block(lines: &[&str], i: &mut usize) -> Option<Record> {
    let mut name = String::new();
    let mut position = Point::new(0.0, 0.0);
    let mut attributes = Vec::new();

    while *i < lines.len() {
        let line = lines[*i].trim();
        *i += 1;
        if line == "$EndComp" {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first() {
            Some(&"L") if parts.len() >= 2 => {
                name = parts[1].to_string();
            }
            Some(&"P") if parts.len() >= 3 => {
                position = Point::new(
                    parts[1].parse::<f64>().unwrap_or(0.0),
                    parts[2].parse::<f64>().unwrap_or(0.0),
                );
            }
            Some(&"F") => {
                if let Some(attr) = parse_field_line(line) {
                    attributes.push(attr);
                }
            }
            _ => {}
        }
    }

    if name.is_empty() {
        return None;
    }
    Some(Record::Component(ComponentRecord {
        position,
        locked: false,
        rotation: 0,
        mirror: false,
        name,
        symbol: None,
        attributes,
    }))
}

/// One `F` field line. The value is the first double-quoted span; the
/// remaining tokens are orientation, position, size, and visibility flags.
fn parse_field_line(line: &str) -> Option<Attribute> {
    let open = line.find('"')?;
    let close = open + 1 + line[open + 1..].find('"')?;
    let value = line[open + 1..close].to_string();
    let before: Vec<&str> = line[..open].split_whitespace().collect();
    let after: Vec<&str> = line[close + 1..].split_whitespace().collect();

    let field_index = before.get(1).and_then(|s| s.parse::<u32>().ok())?;
    let key = match field_index {
        0 => "refdes".to_string(),
        1 => "value".to_string(),
        2 => "footprint".to_string(),
        3 => "datasheet".to_string(),
        n => format!("field{n}"),
    };
    let num = |idx: usize| {
        after
            .get(idx)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let rotation = if after.first() == Some(&"V") { 90 } else { 0 };
    // Layout after the quoted value: orient x y size flags ...
    let position = Point::new(num(1), num(2));
    let size = num(3) as i64;
    let visible = after.get(4) != Some(&"0001");
    Some(Attribute {
        key,
        value,
        position,
        color: ATTRIBUTE_COLOR,
        size,
        visible,
        show: ShowMode::Value,
        rotation,
        alignment: 0,
    })
}
