//! SVG emission.
//!
//! Records are drawn in parse order (later records paint over earlier ones).
//! Each record is rendered into a scratch buffer so one failing record is
//! skipped with a warning instead of poisoning the document. Rendering the
//! same records and bounds twice produces byte-identical output: there is no
//! hidden state beyond the endpoint registry rebuilt on every call.

pub mod text;

use std::fmt::Write;

use crate::core::{RenderConfig, SchematicError};
use crate::endpoints::{EndpointMark, EndpointRegistry};
use crate::geometry::{
    polar_to_cartesian, screen_project, screen_transform, Bounds, Point, TransformContext,
};
use crate::parser::schema::*;
use text::{overline_spans, resolve_anchor, xml_escape};

/// Stroke width used for buses (the dialect fixes it).
const BUS_THICKNESS: f64 = 30.0;
/// Radius of junction dots.
const JUNCTION_RADIUS: f64 = 25.0;
/// Side length of dangling-endpoint markers.
const DANGLING_SIZE: f64 = 60.0;
/// Font units per point (gschem sizes text in points, SVG in mils).
const FONT_SCALE_NUM: i64 = 1000;
const FONT_SCALE_DEN: i64 = 72;

/// Render parsed records into an SVG document.
///
/// Pure in its inputs; safe to call concurrently for independent parses.
pub fn render<W: Write>(
    records: &[Record],
    bounds: &Bounds,
    config: &RenderConfig,
    out: &mut W,
) -> Result<(), SchematicError> {
    let bounds = if bounds.is_empty() {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        }
    } else {
        *bounds
    };
    let mut renderer = SvgRenderer {
        config,
        bounds,
        registry: EndpointRegistry::new(),
    };

    let width = bounds.width() + 2.0 * config.margin;
    let height = bounds.height() + 2.0 * config.margin;
    write!(
        out,
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" \
         xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{bg}\"/>\n",
        w = width,
        h = height,
        bg = config.palette.background(),
    )?;

    // Grid lines go first so everything else paints over them.
    if config.minor_grid {
        renderer.grid(out, 100.0, config.palette.raw(23), 1.0)?;
    }
    if config.major_grid {
        renderer.grid(out, 500.0, config.palette.raw(22), 2.0)?;
    }

    for record in records {
        let mut buf = String::new();
        match renderer.render_record(&mut buf, record, &TransformContext::IDENTITY, &[], false, &[])
        {
            Ok(()) => out.write_str(&buf)?,
            Err(err) => {
                tracing::warn!(%err, "skipping record that failed to render");
            }
        }
    }

    renderer.endpoint_markers(out)?;
    out.write_str("</svg>\n")?;
    Ok(())
}

struct SvgRenderer<'a> {
    config: &'a RenderConfig,
    bounds: Bounds,
    registry: EndpointRegistry,
}

impl SvgRenderer<'_> {
    fn screen(&self, p: Point) -> Point {
        screen_project(&self.bounds, p, self.config.margin)
    }

    fn render_record<W: Write>(
        &mut self,
        out: &mut W,
        record: &Record,
        ctx: &TransformContext,
        component_attrs: &[Attribute],
        locked: bool,
        slotdef: &[String],
    ) -> std::fmt::Result {
        let palette = &self.config.palette;
        match record {
            Record::Pin(pin) => {
                let seg = ctx.apply_segment(pin.segment);
                let (a, b) = (self.screen(seg.start), self.screen(seg.end));
                writeln!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    a.x, a.y, b.x, b.y,
                    palette.color(pin.color, locked),
                    self.config.min_thickness,
                )?;
                self.registry.register(seg.start);
                self.registry.register(seg.end);
            }
            Record::Net(net) => {
                let seg = ctx.apply_segment(net.segment);
                let (a, b) = (self.screen(seg.start), self.screen(seg.end));
                writeln!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    a.x, a.y, b.x, b.y,
                    palette.color(net.color, locked),
                    self.config.min_thickness,
                )?;
                self.registry.register(seg.start);
                self.registry.register(seg.end);
                self.registry.add_segment(seg);
            }
            Record::Wire(line) | Record::Label(line) => {
                let seg = ctx.apply_segment(line.segment);
                let (a, b) = (self.screen(seg.start), self.screen(seg.end));
                let thickness = line.width.max(self.config.min_thickness);
                writeln!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}px\" />",
                    a.x, a.y, b.x, b.y,
                    palette.color(line.color, locked),
                    thickness,
                )?;
            }
            Record::Bus(bus) => {
                let seg = ctx.apply_segment(bus.segment);
                let (a, b) = (self.screen(seg.start), self.screen(seg.end));
                writeln!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}px\" />",
                    a.x, a.y, b.x, b.y,
                    palette.color(bus.color, locked),
                    BUS_THICKNESS,
                )?;
            }
            Record::Box(b) => {
                let c1 = ctx.apply(b.origin);
                let c2 = ctx.apply(Point::new(b.origin.x + b.width, b.origin.y + b.height));
                let (p1, p2) = (self.screen(c1), self.screen(c2));
                writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" stroke=\"{}\" fill=\"none\" stroke-width=\"{}px\" />",
                    p1.x.min(p2.x),
                    p1.y.min(p2.y),
                    (p2.x - p1.x).abs(),
                    (p2.y - p1.y).abs(),
                    palette.color(b.color, locked),
                    b.stroke_width.max(self.config.min_thickness),
                )?;
            }
            Record::Text(t) => {
                self.render_text(out, t, ctx, component_attrs, locked)?;
            }
            Record::Arc(arc) => {
                let start = polar_to_cartesian(arc.center, arc.radius, arc.start_angle);
                let end = polar_to_cartesian(
                    arc.center,
                    arc.radius,
                    arc.start_angle + arc.sweep_angle,
                );
                let large_arc = if arc.sweep_angle > 180.0 { 1 } else { 0 };
                let mirror_scale = if ctx.mirror { -1 } else { 1 };
                let t = self.screen(ctx.offset);
                writeln!(
                    out,
                    "<path transform=\"translate({}, {}) rotate({}) scale({}, -1)\" \
                     d=\"M {} {} A {} {} 0 {} 1 {} {}\" stroke=\"{}\" fill-opacity=\"0\" stroke-width=\"{}\"/>",
                    t.x, t.y,
                    (360 - ctx.rotation.rem_euclid(360)) % 360,
                    mirror_scale,
                    start.x, start.y,
                    arc.radius, arc.radius,
                    large_arc,
                    end.x, end.y,
                    palette.color(arc.color, locked),
                    arc.stroke_width.max(self.config.min_thickness),
                )?;
            }
            Record::Circle(c) => {
                let center = self.screen(ctx.apply(c.center));
                writeln!(
                    out,
                    "<circle cx=\"{0}\" cy=\"{1}\" r=\"{2}\" stroke=\"{3}\" fill=\"{3}\" stroke-width=\"{4}\" fill-opacity=\"{5}\"/>",
                    center.x,
                    center.y,
                    c.radius,
                    palette.color(c.color, locked),
                    c.stroke_width.max(self.config.min_thickness),
                    c.fill_opacity,
                )?;
            }
            Record::Path(path) => {
                let t = self.screen(ctx.offset);
                let mirror_scale = if ctx.mirror { -1 } else { 1 };
                let data = path.data.trim().replace('\n', " ");
                // Path fill ignores the lock override.
                writeln!(
                    out,
                    "<path transform=\"translate({}, {}) rotate({}) scale({}, -1)\" d=\"{}\" fill=\"{}\"/>",
                    t.x, t.y,
                    (360 - ctx.rotation.rem_euclid(360)) % 360,
                    mirror_scale,
                    xml_escape(&data),
                    palette.raw(path.color),
                )?;
            }
            Record::Component(c) => {
                self.render_component(out, c)?;
                // A component's own attributes render without the symbol's
                // placement rotation.
                return self.render_attributes(out, &c.attributes, 0, false, c.locked, &[]);
            }
        }
        self.render_attributes(
            out,
            record.attributes(),
            ctx.rotation,
            ctx.embedded,
            locked,
            slotdef,
        )
    }

    fn render_component<W: Write>(&mut self, out: &mut W, c: &ComponentRecord) -> std::fmt::Result {
        let Some(symbol) = &c.symbol else {
            return Ok(());
        };
        let ctx = c.context();
        let slotdef = slot_definition(c, symbol);
        for sub in &symbol.records {
            self.render_record(out, sub, &ctx, &c.attributes, c.locked, &slotdef)?;
        }
        Ok(())
    }

    fn render_text<W: Write>(
        &mut self,
        out: &mut W,
        t: &TextRecord,
        ctx: &TransformContext,
        component_attrs: &[Attribute],
        locked: bool,
    ) -> std::fmt::Result {
        if !t.visible {
            return Ok(());
        }
        let mut content = t.payload.trim().to_string();
        if let Some(eq) = content.find('=') {
            // A key=value text duplicating a promoted attribute stays hidden.
            if component_attrs.iter().any(|a| a.key == content[..eq]) {
                return Ok(());
            }
            match t.show {
                ShowMode::Value => content = content[eq + 1..].to_string(),
                ShowMode::Name => content.truncate(eq),
                ShowMode::NameValue => {}
            }
        }

        let total_rotation = (ctx.rotation + t.rotation).rem_euclid(360);
        let placement = resolve_anchor(t.alignment, total_rotation, ctx.mirror);
        let font_size = t.size * FONT_SCALE_NUM / FONT_SCALE_DEN;
        let line_step = self.config.line_spacing * font_size as f64;
        let extra_lines = content.matches('\n').count() as f64;
        let v_offset = match placement.baseline {
            text::Baseline::Hanging => 0.0,
            text::Baseline::Middle => line_step * extra_lines / 2.0,
            text::Baseline::Baseline => line_step * extra_lines,
        };

        let base = ctx.apply(t.position);
        for (i, part) in content.split('\n').enumerate() {
            let p = self.screen(Point::new(base.x, base.y - i as f64 * line_step + v_offset));
            writeln!(
                out,
                "<text text-anchor=\"{}\" dominant-baseline=\"{}\" transform=\"translate({}, {}) rotate({})\" fill=\"{}\" font-size=\"{}\">{}</text>",
                placement.anchor,
                placement.baseline,
                p.x,
                p.y,
                placement.rotation,
                self.config.palette.color(t.color, locked),
                font_size,
                overline_spans(part),
            )?;
        }
        Ok(())
    }

    fn render_attributes<W: Write>(
        &mut self,
        out: &mut W,
        attrs: &[Attribute],
        base_rotation: i32,
        embedded: bool,
        locked: bool,
        slotdef: &[String],
    ) -> std::fmt::Result {
        let pinseq = attrs
            .iter()
            .find(|a| a.key == "pinseq")
            .and_then(|a| a.value.trim().parse::<usize>().ok());
        for attr in attrs {
            if !attr.visible {
                continue;
            }
            // Embedded symbols keep their authored attribute rotation.
            let rotation = if embedded {
                attr.rotation
            } else {
                (attr.rotation + base_rotation).rem_euclid(360)
            };
            let placement = resolve_anchor(attr.alignment, rotation, false);
            let mut value = attr.value.as_str();
            if !slotdef.is_empty() && attr.key == "pinnumber" {
                if let Some(seq) = pinseq {
                    if (1..=slotdef.len()).contains(&seq) {
                        value = &slotdef[seq - 1];
                    }
                }
            }
            let content = match attr.show {
                ShowMode::NameValue => format!("{}={}", attr.key, value),
                ShowMode::Value => value.to_string(),
                ShowMode::Name => attr.key.clone(),
            };
            let p = self.screen(attr.position);
            writeln!(
                out,
                "<text text-anchor=\"{}\" dominant-baseline=\"{}\" transform=\"translate({}, {}) rotate({})\" fill=\"{}\" font-size=\"{}\">{}</text>",
                placement.anchor,
                placement.baseline,
                p.x,
                p.y,
                placement.rotation,
                self.config.palette.color(attr.color, locked),
                attr.size * FONT_SCALE_NUM / FONT_SCALE_DEN,
                overline_spans(&content),
            )?;
        }
        Ok(())
    }

    fn grid<W: Write>(
        &self,
        out: &mut W,
        step: f64,
        color: &str,
        width: f64,
    ) -> Result<(), SchematicError> {
        let margin = self.config.margin;
        let extent_x = self.bounds.width() + 2.0 * margin;
        let extent_y = self.bounds.height() + 2.0 * margin;
        let mut x = step - (self.bounds.min_x - margin).rem_euclid(step);
        while x < extent_x {
            writeln!(
                out,
                "<line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{extent_y}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            )?;
            x += step;
        }
        let offset = (self.bounds.max_y + margin).rem_euclid(step);
        let mut y = if offset == 0.0 { step } else { offset };
        while y < extent_y {
            writeln!(
                out,
                "<line x1=\"0\" y1=\"{y}\" x2=\"{extent_x}\" y2=\"{y}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            )?;
            y += step;
        }
        Ok(())
    }

    fn endpoint_markers<W: Write>(&self, out: &mut W) -> Result<(), SchematicError> {
        for mark in self.registry.classify() {
            match mark {
                EndpointMark::Junction(p) => {
                    let c = self.screen(p);
                    writeln!(
                        out,
                        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"#ffff00\" />",
                        c.x, c.y, JUNCTION_RADIUS,
                    )?;
                }
                EndpointMark::Dangling(p) => {
                    // Markers go through the projection-time transform table.
                    let corner = screen_transform(
                        &self.bounds,
                        Point::new(p.x - DANGLING_SIZE / 2.0, p.y + DANGLING_SIZE / 2.0),
                        Point::new(0.0, 0.0),
                        0,
                        false,
                        self.config.margin,
                    );
                    writeln!(
                        out,
                        "<rect x=\"{}\" y=\"{}\" width=\"{s}\" height=\"{s}\" fill=\"#ff0000\" />",
                        corner.x,
                        corner.y,
                        s = DANGLING_SIZE,
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Pin-number remapping for slotted parts: the component's `slot` attribute
/// selects a `slotdef=slot:p1,p2,...` text in the symbol.
fn slot_definition(c: &ComponentRecord, symbol: &ResolvedSymbol) -> Vec<String> {
    let Some(slot) = c
        .attributes
        .iter()
        .find(|a| a.key == "slot")
        .map(|a| a.value.trim())
    else {
        return Vec::new();
    };
    for record in &symbol.records {
        if let Record::Text(t) = record {
            if let Some(rest) = t.payload.trim().strip_prefix("slotdef=") {
                if let Some((id, pins)) = rest.split_once(':') {
                    if id == slot {
                        return pins.split(',').map(|p| p.trim().to_string()).collect();
                    }
                }
            }
        }
    }
    Vec::new()
}
