//! Position-code driven text alignment.
//!
//! gEDA alignment codes 0..8 address a 3x3 grid: `code / 3` selects the
//! baseline row, `code % 3` the anchor column. Mirroring reverses the column
//! order. At 180 degrees the anchor grid flips but the glyphs do not: the
//! baseline list is reversed and the emitted rotation is forced to 0 instead
//! of the general `360 - rotation`. That exception is deliberate; keep it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Begin,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Begin => "begin",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Baseline,
    Middle,
    Hanging,
}

impl Baseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Baseline::Baseline => "baseline",
            Baseline::Middle => "middle",
            Baseline::Hanging => "hanging",
        }
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved SVG text placement: anchor, dominant baseline, and the rotation
/// to emit in the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAnchor {
    pub anchor: Anchor,
    pub baseline: Baseline,
    pub rotation: i32,
}

const ANCHORS: [Anchor; 3] = [Anchor::Begin, Anchor::Middle, Anchor::End];
const BASELINES: [Baseline; 3] = [Baseline::Baseline, Baseline::Middle, Baseline::Hanging];
const BASELINES_FLIPPED: [Baseline; 3] =
    [Baseline::Hanging, Baseline::Middle, Baseline::Baseline];

/// Map an alignment code and rotation to SVG placement.
pub fn resolve_anchor(code: u8, rotation: i32, mirror: bool) -> TextAnchor {
    let rotation = rotation.rem_euclid(360);
    let row = (code / 3).min(2) as usize;
    let col = (code % 3) as usize;
    let col = if mirror { 2 - col } else { col };
    if rotation == 180 {
        TextAnchor {
            anchor: ANCHORS[col],
            baseline: BASELINES_FLIPPED[row],
            rotation: 0,
        }
    } else {
        TextAnchor {
            anchor: ANCHORS[col],
            baseline: BASELINES[row],
            rotation: (360 - rotation) % 360,
        }
    }
}

/// Escape text for SVG content.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Render one line of schematic text as tspans. `\_` toggles overline
/// (active-low markers): segments alternate plain/overlined, empty segments
/// only toggle.
pub fn overline_spans(text: &str) -> String {
    let mut out = String::new();
    let mut overline = false;
    for part in text.split("\\_") {
        if !part.is_empty() {
            if overline {
                out.push_str(&format!(
                    "<tspan text-decoration=\"overline\">{}</tspan>",
                    xml_escape(part)
                ));
            } else {
                out.push_str(&format!("<tspan>{}</tspan>", xml_escape(part)));
            }
        }
        overline = !overline;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_codes() {
        let a = resolve_anchor(0, 0, false);
        assert_eq!((a.anchor, a.baseline), (Anchor::Begin, Baseline::Baseline));

        let a = resolve_anchor(4, 0, false);
        assert_eq!((a.anchor, a.baseline), (Anchor::Middle, Baseline::Middle));

        let a = resolve_anchor(8, 0, false);
        assert_eq!((a.anchor, a.baseline), (Anchor::End, Baseline::Hanging));
    }

    #[test]
    fn rotation_180_flips_baseline_and_zeroes_rotation() {
        let a = resolve_anchor(4, 180, false);
        assert_eq!((a.anchor, a.baseline), (Anchor::Middle, Baseline::Middle));
        assert_eq!(a.rotation, 0);

        let a = resolve_anchor(0, 180, false);
        assert_eq!(a.baseline, Baseline::Hanging);
        assert_eq!(a.rotation, 0);
    }

    #[test]
    fn general_rotation_is_360_minus() {
        assert_eq!(resolve_anchor(0, 90, false).rotation, 270);
        assert_eq!(resolve_anchor(0, 270, false).rotation, 90);
        assert_eq!(resolve_anchor(0, 0, false).rotation, 0);
    }

    #[test]
    fn mirror_reverses_columns() {
        assert_eq!(resolve_anchor(2, 0, false).anchor, Anchor::End);
        assert_eq!(resolve_anchor(2, 0, true).anchor, Anchor::Begin);
        // Middle column is its own mirror image.
        assert_eq!(resolve_anchor(1, 0, true).anchor, Anchor::Middle);
    }

    #[test]
    fn overline_alternation() {
        assert_eq!(overline_spans("plain"), "<tspan>plain</tspan>");
        assert_eq!(
            overline_spans("A\\_RD\\_B"),
            "<tspan>A</tspan><tspan text-decoration=\"overline\">RD</tspan><tspan>B</tspan>"
        );
        // Leading marker: first segment empty, only toggles.
        assert_eq!(
            overline_spans("\\_RESET\\_"),
            "<tspan text-decoration=\"overline\">RESET</tspan>"
        );
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape("a<b & c"), "a&lt;b &amp; c");
        assert_eq!(overline_spans("1<2"), "<tspan>1&lt;2</tspan>");
    }
}
