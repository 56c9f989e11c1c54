use crate::model::Pose;
use crate::scene::{
    Layer, Marker, Paint, PathCommand, PathData, Primitive, Scene, Stroke, Style, TextAnchor,
};
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root element id; also prefixes every `<defs>` id so several drawings can share a page.
    pub diagram_id: Option<String>,
    /// Solid background fill. `None` leaves the canvas transparent.
    pub background: Option<String>,
    /// Adds extra space around the canvas viewBox.
    pub viewbox_padding: f64,
}

pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("bellows");
    let id = escape_xml(diagram_id);
    let pad = options.viewbox_padding.max(0.0);
    let vb_w = scene.width + pad * 2.0;
    let vb_h = scene.height + pad * 2.0;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="bellows">"#,
        id = id,
        x = fmt(-pad),
        y = fmt(-pad),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );
    write_defs(&mut out, &id, scene);

    if let Some(bg) = options.background.as_deref() {
        let _ = write!(
            &mut out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
            x = fmt(-pad),
            y = fmt(-pad),
            w = fmt(vb_w),
            h = fmt(vb_h),
            fill = escape_xml(bg)
        );
    }

    let mut glow_index = 0usize;
    for layer in &scene.layers {
        write_layer(&mut out, &id, layer, &mut glow_index);
    }
    out.push_str("</svg>\n");
    out
}

fn write_defs(out: &mut String, id: &str, scene: &Scene) {
    out.push_str("<defs>");
    let _ = write!(
        out,
        r##"<linearGradient id="{id}-metal" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="#94a3b8"/><stop offset="40%" stop-color="#e2e8f0"/><stop offset="60%" stop-color="#cbd5e1"/><stop offset="100%" stop-color="#475569"/></linearGradient>"##
    );
    let _ = write!(
        out,
        r#"<linearGradient id="{id}-pipe-shine" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="white" stop-opacity="0.1"/><stop offset="40%" stop-color="white" stop-opacity="0.6"/><stop offset="60%" stop-color="black" stop-opacity="0.1"/></linearGradient>"#
    );
    let _ = write!(
        out,
        r##"<pattern id="{id}-hatch" width="8" height="8" patternTransform="rotate(45 0 0)" patternUnits="userSpaceOnUse"><line x1="0" y1="0" x2="0" y2="8" stroke="#38bdf8" stroke-width="1"/></pattern>"##
    );
    let _ = write!(
        out,
        r##"<marker id="{id}-arrowhead" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" fill="#38bdf8"/></marker>"##
    );
    let glows = scene
        .layers
        .iter()
        .flat_map(|l| l.primitives.iter())
        .filter_map(|p| match p {
            Primitive::Glow { blur, .. } => Some(*blur),
            _ => None,
        });
    for (i, blur) in glows.enumerate() {
        let _ = write!(
            out,
            r#"<filter id="{id}-glow-{i}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{sd}"/></filter>"#,
            sd = fmt(blur / 2.0)
        );
    }
    out.push_str("</defs>");
}

fn write_layer(out: &mut String, id: &str, layer: &Layer, glow_index: &mut usize) {
    let _ = write!(out, r#"<g class="{}""#, layer.role.as_str());
    if let Some(o) = layer.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt(o));
    }
    out.push('>');
    for p in &layer.primitives {
        write_primitive(out, id, p, glow_index);
    }
    out.push_str("</g>");
}

fn write_primitive(out: &mut String, id: &str, p: &Primitive, glow_index: &mut usize) {
    match p {
        Primitive::Path { data, style } => {
            let _ = write!(out, r#"<path d="{}""#, path_d(data));
            write_style(out, id, style);
            out.push_str("/>");
        }
        Primitive::Rect {
            placement,
            x,
            y,
            width,
            height,
            rx,
            style,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(*x),
                fmt(*y),
                fmt(*width),
                fmt(*height)
            );
            if *rx > 0.0 {
                let _ = write!(out, r#" rx="{}""#, fmt(*rx));
            }
            write_transform(out, placement);
            write_style(out, id, style);
            out.push_str("/>");
        }
        Primitive::Circle {
            placement,
            cx,
            cy,
            r,
            style,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt(*cx),
                fmt(*cy),
                fmt(*r)
            );
            write_transform(out, placement);
            write_style(out, id, style);
            out.push_str("/>");
        }
        Primitive::Line {
            from,
            to,
            stroke,
            marker_end,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt(from.x),
                fmt(from.y),
                fmt(to.x),
                fmt(to.y)
            );
            write_stroke(out, stroke);
            if let Some(Marker::Arrowhead) = marker_end {
                let _ = write!(out, r#" marker-end="url(#{id}-arrowhead)""#);
            }
            out.push_str("/>");
        }
        Primitive::Text {
            at,
            content,
            color,
            font_size,
            font_family,
            anchor,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-family="{}" text-anchor="{}">{}</text>"#,
                fmt(at.x),
                fmt(at.y),
                escape_xml(color),
                fmt(*font_size),
                escape_xml(font_family),
                anchor,
                escape_xml(content)
            );
        }
        Primitive::Glow {
            center,
            rx,
            ry,
            color,
            opacity,
            ..
        } => {
            let _ = write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}" opacity="{}" filter="url(#{id}-glow-{i})"/>"#,
                fmt(center.x),
                fmt(center.y),
                fmt(*rx),
                fmt(*ry),
                escape_xml(color),
                fmt(*opacity),
                i = *glow_index
            );
            *glow_index += 1;
        }
    }
}

fn write_transform(out: &mut String, pose: &Pose) {
    if pose.x == 0.0 && pose.y == 0.0 && pose.rotation == 0.0 {
        return;
    }
    let _ = write!(
        out,
        r#" transform="translate({},{})"#,
        fmt(pose.x),
        fmt(pose.y)
    );
    if pose.rotation != 0.0 {
        let _ = write!(out, " rotate({})", fmt(pose.rotation_degrees()));
    }
    out.push('"');
}

fn paint_ref(id: &str, paint: &Paint) -> String {
    match paint {
        Paint::Metal => format!("url(#{id}-metal)"),
        Paint::PipeShine => format!("url(#{id}-pipe-shine)"),
        Paint::Hatch => format!("url(#{id}-hatch)"),
        Paint::Color(c) => escape_xml(c),
    }
}

fn write_style(out: &mut String, id: &str, style: &Style) {
    match &style.fill {
        Some(paint) => {
            let _ = write!(out, r#" fill="{}""#, paint_ref(id, paint));
        }
        None => out.push_str(r#" fill="none""#),
    }
    match &style.stroke {
        Some(stroke) => write_stroke(out, stroke),
        None => out.push_str(r#" stroke="none""#),
    }
    if let Some(o) = style.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt(o));
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        escape_xml(stroke.color),
        fmt(stroke.width)
    );
    if let Some(o) = stroke.opacity {
        let _ = write!(out, r#" stroke-opacity="{}""#, fmt(o));
    }
    if let Some(dash) = stroke.dash {
        let _ = write!(out, r#" stroke-dasharray="{}""#, escape_xml(dash));
    }
    if stroke.round_cap {
        out.push_str(r#" stroke-linecap="round""#);
    }
}

/// Serializes path commands as an SVG `d` attribute with 3 fractional digits.
pub fn path_d(data: &PathData) -> String {
    let mut out = String::new();
    for cmd in &data.commands {
        match cmd {
            PathCommand::MoveTo(p) => {
                let _ = write!(out, "M{},{}", fmt_path(p.x), fmt_path(p.y));
            }
            PathCommand::LineTo(p) => {
                let _ = write!(out, "L{},{}", fmt_path(p.x), fmt_path(p.y));
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let _ = write!(
                    out,
                    "C{},{},{},{},{},{}",
                    fmt_path(ctrl1.x),
                    fmt_path(ctrl1.y),
                    fmt_path(ctrl2.x),
                    fmt_path(ctrl2.y),
                    fmt_path(to.x),
                    fmt_path(to.y)
                );
            }
            PathCommand::Close => out.push('Z'),
        }
    }
    out
}

pub(crate) fn fmt(v: f64) -> String {
    // Round-trippable decimal without `-0` or float noise.
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }
    format!("{v}")
}

pub(crate) fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    fmt((v * 1000.0).round() / 1000.0)
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_drops_float_noise() {
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(1e-12), "0");
        assert_eq!(fmt(349.99999999), "350");
        assert_eq!(fmt(0.25), "0.25");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn fmt_path_rounds_to_three_digits() {
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-0.0004), "0");
        assert_eq!(fmt_path(10.0), "10");
    }

    #[test]
    fn escape_xml_escapes_markup() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
