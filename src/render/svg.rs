//! SVG serialization of draw commands

use std::fmt::Write;

use super::style::{hex, MapStyle, PathStyle};
use super::{DrawCommand, Ring};

/// Serialize draw commands into a standalone SVG document
///
/// The viewport is `width` by `height` with the origin at the top left,
/// matching the projection's screen coordinates. Marker titles become
/// `<title>` children so browsers show them on hover.
pub fn to_svg(commands: &[DrawCommand], width: f64, height: f64, style: &impl MapStyle) -> String {
    let mut svg = String::new();
    // writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );

    for command in commands {
        match command {
            DrawCommand::Boundary { name, rings } => {
                let _ = write!(svg, r#"  <path class="boundary""#);
                if let Some(name) = name {
                    let _ = write!(svg, r#" data-name="{}""#, escape(name));
                }
                write_path(&mut svg, rings, &style.boundary());
            }
            DrawCommand::Cell { seed_index, rings } => {
                let _ = write!(svg, r#"  <path class="cell" data-seed="{}""#, seed_index);
                write_path(&mut svg, rings, &style.cell(*seed_index));
            }
            DrawCommand::Marker {
                seed_index,
                position,
                title,
            } => {
                let marker = style.marker(*seed_index);
                let _ = writeln!(
                    svg,
                    r#"  <circle class="station" cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"><title>{}</title></circle>"#,
                    fmt(position.x),
                    fmt(position.y),
                    marker.radius,
                    hex(marker.fill),
                    hex(marker.stroke),
                    marker.stroke_width,
                    escape(title)
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_path(svg: &mut String, rings: &[Ring], style: &PathStyle) {
    let _ = writeln!(
        svg,
        r#" d="{}" fill="{}" fill-opacity="{}" fill-rule="evenodd" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
        path_data(rings),
        hex(style.fill),
        style.fill_opacity,
        hex(style.stroke),
        style.stroke_width,
        style.stroke_opacity
    );
}

/// `M x,y L x,y ... Z` for each ring
fn path_data(rings: &[Ring]) -> String {
    let mut d = String::new();
    for ring in rings {
        // the closing vertex is implied by Z
        let open = match ring.split_last() {
            Some((last, rest)) if Some(last) == rest.first() => rest,
            _ => ring.as_slice(),
        };
        for (i, p) in open.iter().enumerate() {
            let op = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{},{}", op, fmt(p.x), fmt(p.y));
        }
        if !open.is_empty() {
            d.push('Z');
        }
    }
    d
}

/// Coordinates rounded to 1/1000 of a pixel
fn fmt(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
