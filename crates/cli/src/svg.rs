//! SVG export of the cut paths (millimetre units) with the frame outline.

use std::fmt::Write as _;

use shatter::api::{Impact, Point};

/// Render `impact` as an SVG document.
///
/// The view box covers the frame and every cutting tab; coordinates are shifted
/// so the box starts at the origin. Cuts are black, the frame red.
pub fn render(impact: &Impact) -> String {
    let frame = impact.frame();
    let corners = [frame.min_corner(), frame.max_corner()];
    let cut_points = impact
        .tabs()
        .filter(|(_, t)| !t.is_gap())
        .flat_map(|(_, t)| t.points().iter().copied());
    let (lo, hi) = corners.into_iter().chain(cut_points).fold(
        (corners[0], corners[1]),
        |(lo, hi), p| {
            (
                Point::new(lo.x().min(p.x()), lo.y().min(p.y())),
                Point::new(hi.x().max(p.x()), hi.y().max(p.y())),
            )
        },
    );
    let (w, h) = (hi.x() - lo.x(), hi.y() - lo.y());

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#
    );
    for path in impact.to_polylines() {
        let pts: Vec<String> = path
            .points()
            .iter()
            .map(|p| format!("{:.3},{:.3}", p.x() - lo.x(), p.y() - lo.y()))
            .collect();
        let _ = writeln!(
            out,
            r#"  <polyline points="{}" fill="none" stroke="black" stroke-width="0.1"/>"#,
            pts.join(" ")
        );
    }
    let _ = writeln!(
        out,
        r#"  <rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="none" stroke="red" stroke-width="0.1"/>"#,
        frame.min_corner().x() - lo.x(),
        frame.min_corner().y() - lo.y(),
        frame.width(),
        frame.height()
    );
    out.push_str("</svg>\n");
    out
}
