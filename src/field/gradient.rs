//! Gradient panels and the grid overlay painted behind the field

use egui::{Color32, Mesh, Painter, Pos2, Rect, Stroke};

use crate::core::GradientSpec;

fn color([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn quad(corners: [(Pos2, Color32); 4]) -> Mesh {
    let mut mesh = Mesh::default();
    for (pos, c) in corners {
        mesh.colored_vertex(pos, c);
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

/// Static fallback panel: diagonal two-stop gradient over `rect`
pub fn paint_static_panel(painter: &Painter, rect: Rect, spec: &GradientSpec) {
    let mid = color(spec.at(0.5));
    painter.add(quad([
        (rect.left_top(), color(spec.from)),
        (rect.right_top(), mid),
        (rect.right_bottom(), color(spec.to)),
        (rect.left_bottom(), mid),
    ]));
}

/// Fade from `bottom` at the lower edge to transparent at the top
pub fn paint_bottom_fade(painter: &Painter, rect: Rect, bottom: Color32) {
    painter.add(quad([
        (rect.left_top(), Color32::TRANSPARENT),
        (rect.right_top(), Color32::TRANSPARENT),
        (rect.right_bottom(), bottom),
        (rect.left_bottom(), bottom),
    ]));
}

/// Distance between grid lines in points
pub const GRID_SPACING: f32 = 40.0;
/// Grid line color: white at 10% opacity
pub const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(25, 25, 25, 25);

/// Endpoints of the vertical then horizontal grid lines covering `rect`,
/// anchored at its top-left corner.
pub fn grid_lines(rect: Rect, spacing: f32) -> Vec<[Pos2; 2]> {
    if spacing.is_nan() || spacing <= 0.0 || !rect.is_positive() {
        return Vec::new();
    }
    let columns = (rect.width() / spacing).floor() as usize;
    let rows = (rect.height() / spacing).floor() as usize;

    let mut lines = Vec::with_capacity(columns + rows + 2);
    for i in 0..=columns {
        let x = rect.left() + i as f32 * spacing;
        lines.push([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())]);
    }
    for i in 0..=rows {
        let y = rect.top() + i as f32 * spacing;
        lines.push([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)]);
    }
    lines
}

/// Faint square grid over `rect`
pub fn paint_grid(painter: &Painter, rect: Rect) {
    let stroke = Stroke::new(1.0, GRID_COLOR);
    for line in grid_lines(rect, GRID_SPACING) {
        painter.line_segment(line, stroke);
    }
}
