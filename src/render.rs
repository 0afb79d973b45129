use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};
use glam::{Mat4, Vec3};

use crate::layout::SceneAssembly;
use crate::scene::{SceneHost, project};

const EDGE_STROKE: f32 = 1.2;
const CONNECTOR_STROKE: f32 = 2.0;
const ARROW_HEAD: f32 = 9.0;
const SIZE_LABEL_FONT: f32 = 11.0;
const NAME_LABEL_FONT: f32 = 13.0;
const TOOLTIP_FONT: f32 = 12.0;
const TOOLTIP_LINE_HEIGHT: f32 = 16.0;
const TOOLTIP_PADDING: f32 = 8.0;

/// Quad corner indices into `LayerBox` corner order, one entry per face.
const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2], // -z
    [4, 5, 6, 7], // +z
    [0, 4, 7, 3], // -x
    [5, 1, 2, 6], // +x
    [0, 1, 5, 4], // -y
    [3, 7, 6, 2], // +y
];

const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// One continuously rescheduled step: advance control damping, paint the 3D
/// pass, paint the label overlay pass. The caller reschedules every frame;
/// there is no pause or backoff here.
pub fn run_frame(
    painter: &Painter,
    rect: Rect,
    host: &mut SceneHost,
    assembly: Option<&SceneAssembly>,
) {
    host.camera.update();
    let Some(assembly) = assembly else {
        return;
    };
    let view_projection = host.camera.view_projection(rect.aspect_ratio());
    let eye = host.camera.eye();
    draw_solid_pass(painter, rect, &view_projection, eye, assembly);
    draw_label_overlay(painter, rect, &view_projection, assembly);
}

/// Faces of every box, depth-sorted back to front, then wireframe edges and
/// connector arrows on top. Outlines ignore depth so every box stays
/// readable from any orbit angle.
fn draw_solid_pass(
    painter: &Painter,
    rect: Rect,
    view_projection: &Mat4,
    eye: Vec3,
    assembly: &SceneAssembly,
) {
    struct FaceDraw {
        depth: f32,
        points: Vec<Pos2>,
        fill: Color32,
    }

    let mut faces: Vec<FaceDraw> = Vec::with_capacity(assembly.boxes.len() * 6);
    for (box_index, layer_box) in assembly.boxes.iter().enumerate() {
        let Some(corners) = assembly.box_corners(box_index) else {
            continue;
        };
        for quad in &FACES {
            let centroid = (corners[quad[0]]
                + corners[quad[1]]
                + corners[quad[2]]
                + corners[quad[3]])
                * 0.25;
            let normal = (corners[quad[1]] - corners[quad[0]])
                .cross(corners[quad[3]] - corners[quad[0]]);
            if normal.dot(eye - centroid) <= 0.0 {
                continue; // backface
            }
            let mut points = Vec::with_capacity(4);
            let mut clipped = false;
            for index in quad {
                match project(view_projection, rect, corners[*index]) {
                    Some(point) => points.push(point),
                    None => {
                        clipped = true;
                        break;
                    }
                }
            }
            if clipped {
                continue;
            }
            faces.push(FaceDraw {
                depth: eye.distance_squared(centroid),
                points,
                fill: layer_box.fill.gamma_multiply(face_shade(normal)),
            });
        }
    }
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for face in faces {
        painter.add(egui::Shape::convex_polygon(
            face.points,
            face.fill,
            Stroke::NONE,
        ));
    }

    for (box_index, layer_box) in assembly.boxes.iter().enumerate() {
        let Some(corners) = assembly.box_corners(box_index) else {
            continue;
        };
        let stroke = Stroke::new(EDGE_STROKE, layer_box.edge);
        for [a, b] in &EDGES {
            if let (Some(from), Some(to)) = (
                project(view_projection, rect, corners[*a]),
                project(view_projection, rect, corners[*b]),
            ) {
                painter.line_segment([from, to], stroke);
            }
        }
    }

    for connector in &assembly.connectors {
        let (Some(from), Some(to)) = (
            project(view_projection, rect, connector.from),
            project(view_projection, rect, connector.to),
        ) else {
            continue;
        };
        let stroke = Stroke::new(CONNECTOR_STROKE, connector.color);
        painter.line_segment([from, to], stroke);
        draw_arrow_head(painter, from, to, stroke);
    }
}

fn draw_arrow_head(painter: &Painter, from: Pos2, to: Pos2, stroke: Stroke) {
    let shaft = to - from;
    if shaft.length() <= f32::EPSILON {
        return;
    }
    let dir = shaft.normalized();
    let normal = egui::vec2(-dir.y, dir.x);
    let base = to - dir * ARROW_HEAD;
    painter.line_segment([to, base + normal * ARROW_HEAD * 0.5], stroke);
    painter.line_segment([to, base - normal * ARROW_HEAD * 0.5], stroke);
}

/// Screen-space text pass drawn after the 3D pass: size labels, name
/// labels, and any visible tooltips.
fn draw_label_overlay(
    painter: &Painter,
    rect: Rect,
    view_projection: &Mat4,
    assembly: &SceneAssembly,
) {
    for label in &assembly.size_labels {
        if let Some(pos) = project(view_projection, rect, label.position) {
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                &label.text,
                FontId::monospace(SIZE_LABEL_FONT),
                label.color,
            );
        }
    }
    for label in &assembly.name_labels {
        if let Some(pos) = project(view_projection, rect, label.position) {
            painter.text(
                pos,
                Align2::CENTER_BOTTOM,
                &label.text,
                FontId::proportional(NAME_LABEL_FONT),
                label.color,
            );
        }
    }
    for tooltip in &assembly.tooltips {
        if !tooltip.visible {
            continue;
        }
        let Some(anchor) = project(view_projection, rect, tooltip.position) else {
            continue;
        };
        draw_tooltip_box(painter, rect, anchor, tooltip);
    }
}

fn draw_tooltip_box(painter: &Painter, rect: Rect, anchor: Pos2, tooltip: &crate::layout::Tooltip) {
    let font = FontId::proportional(TOOLTIP_FONT);
    let mut max_width: f32 = 0.0;
    for line in &tooltip.lines {
        let galley = painter.layout_no_wrap(line.clone(), font.clone(), tooltip.foreground);
        max_width = max_width.max(galley.size().x);
    }
    let size = egui::vec2(
        max_width + 2.0 * TOOLTIP_PADDING,
        tooltip.lines.len() as f32 * TOOLTIP_LINE_HEIGHT + 2.0 * TOOLTIP_PADDING,
    );
    let mut origin = anchor - egui::vec2(size.x * 0.5, size.y);
    // Keep the box inside the canvas.
    origin.x = origin.x.clamp(rect.left(), (rect.right() - size.x).max(rect.left()));
    origin.y = origin.y.clamp(rect.top(), (rect.bottom() - size.y).max(rect.top()));
    let tooltip_rect = Rect::from_min_size(origin, size);
    painter.rect_filled(tooltip_rect, 6.0, tooltip.background);
    for (index, line) in tooltip.lines.iter().enumerate() {
        painter.text(
            egui::pos2(
                tooltip_rect.left() + TOOLTIP_PADDING,
                tooltip_rect.top() + TOOLTIP_PADDING + index as f32 * TOOLTIP_LINE_HEIGHT,
            ),
            Align2::LEFT_TOP,
            line,
            font.clone(),
            tooltip.foreground,
        );
    }
}

/// Axis-based flat shading so adjacent faces of one box stay readable.
fn face_shade(normal: Vec3) -> f32 {
    let n = normal.normalize_or_zero();
    if n.y.abs() >= 0.5 {
        if n.y > 0.0 { 1.0 } else { 0.55 }
    } else if n.z.abs() >= 0.5 {
        0.85
    } else {
        0.7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_table_normals_point_outward() {
        // Unit box corners in LayerBox order.
        let lo = Vec3::splat(-0.5);
        let hi = Vec3::splat(0.5);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ];
        for quad in &FACES {
            let centroid = (corners[quad[0]]
                + corners[quad[1]]
                + corners[quad[2]]
                + corners[quad[3]])
                * 0.25;
            let normal = (corners[quad[1]] - corners[quad[0]])
                .cross(corners[quad[3]] - corners[quad[0]]);
            assert!(
                normal.dot(centroid) > 0.0,
                "face {quad:?} normal points inward"
            );
        }
    }

    #[test]
    fn shade_distinguishes_the_three_visible_axes() {
        let top = face_shade(Vec3::Y);
        let front = face_shade(Vec3::Z);
        let side = face_shade(Vec3::X);
        assert!(top > front && front > side);
        assert!(face_shade(-Vec3::Y) < face_shade(Vec3::Y));
    }
}
