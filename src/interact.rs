use egui::{Pos2, Rect};
use glam::{Mat4, Vec3, Vec4};

use crate::layout::SceneAssembly;

/// A world-space ray cast from the camera through a pointer position.
#[derive(Debug, Clone, Copy)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Convert a pointer position inside `rect` to a world-space ray by
/// unprojecting the near- and far-plane points under the inverse
/// view-projection. Returns `None` for degenerate cases (singular matrix,
/// pointer outside the rect).
pub fn pointer_ray(view_projection: &Mat4, rect: Rect, pointer: Pos2) -> Option<PointerRay> {
    if !rect.contains(pointer) {
        return None;
    }
    let ndc_x = (pointer.x - rect.center().x) / (rect.width() * 0.5);
    let ndc_y = (rect.center().y - pointer.y) / (rect.height() * 0.5);

    let inverse = view_projection.inverse();
    // glam's perspective matrices use a 0..1 depth range.
    let near = unproject(&inverse, ndc_x, ndc_y, 0.0)?;
    let far = unproject(&inverse, ndc_x, ndc_y, 1.0)?;
    let direction = far - near;
    if direction.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(PointerRay {
        origin: near,
        direction: direction.normalize(),
    })
}

fn unproject(inverse: &Mat4, ndc_x: f32, ndc_y: f32, ndc_z: f32) -> Option<Vec3> {
    let world = *inverse * Vec4::new(ndc_x, ndc_y, ndc_z, 1.0);
    if world.w.abs() <= f32::EPSILON {
        return None;
    }
    let point = world.truncate() / world.w;
    point.is_finite().then_some(point)
}

/// Slab test of `ray` against every box AABB; the nearest hit in front of
/// the origin wins. Misses are `None`, never an error.
pub fn pick(ray: PointerRay, assembly: &SceneAssembly) -> Option<usize> {
    let mut nearest: Option<(usize, f32)> = None;
    for (index, layer_box) in assembly.boxes.iter().enumerate() {
        let Some(t) = ray_aabb(ray, layer_box.min(), layer_box.max()) else {
            continue;
        };
        if nearest.is_none_or(|(_, best)| t < best) {
            nearest = Some((index, t));
        }
    }
    nearest.map(|(index, _)| index)
}

fn ray_aabb(ray: PointerRay, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = 0.0f32;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let (lo, hi) = (min[axis], max[axis]);
        if direction.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let t0 = (lo - origin) / direction;
        let t1 = (hi - origin) / direction;
        let (t_near, t_far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_enter = t_enter.max(t_near);
        t_exit = t_exit.min(t_far);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

/// Flip the tooltip attached to `box_index`, if any. Exactly one tooltip
/// changes per call; hits without a binding are no-ops.
pub fn toggle_tooltip(assembly: &mut SceneAssembly, box_index: usize) {
    let Some(binding) = assembly.binding(box_index) else {
        return;
    };
    if let Some(tooltip) = assembly.tooltips.get_mut(binding.tooltip) {
        tooltip.visible = !tooltip.visible;
    }
}
