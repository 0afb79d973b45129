use egui::{Pos2, Rect};
use glam::{Mat4, Vec3, Vec4};

use crate::layout::SceneAssembly;

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 4000.0;
pub const MIN_DISTANCE: f32 = 100.0;
pub const MAX_DISTANCE: f32 = 1000.0;
pub const DAMPING_FACTOR: f32 = 0.1;

const DEFAULT_DISTANCE: f32 = 400.0;
const DEFAULT_PITCH: f32 = 0.35;
const ORBIT_SENSITIVITY: f32 = 0.008;
const ZOOM_STEP: f32 = 1.15;
const FRAMING_MARGIN: f32 = 1.2;
const PITCH_LIMIT: f32 = 1.5;

/// Damped orbit rig around a fixed target. Pointer input moves the goal
/// values; `update` eases the live values toward them each frame.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: DEFAULT_PITCH,
            distance: DEFAULT_DISTANCE,
            goal_yaw: 0.0,
            goal_pitch: DEFAULT_PITCH,
            goal_distance: DEFAULT_DISTANCE,
        }
    }
}

impl OrbitCamera {
    /// Apply a pointer drag to the orbit goals.
    pub fn orbit(&mut self, delta: egui::Vec2) {
        self.goal_yaw += delta.x * ORBIT_SENSITIVITY;
        self.goal_pitch =
            (self.goal_pitch + delta.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply scroll input; distance stays inside the fixed zoom range.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let factor = ZOOM_STEP.powf(-scroll.signum());
        self.goal_distance = (self.goal_distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Jump the goal (and, for framing, the live value) to a new distance.
    pub fn set_distance(&mut self, distance: f32) {
        self.goal_distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn reset(&mut self) {
        self.goal_yaw = 0.0;
        self.goal_pitch = DEFAULT_PITCH;
        self.goal_distance = DEFAULT_DISTANCE;
    }

    /// One damping step; the live orientation eases toward the goals.
    pub fn update(&mut self) {
        self.yaw += (self.goal_yaw - self.yaw) * DAMPING_FACTOR;
        self.pitch += (self.goal_pitch - self.pitch) * DAMPING_FACTOR;
        self.distance += (self.goal_distance - self.distance) * DAMPING_FACTOR;
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            aspect.max(1e-3),
            NEAR_PLANE,
            FAR_PLANE,
        );
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        projection * view
    }
}

/// Owns the camera and the per-frame viewport adaptation. No ambient state:
/// the host is created once per mount and threaded through every call.
#[derive(Debug, Default)]
pub struct SceneHost {
    pub camera: OrbitCamera,
}

impl SceneHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the camera back far enough that the whole assembly is visible.
    /// Re-invoked after every rebuild, not only on first load.
    pub fn frame(&mut self, assembly: &SceneAssembly) {
        let radius = (assembly.bounds().size().length() * 0.5).max(1.0);
        let distance = radius / (FOV_Y_DEGREES.to_radians() * 0.5).tan() * FRAMING_MARGIN;
        self.camera.target = assembly.bounds().center();
        self.camera.set_distance(distance);
    }
}

/// Project a world point into `rect`. Returns `None` for points at or behind
/// the camera plane.
pub fn project(view_projection: &Mat4, rect: Rect, point: Vec3) -> Option<Pos2> {
    let clip = *view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Pos2::new(
        rect.center().x + ndc.x * rect.width() * 0.5,
        rect.center().y - ndc.y * rect.height() * 0.5,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::layout::build_assembly;
    use crate::model::{DisplaySettings, LayerDescriptor};

    #[test]
    fn damping_converges_on_goals() {
        let mut camera = OrbitCamera::default();
        camera.orbit(egui::vec2(100.0, 0.0));
        camera.zoom(3.0);
        for _ in 0..200 {
            camera.update();
        }
        assert_relative_eq!(camera.yaw, camera.goal_yaw, epsilon = 1e-3);
        assert_relative_eq!(camera.distance, camera.goal_distance, epsilon = 1e-2);
    }

    #[test]
    fn zoom_respects_fixed_range() {
        let mut camera = OrbitCamera::default();
        for _ in 0..100 {
            camera.zoom(-1.0);
        }
        assert_relative_eq!(camera.goal_distance, MAX_DISTANCE);
        for _ in 0..100 {
            camera.zoom(1.0);
        }
        assert_relative_eq!(camera.goal_distance, MIN_DISTANCE);
    }

    #[test]
    fn framing_backs_off_for_longer_models() {
        let short: Vec<LayerDescriptor> = (0..2)
            .map(|i| LayerDescriptor::new(&format!("c{i}"), "Conv2D", "(None, 20, 20, 30)"))
            .collect();
        let long: Vec<LayerDescriptor> = (0..12)
            .map(|i| LayerDescriptor::new(&format!("c{i}"), "Conv2D", "(None, 20, 20, 30)"))
            .collect();
        let settings = DisplaySettings::default();

        let mut host = SceneHost::new();
        host.frame(&build_assembly(&short, &settings));
        let near = host.camera.goal_distance;
        host.frame(&build_assembly(&long, &settings));
        let far = host.camera.goal_distance;
        assert!(far > near, "longer models must be framed farther back");
    }

    #[test]
    fn projection_centers_the_origin() {
        let camera = OrbitCamera::default();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let vp = camera.view_projection(rect.aspect_ratio());
        let center = project(&vp, rect, Vec3::ZERO).unwrap();
        assert_relative_eq!(center.x, 400.0, epsilon = 0.5);
        assert_relative_eq!(center.y, 300.0, epsilon = 0.5);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let camera = OrbitCamera::default();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let vp = camera.view_projection(rect.aspect_ratio());
        let behind = camera.eye() + (camera.eye() - camera.target);
        assert!(project(&vp, rect, behind).is_none());
    }
}
