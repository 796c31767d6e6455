//! Handle trait and common types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{Ray, TransformSnapshot};

/// Part of a gizmo that can be interacted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GizmoPart {
    // Translate arrows
    AxisX,
    AxisY,
    AxisZ,
    // Translate planes
    PlaneXY,
    PlaneXZ,
    PlaneYZ,
    // Rotation rings
    RingX,
    RingY,
    RingZ,
    // Scale handles
    HandleX,
    HandleY,
    HandleZ,
    UniformCenter,
    None,
}

impl GizmoPart {
    /// Mode whose handle set owns this part.
    pub fn mode(&self) -> Option<GizmoMode> {
        match self {
            GizmoPart::AxisX
            | GizmoPart::AxisY
            | GizmoPart::AxisZ
            | GizmoPart::PlaneXY
            | GizmoPart::PlaneXZ
            | GizmoPart::PlaneYZ => Some(GizmoMode::Translate),
            GizmoPart::RingX | GizmoPart::RingY | GizmoPart::RingZ => Some(GizmoMode::Rotate),
            GizmoPart::HandleX | GizmoPart::HandleY | GizmoPart::HandleZ | GizmoPart::UniformCenter => {
                Some(GizmoMode::Scale)
            }
            GizmoPart::None => None,
        }
    }

    /// Index of the single axis this part acts on.
    pub fn axis_index(&self) -> Option<usize> {
        match self {
            GizmoPart::AxisX | GizmoPart::RingX | GizmoPart::HandleX => Some(0),
            GizmoPart::AxisY | GizmoPart::RingY | GizmoPart::HandleY => Some(1),
            GizmoPart::AxisZ | GizmoPart::RingZ | GizmoPart::HandleZ => Some(2),
            _ => None,
        }
    }

    /// Index of the axis normal to a plane handle.
    pub fn plane_normal_index(&self) -> Option<usize> {
        match self {
            GizmoPart::PlaneYZ => Some(0),
            GizmoPart::PlaneXZ => Some(1),
            GizmoPart::PlaneXY => Some(2),
            _ => None,
        }
    }
}

/// Current gizmo operation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn label(&self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

/// Space for gizmo operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoSpace {
    /// Local space (relative to object rotation)
    Local,
    /// World space (aligned to world axes)
    #[default]
    World,
}

impl GizmoSpace {
    pub fn toggled(self) -> Self {
        match self {
            GizmoSpace::Local => GizmoSpace::World,
            GizmoSpace::World => GizmoSpace::Local,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GizmoSpace::Local => "Local",
            GizmoSpace::World => "World",
        }
    }
}

/// State during a handle drag.
#[derive(Clone, Debug)]
pub struct InteractionState {
    pub active_part: GizmoPart,
    pub start: TransformSnapshot,
    /// Handle axes in world space, fixed for the whole drag
    pub axes: [Vec3; 3],
    /// Plane the pointer ray is intersected with
    pub plane_normal: Vec3,
    /// First intersection of the pointer ray with the drag plane
    pub anchor: Option<Vec3>,
    /// Rotation only: last measured angle and the unwrapped total
    pub last_angle: f32,
    pub total_angle: f32,
}

impl InteractionState {
    pub fn new(part: GizmoPart, start: &TransformSnapshot, axes: [Vec3; 3]) -> Self {
        Self {
            active_part: part,
            start: *start,
            axes,
            plane_normal: Vec3::Y,
            anchor: None,
            last_angle: 0.0,
            total_angle: 0.0,
        }
    }
}

/// Transform change produced by a drag, relative to the drag start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDelta {
    pub translation: Vec3,
    /// World-frame rotation applied before the start orientation
    pub rotation: Quat,
    /// Per-axis multiplier on the start scale
    pub scale: Vec3,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl TransformDelta {
    pub fn apply(&self, start: &TransformSnapshot) -> TransformSnapshot {
        let mut result = *start;
        result.position = start.position + self.translation;
        if self.rotation != Quat::IDENTITY {
            result.set_orientation((self.rotation * start.orientation()).normalize());
        }
        result.scale = start.scale * self.scale;
        result
    }
}

/// A set of handles for one gizmo mode.
pub trait Handle {
    fn mode(&self) -> GizmoMode;

    /// Hit test the handles against a pointer ray.
    /// Returns the hit part and distance along the ray.
    fn hit_test(
        &self,
        transform: &TransformSnapshot,
        axes: &[Vec3; 3],
        ray: &Ray,
        scale: f32,
    ) -> Option<(GizmoPart, f32)>;

    /// Begin a drag on `part`.
    fn begin_interaction(
        &mut self,
        part: GizmoPart,
        transform: &TransformSnapshot,
        axes: [Vec3; 3],
        ray: &Ray,
    ) -> InteractionState;

    /// Update the drag and return the change since its start.
    fn update_interaction(
        &mut self,
        state: &mut InteractionState,
        ray: &Ray,
        snap: Option<f32>,
    ) -> TransformDelta;
}

/// Apply snapping to a value.
pub fn snap_value(value: f32, snap: f32) -> f32 {
    if snap > 0.0 {
        (value / snap).round() * snap
    } else {
        value
    }
}

/// Calculate ray-plane intersection in front of the ray origin.
pub fn ray_plane_intersection(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    let denom = plane_normal.dot(ray.direction);

    if denom.abs() < 0.0001 {
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;

    if t < 0.0 {
        return None;
    }

    Some(ray.at(t))
}

/// Closest approach between a ray and a segment.
/// Returns `(distance, t along ray)`.
pub fn ray_segment_distance(ray: &Ray, start: Vec3, end: Vec3) -> Option<(f32, f32)> {
    let seg = end - start;
    let seg_len_sq = seg.length_squared();
    if seg_len_sq < 1e-8 {
        return None;
    }

    let w0 = ray.origin - start;
    let b = ray.direction.dot(seg);
    let d = ray.direction.dot(w0);
    let e = seg.dot(w0);
    // Ray direction is unit length, so a == 1
    let denom = seg_len_sq - b * b;

    let s = if denom.abs() < 1e-8 {
        0.0
    } else {
        ((e - b * d) / denom).clamp(0.0, 1.0)
    };
    let on_segment = start + seg * s;
    let t = (on_segment - ray.origin).dot(ray.direction).max(0.0);

    Some((ray.at(t).distance(on_segment), t))
}

/// Distance from a point to a ray, with the ray parameter of the closest point.
pub fn ray_point_distance(ray: &Ray, point: Vec3) -> (f32, f32) {
    let t = (point - ray.origin).dot(ray.direction).max(0.0);
    (ray.at(t).distance(point), t)
}

/// Plane containing `axis` that faces the viewer as much as possible.
pub fn axis_drag_plane(axis: Vec3, view_direction: Vec3, fallback: Vec3) -> Vec3 {
    let normal = axis.cross(view_direction).cross(axis);
    if normal.length_squared() < 1e-6 {
        fallback
    } else {
        normal.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_snap_value() {
        assert_eq!(snap_value(1.3, 0.5), 1.5);
        assert_eq!(snap_value(-0.2, 0.5), -0.0);
        assert_eq!(snap_value(0.37, 0.0), 0.37);
    }

    #[test]
    fn test_ray_plane_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(ray_plane_intersection(&ray, Vec3::ZERO, Vec3::Y).is_none());

        let down = Ray::new(Vec3::new(1.0, 5.0, 2.0), -Vec3::Y);
        let hit = ray_plane_intersection(&down, Vec3::ZERO, Vec3::Y).unwrap();
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 0.0);
        assert_relative_eq!(hit.z, 2.0);
    }

    #[test]
    fn test_ray_segment_distance() {
        let ray = Ray::new(Vec3::new(0.5, 2.0, 0.0), -Vec3::Y);
        let (dist, t) = ray_segment_distance(&ray, Vec3::ZERO, Vec3::X).unwrap();
        assert_relative_eq!(dist, 0.0, epsilon = 1e-6);
        assert_relative_eq!(t, 2.0, epsilon = 1e-6);

        let miss = Ray::new(Vec3::new(3.0, 2.0, 0.0), -Vec3::Y);
        let (dist, _) = ray_segment_distance(&miss, Vec3::ZERO, Vec3::X).unwrap();
        assert_relative_eq!(dist, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_delta_apply_scales_and_moves() {
        let start = TransformSnapshot {
            position: Vec3::new(1.0, 2.0, 3.0),
            scale: Vec3::new(2.0, 1.0, 1.0),
            ..Default::default()
        };
        let delta = TransformDelta {
            translation: Vec3::X,
            scale: Vec3::new(-1.5, 1.0, 1.0),
            ..Default::default()
        };
        let result = delta.apply(&start);
        assert_eq!(result.position, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(result.scale, Vec3::new(-3.0, 1.0, 1.0));
        assert_eq!(result.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_space_toggle_is_involution() {
        for space in [GizmoSpace::Local, GizmoSpace::World] {
            assert_eq!(space.toggled().toggled(), space);
            assert_ne!(space.toggled(), space);
        }
    }
}
