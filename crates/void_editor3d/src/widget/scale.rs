//! Scale handles: one cube per axis plus a uniform center.
//!
//! Scale always acts along the node's local axes. Dragging an axis handle
//! through the center produces a negative factor (mirroring).

use glam::Vec3;

use super::handle::{
    axis_drag_plane, ray_plane_intersection, ray_point_distance, snap_value, GizmoMode, GizmoPart,
    Handle, InteractionState, TransformDelta,
};
use crate::scene::{Ray, TransformSnapshot};

const HANDLE_PARTS: [GizmoPart; 3] = [GizmoPart::HandleX, GizmoPart::HandleY, GizmoPart::HandleZ];

/// Smallest factor magnitude a drag can produce.
pub const MIN_SCALE_FACTOR: f32 = 0.01;

/// Scale handles with per-axis cubes and a uniform center.
#[derive(Debug, Default)]
pub struct ScaleHandle;

impl ScaleHandle {
    pub fn new() -> Self {
        Self
    }
}

fn clamp_factor(factor: f32) -> f32 {
    if factor.abs() < MIN_SCALE_FACTOR {
        MIN_SCALE_FACTOR.copysign(factor)
    } else {
        factor
    }
}

impl Handle for ScaleHandle {
    fn mode(&self) -> GizmoMode {
        GizmoMode::Scale
    }

    fn hit_test(
        &self,
        transform: &TransformSnapshot,
        axes: &[Vec3; 3],
        ray: &Ray,
        scale: f32,
    ) -> Option<(GizmoPart, f32)> {
        let pos = transform.position;
        let handle_radius = scale * 0.12;

        let mut closest: Option<(GizmoPart, f32)> = None;

        for (part, axis) in HANDLE_PARTS.into_iter().zip(axes) {
            let (dist, t) = ray_point_distance(ray, pos + *axis * scale);
            if dist < handle_radius && closest.map_or(true, |(_, best)| t < best) {
                closest = Some((part, t));
            }
        }

        let (dist, t) = ray_point_distance(ray, pos);
        if dist < scale * 0.15 && closest.map_or(true, |(_, best)| t < best) {
            closest = Some((GizmoPart::UniformCenter, t));
        }

        closest
    }

    fn begin_interaction(
        &mut self,
        part: GizmoPart,
        transform: &TransformSnapshot,
        axes: [Vec3; 3],
        ray: &Ray,
    ) -> InteractionState {
        let mut state = InteractionState::new(part, transform, axes);

        state.plane_normal = match part.axis_index() {
            Some(index) => axis_drag_plane(axes[index], ray.direction, axes[(index + 1) % 3]),
            None => -ray.direction,
        };
        state.anchor = ray_plane_intersection(ray, transform.position, state.plane_normal);

        state
    }

    fn update_interaction(
        &mut self,
        state: &mut InteractionState,
        ray: &Ray,
        snap: Option<f32>,
    ) -> TransformDelta {
        let mut delta = TransformDelta::default();

        let (Some(anchor), Some(hit)) = (
            state.anchor,
            ray_plane_intersection(ray, state.start.position, state.plane_normal),
        ) else {
            return delta;
        };
        let start_offset = anchor - state.start.position;
        let offset = hit - state.start.position;

        let factor = match state.active_part.axis_index() {
            Some(index) => {
                let axis = state.axes[index];
                let start_extent = start_offset.dot(axis);
                if start_extent.abs() < 1e-4 {
                    return delta;
                }
                offset.dot(axis) / start_extent
            }
            None => {
                let start_distance = start_offset.length();
                if start_distance < 1e-4 {
                    // Grabbed dead center: measure from the anchor instead
                    1.0 + offset.dot(Vec3::ONE.normalize())
                } else {
                    offset.length() / start_distance
                }
            }
        };

        let factor = clamp_factor(snap.map_or(factor, |step| snap_value(factor, step)));

        delta.scale = match state.active_part {
            GizmoPart::HandleX => Vec3::new(factor, 1.0, 1.0),
            GizmoPart::HandleY => Vec3::new(1.0, factor, 1.0),
            GizmoPart::HandleZ => Vec3::new(1.0, 1.0, factor),
            _ => Vec3::splat(factor),
        };

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WORLD: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

    fn ray_above(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), -Vec3::Y)
    }

    #[test]
    fn test_hit_handles() {
        let handle = ScaleHandle::new();
        let t = TransformSnapshot::default();
        let x = handle.hit_test(&t, &WORLD, &ray_above(1.0, 0.0), 1.0);
        assert_eq!(x.map(|(p, _)| p), Some(GizmoPart::HandleX));
        // Diagonal view so no axis handle sits in front of the center
        let diagonal = Ray::new(Vec3::splat(5.0), -Vec3::ONE);
        let center = handle.hit_test(&t, &WORLD, &diagonal, 1.0);
        assert_eq!(center.map(|(p, _)| p), Some(GizmoPart::UniformCenter));
    }

    #[test]
    fn test_axis_drag_doubles_scale() {
        let mut handle = ScaleHandle::new();
        let start = TransformSnapshot::default();
        let mut state = handle.begin_interaction(GizmoPart::HandleX, &start, WORLD, &ray_above(1.0, 0.0));

        let delta = handle.update_interaction(&mut state, &ray_above(2.0, 0.5), None);
        assert_relative_eq!(delta.scale.x, 2.0, epsilon = 1e-5);
        assert_eq!(delta.scale.y, 1.0);
        assert_eq!(delta.scale.z, 1.0);
    }

    #[test]
    fn test_drag_through_center_mirrors() {
        let mut handle = ScaleHandle::new();
        let start = TransformSnapshot::default();
        let mut state = handle.begin_interaction(GizmoPart::HandleX, &start, WORLD, &ray_above(1.0, 0.0));

        let delta = handle.update_interaction(&mut state, &ray_above(-2.0, 0.0), None);
        assert_relative_eq!(delta.scale.x, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_factor_never_collapses_to_zero() {
        let mut handle = ScaleHandle::new();
        let start = TransformSnapshot::default();
        let mut state = handle.begin_interaction(GizmoPart::HandleX, &start, WORLD, &ray_above(1.0, 0.0));

        let delta = handle.update_interaction(&mut state, &ray_above(0.0, 0.0), None);
        assert_relative_eq!(delta.scale.x, MIN_SCALE_FACTOR);
    }

    #[test]
    fn test_uniform_drag() {
        let mut handle = ScaleHandle::new();
        let start = TransformSnapshot::default();
        let mut state = handle.begin_interaction(GizmoPart::UniformCenter, &start, WORLD, &ray_above(0.1, 0.0));

        let delta = handle.update_interaction(&mut state, &ray_above(0.3, 0.0), Some(0.5));
        assert_relative_eq!(delta.scale.x, 3.0, epsilon = 1e-5);
        assert_eq!(delta.scale.x, delta.scale.y);
        assert_eq!(delta.scale.y, delta.scale.z);
    }
}
