//! Translate handles: axis arrows and plane squares.

use glam::Vec3;

use super::handle::{
    axis_drag_plane, ray_plane_intersection, ray_segment_distance, snap_value, GizmoMode,
    GizmoPart, Handle, InteractionState, TransformDelta,
};
use crate::scene::{Ray, TransformSnapshot};

const AXIS_PARTS: [GizmoPart; 3] = [GizmoPart::AxisX, GizmoPart::AxisY, GizmoPart::AxisZ];
const PLANE_PARTS: [GizmoPart; 3] = [GizmoPart::PlaneYZ, GizmoPart::PlaneXZ, GizmoPart::PlaneXY];

/// Translate handles with axis arrows and plane handles.
#[derive(Debug, Default)]
pub struct TranslateHandle;

impl TranslateHandle {
    pub fn new() -> Self {
        Self
    }
}

impl Handle for TranslateHandle {
    fn mode(&self) -> GizmoMode {
        GizmoMode::Translate
    }

    fn hit_test(
        &self,
        transform: &TransformSnapshot,
        axes: &[Vec3; 3],
        ray: &Ray,
        scale: f32,
    ) -> Option<(GizmoPart, f32)> {
        let pos = transform.position;
        let hit_radius = scale * 0.1;
        let mut closest: Option<(GizmoPart, f32)> = None;

        for (part, axis) in AXIS_PARTS.into_iter().zip(axes) {
            let end = pos + *axis * scale;
            if let Some((dist, t)) = ray_segment_distance(ray, pos, end) {
                if dist < hit_radius && closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((part, t));
                }
            }
        }

        // Plane squares sit between the two axes they span
        let plane_size = scale * 0.15;
        let plane_offset = scale * 0.3;

        for (normal_index, part) in PLANE_PARTS.into_iter().enumerate() {
            let normal = axes[normal_index];
            let u = axes[(normal_index + 1) % 3];
            let v = axes[(normal_index + 2) % 3];
            let center = pos + (u + v) * plane_offset;

            if let Some(hit) = ray_plane_intersection(ray, center, normal) {
                let local = hit - center;
                if local.dot(u).abs() < plane_size && local.dot(v).abs() < plane_size {
                    let t = hit.distance(ray.origin);
                    if closest.map_or(true, |(_, best)| t < best) {
                        closest = Some((part, t));
                    }
                }
            }
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

        state.plane_normal = if let Some(index) = part.axis_index() {
            axis_drag_plane(axes[index], ray.direction, axes[(index + 1) % 3])
        } else if let Some(index) = part.plane_normal_index() {
            axes[index]
        } else {
            -ray.direction
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

        let (Some(anchor), Some(current)) = (
            state.anchor,
            ray_plane_intersection(ray, state.start.position, state.plane_normal),
        ) else {
            return delta;
        };
        let raw = current - anchor;

        // Constrain to the active axis or plane, snapping along each handle axis
        let component = |axis: Vec3| {
            let amount = raw.dot(axis);
            axis * snap.map_or(amount, |step| snap_value(amount, step))
        };
        delta.translation = if let Some(index) = state.active_part.axis_index() {
            component(state.axes[index])
        } else if let Some(index) = state.active_part.plane_normal_index() {
            component(state.axes[(index + 1) % 3]) + component(state.axes[(index + 2) % 3])
        } else {
            raw
        };

        delta
    }
}
