//! Rotate handles: one ring per axis.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use super::handle::{
    ray_plane_intersection, snap_value, GizmoMode, GizmoPart, Handle, InteractionState,
    TransformDelta,
};
use crate::scene::{Ray, TransformSnapshot};

const RING_PARTS: [GizmoPart; 3] = [GizmoPart::RingX, GizmoPart::RingY, GizmoPart::RingZ];

/// Rotate handles with rotation rings.
#[derive(Debug, Default)]
pub struct RotateHandle;

impl RotateHandle {
    pub fn new() -> Self {
        Self
    }
}

/// Angle of `offset` inside the plane normal to `axes[index]`, measured
/// from the next axis toward the one after it (right-handed).
fn ring_angle(axes: &[Vec3; 3], index: usize, offset: Vec3) -> f32 {
    let u = axes[(index + 1) % 3];
    let w = axes[(index + 2) % 3];
    offset.dot(w).atan2(offset.dot(u))
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

impl Handle for RotateHandle {
    fn mode(&self) -> GizmoMode {
        GizmoMode::Rotate
    }

    fn hit_test(
        &self,
        transform: &TransformSnapshot,
        axes: &[Vec3; 3],
        ray: &Ray,
        scale: f32,
    ) -> Option<(GizmoPart, f32)> {
        let pos = transform.position;
        let ring_radius = scale;
        let ring_thickness = scale * 0.1;

        let mut closest: Option<(GizmoPart, f32)> = None;

        for (part, normal) in RING_PARTS.into_iter().zip(axes) {
            let Some(hit) = ray_plane_intersection(ray, pos, *normal) else {
                continue;
            };

            // Check if on the ring
            let dist_from_center = hit.distance(pos);
            if (dist_from_center - ring_radius).abs() < ring_thickness {
                let t = hit.distance(ray.origin);
                if closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((part, t));
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
        let Some(index) = part.axis_index() else {
            return state;
        };

        state.plane_normal = axes[index];
        state.anchor = ray_plane_intersection(ray, transform.position, state.plane_normal);
        if let Some(anchor) = state.anchor {
            state.last_angle = ring_angle(&axes, index, anchor - transform.position);
        }

        state
    }

    fn update_interaction(
        &mut self,
        state: &mut InteractionState,
        ray: &Ray,
        snap: Option<f32>,
    ) -> TransformDelta {
        let mut delta = TransformDelta::default();

        let (Some(index), Some(_)) = (state.active_part.axis_index(), state.anchor) else {
            return delta;
        };
        let Some(hit) = ray_plane_intersection(ray, state.start.position, state.plane_normal) else {
            return delta;
        };

        // Accumulate unwrapped so dragging past half a turn keeps going
        let current_angle = ring_angle(&state.axes, index, hit - state.start.position);
        state.total_angle += wrap_angle(current_angle - state.last_angle);
        state.last_angle = current_angle;

        // Snap is in degrees
        let angle = match snap {
            Some(step) => snap_value(state.total_angle, step.to_radians()),
            None => state.total_angle,
        };

        delta.rotation = Quat::from_axis_angle(state.plane_normal, angle);
        delta
    }
}
