//! Conversion of committed node transforms into instance properties.
//!
//! Nodes are centered on the instance while instance positions name its
//! corner, so translation subtracts half the size. Rotations go from
//! radians to degrees. Scale multiplies the instance size by the magnitude
//! of the node scale; the sign of a mirrored axis is dropped.

use crate::instance::Instance;
use crate::scene::TransformSnapshot;
use crate::widget::GizmoMode;

pub fn apply_translate(instance: &mut Instance, snapshot: &TransformSnapshot) {
    let position = snapshot.position;
    instance.set_x(position.x - instance.width() / 2.0);
    instance.set_y(position.y - instance.height() / 2.0);
    if let Some(depth) = instance.depth() {
        instance.set_z(position.z - depth / 2.0);
    }
}

pub fn apply_rotate(instance: &mut Instance, snapshot: &TransformSnapshot) {
    let rotation = snapshot.rotation;
    instance.set_angle(rotation.z.to_degrees());
    instance.set_rotation_x(rotation.x.to_degrees());
    instance.set_rotation_y(rotation.y.to_degrees());
}

pub fn apply_scale(instance: &mut Instance, snapshot: &TransformSnapshot) {
    let scale = snapshot.scale.abs();
    instance.set_width(instance.width() * scale.x);
    instance.set_height(instance.height() * scale.y);
    if let Some(depth) = instance.depth() {
        instance.set_depth(depth * scale.z);
    }
}

/// Apply a commit made in `mode`.
pub fn apply_edit(instance: &mut Instance, mode: GizmoMode, snapshot: &TransformSnapshot) {
    match mode {
        GizmoMode::Translate => apply_translate(instance, snapshot),
        GizmoMode::Rotate => apply_rotate(instance, snapshot),
        GizmoMode::Scale => apply_scale(instance, snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{FlatInstance, SpatialInstance};
    use approx::assert_relative_eq;
    use glam::Vec3;
    use std::f32::consts::PI;

    fn flat(width: f32, height: f32) -> Instance {
        FlatInstance {
            width,
            height,
            ..Default::default()
        }
        .into()
    }

    fn snapshot() -> TransformSnapshot {
        TransformSnapshot::default()
    }

    #[test]
    fn test_translate_subtracts_half_size() {
        let mut instance = flat(6.0, 8.0);
        let edit = TransformSnapshot {
            position: Vec3::new(10.0, 4.0, 0.0),
            ..snapshot()
        };
        apply_translate(&mut instance, &edit);
        assert_eq!(instance.x(), 7.0);
        assert_eq!(instance.y(), 0.0);
    }

    #[test]
    fn test_translate_spatial_uses_depth() {
        let mut instance: Instance = SpatialInstance {
            width: 2.0,
            height: 2.0,
            depth: 4.0,
            ..Default::default()
        }
        .into();
        let edit = TransformSnapshot {
            position: Vec3::new(1.0, 1.0, 5.0),
            ..snapshot()
        };
        apply_translate(&mut instance, &edit);
        assert_eq!(instance.z(), Some(3.0));
    }

    #[test]
    fn test_scale_discards_sign() {
        let mut instance = flat(10.0, 5.0);
        let edit = TransformSnapshot {
            scale: Vec3::new(-2.0, 1.5, 1.0),
            ..snapshot()
        };
        apply_scale(&mut instance, &edit);
        assert_eq!(instance.width(), 20.0);
        assert_eq!(instance.height(), 7.5);
    }

    #[test]
    fn test_rotate_converts_to_degrees() {
        let mut instance = flat(1.0, 1.0);
        let edit = TransformSnapshot {
            rotation: Vec3::new(0.0, 0.0, PI),
            ..snapshot()
        };
        apply_rotate(&mut instance, &edit);
        assert_relative_eq!(instance.angle(), 180.0, epsilon = 1e-4);
        assert_eq!(instance.rotation_x(), None);
    }

    #[test]
    fn test_rotate_spatial_sets_pitch_and_roll() {
        let mut instance: Instance = SpatialInstance::default().into();
        let edit = TransformSnapshot {
            rotation: Vec3::new(PI / 2.0, PI / 4.0, 0.0),
            ..snapshot()
        };
        apply_rotate(&mut instance, &edit);
        assert_relative_eq!(instance.rotation_x().unwrap(), 90.0, epsilon = 1e-4);
        assert_relative_eq!(instance.rotation_y().unwrap(), 45.0, epsilon = 1e-4);
    }
}
