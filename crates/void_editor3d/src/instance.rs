//! Editor instance model.
//!
//! An instance is the editor's placement of an object in a layout: a
//! corner-origin position, a size and rotation angles in degrees. Flat
//! instances only have the 2D subset; spatial instances add depth, `z` and
//! pitch/roll. Setters for the 3D-only properties report whether the
//! instance supports them.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Instance identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// A 2D instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatInstance {
    pub object_name: String,
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub angle: f32,
    pub width: f32,
    pub height: f32,
}

/// A 3D-capable instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialInstance {
    pub object_name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation about Z in degrees
    pub angle: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instance {
    Flat(FlatInstance),
    Spatial(SpatialInstance),
}

/// Everything a gizmo edit can change on an instance.
///
/// `rotation` holds (rotation_x, rotation_y, angle) in degrees. Components a
/// flat instance lacks are zero and ignored on apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: Vec3,
}

impl Instance {
    pub fn object_name(&self) -> &str {
        match self {
            Instance::Flat(i) => &i.object_name,
            Instance::Spatial(i) => &i.object_name,
        }
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self, Instance::Spatial(_))
    }

    pub fn as_spatial(&self) -> Option<&SpatialInstance> {
        match self {
            Instance::Spatial(i) => Some(i),
            Instance::Flat(_) => None,
        }
    }

    pub fn x(&self) -> f32 {
        match self {
            Instance::Flat(i) => i.x,
            Instance::Spatial(i) => i.x,
        }
    }

    pub fn set_x(&mut self, x: f32) {
        match self {
            Instance::Flat(i) => i.x = x,
            Instance::Spatial(i) => i.x = x,
        }
    }

    pub fn y(&self) -> f32 {
        match self {
            Instance::Flat(i) => i.y,
            Instance::Spatial(i) => i.y,
        }
    }

    pub fn set_y(&mut self, y: f32) {
        match self {
            Instance::Flat(i) => i.y = y,
            Instance::Spatial(i) => i.y = y,
        }
    }

    pub fn z(&self) -> Option<f32> {
        self.as_spatial().map(|i| i.z)
    }

    /// Returns false if the instance has no `z`.
    pub fn set_z(&mut self, z: f32) -> bool {
        match self {
            Instance::Spatial(i) => {
                i.z = z;
                true
            }
            Instance::Flat(_) => false,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            Instance::Flat(i) => i.width,
            Instance::Spatial(i) => i.width,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        match self {
            Instance::Flat(i) => i.width = width,
            Instance::Spatial(i) => i.width = width,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            Instance::Flat(i) => i.height,
            Instance::Spatial(i) => i.height,
        }
    }

    pub fn set_height(&mut self, height: f32) {
        match self {
            Instance::Flat(i) => i.height = height,
            Instance::Spatial(i) => i.height = height,
        }
    }

    pub fn depth(&self) -> Option<f32> {
        self.as_spatial().map(|i| i.depth)
    }

    pub fn set_depth(&mut self, depth: f32) -> bool {
        match self {
            Instance::Spatial(i) => {
                i.depth = depth;
                true
            }
            Instance::Flat(_) => false,
        }
    }

    pub fn angle(&self) -> f32 {
        match self {
            Instance::Flat(i) => i.angle,
            Instance::Spatial(i) => i.angle,
        }
    }

    pub fn set_angle(&mut self, angle: f32) {
        match self {
            Instance::Flat(i) => i.angle = angle,
            Instance::Spatial(i) => i.angle = angle,
        }
    }

    pub fn rotation_x(&self) -> Option<f32> {
        self.as_spatial().map(|i| i.rotation_x)
    }

    pub fn set_rotation_x(&mut self, degrees: f32) -> bool {
        match self {
            Instance::Spatial(i) => {
                i.rotation_x = degrees;
                true
            }
            Instance::Flat(_) => false,
        }
    }

    pub fn rotation_y(&self) -> Option<f32> {
        self.as_spatial().map(|i| i.rotation_y)
    }

    pub fn set_rotation_y(&mut self, degrees: f32) -> bool {
        match self {
            Instance::Spatial(i) => {
                i.rotation_y = degrees;
                true
            }
            Instance::Flat(_) => false,
        }
    }

    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform {
            position: Vec3::new(self.x(), self.y(), self.z().unwrap_or(0.0)),
            rotation: Vec3::new(
                self.rotation_x().unwrap_or(0.0),
                self.rotation_y().unwrap_or(0.0),
                self.angle(),
            ),
            size: Vec3::new(self.width(), self.height(), self.depth().unwrap_or(0.0)),
        }
    }

    /// Write every supported component of `transform`.
    pub fn apply_transform(&mut self, transform: &InstanceTransform) {
        self.set_x(transform.position.x);
        self.set_y(transform.position.y);
        self.set_z(transform.position.z);
        self.set_rotation_x(transform.rotation.x);
        self.set_rotation_y(transform.rotation.y);
        self.set_angle(transform.rotation.z);
        self.set_width(transform.size.x);
        self.set_height(transform.size.y);
        self.set_depth(transform.size.z);
    }
}

impl From<FlatInstance> for Instance {
    fn from(instance: FlatInstance) -> Self {
        Instance::Flat(instance)
    }
}

impl From<SpatialInstance> for Instance {
    fn from(instance: SpatialInstance) -> Self {
        Instance::Spatial(instance)
    }
}

/// Instances of the edited layout.
#[derive(Clone, Debug, Default)]
pub struct InstanceStore {
    instances: HashMap<InstanceId, Instance>,
    next_id: u64,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instance: impl Into<Instance>) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(id, instance.into());
        id
    }

    pub fn remove(&mut self, id: InstanceId) -> Option<Instance> {
        self.instances.remove(&id)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(&id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances.iter().map(|(id, instance)| (*id, instance))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Instance {
        FlatInstance {
            object_name: "Player".into(),
            x: 1.0,
            y: 2.0,
            angle: 30.0,
            width: 6.0,
            height: 8.0,
        }
        .into()
    }

    #[test]
    fn test_flat_rejects_spatial_setters() {
        let mut instance = flat();
        assert!(!instance.set_z(5.0));
        assert!(!instance.set_depth(5.0));
        assert!(!instance.set_rotation_x(90.0));
        assert_eq!(instance.z(), None);
        assert_eq!(instance.transform().position.z, 0.0);
    }

    #[test]
    fn test_apply_transform_on_flat_ignores_3d_components() {
        let mut instance = flat();
        let transform = InstanceTransform {
            position: Vec3::new(4.0, 5.0, 6.0),
            rotation: Vec3::new(10.0, 20.0, 45.0),
            size: Vec3::new(3.0, 4.0, 5.0),
        };
        instance.apply_transform(&transform);
        assert_eq!(instance.x(), 4.0);
        assert_eq!(instance.angle(), 45.0);
        assert_eq!(instance.width(), 3.0);
        assert_eq!(instance.depth(), None);
    }

    #[test]
    fn test_spatial_transform_roundtrip() {
        let mut instance: Instance = SpatialInstance::default().into();
        let transform = InstanceTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(10.0, 20.0, 30.0),
            size: Vec3::new(4.0, 5.0, 6.0),
        };
        instance.apply_transform(&transform);
        assert_eq!(instance.transform(), transform);
    }

    #[test]
    fn test_store_ids_are_unique() {
        let mut store = InstanceStore::new();
        let a = store.insert(flat());
        let b = store.insert(flat());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert!(store.remove(a).is_some());
        assert!(!store.contains(a));
    }
}
