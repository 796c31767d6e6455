//! Retained 3D scene graph shown in the viewport.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Each node carries a local
//! transform (position, XYZ Euler rotation in radians, scale) and an
//! optional [`PendingEdit`] written by the gizmo while a drag is in flight.
//! Gizmo math treats node transforms as world transforms, which holds for
//! instance nodes and their identity wrapper groups.

pub mod camera;

pub use camera::{Camera3d, Ray, SharedCamera};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{EulerRot, Quat, Vec3};

/// Scene node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Position, rotation and scale of a node at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    pub position: Vec3,
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformSnapshot {
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// World directions of the node's local X, Y and Z axes.
    pub fn local_axes(&self) -> [Vec3; 3] {
        let q = self.orientation();
        [q * Vec3::X, q * Vec3::Y, q * Vec3::Z]
    }
}

/// Transient annotation on a node that the gizmo is dragging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingEdit {
    /// Still dragging; false once the drag has ended but before the edit was consumed
    pub dragging: bool,
    pub snapshot: TransformSnapshot,
}

/// A node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: TransformSnapshot,
    pub pending_edit: Option<PendingEdit>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            transform: TransformSnapshot::default(),
            pending_edit: None,
        }
    }
}

/// Arena-backed scene graph.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: u32,
}

pub type SharedScene = Rc<RefCell<SceneGraph>>;

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.allocate_id();
        self.nodes.insert(id, SceneNode::new(name, None));
        id
    }

    /// Add a node under `parent`. Returns `None` if the parent does not exist.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.allocate_id();
        self.nodes.insert(id, SceneNode::new(name, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|&c| c != id);
        }
        for child in node.children {
            self.remove_node(child);
        }
        true
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Walk from the parent of `id` up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            current: self.parent(id),
        }
    }

    /// True if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn transform(&self, id: NodeId) -> Option<TransformSnapshot> {
        self.nodes.get(&id).map(|n| n.transform)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: TransformSnapshot) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn pending_edit(&self, id: NodeId) -> Option<PendingEdit> {
        self.nodes.get(&id).and_then(|n| n.pending_edit)
    }

    pub fn set_pending_edit(&mut self, id: NodeId, edit: Option<PendingEdit>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.pending_edit = edit;
                true
            }
            None => false,
        }
    }

    /// Remove a node's pending edit only if it is a finished one. A live
    /// drag's annotation stays in place.
    pub fn take_committed_edit(&mut self, id: NodeId) -> Option<PendingEdit> {
        let node = self.nodes.get_mut(&id)?;
        match node.pending_edit {
            Some(edit) if !edit.dragging => node.pending_edit.take(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.graph.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ancestors_walk_to_root() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("layer");
        let wrapper = scene.add_child(root, "wrapper").unwrap();
        let mesh = scene.add_child(wrapper, "mesh").unwrap();

        let chain: Vec<_> = scene.ancestors(mesh).collect();
        assert_eq!(chain, vec![wrapper, root]);
        assert!(scene.is_ancestor(root, mesh));
        assert!(!scene.is_ancestor(mesh, root));
        assert!(!scene.is_ancestor(mesh, mesh));
    }

    #[test]
    fn test_take_committed_edit_leaves_live_drag() {
        let mut graph = SceneGraph::new();
        let node = graph.add_node("box");
        let snapshot = TransformSnapshot::default();

        graph.set_pending_edit(node, Some(PendingEdit { dragging: true, snapshot }));
        assert_eq!(graph.take_committed_edit(node), None);
        assert!(graph.pending_edit(node).is_some());

        graph.set_pending_edit(node, Some(PendingEdit { dragging: false, snapshot }));
        assert!(graph.take_committed_edit(node).is_some());
        assert_eq!(graph.pending_edit(node), None);
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("root");
        let child = scene.add_child(root, "child").unwrap();
        let grandchild = scene.add_child(child, "grandchild").unwrap();

        assert!(scene.remove_node(child));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.get(root).unwrap().children.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_add_child_requires_parent() {
        let mut scene = SceneGraph::new();
        assert!(scene.add_child(NodeId(42), "orphan").is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_single_axis_orientation_roundtrip() {
        for rotation in [Vec3::new(0.7, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.2)] {
            let t = TransformSnapshot {
                rotation,
                ..Default::default()
            };
            let mut back = TransformSnapshot::default();
            back.set_orientation(t.orientation());
            assert_relative_eq!(back.rotation.x, rotation.x, epsilon = 1e-5);
            assert_relative_eq!(back.rotation.y, rotation.y, epsilon = 1e-5);
            assert_relative_eq!(back.rotation.z, rotation.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_local_axes_follow_rotation() {
        let t = TransformSnapshot {
            rotation: Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        let [x, y, _] = t.local_axes();
        assert_relative_eq!(x.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(y.x, -1.0, epsilon = 1e-5);
    }
}
