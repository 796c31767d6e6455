//! Reverse lookup from scene nodes to instances.

use std::collections::HashMap;

use super::NodeMap;
use crate::instance::InstanceId;
use crate::scene::{NodeId, SceneGraph};

/// Node to instance index for the current selection.
///
/// The gizmo may be attached to a wrapper around an instance's node or to a
/// child inside it, so lookups also match through the hierarchy.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex {
    by_node: HashMap<NodeId, InstanceId>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the mapped nodes of `instances`. Unmapped instances are skipped.
    pub fn build(instances: &[InstanceId], node_map: &NodeMap) -> Self {
        let by_node = instances
            .iter()
            .filter_map(|id| node_map.get(id).map(|node| (*node, *id)))
            .collect();
        Self { by_node }
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Instance owning `node`: an exact match first, then the nearest
    /// indexed ancestor of `node`, then the nearest indexed descendant.
    pub fn resolve(&self, scene: &SceneGraph, node: NodeId) -> Option<InstanceId> {
        if let Some(instance) = self.by_node.get(&node) {
            return Some(*instance);
        }

        if let Some(instance) = scene.ancestors(node).find_map(|a| self.by_node.get(&a)) {
            return Some(*instance);
        }

        self.by_node
            .iter()
            .filter_map(|(indexed, instance)| {
                let depth = scene.ancestors(*indexed).position(|a| a == node)?;
                Some((depth, *instance))
            })
            .min()
            .map(|(_, instance)| instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_through_hierarchy() {
        let mut scene = SceneGraph::new();
        let wrapper = scene.add_node("wrapper");
        let body = scene.add_child(wrapper, "body").unwrap();
        let mesh = scene.add_child(body, "mesh").unwrap();
        let other = scene.add_node("other");

        let instance = InstanceId(7);
        let node_map: NodeMap = [(instance, body)].into_iter().collect();
        let index = NodeIndex::build(&[instance], &node_map);

        assert_eq!(index.resolve(&scene, body), Some(instance));
        assert_eq!(index.resolve(&scene, mesh), Some(instance));
        assert_eq!(index.resolve(&scene, wrapper), Some(instance));
        assert_eq!(index.resolve(&scene, other), None);
    }

    #[test]
    fn test_unmapped_instances_skipped() {
        let index = NodeIndex::build(&[InstanceId(1)], &NodeMap::new());
        assert!(index.is_empty());
    }
}
