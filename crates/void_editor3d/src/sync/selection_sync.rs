//! Selection sync.

use std::rc::Rc;

use glam::Vec3;

use super::apply::apply_edit;
use super::node_index::NodeIndex;
use super::{NodeMap, TransformCompleted, TransformKind};
use crate::config::GizmoSettings;
use crate::editor::Viewport3dContext;
use crate::gizmo::{GizmoController, GizmoEvent};
use crate::instance::{InstanceId, InstanceStore};
use crate::scene::{NodeId, SharedScene};
use crate::widget::{GizmoMode, GizmoSpace};

/// Host callback for every instance edit the sync applies.
pub type TransformCallback = Box<dyn FnMut(InstanceId, TransformKind)>;

/// Parts that only exist with a 3D context.
struct Attached {
    gizmo: GizmoController,
    scene: SharedScene,
}

/// Keeps the gizmo on the single selected instance and applies its edits.
///
/// Without a scene and camera the sync is unavailable and every operation
/// does nothing.
pub struct SelectionSync {
    inner: Option<Attached>,
    enabled: bool,
    selection: Vec<InstanceId>,
    node_map: NodeMap,
    index: NodeIndex,
    on_transform: Option<TransformCallback>,
}

impl SelectionSync {
    pub fn new(context: &Viewport3dContext, settings: &GizmoSettings) -> Self {
        let inner = match (&context.scene, &context.camera) {
            (Some(scene), Some(camera)) => {
                let mut gizmo = GizmoController::new(Rc::clone(scene), Rc::clone(camera), settings);
                gizmo.connect(Rc::clone(&context.input));
                Some(Attached {
                    gizmo,
                    scene: Rc::clone(scene),
                })
            }
            _ => {
                log::warn!("3D context unavailable, gizmo selection sync disabled");
                None
            }
        };

        Self {
            inner,
            enabled: settings.enabled,
            selection: Vec::new(),
            node_map: NodeMap::new(),
            index: NodeIndex::new(),
            on_transform: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Register the callback invoked after each applied edit.
    pub fn on_transform_completed<F>(&mut self, callback: F)
    where
        F: FnMut(InstanceId, TransformKind) + 'static,
    {
        self.on_transform = Some(Box::new(callback));
    }

    /// Replace the selection and the mapping of its instances to nodes.
    pub fn update_selection(&mut self, instances: &[InstanceId], node_map: &NodeMap) {
        if !self.is_available() {
            return;
        }
        self.selection = instances.to_vec();
        self.node_map = instances
            .iter()
            .filter_map(|id| node_map.get(id).map(|node| (*id, *node)))
            .collect();
        self.index = NodeIndex::build(&self.selection, &self.node_map);
        self.refresh_attachment();
    }

    /// Node the gizmo should be on: the sole selected instance's node.
    fn wanted_node(&self) -> Option<NodeId> {
        match (self.enabled, self.selection.as_slice()) {
            (true, [only]) => self.node_map.get(only).copied(),
            _ => None,
        }
    }

    fn refresh_attachment(&mut self) {
        let wanted = self.wanted_node();
        let Some(inner) = self.inner.as_mut() else {
            return;
        };
        if inner.gizmo.attached() != wanted {
            inner.gizmo.set_object(wanted);
        }
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.inner.as_ref().and_then(|inner| inner.gizmo.attached())
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        if let Some(inner) = self.inner.as_mut() {
            inner.gizmo.set_mode(mode);
        }
    }

    pub fn current_mode(&self) -> GizmoMode {
        self.inner
            .as_ref()
            .map_or_else(GizmoMode::default, |inner| inner.gizmo.current_mode())
    }

    pub fn toggle_space(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.gizmo.toggle_space();
        }
    }

    pub fn current_space(&self) -> GizmoSpace {
        self.inner
            .as_ref()
            .map_or_else(GizmoSpace::default, |inner| inner.gizmo.current_space())
    }

    /// Enable or disable the gizmo. Re-enabling re-attaches to the selection.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !self.is_available() {
            return;
        }
        self.enabled = enabled;
        if let Some(inner) = self.inner.as_mut() {
            inner.gizmo.set_enabled(enabled);
        }
        self.refresh_attachment();
    }

    pub fn is_enabled(&self) -> bool {
        self.is_available() && self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.gizmo.is_dragging())
    }

    pub fn gizmo(&self) -> Option<&GizmoController> {
        self.inner.as_ref().map(|inner| &inner.gizmo)
    }

    pub fn gizmo_mut(&mut self) -> Option<&mut GizmoController> {
        self.inner.as_mut().map(|inner| &mut inner.gizmo)
    }

    /// Drain gizmo events and apply committed edits to `store`.
    pub fn process_events(&mut self, store: &mut InstanceStore) -> Vec<TransformCompleted> {
        let Some(inner) = self.inner.as_mut() else {
            return Vec::new();
        };
        let mut completed = Vec::new();

        for event in inner.gizmo.poll_events() {
            let GizmoEvent::Committed { node, mode, snapshot } = event else {
                continue;
            };

            // Consumed whether or not an instance matches
            inner.scene.borrow_mut().take_committed_edit(node);

            let Some(id) = self.index.resolve(&inner.scene.borrow(), node) else {
                log::debug!("Gizmo commit on {} matches no selected instance", node);
                continue;
            };
            let Some(instance) = store.get_mut(id) else {
                log::warn!("Selected {} is missing from the instance store", id);
                continue;
            };

            let before = instance.transform();
            apply_edit(instance, mode, &snapshot);
            let after = instance.transform();

            if mode == GizmoMode::Scale {
                // The instance size now carries the scale
                let mut scene = inner.scene.borrow_mut();
                if let Some(mut transform) = scene.transform(node) {
                    transform.scale = Vec3::ONE;
                    scene.set_transform(node, transform);
                }
            }

            let kind = TransformKind::from(mode);
            log::debug!("Applied {} to {}", kind.as_str(), id);
            if let Some(callback) = self.on_transform.as_mut() {
                callback(id, kind);
            }
            completed.push(TransformCompleted {
                instance: id,
                kind,
                before,
                after,
            });
        }

        completed
    }

    /// Detach, disconnect input and become unavailable.
    pub fn dispose(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.gizmo.dispose();
        }
        self.selection.clear();
        self.node_map.clear();
        self.index = NodeIndex::new();
        self.on_transform = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSurface;
    use crate::instance::FlatInstance;
    use crate::scene::{Camera3d, Ray, SceneGraph, SharedCamera};
    use crate::shared;
    use crate::widget::GizmoPart;
    use std::cell::RefCell;

    struct Fixture {
        sync: SelectionSync,
        scene: SharedScene,
        store: InstanceStore,
        node_map: NodeMap,
        ids: Vec<InstanceId>,
    }

    fn camera() -> SharedCamera {
        shared(Camera3d::new(Vec3::new(0.0, 10.0, 0.01), Vec3::ZERO, 1.0, 0.1, 100.0))
    }

    fn fixture() -> Fixture {
        let scene = shared(SceneGraph::new());
        let mut store = InstanceStore::new();
        let mut node_map = NodeMap::new();
        let mut ids = Vec::new();
        for name in ["a", "b"] {
            let node = scene.borrow_mut().add_node(name);
            let id = store.insert(FlatInstance {
                object_name: name.into(),
                width: 6.0,
                height: 8.0,
                ..Default::default()
            });
            node_map.insert(id, node);
            ids.push(id);
        }
        let context = Viewport3dContext::new(Some(scene.clone()), Some(camera()), shared(InputSurface::new()));
        let sync = SelectionSync::new(&context, &GizmoSettings::default());
        Fixture {
            sync,
            scene,
            store,
            node_map,
            ids,
        }
    }

    #[test]
    fn test_attaches_only_to_singleton() {
        let mut f = fixture();
        f.sync.update_selection(&f.ids[..1], &f.node_map);
        assert_eq!(f.sync.attached(), f.node_map.get(&f.ids[0]).copied());

        f.sync.update_selection(&f.ids, &f.node_map);
        assert_eq!(f.sync.attached(), None);

        f.sync.update_selection(&[], &f.node_map);
        assert_eq!(f.sync.attached(), None);
    }

    #[test]
    fn test_disable_detaches_and_enable_reattaches() {
        let mut f = fixture();
        f.sync.update_selection(&f.ids[1..], &f.node_map);
        f.sync.set_enabled(false);
        assert_eq!(f.sync.attached(), None);

        f.sync.update_selection(&f.ids[1..], &f.node_map);
        assert_eq!(f.sync.attached(), None);

        f.sync.set_enabled(true);
        assert_eq!(f.sync.attached(), f.node_map.get(&f.ids[1]).copied());
    }

    #[test]
    fn test_commit_updates_instance_and_calls_back() {
        let mut f = fixture();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        f.sync.on_transform_completed(move |id, kind| sink.borrow_mut().push((id, kind)));
        f.sync.update_selection(&f.ids[..1], &f.node_map);

        {
            let gizmo = f.sync.gizmo().unwrap();
            let mut widget = gizmo.widget().borrow_mut();
            let down = |x: f32| Ray::new(Vec3::new(x, 10.0, 0.0), -Vec3::Y);
            assert!(widget.begin_drag(GizmoPart::AxisX, &down(0.0)));
            widget.drag(&down(10.0));
            widget.end_drag();
        }

        let completed = f.sync.process_events(&mut f.store);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].kind, TransformKind::Translate);
        let instance = f.store.get(f.ids[0]).unwrap();
        assert!((instance.x() - 7.0).abs() < 1e-4);
        assert!((instance.y() + 4.0).abs() < 1e-4);
        assert_eq!(calls.borrow().as_slice(), &[(f.ids[0], TransformKind::Translate)]);

        let node = f.node_map[&f.ids[0]];
        assert_eq!(f.scene.borrow().pending_edit(node), None);
    }

    #[test]
    fn test_unavailable_is_inert() {
        let context = Viewport3dContext::new(None, Some(camera()), shared(InputSurface::new()));
        let mut sync = SelectionSync::new(&context, &GizmoSettings::default());
        assert!(!sync.is_available());

        sync.update_selection(&[InstanceId(0)], &NodeMap::new());
        sync.set_enabled(true);
        sync.toggle_space();
        assert_eq!(sync.attached(), None);
        assert!(!sync.is_dragging());
        assert_eq!(sync.current_space(), GizmoSpace::World);
        assert!(sync.process_events(&mut InstanceStore::new()).is_empty());
    }

    #[test]
    fn test_dispose_makes_unavailable() {
        let mut f = fixture();
        f.sync.update_selection(&f.ids[..1], &f.node_map);
        f.sync.dispose();
        assert!(!f.sync.is_available());
        assert_eq!(f.sync.attached(), None);
    }
}
