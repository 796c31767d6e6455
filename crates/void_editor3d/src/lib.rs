//! Void Engine 3D Editing Layer
//!
//! Interactive 3D manipulation for the scene editor: a transform gizmo,
//! a free-flying orbit camera and the glue that writes gizmo edits back
//! into the editor's instance model.
//!
//! ## Features
//!
//! - **Free Camera**: Damped orbit/pan/zoom rig with optional WASD movement
//! - **Transform Gizmo**: Translate, rotate and scale handles in local or world space
//! - **Selection Sync**: Attaches the gizmo to the selected instance's node and
//!   converts completed edits into instance position/size/rotation
//! - **Undo/Redo**: History of completed transform edits
//! - **TOML Settings**: Camera and gizmo tuning loaded from disk
//!
//! ## Architecture
//!
//! ```text
//! InputSurface → TransformWidget → GizmoController → SelectionSync → InstanceStore
//!              ↘ FreeCameraController → Camera3d
//! ```
//!
//! Everything runs on the UI thread. Input handlers fire synchronously from
//! [`InputSurface::dispatch`] and [`Editor3d::update`] advances the camera
//! and drains gizmo edits once per frame.

pub mod camera;
pub mod config;
pub mod editor;
pub mod error;
pub mod gizmo;
pub mod history;
pub mod input;
pub mod instance;
pub mod scene;
pub mod sync;
pub mod toolbar;
pub mod widget;

use std::cell::RefCell;
use std::rc::Rc;

pub use camera::{FreeCameraController, Spherical};
pub use config::{CameraSettings, Editor3dConfig, GizmoSettings, SnapSettings};
pub use editor::{Editor3d, Viewport3dContext};
pub use error::{Editor3dError, Result};
pub use gizmo::{GizmoController, GizmoEvent};
pub use history::{EditHistory, TransformEdit};
pub use input::{
    InputEvent, InputKind, InputSurface, Key, Modifiers, MouseButton, Priority, Propagation,
    SharedInputSurface, SubscriberId,
};
pub use instance::{
    FlatInstance, Instance, InstanceId, InstanceStore, InstanceTransform, SpatialInstance,
};
pub use scene::{
    Camera3d, NodeId, PendingEdit, Ray, SceneGraph, SceneNode, SharedCamera, SharedScene,
    TransformSnapshot,
};
pub use sync::{NodeMap, SelectionSync, TransformCallback, TransformCompleted, TransformKind};
pub use toolbar::{ToolbarAction, ToolbarState};
pub use widget::{GizmoMode, GizmoPart, GizmoSpace, TransformWidget, WidgetEvent};

/// Single-threaded shared handle used for the scene, camera and input surface.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
