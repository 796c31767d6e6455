//! Gizmo controller wrapping the transform widget.

mod controller;

pub use controller::{GizmoController, GizmoEvent};
