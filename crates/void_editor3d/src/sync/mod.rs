//! Selection to gizmo synchronization.
//!
//! [`SelectionSync`] attaches the gizmo to the node of the single selected
//! instance and writes committed gizmo edits back into that instance.

mod apply;
mod node_index;
mod selection_sync;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::instance::{InstanceId, InstanceTransform};
use crate::scene::NodeId;
use crate::widget::GizmoMode;

pub use apply::{apply_edit, apply_rotate, apply_scale, apply_translate};
pub use node_index::NodeIndex;
pub use selection_sync::{SelectionSync, TransformCallback};

/// Instance to scene node mapping supplied by the host.
pub type NodeMap = HashMap<InstanceId, NodeId>;

/// Kind of a completed instance edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Translate,
    Rotate,
    Scale,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::Rotate => "rotate",
            TransformKind::Scale => "scale",
        }
    }
}

impl From<GizmoMode> for TransformKind {
    fn from(mode: GizmoMode) -> Self {
        match mode {
            GizmoMode::Translate => TransformKind::Translate,
            GizmoMode::Rotate => TransformKind::Rotate,
            GizmoMode::Scale => TransformKind::Scale,
        }
    }
}

/// An instance edit applied from a gizmo commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformCompleted {
    pub instance: InstanceId,
    pub kind: TransformKind,
    pub before: InstanceTransform,
    pub after: InstanceTransform,
}
