//! Interactive transform widget.
//!
//! Translate, rotate and scale handles picked and dragged with world-space
//! rays, plus the [`TransformWidget`] that drives them against a scene node.

mod handle;
mod rotate;
mod scale;
mod transform_widget;
mod translate;

pub use handle::{
    axis_drag_plane, ray_plane_intersection, ray_point_distance, ray_segment_distance, snap_value,
    GizmoMode, GizmoPart, GizmoSpace, Handle, InteractionState, TransformDelta,
};
pub use rotate::RotateHandle;
pub use scale::{ScaleHandle, MIN_SCALE_FACTOR};
pub use transform_widget::{TransformWidget, WidgetEvent};
pub use translate::TranslateHandle;
