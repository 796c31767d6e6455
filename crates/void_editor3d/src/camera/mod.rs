//! Free camera navigation.

mod free_camera;
mod spherical;

pub use free_camera::FreeCameraController;
pub use spherical::Spherical;
