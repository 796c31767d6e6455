//! Camera and gizmo settings.
//!
//! Settings are plain serde structs with defaults for every field, so a
//! TOML file only needs to name the values it overrides:
//!
//! ```toml
//! [camera]
//! damping_factor = 0.2
//! keyboard_enabled = false
//!
//! [gizmo]
//! mode = "rotate"
//! space = "local"
//! ```

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Editor3dError, Result};
use crate::widget::{GizmoMode, GizmoSpace};

/// Free camera tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians of orbit per pixel of primary-button drag
    pub rotate_speed: f32,
    /// World units of pan per pixel of secondary-button drag
    pub pan_speed: f32,
    /// Relative radius change per wheel unit
    pub zoom_speed: f32,
    /// World units per frame while a movement key is held
    pub move_speed: f32,
    /// Fraction of the remaining distance covered by each `update()`
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle bounds, measured from the up axis
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// WASD/QE movement
    pub keyboard_enabled: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.01,
            zoom_speed: 0.1,
            move_speed: 0.2,
            damping_factor: 0.15,
            min_distance: 0.5,
            max_distance: 500.0,
            min_polar_angle: 0.05,
            max_polar_angle: PI - 0.05,
            keyboard_enabled: true,
        }
    }
}

impl CameraSettings {
    /// Check ranges that the camera rig relies on.
    pub fn validate(&self) -> Result<()> {
        // Negated comparisons so that NaN fails every check
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(Editor3dError::InvalidConfig(format!(
                "camera.damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        if !(self.min_distance > 0.0 && self.min_distance <= self.max_distance) {
            return Err(Editor3dError::InvalidConfig(format!(
                "camera distance range [{}, {}] is empty or non-positive",
                self.min_distance, self.max_distance
            )));
        }
        if !(0.0 <= self.min_polar_angle
            && self.min_polar_angle <= self.max_polar_angle
            && self.max_polar_angle <= PI)
        {
            return Err(Editor3dError::InvalidConfig(format!(
                "camera polar range [{}, {}] must lie within [0, PI]",
                self.min_polar_angle, self.max_polar_angle
            )));
        }
        let speeds = [
            ("rotate_speed", self.rotate_speed),
            ("pan_speed", self.pan_speed),
            ("zoom_speed", self.zoom_speed),
            ("move_speed", self.move_speed),
        ];
        if let Some((name, value)) = speeds.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Editor3dError::InvalidConfig(format!(
                "camera.{} must be finite, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// Snap settings for gizmo operations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Enable snap
    pub enabled: bool,
    /// Translation snap value (units)
    pub translate: f32,
    /// Rotation snap value (degrees)
    pub rotate: f32,
    /// Scale snap value (multiplier)
    pub scale: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            translate: 0.5,
            rotate: 15.0,
            scale: 0.1,
        }
    }
}

impl SnapSettings {
    /// Snap increment for a mode, or `None` when snapping is off.
    pub fn step_for(&self, mode: GizmoMode) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        Some(match mode {
            GizmoMode::Translate => self.translate,
            GizmoMode::Rotate => self.rotate,
            GizmoMode::Scale => self.scale,
        })
    }
}

/// Gizmo defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    pub enabled: bool,
    pub mode: GizmoMode,
    pub space: GizmoSpace,
    /// Handle size multiplier on top of the distance-based scale
    pub size: f32,
    pub snap: SnapSettings,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: GizmoMode::Translate,
            space: GizmoSpace::World,
            size: 1.0,
            snap: SnapSettings::default(),
        }
    }
}

/// Complete settings for the 3D editing layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Editor3dConfig {
    pub camera: CameraSettings,
    pub gizmo: GizmoSettings,
    /// Start with the free camera attached to the viewport
    pub free_camera_enabled: bool,
}

impl Editor3dConfig {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Editor3dError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded 3D editor settings from {:?}", path);
        Ok(config)
    }

    /// Save settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?).map_err(|source| Editor3dError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved 3D editor settings to {:?}", path);
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;
        if !(self.gizmo.size > 0.0 && self.gizmo.size.is_finite()) {
            return Err(Editor3dError::InvalidConfig(format!(
                "gizmo.size must be positive, got {}",
                self.gizmo.size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Editor3dConfig::from_toml_str(
            r#"
            [camera]
            damping_factor = 0.25

            [gizmo]
            mode = "rotate"
            space = "local"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.damping_factor, 0.25);
        assert_eq!(config.camera.max_distance, CameraSettings::default().max_distance);
        assert_eq!(config.gizmo.mode, GizmoMode::Rotate);
        assert_eq!(config.gizmo.space, GizmoSpace::Local);
        assert!(config.gizmo.enabled);
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = Editor3dConfig::from_toml_str("[camera]\ndamping_factor = 1.5\n").unwrap_err();
        assert!(matches!(err, Editor3dError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_distance_range() {
        let mut config = Editor3dConfig::default();
        config.camera.min_distance = 10.0;
        config.camera.max_distance = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_bounds() {
        let err = Editor3dConfig::from_toml_str("[camera]\nmin_distance = nan\n").unwrap_err();
        assert!(matches!(err, Editor3dError::InvalidConfig(_)));

        let mut config = Editor3dConfig::default();
        config.camera.min_polar_angle = f32::NAN;
        assert!(config.validate().is_err());

        config = Editor3dConfig::default();
        config.camera.max_distance = f32::NAN;
        assert!(config.validate().is_err());

        config = Editor3dConfig::default();
        config.camera.zoom_speed = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_polar_range() {
        let mut config = Editor3dConfig::default();
        config.camera.min_polar_angle = 2.0;
        config.camera.max_polar_angle = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Editor3dConfig::from_toml_str("[camera\n").unwrap_err();
        assert!(matches!(err, Editor3dError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Editor3dConfig::default();
        config.gizmo.snap.enabled = true;
        config.free_camera_enabled = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(Editor3dConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_snap_step_for_mode() {
        let mut snap = SnapSettings::default();
        assert_eq!(snap.step_for(GizmoMode::Translate), None);
        snap.enabled = true;
        assert_eq!(snap.step_for(GizmoMode::Rotate), Some(15.0));
    }
}
