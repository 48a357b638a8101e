//! Scene description: target model, indicator markers and room boundary
//!
//! This is the part of the scene graph the controller mutates. Lights,
//! camera and the renderer itself live in the rendering engine.

pub mod loader;
pub mod room;

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::config::{AppConfig, MarkerConfig};
use crate::input::HandSample;
use crate::xr::Handedness;

pub use loader::{spawn_load, GltfLoader, LoadState, Model, ModelInfo, ModelLoader, ModelSlot};
pub use room::RoomBoundary;

/// Position, local rotation and uniform scale of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    /// Rotate about the node's own Y axis
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Rotate about the node's own Z axis
    pub fn rotate_local_z(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_z(angle)).normalize();
    }
}

/// Material variant shown by an indicator marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMaterial {
    #[default]
    Released,
    Pressed,
}

/// Sphere that mirrors one hand's stick deflection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub hand: Handedness,
    pub anchor: Vec3,
    pub position: Vec3,
    pub material: MarkerMaterial,
}

impl Marker {
    pub fn new(hand: Handedness, anchor: Vec3) -> Self {
        Self {
            hand,
            anchor,
            position: anchor,
            material: MarkerMaterial::Released,
        }
    }

    /// Offset the marker from its anchor by the sample's deflection
    ///
    /// Stick Y is inverted so pushing forward moves the marker up.
    pub fn update(&mut self, sample: &HandSample) {
        self.position = self.anchor + Vec3::new(sample.delta_x, -sample.delta_y, 0.0);
        self.material = if sample.button_pressed {
            MarkerMaterial::Pressed
        } else {
            MarkerMaterial::Released
        };
    }
}

/// Colors for the two marker materials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPalette {
    pub released: u32,
    pub pressed: u32,
}

impl MarkerPalette {
    pub fn color(&self, material: MarkerMaterial) -> u32 {
        match material {
            MarkerMaterial::Released => self.released,
            MarkerMaterial::Pressed => self.pressed,
        }
    }
}

/// The mutable part of the scene graph
#[derive(Debug, Clone)]
pub struct Scene {
    pub room: RoomBoundary,
    pub right_marker: Marker,
    pub left_marker: Marker,
    pub marker_radius: f32,
    pub palette: MarkerPalette,
    pub model: ModelSlot,
}

impl Scene {
    /// Build the room, markers at their anchors and an empty model slot
    pub fn build(config: &AppConfig) -> Self {
        let markers = &config.markers;
        Self {
            room: RoomBoundary::new(&config.room),
            right_marker: Marker::new(Handedness::Right, markers.right_anchor),
            left_marker: Marker::new(Handedness::Left, markers.left_anchor),
            marker_radius: markers.radius,
            palette: palette_of(markers),
            model: ModelSlot::new(),
        }
    }

    pub fn marker_mut(&mut self, hand: Handedness) -> Option<&mut Marker> {
        match hand {
            Handedness::Right => Some(&mut self.right_marker),
            Handedness::Left => Some(&mut self.left_marker),
            Handedness::None => None,
        }
    }

    /// One-line summary of room extent and marker placement
    pub fn describe(&self) -> String {
        let (min, max) = self.room.bounds();
        format!(
            "room {:?}..{:?} ({} lines), markers r={} at {:?} / {:?}",
            min,
            max,
            self.room.lines().len(),
            self.marker_radius,
            self.left_marker.anchor,
            self.right_marker.anchor
        )
    }

    /// Apply reloaded configuration without touching the model
    pub fn apply_config(&mut self, config: &AppConfig) {
        if self.room.size != Vec3::new(config.room.width, config.room.height, config.room.depth)
            || self.room.center != config.room.center
            || self.room.segments != config.room.segments
            || self.room.color != config.room.color
        {
            self.room = RoomBoundary::new(&config.room);
        }

        let markers = &config.markers;
        self.right_marker.anchor = markers.right_anchor;
        self.left_marker.anchor = markers.left_anchor;
        self.marker_radius = markers.radius;
        self.palette = palette_of(markers);
    }
}

fn palette_of(markers: &MarkerConfig) -> MarkerPalette {
    MarkerPalette {
        released: markers.released_color,
        pressed: markers.pressed_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_follows_stick() {
        let mut marker = Marker::new(Handedness::Right, Vec3::new(0.5, 1.6, -1.0));
        marker.update(&HandSample::new(Handedness::Right, 0.5, 0.25, true));
        assert_eq!(marker.position, Vec3::new(1.0, 1.35, -1.0));
        assert_eq!(marker.material, MarkerMaterial::Pressed);

        marker.update(&HandSample::new(Handedness::Right, 0.0, 0.0, false));
        assert_eq!(marker.position, marker.anchor);
        assert_eq!(marker.material, MarkerMaterial::Released);
    }

    #[test]
    fn test_build_default_scene() {
        let scene = Scene::build(&AppConfig::default());
        assert_eq!(scene.right_marker.position, Vec3::new(0.5, 1.6, -1.0));
        assert_eq!(scene.left_marker.position, Vec3::new(-0.5, 1.6, -1.0));
        assert_eq!(scene.palette.color(MarkerMaterial::Released), 0x3333ff);
        assert_eq!(scene.palette.color(MarkerMaterial::Pressed), 0x33ff33);
        assert_eq!(scene.model.state(), LoadState::Pending);
        assert_eq!(scene.room.lines().len(), 132);
    }

    #[test]
    fn test_describe_reports_bounds_and_radius() {
        let scene = Scene::build(&AppConfig::default());
        let text = scene.describe();
        assert!(text.contains(&format!("{:?}..{:?}", Vec3::new(-3.0, 0.0, -3.0), Vec3::new(3.0, 6.0, 3.0))));
        assert!(text.contains("132 lines"));
        assert!(text.contains("r=0.1"));
    }

    #[test]
    fn test_no_marker_for_unhanded_source() {
        let mut scene = Scene::build(&AppConfig::default());
        assert!(scene.marker_mut(Handedness::None).is_none());
        assert_eq!(scene.marker_mut(Handedness::Left).unwrap().hand, Handedness::Left);
    }

    #[test]
    fn test_apply_config_moves_anchors_only() {
        let mut scene = Scene::build(&AppConfig::default());
        scene.model.set_loaded(Model {
            info: ModelInfo {
                url: "m.glb".to_string(),
                byte_length: 0,
                generator: None,
                nodes: 1,
                meshes: 1,
                materials: 0,
                draco_compressed: false,
            },
            transform: Transform::new(Vec3::new(2.0, 0.0, 0.0), 3.0),
        });

        let mut config = AppConfig::default();
        config.markers.right_anchor = Vec3::new(1.0, 1.0, -2.0);
        config.room.segments = 2;
        scene.apply_config(&config);

        assert_eq!(scene.right_marker.anchor, Vec3::new(1.0, 1.0, -2.0));
        assert_eq!(scene.room.lines().len(), 36);
        assert_eq!(scene.model.transform().unwrap().scale, 3.0);
    }

    #[test]
    fn test_local_rotation_composes_on_the_right() {
        let mut t = Transform::default();
        t.rotate_local_y(std::f32::consts::FRAC_PI_2);
        t.rotate_local_z(std::f32::consts::FRAC_PI_2);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(t.rotation.abs_diff_eq(expected, 1e-6));
    }
}
