//! Room boundary line geometry
//!
//! The room is drawn as a wireframe box: for every grid division along an
//! axis, one closed rectangle of four line segments wraps around the box at
//! that slice.

use glam::Vec3;

use crate::config::RoomConfig;

/// A line segment in world space
pub type LineSegment = [Vec3; 2];

/// Wireframe box surrounding the play area
#[derive(Debug, Clone, PartialEq)]
pub struct RoomBoundary {
    pub size: Vec3,
    pub center: Vec3,
    pub segments: u32,
    pub color: u32,
    lines: Vec<LineSegment>,
}

impl RoomBoundary {
    pub fn new(config: &RoomConfig) -> Self {
        let size = Vec3::new(config.width, config.height, config.depth);
        let lines = box_lines(size, config.segments, config.center);
        Self {
            size,
            center: config.center,
            segments: config.segments,
            color: config.color,
            lines,
        }
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = self.size * 0.5;
        (self.center - half, self.center + half)
    }
}

/// Generate grid rings for a box of `size` centred at `center`
fn box_lines(size: Vec3, segments: u32, center: Vec3) -> Vec<LineSegment> {
    let half = size * 0.5;
    let rings_per_axis = segments as usize + 1;
    let mut lines = Vec::with_capacity(rings_per_axis * 3 * 4);

    for axis in 0..3 {
        // The two axes spanning the ring's plane
        let u = (axis + 1) % 3;
        let v = (axis + 2) % 3;
        let step = size[axis] / segments as f32;

        for i in 0..rings_per_axis {
            let t = -half[axis] + step * i as f32;
            let corner = |su: f32, sv: f32| {
                let mut p = Vec3::ZERO;
                p[axis] = t;
                p[u] = su * half[u];
                p[v] = sv * half[v];
                p + center
            };

            let ring = [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ];
            for k in 0..4 {
                lines.push([ring[k], ring[(k + 1) % 4]]);
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(segments: u32) -> RoomBoundary {
        RoomBoundary::new(&RoomConfig {
            segments,
            ..RoomConfig::default()
        })
    }

    #[test]
    fn test_segment_count() {
        // Four segments per ring, (n + 1) rings per axis
        assert_eq!(room(10).lines().len(), 4 * 3 * 11);
        assert_eq!(room(1).lines().len(), 4 * 3 * 2);
    }

    #[test]
    fn test_default_room_bounds() {
        let (min, max) = room(10).bounds();
        assert_eq!(min, Vec3::new(-3.0, 0.0, -3.0));
        assert_eq!(max, Vec3::new(3.0, 6.0, 3.0));
    }

    #[test]
    fn test_lines_stay_on_box_surface() {
        let room = room(4);
        let (min, max) = room.bounds();
        let eps = 1e-4;
        for [a, b] in room.lines() {
            for p in [a, b] {
                assert!(p.cmpge(min - eps).all() && p.cmple(max + eps).all(), "{p:?} outside");
                let on_face = (0..3).any(|i| (p[i] - min[i]).abs() < eps || (p[i] - max[i]).abs() < eps);
                assert!(on_face, "{p:?} not on a face");
            }
        }
    }

    #[test]
    fn test_rings_are_closed() {
        let room = room(2);
        for ring in room.lines().chunks(4) {
            assert_eq!(ring[0][0], ring[3][1]);
            for k in 0..3 {
                assert_eq!(ring[k][1], ring[k + 1][0]);
            }
        }
    }
}
