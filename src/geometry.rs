//! Edge math and length formatting for measured rectangles.

use bevy::prelude::*;

/// World units are meters; labels read in centimeters.
pub const CENTIMETERS_PER_METER: f32 = 100.0;
pub const LENGTH_UNIT_SUFFIX: &str = "cm";

/// Number of corners in a measured rectangle
pub const RECTANGLE_CORNERS: usize = 4;

/// Straight segment between two placed points
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec3,
    pub end:   Vec3,
}

impl Edge {
    pub const fn new(start: Vec3, end: Vec3) -> Self { Self { start, end } }

    /// Euclidean distance between the endpoints, in meters
    pub fn length(&self) -> f32 { self.start.distance(self.end) }

    pub fn midpoint(&self) -> Vec3 { (self.start + self.end) * 0.5 }

    /// Text shown on the edge's label, e.g. `"47 cm"`
    pub fn length_text(&self) -> String { format_length(self.length()) }
}

/// Formats a length in meters as whole centimeters.
/// Rounds half away from zero, so 0.475 m reads "48 cm".
pub fn format_length(meters: f32) -> String {
    let centimeters = (meters * CENTIMETERS_PER_METER).round();
    format!("{centimeters} {LENGTH_UNIT_SUFFIX}")
}

/// Edges of a closed quadrilateral: `points[i] -> points[(i + 1) % 4]`
pub fn closed_edges(points: &[Vec3; RECTANGLE_CORNERS]) -> [Edge; RECTANGLE_CORNERS] {
    std::array::from_fn(|i| Edge::new(points[i], points[(i + 1) % RECTANGLE_CORNERS]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_length_is_euclidean() {
        let edge = Edge::new(Vec3::new(1.0, 2.0, 2.0), Vec3::new(4.0, 6.0, 2.0));
        assert!((edge.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn edge_midpoint() {
        let edge = Edge::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(edge.midpoint(), Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn label_text_rounds_to_whole_centimeters() {
        let edge = Edge::new(Vec3::ZERO, Vec3::new(0.473, 0.0, 0.0));
        assert_eq!(edge.length_text(), "47 cm");
        assert_eq!(format_length(1.0), "100 cm");
        assert_eq!(format_length(0.0), "0 cm");
        assert_eq!(format_length(0.129), "13 cm");
    }

    #[test]
    fn closed_edges_wrap_to_first_point() {
        let points = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::Z,
        ];
        let edges = closed_edges(&points);
        for (i, edge) in edges.iter().enumerate() {
            assert_eq!(edge.start, points[i]);
            assert_eq!(edge.end, points[(i + 1) % 4]);
        }
        assert_eq!(edges[3], Edge::new(Vec3::Z, Vec3::ZERO));
    }
}
