use crate::models::{Polygon, ShapeLabel};

/// Inclusive aspect ratio range treated as a square
pub const SQUARE_MIN_ASPECT: f64 = 0.95;
pub const SQUARE_MAX_ASPECT: f64 = 1.05;

/// Classify a simplified contour by its vertex count.
///
/// `aspect_ratio` (bounding box width / height) is only consulted for four
/// vertices. Counts without a bucket of their own (7, 8, 9 and anything below
/// 3) fall back to `Heart`; hearts are not actually distinguishable by vertex
/// count, so this label is a catch-all rather than a real detector.
pub fn classify(vertex_count: usize, aspect_ratio: f64) -> ShapeLabel {
    match vertex_count {
        3 => ShapeLabel::Triangle,
        4 => ShapeLabel::from_aspect_ratio(aspect_ratio),
        5 => ShapeLabel::Pentagon,
        6 => ShapeLabel::Hexagon,
        10..=14 => ShapeLabel::Star,
        v if v > 14 => ShapeLabel::Circle,
        _ => ShapeLabel::Heart,
    }
}

/// Classify a polygon, deriving the aspect ratio from its own bounding box
pub fn classify_polygon(polygon: &Polygon) -> ShapeLabel {
    let aspect_ratio = polygon
        .bounding_box()
        .map(|bbox| bbox.aspect_ratio())
        .unwrap_or(0.0);
    classify(polygon.vertex_count(), aspect_ratio)
}

impl ShapeLabel {
    /// Square or rectangle for a four-vertex polygon
    pub fn from_aspect_ratio(aspect_ratio: f64) -> Self {
        if (SQUARE_MIN_ASPECT..=SQUARE_MAX_ASPECT).contains(&aspect_ratio) {
            ShapeLabel::Square
        } else {
            ShapeLabel::Rectangle
        }
    }
}
