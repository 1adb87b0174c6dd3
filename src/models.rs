use std::fmt;

use imageproc::point::Point;
use serde::{Serialize, Serializer};

/// Axis-aligned box in original image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Inclusive pixel extent of a point set. Returns None for an empty set.
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Simplified outline of a contour
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point<i32>>,
}

impl Polygon {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

impl Serialize for Polygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points.iter().map(|p| [p.x, p.y]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeLabel {
    Triangle,
    Square,
    Rectangle,
    Pentagon,
    Hexagon,
    Star,
    Circle,
    Heart,
}

impl ShapeLabel {
    pub const ALL: [ShapeLabel; 8] = [
        ShapeLabel::Triangle,
        ShapeLabel::Square,
        ShapeLabel::Rectangle,
        ShapeLabel::Pentagon,
        ShapeLabel::Hexagon,
        ShapeLabel::Star,
        ShapeLabel::Circle,
        ShapeLabel::Heart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeLabel::Triangle => "Triangle",
            ShapeLabel::Square => "Square",
            ShapeLabel::Rectangle => "Rectangle",
            ShapeLabel::Pentagon => "Pentagon",
            ShapeLabel::Hexagon => "Hexagon",
            ShapeLabel::Star => "Star",
            ShapeLabel::Circle => "Circle",
            ShapeLabel::Heart => "Heart",
        }
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified contour
#[derive(Debug, Clone, Serialize)]
pub struct DetectedShape {
    pub label: ShapeLabel,
    pub area: f64,
    /// Extent of the raw contour, used for annotation placement
    pub bbox: BoundingBox,
    pub polygon: Polygon,
}

impl DetectedShape {
    /// Text drawn next to the shape, e.g. "Square 2401.0"
    pub fn annotation_text(&self) -> String {
        format!("{} {:.1}", self.label, self.area)
    }
}
