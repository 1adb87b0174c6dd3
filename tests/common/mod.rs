mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from shapedetect for tests
pub use shapedetect::{
    BoundingBox, DetectedShape, DetectorConfig, Polygon, ShapeDetector, ShapeLabel,
};
