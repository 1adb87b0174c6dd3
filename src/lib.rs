pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::DetectorConfig;
pub use detection::{Detection, ShapeDetector};
pub use detection::classifier::{classify, classify_polygon};
pub use error::ShapeError;
pub use models::{BoundingBox, DetectedShape, Polygon, ShapeLabel};
pub use pipeline::{
    Pipeline, PipelineData, PipelineStep, PipelineContext,
    MetadataValue, WorkItem, PipelineExecutor, DebugConfig
};

#[cfg(feature = "gui")]
pub mod gui;
