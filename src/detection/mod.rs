pub mod annotate;
pub mod classifier;
pub mod contours;
pub mod preprocessing;
pub mod steps;

use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, RgbImage};
use tracing::info;

use crate::config::DetectorConfig;
use crate::error::ShapeError;
use crate::models::DetectedShape;
use crate::pipeline::{Pipeline, PipelineData};
use steps::keys;

/// Result of processing one image
#[derive(Debug, Clone)]
pub struct Detection {
    pub original: DynamicImage,
    pub annotated: RgbImage,
    pub shapes: Vec<DetectedShape>,
}

/// Runs the standard pipeline and turns its output into shapes
pub struct ShapeDetector {
    pub config: DetectorConfig,
    debug_dir: Option<PathBuf>,
}

impl ShapeDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            config,
            debug_dir: None,
        }
    }

    /// Write every intermediate image under `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Decode an uploaded file and process it
    pub fn process_bytes(&self, bytes: &[u8]) -> anyhow::Result<Detection> {
        let img = image::load_from_memory(bytes).map_err(ShapeError::from)?;
        self.process(img)
    }

    /// Detect, then annotate a copy of the image
    pub fn process(&self, img: DynamicImage) -> anyhow::Result<Detection> {
        let shapes = self.detect(&img)?;
        let annotated = annotate::annotate(&img, &shapes)?;
        Ok(Detection {
            original: img,
            annotated,
            shapes,
        })
    }

    /// Shapes ordered top-to-bottom, then left-to-right
    pub fn detect(&self, img: &DynamicImage) -> anyhow::Result<Vec<DetectedShape>> {
        let mut pipeline = build_standard_pipeline(&self.config);
        if let Some(dir) = &self.debug_dir {
            pipeline = pipeline.with_debug(dir.clone())?;
        }

        let results = pipeline.run_with_executor(img.clone())?;
        let mut shapes = results
            .iter()
            .map(DetectedShape::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        shapes.sort_by_key(|s| (s.bbox.y, s.bbox.x));

        info!(shapes = shapes.len(), "detection finished");
        Ok(shapes)
    }

    pub fn annotate(&self, img: &DynamicImage, shapes: &[DetectedShape]) -> anyhow::Result<RgbImage> {
        Ok(annotate::annotate(img, shapes)?)
    }
}

impl Default for ShapeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&PipelineData> for DetectedShape {
    type Error = ShapeError;

    fn try_from(item: &PipelineData) -> Result<Self, Self::Error> {
        Ok(DetectedShape {
            label: item.get_label(keys::LABEL).ok_or(ShapeError::MissingMetadata(keys::LABEL))?,
            area: item.get_float(keys::AREA).ok_or(ShapeError::MissingMetadata(keys::AREA))?,
            bbox: item.bbox.ok_or(ShapeError::MissingMetadata("bbox"))?,
            polygon: item
                .get_polygon(keys::POLYGON)
                .cloned()
                .ok_or(ShapeError::MissingMetadata(keys::POLYGON))?,
        })
    }
}

/// Build the standard detection pipeline using the composable pipeline system
pub fn build_standard_pipeline(config: &DetectorConfig) -> Pipeline {
    use steps::*;

    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(ThresholdStep))
        .add_step(Arc::new(ContourDetectionStep {
            padding: config.crop_padding,
        }))
        .add_step(Arc::new(AreaFilterStep {
            min_area: config.min_area,
        }))
        .add_step(Arc::new(ShapeClassificationStep {
            epsilon_fraction: config.epsilon_fraction,
        }))
}
