use crate::pipeline::{PipelineData, PipelineStep, PipelineContext, MetadataValue};
use crate::detection::{classifier, contours, preprocessing};
use crate::error::ShapeError;
use crate::models::{BoundingBox, Polygon};
use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Metadata keys written by the steps below
pub mod keys {
    pub const THRESHOLD_LEVEL: &str = "threshold_level";
    pub const CONTOUR: &str = "contour";
    pub const AREA: &str = "area";
    pub const VERTICES: &str = "vertices";
    pub const POLYGON: &str = "polygon";
    pub const LABEL: &str = "label";
}

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Otsu threshold, inverted so shapes become foreground
pub struct ThresholdStep;

impl PipelineStep for ThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());
        for item in data {
            let (binary, level) = preprocessing::threshold_inverted(&item.image.to_luma8());
            debug!(level, "otsu threshold");
            result.push(
                item.with_image(DynamicImage::ImageLuma8(binary))
                    .with_metadata(keys::THRESHOLD_LEVEL, MetadataValue::Int(level as i64)),
            );
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Otsu Threshold"
    }
}

/// Find outermost contours in a binary image - splits one image into many regions
pub struct ContourDetectionStep {
    /// Extra margin around each contour when cropping its debug image
    pub padding: u32,
}

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let binary = item.image.to_luma8();
            let detected = contours::find_external_contours(&binary);
            let (img_width, img_height) = item.original.dimensions();
            debug!(contours = detected.len(), "found external contours");

            for points in detected {
                let Some(bbox) = BoundingBox::from_points(&points) else {
                    continue;
                };
                let area = contours::contour_area(&points);

                // Padded crop, clamped to image boundaries
                let min_x = (bbox.x.max(0) as u32).saturating_sub(self.padding);
                let min_y = (bbox.y.max(0) as u32).saturating_sub(self.padding);
                let max_x = (bbox.x.max(0) as u32 + bbox.width - 1)
                    .saturating_add(self.padding)
                    .min(img_width - 1);
                let max_y = (bbox.y.max(0) as u32 + bbox.height - 1)
                    .saturating_add(self.padding)
                    .min(img_height - 1);
                let cropped = item.original.crop_imm(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);

                let region = PipelineData::from_region(cropped, item.original.clone(), bbox)
                    .with_metadata(keys::AREA, MetadataValue::Float(area))
                    .with_metadata(keys::CONTOUR, MetadataValue::Points(points));

                result.push(region);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Drop contours too small to be shapes (noise, compression artifacts)
pub struct AreaFilterStep {
    pub min_area: f64,
}

impl PipelineStep for AreaFilterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let area = item
                .get_float(keys::AREA)
                .ok_or(ShapeError::MissingMetadata(keys::AREA))?;

            if area < self.min_area {
                debug!(area, bbox = ?item.bbox, "dropping small contour");
                continue;
            }
            result.push(item);
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Area Filtering"
    }
}

/// Simplify each contour to a polygon and label it by vertex count
pub struct ShapeClassificationStep {
    /// Approximation tolerance as a fraction of the contour perimeter
    pub epsilon_fraction: f64,
}

impl PipelineStep for ShapeClassificationStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());

        for item in data {
            let points = item
                .get_points(keys::CONTOUR)
                .ok_or(ShapeError::MissingMetadata(keys::CONTOUR))?;

            let polygon = Polygon::new(contours::approximate_by_perimeter(points, self.epsilon_fraction));
            let label = classifier::classify_polygon(&polygon);
            debug!(vertices = polygon.vertex_count(), %label, bbox = ?item.bbox, "classified contour");

            result.push(
                item.with_metadata(keys::VERTICES, MetadataValue::Int(polygon.vertex_count() as i64))
                    .with_metadata(keys::LABEL, MetadataValue::Label(label))
                    .with_metadata(keys::POLYGON, MetadataValue::Polygon(polygon)),
            );
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Shape Classification"
    }
}
