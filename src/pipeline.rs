use image::DynamicImage;
use imageproc::point::Point;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use anyhow::Result;
use tracing::{debug, info};

use crate::error::ShapeError;
use crate::models::{BoundingBox, Polygon, ShapeLabel};

/// Data that flows through the pipeline
/// Each PipelineData represents either the whole image or one contour region
#[derive(Clone)]
pub struct PipelineData {
    /// The working image (full frame, binary mask, or a crop around a contour)
    pub image: DynamicImage,

    /// Reference to the original image (shared efficiently via Arc)
    pub original: Arc<DynamicImage>,

    /// Contour extent in the original image (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Properties accumulated by the steps (e.g. "area", "polygon", "label")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone)]
pub enum MetadataValue {
    Float(f64),
    Int(i64),
    Points(Vec<Point<i32>>),
    Polygon(Polygon),
    Label(ShapeLabel),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(
        image: DynamicImage,
        original: Arc<DynamicImage>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            metadata: HashMap::new(),
        }
    }

    /// Same region and metadata, different working image
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            bbox: self.bbox,
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_points(&self, key: &str) -> Option<&[Point<i32>]> {
        match self.metadata.get(key) {
            Some(MetadataValue::Points(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn get_polygon(&self, key: &str) -> Option<&Polygon> {
        match self.metadata.get(key) {
            Some(MetadataValue::Polygon(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_label(&self, key: &str) -> Option<ShapeLabel> {
        match self.metadata.get(key) {
            Some(MetadataValue::Label(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Where intermediate images are written when debugging a run
#[derive(Clone, Debug)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
}

impl DebugConfig {
    fn step_dir(&self, step_index: usize, step_name: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{:02}_{}",
            step_index,
            step_name.to_lowercase().replace(' ', "_")
        ))
    }

    fn save(&self, dir: &Path, filename: &str, image: &DynamicImage) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let output_path = dir.join(filename);
        image
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", output_path.display(), e))?;
        debug!(path = %output_path.display(), "saved debug image");
        Ok(())
    }

    fn save_input(&self, input: &DynamicImage) -> Result<()> {
        self.save(&self.output_dir.join("00_input"), "01.png", input)
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Work item for pipeline execution
/// Contains data and the remaining steps to execute
#[derive(Clone)]
pub struct WorkItem {
    pub data: PipelineData,

    /// Steps not yet executed
    pub remaining_steps: Vec<Arc<dyn PipelineStep>>,

    pub current_step_index: usize,

    /// Lineage: IDs from previous steps that led to this item
    /// E.g., [1, 3, 2] means: item 1 from step 0 → item 3 from step 1 → item 2 from step 2
    pub lineage: Vec<usize>,
}

impl WorkItem {
    pub fn new(data: PipelineData, steps: Vec<Arc<dyn PipelineStep>>) -> Self {
        Self {
            data,
            remaining_steps: steps,
            current_step_index: 0,
            lineage: vec![],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_steps.is_empty()
    }

    /// Generate filename from lineage (e.g., "01-03-02.png")
    pub fn lineage_filename(&self, extension: &str) -> String {
        if self.lineage.is_empty() {
            format!("01.{}", extension)
        } else {
            let ids: Vec<String> = self.lineage.iter().map(|id| format!("{:02}", id)).collect();
            format!("{}.{}", ids.join("-"), extension)
        }
    }

    fn save_debug_output(&self, context: &PipelineContext, step_name: &str) -> Result<()> {
        if let Some(debug_config) = &context.debug {
            let step_dir = debug_config.step_dir(self.current_step_index, step_name);
            debug_config.save(&step_dir, &self.lineage_filename("png"), &self.data.image)?;
        }
        Ok(())
    }

    /// Run the next step on this item; one result item per output of the step
    pub fn process_next_step(&self, context: &PipelineContext) -> Result<Vec<WorkItem>> {
        let Some((step, remaining_after)) = self.remaining_steps.split_first() else {
            return Ok(vec![]);
        };
        let step_name = step.name();

        let results = step.process(vec![self.data.clone()], context)?;

        let mut new_items = Vec::with_capacity(results.len());
        for (idx, result_data) in results.into_iter().enumerate() {
            let mut new_lineage = self.lineage.clone();
            new_lineage.push(idx + 1); // 1-indexed for readability

            let new_item = WorkItem {
                data: result_data,
                remaining_steps: remaining_after.to_vec(),
                current_step_index: self.current_step_index + 1,
                lineage: new_lineage,
            };

            new_item.save_debug_output(context, step_name)?;
            new_items.push(new_item);
        }

        Ok(new_items)
    }
}

/// Pipeline executor using an MPSC channel as its work queue
pub struct PipelineExecutor {
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
    context: PipelineContext,
}

impl PipelineExecutor {
    pub fn new(context: PipelineContext) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            context,
        }
    }

    fn enqueue(&self, item: WorkItem) -> Result<()> {
        self.sender
            .send(item)
            .map_err(|e| anyhow::anyhow!("Failed to send work item: {}", e))
    }

    /// Process work items until the queue is drained
    pub fn execute(&self, initial_items: Vec<WorkItem>) -> Result<Vec<PipelineData>> {
        let mut pending_count = initial_items.len();
        for item in initial_items {
            self.enqueue(item)?;
        }

        let mut completed_results = Vec::new();

        while pending_count > 0 {
            let item = self
                .receiver
                .try_recv()
                .map_err(|e| anyhow::anyhow!("Work queue drained with {} items pending: {}", pending_count, e))?;
            pending_count -= 1;

            if item.is_complete() {
                completed_results.push(item.data);
                continue;
            }

            for new_item in item.process_next_step(&self.context)? {
                self.enqueue(new_item)?;
                pending_count += 1;
            }
        }

        Ok(completed_results)
    }
}

/// Composable pipeline builder
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(ShapeError::DebugDirNotEmpty(output_dir).into());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step over the whole batch before moving to the next one
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        if let Some(debug_config) = &self.context.debug {
            debug_config.save_input(&input)?;
        }

        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            let step_name = step.name();
            debug!(step = step_name, items = data.len(), "running step");

            data = step.process(data, &self.context)?;

            if let Some(debug_config) = &self.context.debug {
                let step_dir = debug_config.step_dir(step_idx + 1, step_name);
                for (idx, item) in data.iter().enumerate() {
                    debug_config.save(&step_dir, &format!("{:02}.png", idx + 1), &item.image)?;
                }
            }

            debug!(step = step_name, items = data.len(), "step finished");
        }

        info!(results = data.len(), "pipeline finished");
        Ok(data)
    }

    /// Run the pipeline through the work-queue executor, one item at a time,
    /// naming debug outputs by lineage
    pub fn run_with_executor(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        if let Some(debug_config) = &self.context.debug {
            debug_config.save_input(&input)?;
        }

        let initial_item = WorkItem::new(PipelineData::from_image(input), self.steps.clone());
        let executor = PipelineExecutor::new(self.context.clone());
        let results = executor.execute(vec![initial_item])?;

        info!(results = results.len(), "pipeline finished");
        Ok(results)
    }
}
