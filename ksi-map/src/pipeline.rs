//! Running all stages from CSV input to a styled map.
//!
//! Input is loaded, normalized and cut to the region of interest once with [`Pipeline::prepare`].
//! The result can then be filtered and rendered any number of times with different
//! [`FilterConfig`]s with [`Pipeline::render`], the way a dashboard re-renders when its controls
//! change.

use std::io::Read;

use crate::error::KsiMapError;
use crate::filter::{AttributeFilter, FilterChoices, FilterConfig, RecordFilter, SpatialFilter};
use crate::loader::{self, LoadReport};
use crate::normalizer::{CrsDecision, CrsNormalizer};
use crate::options::PipelineOptions;
use crate::record::{RoadSegment, GEOMETRY_COLUMN};
use crate::render::{RenderedMap, Renderer};
use crate::smoother::Smoother;

/// Segments of one input in geographic coordinates, inside the region and with at least one KSI.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// The segments.
    pub records: Vec<RoadSegment>,
    /// Road numbers and speed limits available for filtering.
    pub choices: FilterChoices,
    /// How the CRS of the input was determined.
    pub crs: CrsDecision,
    /// Rows dropped while loading.
    pub load_report: LoadReport,
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Styled segments.
    pub map: RenderedMap,
    /// Road numbers and speed limits available for filtering.
    pub choices: FilterChoices,
    /// How the CRS of the input was determined.
    pub crs: CrsDecision,
    /// Rows dropped while loading.
    pub load_report: LoadReport,
}

/// Message for the user about the outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    /// The input has no geometry column.
    MissingGeometryColumn,
    /// No row contains a line geometry.
    NoValidGeometries,
    /// Any other failure, with its description.
    LoadFailed(String),
    /// The run succeeded but the filters left nothing to show.
    NoMatches,
}

impl UserMessage {
    /// Returns true for failures, false for warnings.
    pub fn is_error(&self) -> bool {
        !matches!(self, UserMessage::NoMatches)
    }
}

impl From<&KsiMapError> for UserMessage {
    fn from(value: &KsiMapError) -> Self {
        match value {
            KsiMapError::MissingColumn(_) => UserMessage::MissingGeometryColumn,
            KsiMapError::EmptyDataset => UserMessage::NoValidGeometries,
            other => UserMessage::LoadFailed(other.to_string()),
        }
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserMessage::MissingGeometryColumn => write!(
                f,
                "Error: The uploaded file must contain a '{GEOMETRY_COLUMN}' column."
            ),
            UserMessage::NoValidGeometries => {
                write!(f, "No valid LineString geometries found in the dataset.")
            }
            UserMessage::LoadFailed(err) => write!(f, "Error loading data: {err}"),
            UserMessage::NoMatches => write!(
                f,
                "No data matches the selected filters or there is an issue rendering the map."
            ),
        }
    }
}

/// What a front end shows after a run.
#[derive(Debug, Clone)]
pub struct DisplayOutput {
    /// Map to draw. `None` if the run failed or nothing matched.
    pub map: Option<RenderedMap>,
    /// Road numbers and speed limits to offer in the filter controls.
    pub choices: FilterChoices,
    /// Error or warning to show.
    pub message: Option<UserMessage>,
}

/// The road segment pipeline with fixed options.
#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    normalizer: CrsNormalizer,
    spatial_filter: SpatialFilter,
    smoother: Smoother,
    renderer: Renderer,
}

impl Pipeline {
    /// Creates a pipeline, validating the options.
    pub fn new(options: PipelineOptions) -> Result<Self, KsiMapError> {
        options.validate()?;

        Ok(Self {
            normalizer: CrsNormalizer::new(options.projected_crs.clone())?,
            spatial_filter: SpatialFilter::new(&options.region),
            smoother: Smoother::new(options.smoothing),
            renderer: Renderer::new(&options.region, options.thresholds, options.map),
            options,
        })
    }

    /// Options of the pipeline.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Loads the input, brings it into geographic coordinates and keeps the segments inside the
    /// region of interest with at least one KSI.
    pub fn prepare(&self, reader: impl Read) -> Result<PreparedData, KsiMapError> {
        let (records, load_report) = loader::load_with_report(reader)?;
        let (records, crs) = self.normalizer.normalize(records);

        let loaded = records.len();
        let records = self.spatial_filter.apply(records);
        log::info!(
            "{} of {loaded} segments are inside the region with KSI > 0",
            records.len()
        );

        Ok(PreparedData {
            choices: FilterChoices::from_records(&records),
            records,
            crs,
            load_report,
        })
    }

    /// Applies user filters to prepared data, smooths the remaining segments and styles them.
    pub fn render(&self, data: &PreparedData, filter: &FilterConfig) -> RenderedMap {
        let attribute_filter = AttributeFilter::new(filter, self.options.thresholds);
        let filtered = attribute_filter.apply(data.records.clone());
        log::debug!(
            "{} of {} segments match the filters",
            filtered.len(),
            data.records.len()
        );

        let smoothed = self.smoother.smooth_records(filtered);
        self.renderer.render(&smoothed)
    }

    /// Runs every stage on the input.
    pub fn run(
        &self,
        reader: impl Read,
        filter: &FilterConfig,
    ) -> Result<PipelineOutput, KsiMapError> {
        let data = self.prepare(reader)?;
        let map = self.render(&data, filter);

        Ok(PipelineOutput {
            map,
            choices: data.choices,
            crs: data.crs,
            load_report: data.load_report,
        })
    }

    /// Runs every stage, turning failures into a message for the user instead of an error.
    pub fn run_for_display(&self, reader: impl Read, filter: &FilterConfig) -> DisplayOutput {
        match self.run(reader, filter) {
            Ok(output) if output.map.is_empty() => DisplayOutput {
                map: None,
                choices: output.choices,
                message: Some(UserMessage::NoMatches),
            },
            Ok(output) => DisplayOutput {
                map: Some(output.map),
                choices: output.choices,
                message: None,
            },
            Err(err) => {
                log::error!("Pipeline run failed: {err}");
                DisplayOutput {
                    map: None,
                    choices: FilterChoices::default(),
                    message: Some(UserMessage::from(&err)),
                }
            }
        }
    }
}
