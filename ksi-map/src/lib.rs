//! Road KSI map is a pipeline that turns a CSV of road segments with killed-or-seriously-injured
//! (KSI) counts into colored lines for a web map.
//!
//! # Stages
//!
//! 1. [`loader`] reads the CSV and parses the WKT `geometry` column, keeping only line strings.
//! 2. [`CrsNormalizer`] guesses whether the data is in longitude/latitude or in a projected CRS
//!    and reprojects if needed.
//! 3. [`SpatialFilter`] keeps segments touching the region of interest with at least one KSI.
//! 4. [`AttributeFilter`] applies the user's choice of road numbers, speed limits and
//!    [severity buckets](SeverityBucket).
//! 5. [`Smoother`] replaces each line with a resampled interpolating spline.
//! 6. [`Renderer`] colors segments by severity and exports GeoJSON.
//!
//! [`Pipeline`] runs all of them:
//!
//! ```no_run
//! use ksi_map::{FilterConfig, Pipeline, PipelineOptions};
//!
//! let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();
//! let file = std::fs::File::open("roads.csv").unwrap();
//! let output = pipeline.run(file, &FilterConfig::default()).unwrap();
//! println!("{}", output.map.to_geojson_string().unwrap());
//! ```

mod color;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalizer;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod severity;
pub mod smoother;
mod spline;

pub use color::Color;
pub use error::KsiMapError;
pub use filter::{
    AttributeFilter, FilterChoices, FilterConfig, RecordFilter, Region, Selection, SpatialFilter,
};
pub use ksi_geo;
pub use normalizer::{CrsDecision, CrsNormalizer};
pub use options::PipelineOptions;
pub use pipeline::{DisplayOutput, Pipeline, PipelineOutput, PreparedData, UserMessage};
pub use record::RoadSegment;
pub use render::{LegendEntry, MapStyle, RenderedMap, RenderedSegment, Renderer};
pub use severity::{severity_color, BucketThresholds, SeverityBucket};
pub use smoother::{Smoother, SmoothingError, SmoothingOptions};
pub use spline::SplineDegree;
