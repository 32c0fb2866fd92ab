//! Pipeline orchestration.
//!
//! [`ReportPipeline`] runs the stages of [`EdaStage`] in order and returns
//! the [`EdaReport`](crate::reporting::EdaReport) of the run. Progress can be
//! observed with a [`ProgressReporter`] or a closure.

mod builder;
mod progress;

pub use builder::{ReportPipeline, ReportPipelineBuilder};
pub use progress::{ClosureProgressReporter, EdaStage, ProgressReporter, ProgressUpdate};
