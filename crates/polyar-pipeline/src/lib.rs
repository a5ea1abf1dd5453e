//! PolyAR Pipeline - From asset identifier to a node in the scene
//!
//! Resolves the identifier against the catalog, downloads every listed
//! file concurrently, relocates each one into the storage root as soon as
//! it arrives, classifies it, and places object files into the scene.
//! Every stage returns a structured error; a run's outcome is a
//! [`PipelineReport`].

pub mod client;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod state;

pub use client::{PendingRun, PipelineClient, RunStatus};
pub use context::PipelineContext;
pub use error::PipelineError;
pub use pipeline::{AssetPipeline, FileOutcome, FileReport, FileStage, PipelineReport};
pub use state::{PipelineState, StateMachine};
