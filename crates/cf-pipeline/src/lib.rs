//! # cf-pipeline
//!
//! Client-local simulation that turns one selected file into a batch of
//! fabricated shorts plus a summary. No media is ever inspected.

pub mod generator;
pub mod pipeline;
pub mod progress;

pub use generator::{ShortGenerator, HASHTAG_POOL, STOCK_VIDEO_URL};
pub use pipeline::{Pipeline, PipelineConfig, RunOutput};
pub use progress::{Phase, ProgressEvent, ProgressProfile, ProgressSender, ProgressStream};
