//! # Processing Pipeline
//!
//! validate -> simulated upload -> simulated processing -> generate.
//! Steps run strictly in sequence on the caller's task. Dropping the `run`
//! future abandons the run and stops any in-flight progress simulation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cf_core::error::{AppError, Result};
use cf_core::format::mib_two_decimals;
use cf_core::models::{RunSummary, Short, VideoFile};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::generator::{ShortGenerator, STOCK_VIDEO_URL};
use crate::progress::{Phase, ProgressProfile, ProgressSender, ProgressStream};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub upload: ProgressProfile,
    pub processing: ProgressProfile,
    /// Fixes every random draw when set
    pub seed: Option<u64>,
    /// Media reference stamped on each short; `None` omits it
    pub video_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload: ProgressProfile::UPLOAD,
            processing: ProgressProfile::PROCESSING,
            seed: None,
            video_url: Some(STOCK_VIDEO_URL.to_string()),
        }
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub shorts: Vec<Short>,
    pub summary: RunSummary,
}

pub struct Pipeline {
    config: PipelineConfig,
    generator: ShortGenerator,
    rng: Mutex<StdRng>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            generator: ShortGenerator::new(config.video_url.clone()),
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Accepts anything whose declared MIME type is `video/*`.
    pub fn validate_selection(file: &VideoFile) -> Result<()> {
        match file.declared_mime() {
            Some(declared) if declared.type_() == mime::VIDEO => Ok(()),
            _ => Err(AppError::not_video(&file.mime_type)),
        }
    }

    pub fn simulate_upload(&self) -> ProgressStream {
        ProgressStream::spawn(Phase::Upload, self.config.upload, self.next_seed())
    }

    pub fn simulate_processing(&self) -> ProgressStream {
        ProgressStream::spawn(Phase::Processing, self.config.processing, self.next_seed())
    }

    pub fn generate_shorts(&self, file: &VideoFile) -> Vec<Short> {
        self.generator.generate(file, &mut *self.rng())
    }

    pub async fn run(&self, file: &VideoFile, observer: Option<&ProgressSender>) -> Result<RunOutput> {
        Self::validate_selection(file)?;
        info!(file = %file.name, size = file.size, "pipeline run started");

        self.simulate_upload().complete(observer).await;
        self.simulate_processing().complete(observer).await;

        let shorts = self.generate_shorts(file);
        let summary = RunSummary {
            file_name: file.name.clone(),
            file_size: mib_two_decimals(file.size),
            total_shorts: shorts.len(),
            timestamp: Utc::now(),
        };

        info!(file = %file.name, shorts = shorts.len(), "pipeline run finished");
        Ok(RunOutput { shorts, summary })
    }

    fn next_seed(&self) -> u64 {
        self.rng().gen()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
