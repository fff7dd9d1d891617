//! Thumbnail generation for every picture in the pictures directory.
//!
//! Each picture gets one thumbnail in the output directory, cover-fit into a
//! square box and center-cropped. The output filename comes from
//! [`thumbnail_filename`](crate::naming::thumbnail_filename), so it always
//! matches the `thumbnailPath` the scanner reports.
//!
//! ## Batching
//!
//! Pictures are processed in batches of `batch_size`. Files inside a batch
//! run in parallel on a dedicated [rayon](https://docs.rs/rayon) pool with
//! `batch_size` threads; the next batch starts only after every file of the
//! current batch has finished. Full-resolution decodes are memory-heavy, so
//! this bounds peak memory to `batch_size` decoded images.
//!
//! ## Failure handling
//!
//! A file that cannot be decoded or encoded is logged and counted as failed.
//! It never stops the run. Only setup problems (output directory, thread
//! pool) fail the pipeline as a whole.
//!
//! Two sources can map to one thumbnail (`foo.gif` and `foo.png` both give
//! `foo.png`). Only one of them is processed; the other is reported as failed
//! without touching the backend.
//!
//! ## Events
//!
//! Progress is reported through an optional `mpsc` channel so the CLI can
//! print while workers run:
//!
//! ```text
//! Started { total: 10, batches: 3 }
//! BatchStarted { index: 1, total: 3, count: 4 }
//! Generated { filename: "dawn.jpg", output: ".../thumbnails/dawn.jpg" }
//! Failed { filename: "broken.jpg", error: "..." }
//! ```

use crate::config::GalleryConfig;
use crate::imaging::{ImageBackend, OutputFormat, Quality, RustBackend, ThumbnailParams};
use crate::naming::thumbnail_filename;
use crate::scan::list_picture_files;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Edge of the square target box.
    pub size: u32,
    /// Files decoded concurrently; also the batch length.
    pub batch_size: usize,
}

impl PipelineConfig {
    pub fn from_gallery_config(config: &GalleryConfig) -> Self {
        Self {
            source_dir: config.pictures_dir.clone(),
            output_dir: config.thumbnails_dir.clone(),
            size: config.thumbnails.size,
            batch_size: config.thumbnails.batch_size,
        }
    }
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started { total: usize, batches: usize },
    /// `index` is 1-based.
    BatchStarted {
        index: usize,
        total: usize,
        count: usize,
    },
    Generated { filename: String, output: PathBuf },
    Failed { filename: String, error: String },
}

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub batches: usize,
    pub generated: usize,
    pub failed: usize,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} failed in {} batch{}",
            self.generated,
            self.failed,
            self.batches,
            if self.batches == 1 { "" } else { "es" }
        )
    }
}

struct Job {
    filename: String,
    params: ThumbnailParams,
}

enum Outcome {
    Generated,
    Failed,
}

/// Generate thumbnails with the production backend.
pub fn run(
    config: &PipelineConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<PipelineSummary, ThumbnailError> {
    run_with_backend(&RustBackend::new(), config, events)
}

/// Generate thumbnails using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    config: &PipelineConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<PipelineSummary, ThumbnailError> {
    let emit = |event: PipelineEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening
            let _ = tx.send(event);
        }
    };

    let filenames = list_picture_files(&config.source_dir);
    if filenames.is_empty() {
        tracing::info!(
            dir = %config.source_dir.display(),
            "no pictures to thumbnail"
        );
        return Ok(PipelineSummary::default());
    }

    std::fs::create_dir_all(&config.output_dir)?;

    let (jobs, collisions) = build_jobs(&filenames, config);
    let batch_size = config.batch_size.max(1);
    let total_batches = jobs.len().div_ceil(batch_size);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(batch_size)
        .thread_name(|i| format!("thumbnail-{i}"))
        .build()?;

    emit(PipelineEvent::Started {
        total: jobs.len(),
        batches: total_batches,
    });

    let mut summary = PipelineSummary::default();
    for collision in collisions {
        summary.failed += 1;
        emit(PipelineEvent::Failed {
            filename: collision.filename,
            error: collision.error,
        });
    }

    for (i, batch) in jobs.chunks(batch_size).enumerate() {
        tracing::debug!(
            batch = i + 1,
            of = total_batches,
            files = batch.len(),
            "starting batch"
        );
        emit(PipelineEvent::BatchStarted {
            index: i + 1,
            total: total_batches,
            count: batch.len(),
        });

        // install() blocks until every file in the batch is done
        let outcomes: Vec<Outcome> = pool.install(|| {
            batch
                .par_iter()
                .map(|job| process_job(backend, job, &emit))
                .collect()
        });

        summary.batches += 1;
        for outcome in outcomes {
            match outcome {
                Outcome::Generated => summary.generated += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
    }

    tracing::info!(
        generated = summary.generated,
        failed = summary.failed,
        batches = summary.batches,
        "thumbnail generation complete"
    );
    Ok(summary)
}

/// A source left out because another picture owns its thumbnail path.
struct Collision {
    filename: String,
    error: String,
}

/// Build one job per distinct thumbnail path.
///
/// `foo.gif` and `foo.png` both map to `foo.png`. The picture whose own
/// name matches the thumbnail name keeps it; otherwise the first in filename
/// order does. The others are reported as collisions.
fn build_jobs(filenames: &[String], config: &PipelineConfig) -> (Vec<Job>, Vec<Collision>) {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for filename in filenames {
        let thumb = thumbnail_filename(filename);
        let claims = thumb == *filename;
        owners
            .entry(thumb)
            .and_modify(|owner| {
                if claims {
                    *owner = filename.as_str();
                }
            })
            .or_insert(filename.as_str());
    }

    let mut jobs = Vec::new();
    let mut collisions = Vec::new();
    for filename in filenames {
        let Some(format) = OutputFormat::for_source(filename) else {
            continue;
        };
        let thumb = thumbnail_filename(filename);
        let owner = owners.get(&thumb).copied().unwrap_or(filename.as_str());
        if owner != filename.as_str() {
            tracing::warn!(
                file = %filename,
                thumbnail = %thumb,
                owner = %owner,
                "thumbnail path already taken, skipping"
            );
            collisions.push(Collision {
                filename: filename.clone(),
                error: format!("thumbnail {thumb} is already generated from {owner}"),
            });
            continue;
        }
        jobs.push(Job {
            filename: filename.clone(),
            params: ThumbnailParams {
                source: config.source_dir.join(filename),
                output: thumbnail_path(&config.output_dir, filename),
                width: config.size,
                height: config.size,
                format,
                quality: Quality::default(),
            },
        });
    }
    (jobs, collisions)
}

fn process_job(
    backend: &impl ImageBackend,
    job: &Job,
    emit: &(impl Fn(PipelineEvent) + Sync),
) -> Outcome {
    let result = catch_unwind(AssertUnwindSafe(|| backend.thumbnail(&job.params)));
    let error = match result {
        Ok(Ok(())) => {
            tracing::debug!(
                file = %job.filename,
                format = job.params.format.label(),
                "thumbnail written"
            );
            emit(PipelineEvent::Generated {
                filename: job.filename.clone(),
                output: job.params.output.clone(),
            });
            return Outcome::Generated;
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => "image worker panicked".to_string(),
    };

    tracing::warn!(file = %job.filename, error = %error, "thumbnail generation failed");
    emit(PipelineEvent::Failed {
        filename: job.filename.clone(),
        error,
    });
    Outcome::Failed
}

/// Thumbnail path for a picture inside `output_dir`.
pub fn thumbnail_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(thumbnail_filename(filename))
}
