/// Batch rendering queue
use crate::error::Result;
use crate::services::{RenderService, RenderedTrack};
use lofi_audio::RenderRequest;
use serde::Serialize;
use std::{
    collections::{HashSet, VecDeque},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;

/// Extensions picked up when a directory is given as input
pub const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac", "webm"];

#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Position in the submitted batch; the report keeps this order
    pub index: usize,
    pub request: RenderRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedTrack {
    pub input: PathBuf,
    pub error: String,
}

/// Per-track results of a batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub rendered: Vec<RenderedTrack>,
    pub failed: Vec<FailedTrack>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum JobResult {
    Rendered(RenderedTrack),
    Failed(FailedTrack),
}

/// Everything enqueued so far, indexed by job
#[derive(Default)]
struct Submitted {
    inputs: Vec<PathBuf>,
    /// Output names already taken, lower-cased and joined to their directory
    names: HashSet<PathBuf>,
}

/// Fixed-size pool of workers draining a shared queue of tracks.
///
/// Tracks share nothing; a failing track is recorded and the workers move
/// on to the next one. No two jobs in one batch write the same file.
pub struct BatchQueue {
    queue: Arc<Mutex<VecDeque<BatchJob>>>,
    renderer: Arc<RenderService>,
    workers: usize,
    submitted: Mutex<Submitted>,
    results: Mutex<Vec<(usize, JobResult)>>,
}

impl BatchQueue {
    pub fn new(renderer: Arc<RenderService>, workers: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            renderer,
            workers: workers.max(1),
            submitted: Mutex::new(Submitted::default()),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Enqueue a render job
    ///
    /// If an earlier job already writes to the same output name, this one
    /// is renamed `"<name> (2)"`, `"<name> (3)"`, and so on.
    pub async fn enqueue(&self, mut request: RenderRequest) {
        let index = {
            let mut submitted = self.submitted.lock().await;
            let base = request.output_name.clone();
            let mut copy = 1;
            while !submitted.names.insert(name_key(&request)) {
                copy += 1;
                request.output_name = format!("{base} ({copy})");
            }
            if copy > 1 {
                tracing::warn!(
                    "{} would overwrite another track's output, writing it as \"{}\"",
                    request.input.display(),
                    request.output_name
                );
            }
            submitted.inputs.push(request.input.clone());
            submitted.inputs.len() - 1
        };

        let mut queue = self.queue.lock().await;
        tracing::debug!("Enqueued {} as job {}", request.input.display(), index);
        queue.push_back(BatchJob { index, request });
    }

    /// Get queue length
    pub async fn queue_length(&self) -> usize {
        let queue = self.queue.lock().await;
        queue.len()
    }

    /// Run workers until the queue is empty and collect the results
    pub async fn run(self: Arc<Self>) -> BatchReport {
        let pending = self.queue_length().await;
        let workers = self.workers.min(pending).max(1);
        tracing::info!("Rendering {} tracks with {} workers", pending, workers);

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let queue = Arc::clone(&self);
            handles.push(tokio::spawn(async move { queue.worker_loop(worker_id).await }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Batch worker panicked: {}", e);
            }
        }

        let results = std::mem::take(&mut *self.results.lock().await);
        let inputs = self.submitted.lock().await.inputs.clone();
        let report = assemble_report(&inputs, results);

        tracing::info!(
            "Batch finished: {} rendered, {} failed",
            report.rendered.len(),
            report.failed.len()
        );
        report
    }

    /// Worker loop - processes jobs until the queue is drained
    async fn worker_loop(&self, worker_id: usize) {
        loop {
            let job = {
                let mut queue = self.queue.lock().await;
                queue.pop_front()
            };
            let Some(job) = job else { break };

            let input = job.request.input.clone();
            tracing::info!("Worker {} processing {}", worker_id, input.display());

            let result = match self.renderer.render(job.request).await {
                Ok(track) => JobResult::Rendered(track),
                Err(e) => {
                    tracing::error!("Worker {} failed on {}: {}", worker_id, input.display(), e);
                    JobResult::Failed(FailedTrack {
                        input,
                        error: e.to_string(),
                    })
                }
            };
            self.results.lock().await.push((job.index, result));
        }
    }
}

fn name_key(request: &RenderRequest) -> PathBuf {
    request.output_dir.join(request.output_name.to_lowercase())
}

/// Order results by submission; a job that never reported back is failed
fn assemble_report(inputs: &[PathBuf], mut results: Vec<(usize, JobResult)>) -> BatchReport {
    results.sort_by_key(|(index, _)| *index);

    let mut report = BatchReport::default();
    let mut results = results.into_iter().peekable();
    for (index, input) in inputs.iter().enumerate() {
        match results.next_if(|(done, _)| *done == index) {
            Some((_, JobResult::Rendered(track))) => report.rendered.push(track),
            Some((_, JobResult::Failed(track))) => report.failed.push(track),
            None => report.failed.push(FailedTrack {
                input: input.clone(),
                error: "worker stopped before finishing this track".to_string(),
            }),
        }
    }
    report
}

/// Expand inputs into a list of tracks.
///
/// Files are taken as given (missing ones fail later, per track).
/// Directories contribute their audio files, non-recursively, sorted by name.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut tracks = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && is_audio_file(&path) {
                    found.push(path);
                }
            }
            found.sort();
            tracing::debug!("Found {} tracks in {}", found.len(), input.display());
            tracks.extend(found);
        } else {
            tracks.push(input.clone());
        }
    }

    Ok(tracks)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
