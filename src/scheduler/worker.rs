//! Fixed-size pool of refresh workers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::model::Job;
use crate::{FeedDeckError, Result};

/// Refreshes one feed. Returns the number of new entries.
#[async_trait]
pub trait FeedRefresher: Send + Sync {
    async fn refresh(&self, job: Job) -> Result<usize>;
}

/// Bounded job queue drained by `N` worker tasks.
pub struct WorkerPool {
    queue: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` tasks calling `refresher` for each queued job.
    pub fn new(refresher: Arc<dyn FeedRefresher>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (queue, receiver) = mpsc::channel::<Job>(workers * 2);
        let receiver = Arc::new(Mutex::new(receiver));

        let handles = (0..workers)
            .map(|worker_id| {
                let receiver = Arc::clone(&receiver);
                let refresher = Arc::clone(&refresher);
                tokio::spawn(async move {
                    debug!("[Worker #{}] Started", worker_id);
                    loop {
                        // Hold the lock only while waiting for the next job.
                        let job = receiver.lock().await.recv().await;
                        let Some(job) = job else {
                            break;
                        };

                        debug!(
                            "[Worker #{}] Refreshing feed #{} for user #{}",
                            worker_id, job.feed_id, job.user_id
                        );
                        match refresher.refresh(job).await {
                            Ok(0) => {}
                            Ok(count) => {
                                info!("Feed #{} refreshed: {} new entries", job.feed_id, count)
                            }
                            Err(e) => error!("Unable to refresh feed #{}: {}", job.feed_id, e),
                        }
                    }
                    debug!("[Worker #{}] Stopped", worker_id);
                })
            })
            .collect();

        Self {
            queue,
            workers: handles,
        }
    }

    /// Number of worker tasks.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue jobs, waiting while the queue is full.
    pub async fn push(&self, jobs: Vec<Job>) -> Result<()> {
        for job in jobs {
            debug!("[WorkerPool] Job #{} received", job.feed_id);
            self.queue
                .send(job)
                .await
                .map_err(|_| FeedDeckError::Fetch("worker pool is closed".to_string()))?;
        }
        Ok(())
    }

    /// Stop accepting jobs and wait for the workers to drain the queue.
    pub async fn shutdown(self) {
        drop(self.queue);
        for handle in self.workers {
            if let Err(e) = handle.await {
                error!("Worker task failed: {}", e);
            }
        }
    }
}
