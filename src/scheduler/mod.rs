//! Background feed refresh.
//!
//! The [`Scheduler`] polls the job feeder on a fixed frequency and hands
//! the batch to a [`WorkerPool`], whose workers call a [`FeedRefresher`].

mod fetcher;
mod refresher;
mod worker;

pub use fetcher::{parse_feed, validate_url, FeedFetcher, ParsedFeed, ParsedItem};
pub use refresher::{entry_hash, HttpRefresher};
pub use worker::{FeedRefresher, WorkerPool};

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::storage::Storage;

/// Periodic producer of refresh jobs.
pub struct Scheduler {
    storage: Arc<Storage>,
    pool: WorkerPool,
    frequency: Duration,
    batch_size: u32,
}

impl Scheduler {
    pub fn new(storage: Arc<Storage>, pool: WorkerPool, config: &SchedulerConfig) -> Self {
        Self {
            storage,
            pool,
            frequency: Duration::from_secs(config.polling_frequency_secs.max(1)),
            batch_size: config.batch_size,
        }
    }

    /// Queue one batch of jobs. Returns the number of jobs queued.
    pub async fn run_once(&self) -> usize {
        let jobs = self.storage.get_jobs(self.batch_size).await;
        if jobs.is_empty() {
            debug!("[Scheduler] No feed to refresh");
            return 0;
        }

        let count = jobs.len();
        debug!("[Scheduler] Pushing {} jobs", count);
        if let Err(e) = self.pool.push(jobs).await {
            error!("[Scheduler] {}", e);
            return 0;
        }
        count
    }

    /// Run until [`SchedulerHandle::stop`] is called.
    pub fn spawn(self) -> SchedulerHandle {
        let (cancel_tx, mut cancel_rx) = broadcast::channel(1);

        let join = tokio::spawn(async move {
            info!(
                "Scheduler started (frequency: {}s, batch size: {}, workers: {})",
                self.frequency.as_secs(),
                self.batch_size,
                self.pool.size()
            );

            let mut ticker = interval(self.frequency);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        info!("Scheduler shutdown requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }

            self.pool.shutdown().await;
        });

        SchedulerHandle { cancel_tx, join }
    }
}

/// Handle of a spawned scheduler.
pub struct SchedulerHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop polling and wait for queued jobs to finish.
    pub async fn stop(self) {
        let _ = self.cancel_tx.send(());
        if let Err(e) = self.join.await {
            error!("Scheduler task failed: {}", e);
        }
    }
}

#[cfg(all(test, feature = "sqlite", not(feature = "postgres")))]
mod tests {
    use super::*;
    use crate::model::{Job, NewFeed, NewUser};
    use crate::Result;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct CountingRefresher {
        jobs: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl FeedRefresher for CountingRefresher {
        async fn refresh(&self, job: Job) -> Result<usize> {
            self.jobs.lock().await.push(job);
            Ok(0)
        }
    }

    fn config(batch_size: u32) -> SchedulerConfig {
        SchedulerConfig {
            enabled: true,
            polling_frequency_secs: 1,
            batch_size,
            workers: 2,
        }
    }

    #[tokio::test]
    async fn test_run_once_without_feeds() {
        let storage = Arc::new(Storage::open_in_memory().await.unwrap());
        let refresher = Arc::new(CountingRefresher::default());
        let scheduler = Scheduler::new(storage, WorkerPool::new(refresher, 2), &config(10));

        assert_eq!(scheduler.run_once().await, 0);
    }

    #[tokio::test]
    async fn test_run_once_dispatches_batch() {
        let storage = Arc::new(Storage::open_in_memory().await.unwrap());
        let user = storage.users().create(&NewUser::new("alice")).await.unwrap();
        let category = storage.categories().create(user.id, "All").await.unwrap();
        for i in 0..5 {
            storage
                .feeds()
                .create(&NewFeed::new(
                    user.id,
                    category.id,
                    format!("Feed {i}"),
                    format!("https://example.com/{i}.xml"),
                ))
                .await
                .unwrap();
        }

        let refresher = Arc::new(CountingRefresher::default());
        let scheduler = Scheduler::new(
            storage,
            WorkerPool::new(refresher.clone(), 2),
            &config(3),
        );

        assert_eq!(scheduler.run_once().await, 3);
        scheduler.pool.shutdown().await;
        assert_eq!(refresher.jobs.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_spawn_and_stop() {
        let storage = Arc::new(Storage::open_in_memory().await.unwrap());
        let refresher = Arc::new(CountingRefresher::default());
        let handle =
            Scheduler::new(storage, WorkerPool::new(refresher, 1), &config(10)).spawn();
        handle.stop().await;
    }
}
