//! Refresh job feeder.

use futures::TryStreamExt;
use sqlx::Row;
use tracing::error;

use super::sql::{build_query, QueryArg, Statement};
use super::Storage;
use crate::model::{Job, MAX_PARSING_ERROR};
use crate::timer::ExecutionTimer;

/// Upper bound of the preallocated job buffer.
const JOBS_CAPACITY_HINT: u32 = 1024;

/// Statement selecting the `batch_size` least recently checked feeds that
/// are still under the parsing error threshold.
pub fn jobs_statement(batch_size: u32) -> Statement {
    Statement::new(
        format!(
            "SELECT id, user_id FROM feeds WHERE parsing_error_count < $1 ORDER BY checked_at ASC LIMIT {batch_size}"
        ),
        vec![QueryArg::from(MAX_PARSING_ERROR)],
    )
}

impl Storage {
    /// Return a batch of refresh jobs.
    ///
    /// Never fails: driver errors are logged and the jobs decoded so far
    /// are returned.
    pub async fn get_jobs(&self, batch_size: u32) -> Vec<Job> {
        let _timer = ExecutionTimer::start(format!("[Storage:GetJobs] batchSize={batch_size}"));

        let statement = jobs_statement(batch_size);
        let mut rows = build_query(&statement).fetch(self.pool());
        let mut jobs = Vec::with_capacity(batch_size.min(JOBS_CAPACITY_HINT) as usize);

        loop {
            match rows.try_next().await {
                Ok(Some(row)) => {
                    let job = row
                        .try_get::<i64, _>(0)
                        .and_then(|feed_id| Ok((feed_id, row.try_get::<i64, _>(1)?)));
                    match job {
                        Ok((feed_id, user_id)) => jobs.push(Job { feed_id, user_id }),
                        Err(e) => {
                            error!("Unable to fetch job row: {}", e);
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Unable to fetch jobs: {}", e);
                    break;
                }
            }
        }

        jobs
    }
}
