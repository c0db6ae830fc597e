//! Background job that force-closes overdue live sessions

use anyhow::Result;
use common::clock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::repositories::SessionRepository;

/// Periodically closes live sessions whose absent cutoff has elapsed.
/// The close is conditioned on `status = 'live'`, so a sweep racing a
/// manual end results in exactly one effective transition.
#[derive(Clone)]
pub struct SessionSweeper {
    session_repository: SessionRepository,
}

impl SessionSweeper {
    pub fn new(session_repository: SessionRepository) -> Self {
        Self { session_repository }
    }

    /// One sweep over the live sessions. Returns how many were closed.
    pub async fn tick(&self) -> Result<usize> {
        let now = clock::time_of_day(&clock::now());
        let closed = self.session_repository.close_overdue(now).await?;

        for session_id in &closed {
            info!("Auto-ended session {} at {}", session_id, now);
        }

        Ok(closed.len())
    }

    /// Start the sweep scheduler. A failed tick is logged and swallowed;
    /// the next tick picks up whatever the failed one missed.
    pub async fn start(&self, schedule: &str) -> Result<()> {
        let sweeper = self.clone();

        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(schedule, move |_, _| {
            let sweeper = sweeper.clone();
            Box::pin(async move {
                if let Err(e) = sweeper.tick().await {
                    error!("Session sweep failed: {}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Started session sweeper with schedule: {}", schedule);
        Ok(())
    }
}
