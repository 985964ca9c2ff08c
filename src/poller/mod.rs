// Bounded, cancellable polling of a submitted job
use crate::error::MaipError;
use crate::maip::MaipClient;
use crate::models::{JobPhase, JobStatus};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Where status responses come from. The real source is
/// [`crate::maip::MaipClient`]; tests script their own sequences.
pub trait StatusSource {
    fn job_status(&self, job_id: &str) -> Result<JobStatus, MaipError>;
}

impl StatusSource for MaipClient {
    fn job_status(&self, job_id: &str) -> Result<JobStatus, MaipError> {
        MaipClient::job_status(self, job_id)
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        // 2 s cadence, ~30 min total budget.
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 900,
        }
    }
}

/// Query the job status until it reaches FINISHED, a terminal failure,
/// the attempt budget, or cancellation. `on_status` runs after every
/// successful query so the caller can surface progress.
///
/// Statuses the service never documented are treated as failures
/// rather than "keep waiting"; an infinite watch on a dead job helps
/// nobody.
pub async fn poll_until_finished<S, F>(
    source: &S,
    job_id: &str,
    config: &PollConfig,
    cancel: &AtomicBool,
    mut on_status: F,
) -> Result<JobStatus, MaipError>
where
    S: StatusSource,
    F: FnMut(&JobStatus),
{
    for attempt in 1..=config.max_attempts {
        if cancel.load(Ordering::SeqCst) {
            info!("Watch for job {} cancelled", job_id);
            return Err(MaipError::Cancelled(job_id.to_string()));
        }

        let status = source.job_status(job_id)?;
        on_status(&status);

        match status.phase() {
            JobPhase::Finished => {
                info!("Job {} finished after {} status checks", job_id, attempt);
                return Ok(status);
            }
            JobPhase::Failed => {
                warn!("Job {} reported terminal status {}", job_id, status.status);
                return Err(MaipError::JobFailed {
                    job_id: job_id.to_string(),
                    status: status.status,
                });
            }
            JobPhase::Waiting => {
                debug!(
                    "Job {} still {} (check {}/{})",
                    job_id, status.status, attempt, config.max_attempts
                );
                if attempt < config.max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }

    Err(MaipError::JobTimedOut {
        job_id: job_id.to_string(),
        attempts: config.max_attempts,
    })
}
