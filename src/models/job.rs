// Job data models for the delayed-jobs service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Job identifiers issued by the service carry this prefix. The id is
/// otherwise opaque; nothing beyond the prefix is ever parsed out.
pub const JOB_ID_PREFIX: &str = "MMV-";

/// Per-submission flags. Not persisted; they only shape one request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SubmissionOptions {
    pub standardise: bool,
    pub ignore_cache: bool,
}

/// Successful submit response. The service returns more fields but
/// the job id is the only handle the client ever needs.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedJob {
    pub job_id: String,
}

/// One status response. `status` is kept as the raw string the service
/// sent; its vocabulary is open-ended, so classification lives in
/// [`JobStatus::phase`] rather than in a closed enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: String,
    #[serde(default)]
    pub output_files_urls: HashMap<String, String>,
}

/// How the poll loop should react to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Not terminal, keep polling.
    Waiting,
    Finished,
    /// Terminal and not FINISHED. Unrecognized statuses land here too:
    /// waiting forever on a status we cannot interpret is worse than
    /// surfacing it.
    Failed,
}

impl JobStatus {
    pub fn phase(&self) -> JobPhase {
        match self.status.as_str() {
            "FINISHED" => JobPhase::Finished,
            "PENDING" | "CREATED" | "QUEUED" | "RUNNING" => JobPhase::Waiting,
            _ => JobPhase::Failed,
        }
    }
}

/// A locally tracked submission, as listed in the browse view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedJob {
    pub job_id: String,
    pub filename: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_is_terminal_success() {
        let status = JobStatus {
            status: "FINISHED".to_string(),
            output_files_urls: HashMap::new(),
        };
        assert_eq!(status.phase(), JobPhase::Finished);
    }

    #[test]
    fn lifecycle_statuses_keep_waiting() {
        for s in ["PENDING", "CREATED", "QUEUED", "RUNNING"] {
            let status = JobStatus {
                status: s.to_string(),
                output_files_urls: HashMap::new(),
            };
            assert_eq!(status.phase(), JobPhase::Waiting, "status {}", s);
        }
    }

    #[test]
    fn error_and_unknown_statuses_are_failures() {
        for s in ["ERROR", "FAILED", "SOMETHING_NEW"] {
            let status = JobStatus {
                status: s.to_string(),
                output_files_urls: HashMap::new(),
            };
            assert_eq!(status.phase(), JobPhase::Failed, "status {}", s);
        }
    }

    #[test]
    fn output_files_default_to_empty() {
        let status: JobStatus = serde_json::from_str(r#"{"status": "RUNNING"}"#).unwrap();
        assert!(status.output_files_urls.is_empty());
    }
}
