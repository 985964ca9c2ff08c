// Error taxonomy shared by the protocol modules
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaipError {
    /// The submit request could not be delivered or the response
    /// carried no job id. Submissions are single-attempt.
    #[error("submission failed: {0}")]
    Submission(String),

    /// A status query failed at the transport level or returned an
    /// unparsable payload. The poll loop decides whether to retry.
    #[error("status query failed: {0}")]
    StatusQuery(String),

    /// The poll budget ran out before the job reached FINISHED.
    #[error("job {job_id} still not finished after {attempts} status checks")]
    JobTimedOut { job_id: String, attempts: u32 },

    /// The service reported a terminal non-FINISHED status.
    #[error("job {job_id} failed with status {status}")]
    JobFailed { job_id: String, status: String },

    /// The histogram payload is missing expected fields.
    #[error("malformed result payload: {0}")]
    MalformedResult(String),

    /// The local job registry could not be read or written.
    #[error("job registry error: {0}")]
    Storage(String),

    /// The watch was aborted by the user or by navigation.
    #[error("watch for job {0} was cancelled")]
    Cancelled(String),
}
