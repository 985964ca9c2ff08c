// HTTP client for the ChEMBL delayed-jobs service
mod multipart;

use crate::error::MaipError;
use crate::models::{JobStatus, SubmissionOptions, SubmittedJob, JOB_ID_PREFIX};
use log::{debug, warn};
use multipart::MultipartForm;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.ebi.ac.uk/chembl/interface_api/delayed_jobs";

const REQUEST_TIMEOUT_SECS: u64 = 120;

pub struct MaipClient {
    base_url: String,
    agent: ureq::Agent,
}

impl Default for MaipClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MaipClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build();
        Self { base_url, agent }
    }

    /// Submit a prediction job. One attempt only; the caller surfaces
    /// the error rather than retrying a possibly accepted upload.
    pub fn submit(
        &self,
        file_name: &str,
        content: &[u8],
        options: &SubmissionOptions,
    ) -> Result<SubmittedJob, MaipError> {
        let mut form = MultipartForm::new();
        form.text("standardise", bool_field(options.standardise));
        form.text("dl__ignore_cache", bool_field(options.ignore_cache));
        form.file("input1", file_name, "text/csv", content);
        let (content_type, body) = form.finish();

        let url = format!("{}/submit/mmv_job", self.base_url);
        debug!("Submitting {} ({} bytes) to {}", file_name, content.len(), url);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
            .map_err(|e| MaipError::Submission(describe_ureq_error(e)))?;

        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| MaipError::Submission(format!("unreadable response: {}", e)))?;
        let submitted = parse_submit_response(payload)?;

        if !submitted.job_id.starts_with(JOB_ID_PREFIX) {
            warn!(
                "Service returned job id {:?} without the {} prefix",
                submitted.job_id, JOB_ID_PREFIX
            );
        }
        Ok(submitted)
    }

    /// One status query. Retrying on failure is the poll loop's call.
    pub fn job_status(&self, job_id: &str) -> Result<JobStatus, MaipError> {
        let url = format!("{}/status/{}", self.base_url, job_id);
        let response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::Status(404, _) => MaipError::StatusQuery(format!(
                "job {} not found; jobs are only retained for 7 days",
                job_id
            )),
            other => MaipError::StatusQuery(describe_ureq_error(other)),
        })?;

        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| MaipError::StatusQuery(format!("unreadable response: {}", e)))?;
        parse_status_payload(payload)
    }

    /// Fetch an output file URL as JSON (the histogram payload).
    pub fn fetch_output_json(&self, raw_url: &str) -> Result<serde_json::Value, MaipError> {
        let url = normalize_output_url(raw_url)?;
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| MaipError::StatusQuery(describe_ureq_error(e)))?;
        response
            .into_json()
            .map_err(|e| MaipError::StatusQuery(format!("unreadable output file: {}", e)))
    }
}

fn bool_field(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_submit_response(payload: serde_json::Value) -> Result<SubmittedJob, MaipError> {
    serde_json::from_value(payload)
        .map_err(|e| MaipError::Submission(format!("response missing job id: {}", e)))
}

fn parse_status_payload(payload: serde_json::Value) -> Result<JobStatus, MaipError> {
    serde_json::from_value(payload)
        .map_err(|e| MaipError::StatusQuery(format!("unexpected status payload: {}", e)))
}

/// Output file URLs come back from the service without a scheme
/// (`www.ebi.ac.uk/...`); make them absolute before fetching.
pub fn normalize_output_url(raw: &str) -> Result<Url, MaipError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", raw))
            .map_err(|e| MaipError::StatusQuery(format!("bad output file url {:?}: {}", raw, e))),
        Err(e) => Err(MaipError::StatusQuery(format!(
            "bad output file url {:?}: {}",
            raw, e
        ))),
    }
}

fn describe_ureq_error(error: ureq::Error) -> String {
    match error {
        ureq::Error::Status(code, response) => {
            let body = response
                .into_string()
                .unwrap_or_else(|_| "unknown error".to_string());
            format!("server error {}: {}", code, body)
        }
        transport => transport.to_string(),
    }
}
