// Job command handlers: submit, browse, watch
use crate::maip::MaipClient;
use crate::models::{JobStatus, SubmissionOptions, TrackedJob};
use crate::poller::{poll_until_finished, PollConfig};
use crate::tracker::JobTracker;
use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tauri::{AppHandle, Emitter};

// Cancellation flags for in-flight watches, keyed by job id
lazy_static::lazy_static! {
    static ref ACTIVE_WATCHES: Mutex<HashMap<String, Arc<AtomicBool>>> =
        Mutex::new(HashMap::new());
}

/// Payload for `job:status` events emitted while watching
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusEvent {
    pub job_id: String,
    pub status: String,
}

/// Submit the uploaded CSV for prediction and track the returned job.
#[tauri::command]
pub async fn submit_job(
    file_name: String,
    content: Vec<u8>,
    standardise: bool,
    ignore_cache: bool,
) -> Result<serde_json::Value, String> {
    if !csv_has_required_columns(&content) {
        return Err("Input file must be a CSV with 'id' and 'smiles' columns".to_string());
    }

    let options = SubmissionOptions {
        standardise,
        ignore_cache,
    };
    let client = MaipClient::default();
    let submitted = client
        .submit(&file_name, &content, &options)
        .map_err(|e| e.to_string())?;

    let tracker = JobTracker::open_default();
    tracker
        .record(&submitted.job_id, &file_name, chrono::Utc::now())
        .map_err(|e| e.to_string())?;

    info!("Submitted job {} for {}", submitted.job_id, file_name);
    Ok(serde_json::json!({ "job_id": submitted.job_id }))
}

/// Previously submitted jobs, newest first, for the browse view.
#[tauri::command]
pub fn list_jobs() -> Result<Vec<TrackedJob>, String> {
    let tracker = JobTracker::open_default();
    tracker.known_jobs().map_err(|e| e.to_string())
}

/// One status query, for a manual refresh.
#[tauri::command]
pub fn get_job_status(job_id: String) -> Result<JobStatus, String> {
    let client = MaipClient::default();
    client.job_status(&job_id).map_err(|e| e.to_string())
}

/// Watch a job until it finishes, fails, times out or is cancelled.
/// Emits `job:status` on every poll and `job:finished` / `job:failed`
/// at the end, then returns the final status.
#[tauri::command]
pub async fn watch_job(app: AppHandle, job_id: String) -> Result<JobStatus, String> {
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let mut watches = ACTIVE_WATCHES.lock();
        if watches.contains_key(&job_id) {
            return Err(format!("Already watching job {}", job_id));
        }
        watches.insert(job_id.clone(), cancel.clone());
    }

    let client = MaipClient::default();
    let config = PollConfig::default();
    let status_app = app.clone();
    let status_job_id = job_id.clone();

    let result = poll_until_finished(&client, &job_id, &config, &cancel, |status| {
        let _ = status_app.emit(
            "job:status",
            JobStatusEvent {
                job_id: status_job_id.clone(),
                status: status.status.clone(),
            },
        );
    })
    .await;

    ACTIVE_WATCHES.lock().remove(&job_id);

    match result {
        Ok(status) => {
            let _ = app.emit(
                "job:finished",
                serde_json::json!({
                    "job_id": job_id,
                    "output_files_urls": status.output_files_urls
                }),
            );
            Ok(status)
        }
        Err(e) => {
            let message = e.to_string();
            warn!("Watch for job {} ended with error: {}", job_id, message);
            let _ = app.emit(
                "job:failed",
                serde_json::json!({ "job_id": job_id, "error": message }),
            );
            Err(message)
        }
    }
}

/// Abort an in-flight watch. Unknown job ids are not an error.
#[tauri::command]
pub fn cancel_watch(job_id: String) -> Result<(), String> {
    if let Some(cancel) = ACTIVE_WATCHES.lock().get(&job_id) {
        cancel.store(true, Ordering::SeqCst);
        info!("Cancelling watch for job {}", job_id);
    }
    Ok(())
}

/// The input format requires `id` and `smiles` columns; catch files
/// that cannot possibly be valid before uploading them.
fn csv_has_required_columns(content: &[u8]) -> bool {
    let Some(first_line) = content.split(|&b| b == b'\n').next() else {
        return false;
    };
    let header = String::from_utf8_lossy(first_line).to_lowercase();
    let mut has_id = false;
    let mut has_smiles = false;
    for column in header.split(',') {
        match column.trim().trim_matches('"') {
            "id" => has_id = true,
            "smiles" => has_smiles = true,
            _ => {}
        }
    }
    has_id && has_smiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_csv_with_id_and_smiles_columns() {
        assert!(csv_has_required_columns(b"id,smiles\n1,CCO\n"));
        assert!(csv_has_required_columns(b"smiles,id\nCCO,1\n"));
        assert!(csv_has_required_columns(b"ID,SMILES\r\n1,CCO\r\n"));
        assert!(csv_has_required_columns(b"\"id\",\"smiles\"\n1,CCO\n"));
    }

    #[test]
    fn rejects_files_missing_either_column() {
        assert!(!csv_has_required_columns(b"id,structure\n1,CCO\n"));
        assert!(!csv_has_required_columns(b"name,smiles\nfoo,CCO\n"));
        assert!(!csv_has_required_columns(b""));
    }
}
