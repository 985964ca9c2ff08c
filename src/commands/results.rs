// Results command handlers for finished jobs
use crate::chart;
use crate::maip::{normalize_output_url, MaipClient};
use crate::models::{benchmark_rows, JobPhase, ResultsView};
use crate::tracker::JobTracker;
use log::info;

const BENCHMARKS_DOCS_URL: &str =
    "https://chembl.gitbook.io/malaria-project/using-maip-results";

/// Assemble the results view for a finished job: predictions download
/// link, score distribution chart and the static validation-set table.
#[tauri::command]
pub fn fetch_results(job_id: String) -> Result<ResultsView, String> {
    let client = MaipClient::default();
    let status = client.job_status(&job_id).map_err(|e| e.to_string())?;

    if status.phase() != JobPhase::Finished {
        return Err(format!(
            "Job {} is not finished yet (status {})",
            job_id, status.status
        ));
    }

    let predictions_raw = status
        .output_files_urls
        .get("predictions.csv")
        .ok_or_else(|| format!("Job {} results are missing predictions.csv", job_id))?;
    let predictions_url = normalize_output_url(predictions_raw)
        .map_err(|e| e.to_string())?
        .to_string();

    let hist_raw = status
        .output_files_urls
        .get("hist_data.json")
        .ok_or_else(|| format!("Job {} results are missing hist_data.json", job_id))?;
    let payload = client.fetch_output_json(hist_raw).map_err(|e| e.to_string())?;
    let chart = chart::render(&payload).map_err(|e| e.to_string())?;

    let filename = JobTracker::open_default()
        .find(&job_id)
        .map_err(|e| e.to_string())?
        .map(|job| job.filename);

    info!("Assembled results view for job {}", job_id);
    Ok(ResultsView {
        job_id,
        filename,
        predictions_url,
        chart,
        benchmarks: benchmark_rows(),
        benchmarks_docs_url: BENCHMARKS_DOCS_URL.to_string(),
    })
}
