// Result data models: histogram payload, chart description, benchmarks
use serde::{Deserialize, Serialize};

/// The `hist_data.json` payload of a finished job: (score bin, frequency)
/// pairs plus the three score cutoffs for the top 1% / 10% / 50% of
/// predictions.
#[derive(Debug, Clone, Deserialize)]
pub struct HistogramData {
    pub values: Vec<(f64, f64)>,
    pub t1: f64,
    pub t10: f64,
    pub t50: f64,
}

/// One bar of the score distribution plot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub bin: i64,
    pub frequency: f64,
}

/// A labeled vertical marker line at a threshold score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThresholdLine {
    pub x: f64,
    pub label: String,
}

/// Chart description handed to the webview for drawing.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub bars: Vec<Bar>,
    pub threshold_lines: Vec<ThresholdLine>,
}

/// One row of the static validation-set table shown next to results.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRow {
    pub validation_set: String,
    pub roc_auc: f64,
    pub ef_1: String,
    pub ef_10: String,
    pub ef_50: String,
}

/// Published model performance on the three validation sets. Reference
/// data, not computed by this application.
pub fn benchmark_rows() -> Vec<BenchmarkRow> {
    vec![
        BenchmarkRow {
            validation_set: "MMV test set".to_string(),
            roc_auc: 0.67,
            ef_1: "3.5 (60)".to_string(),
            ef_10: "2.1 (41)".to_string(),
            ef_50: "1.4 (23)".to_string(),
        },
        BenchmarkRow {
            validation_set: "PubChem".to_string(),
            roc_auc: 0.69,
            ef_1: "7.0 (56)".to_string(),
            ef_10: "2.8 (47)".to_string(),
            ef_50: "1.5 (34)".to_string(),
        },
        BenchmarkRow {
            validation_set: "St. Jude Screening Set".to_string(),
            roc_auc: 0.81,
            ef_1: "12.1 (71)".to_string(),
            ef_10: "4.8 (36)".to_string(),
            ef_50: "1.8 (15)".to_string(),
        },
    ]
}

/// Everything the results view needs for one finished job.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub job_id: String,
    /// Originating filename, when the job is in the local registry.
    pub filename: Option<String>,
    pub predictions_url: String,
    pub chart: ChartSpec,
    pub benchmarks: Vec<BenchmarkRow>,
    pub benchmarks_docs_url: String,
}
