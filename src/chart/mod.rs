// Turns a histogram payload into a drawable chart description
use crate::error::MaipError;
use crate::models::{Bar, ChartSpec, HistogramData, ThresholdLine};

pub const CHART_TITLE: &str = "This is the distribution plot of your predicted scores";
pub const X_AXIS_TITLE: &str = "Model score";
pub const Y_AXIS_TITLE: &str = "Proportion of data";

/// Parse a raw `hist_data.json` payload and render it. Missing or
/// mis-shaped fields are a [`MaipError::MalformedResult`].
pub fn render(payload: &serde_json::Value) -> Result<ChartSpec, MaipError> {
    let data: HistogramData = serde_json::from_value(payload.clone())
        .map_err(|e| MaipError::MalformedResult(e.to_string()))?;
    Ok(render_histogram(&data))
}

/// Pure transformation: one bar per score bin (rounded for display),
/// one labeled marker line per threshold.
pub fn render_histogram(data: &HistogramData) -> ChartSpec {
    let bars = data
        .values
        .iter()
        .map(|&(bin, frequency)| Bar {
            bin: bin.round() as i64,
            frequency,
        })
        .collect();

    let threshold_lines = [
        (data.t1, "1% threshold"),
        (data.t10, "10% threshold"),
        (data.t50, "50% threshold"),
    ]
    .into_iter()
    .map(|(x, label)| ThresholdLine {
        x,
        label: label.to_string(),
    })
    .collect();

    ChartSpec {
        title: CHART_TITLE.to_string(),
        x_axis_title: X_AXIS_TITLE.to_string(),
        y_axis_title: Y_AXIS_TITLE.to_string(),
        bars,
        threshold_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_bars_thresholds_and_titles() {
        let payload = json!({
            "values": [[10, 5], [20, 15], [30, 2]],
            "t1": 28,
            "t10": 22,
            "t50": 12
        });
        let chart = render(&payload).unwrap();

        assert_eq!(chart.bars.len(), 3);
        assert_eq!(
            chart.bars,
            vec![
                Bar { bin: 10, frequency: 5.0 },
                Bar { bin: 20, frequency: 15.0 },
                Bar { bin: 30, frequency: 2.0 },
            ]
        );
        assert_eq!(
            chart.threshold_lines,
            vec![
                ThresholdLine { x: 28.0, label: "1% threshold".to_string() },
                ThresholdLine { x: 22.0, label: "10% threshold".to_string() },
                ThresholdLine { x: 12.0, label: "50% threshold".to_string() },
            ]
        );
        assert_eq!(chart.x_axis_title, "Model score");
        assert_eq!(chart.y_axis_title, "Proportion of data");
        assert_eq!(chart.title, CHART_TITLE);
    }

    #[test]
    fn fractional_bins_are_rounded_for_display() {
        let payload = json!({
            "values": [[9.6, 1.0], [10.4, 2.0]],
            "t1": 1, "t10": 1, "t50": 1
        });
        let chart = render(&payload).unwrap();
        assert_eq!(chart.bars[0].bin, 10);
        assert_eq!(chart.bars[1].bin, 10);
    }

    #[test]
    fn missing_threshold_is_malformed() {
        let payload = json!({
            "values": [[10, 5]],
            "t10": 22,
            "t50": 12
        });
        assert!(matches!(
            render(&payload),
            Err(MaipError::MalformedResult(_))
        ));
    }

    #[test]
    fn missing_values_is_malformed() {
        let payload = json!({"t1": 28, "t10": 22, "t50": 12});
        assert!(matches!(
            render(&payload),
            Err(MaipError::MalformedResult(_))
        ));
    }

    #[test]
    fn mis_shaped_values_are_malformed() {
        let payload = json!({
            "values": [[10, 5, 99], "oops"],
            "t1": 28, "t10": 22, "t50": 12
        });
        assert!(matches!(
            render(&payload),
            Err(MaipError::MalformedResult(_))
        ));
    }
}
