/// Chart points for a sample history: one point per sampling interval.
pub fn sample_points(samples: &[u32]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &wpm)| (i as f64, wpm as f64))
        .collect()
}

/// Compute X (samples) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[u32]) -> (f64, f64) {
    let highest_wpm = samples.iter().copied().max().unwrap_or(0) as f64;

    // ratatui needs a non-degenerate x range
    let overall_duration = (samples.len().saturating_sub(1) as f64).max(1.0);

    (overall_duration, highest_wpm)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
