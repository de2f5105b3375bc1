use crate::api::models::TrendLabel;

/// Labels a monthly interest series by comparing the average of the last
/// three points against the three immediately preceding them. Averages
/// within 10% of each other are treated as noise and labelled stable.
pub fn classify(values: &[u32]) -> TrendLabel {
    let len = values.len();
    let recent = &values[len.saturating_sub(3)..];
    let older = &values[len.saturating_sub(6)..len.saturating_sub(3)];

    let recent_avg = window_mean(recent);
    let older_avg = window_mean(older);

    if recent_avg > older_avg * 1.1 {
        TrendLabel::Rising
    } else if recent_avg < older_avg * 0.9 {
        TrendLabel::Falling
    } else {
        TrendLabel::Stable
    }
}

// An empty window averages to 0 over a count of 1, never 0/0.
fn window_mean(window: &[u32]) -> f64 {
    let count = window.len().max(1);
    window.iter().map(|&value| f64::from(value)).sum::<f64>() / count as f64
}
