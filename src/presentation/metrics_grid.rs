// Metrics grid view model
use crate::domain::metrics::Metrics;
use crate::domain::training::ModelResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsGrid {
    pub total_requests: String,
    pub system_load: String,
    pub model_accuracy: String,
    pub model_status: String,
    pub privacy_audits: String,
    pub privacy_score: String,
}

impl MetricsGrid {
    pub fn build(metrics: &Metrics, result: Option<&ModelResult>) -> Self {
        let or = |value: &str, fallback: &str| {
            if value.trim().is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            total_requests: group_thousands(metrics.requests),
            system_load: or(&metrics.cpu, "0%"),
            model_accuracy: result.map_or_else(|| "--%".to_string(), |r| r.accuracy.clone()),
            model_status: result.map_or_else(|| "Idle".to_string(), |r| r.status.clone()),
            privacy_audits: metrics.privacy_audits.to_string(),
            privacy_score: result.map_or_else(|| "N/A".to_string(), |r| or(&r.privacy_score, "N/A")),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
