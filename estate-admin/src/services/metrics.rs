use metrics::{counter, histogram};
use reqwest::{Method, StatusCode};
use std::time::Duration;

pub fn record_request(method: &Method, path: &str, status: StatusCode, elapsed: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_template(path)),
        ("status", status.as_u16().to_string()),
    ];

    counter!("api_requests_total", &labels).increment(1);
    histogram!("api_request_duration_seconds", &labels).record(elapsed.as_secs_f64());
}

/// Collapse numeric path segments so `/countries/42/` is labelled
/// `/countries/{id}/` and each resource keeps a bounded label set.
fn route_template(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, Copy)]
pub enum RefreshOutcome {
    Renewed,
    MissingToken,
    Rejected,
}

impl RefreshOutcome {
    fn as_str(self) -> &'static str {
        match self {
            RefreshOutcome::Renewed => "renewed",
            RefreshOutcome::MissingToken => "missing_token",
            RefreshOutcome::Rejected => "rejected",
        }
    }
}

pub fn record_refresh(outcome: RefreshOutcome) {
    counter!("token_refresh_total", "outcome" => outcome.as_str()).increment(1);
}
