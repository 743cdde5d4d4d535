//! `send`: post a track event on an interval and report how each went
//!
//! Meant to be pointed at a chaos server to watch client libraries or
//! proxies deal with stalls and error responses.

use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

/// What to send and how often
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub endpoint: String,
    pub write_key: String,
    pub event: String,
    pub user_id: String,
    pub interval: Duration,
    /// Stop after this many requests; run until interrupted when unset
    pub count: Option<u64>,
}

/// Totals for a sending run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl SendSummary {
    fn record(&mut self, success: bool) {
        self.sent += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// URL of the server-side track endpoint under `endpoint`
pub fn track_url(endpoint: &str) -> String {
    format!("{}/v1/track", endpoint.trim_end_matches('/'))
}

/// Body of one track call
pub fn track_event(event: &str, user_id: &str, at: DateTime<Utc>) -> Value {
    json!({
        "type": "track",
        "event": event,
        "userId": user_id,
        "timestamp": at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Send until `count` is reached or Ctrl+C is pressed
pub async fn run(client: &reqwest::Client, options: &SendOptions) -> SendSummary {
    let url = track_url(&options.endpoint);
    println!("Sending events to {url}");

    let mut ticker = interval(options.interval);
    // A stalled request must not be followed by a burst
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut summary = SendSummary::default();
    loop {
        if options.count.is_some_and(|count| summary.sent >= count) {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }

        let body = track_event(&options.event, &options.user_id, Utc::now());
        let started = Instant::now();
        let result = client
            .post(&url)
            .basic_auth(&options.write_key, None::<&str>)
            .json(&body)
            .send()
            .await;
        let elapsed = started.elapsed();

        match result {
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                println!(
                    "{} {} in {}ms {}",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    status.as_u16(),
                    elapsed.as_millis(),
                    text.trim()
                );
                summary.record(status.is_success());
            },
            Err(e) => {
                warn!(error = %e, elapsed_ms = elapsed.as_millis(), "Request failed");
                summary.record(false);
            },
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn track_url_joins_path() {
        assert_eq!(track_url("http://localhost:8080"), "http://localhost:8080/v1/track");
        assert_eq!(track_url("http://localhost:8080/"), "http://localhost:8080/v1/track");
    }

    #[test]
    fn event_body() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            track_event("Trace Tested", "Collin", at),
            json!({
                "type": "track",
                "event": "Trace Tested",
                "userId": "Collin",
                "timestamp": "2024-05-01T12:00:00.000Z",
            })
        );
    }

    #[test]
    fn summary_counts() {
        let mut summary = SendSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);
        assert_eq!(
            summary,
            SendSummary {
                sent: 3,
                succeeded: 2,
                failed: 1,
            }
        );
    }
}
