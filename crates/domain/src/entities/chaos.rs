//! Weighted fault model
//!
//! A [`WeightedChaos`] list pairs each [`FaultAction`] with a weight in
//! percent. Entries are selected by walking the list in order and
//! subtracting weights from a draw in `[0, 100)`; any draw past the sum of
//! all weights selects nothing.

use std::fmt;
use std::time::Duration;

use crate::errors::DomainError;

/// Weight given to an entry that does not specify one
pub const DEFAULT_WEIGHT: f64 = 100.0;

/// Upper bound for the sum of all weights in a list
pub const MAX_TOTAL_WEIGHT: f64 = 100.0;

/// Answer with a fixed status code and, optionally, a literal body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeFault {
    code: u16,
    body: Option<String>,
}

impl StatusCodeFault {
    /// Create a status override; `code` must lie in `100..=999`
    pub fn new(code: u16, body: Option<String>) -> Result<Self, DomainError> {
        if !(100..=999).contains(&code) {
            return Err(DomainError::InvalidStatusCode(code));
        }
        Ok(Self { code, body })
    }

    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Body written in place of the downstream response
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Hold the request back before it is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyFault {
    latency: Duration,
    jitter: Duration,
}

impl LatencyFault {
    pub const fn new(latency: Duration, jitter: Duration) -> Self {
        Self { latency, jitter }
    }

    /// Delay applied when no jitter is configured
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Half-width of the range the delay is drawn from; zero disables it
    pub const fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Resolve the delay for a jitter offset drawn from `[-jitter, +jitter)`
    ///
    /// When jitter is configured the offset *is* the delay: the base latency
    /// is not added. Negative offsets mean no delay.
    pub fn delay_for_offset(&self, offset_ms: i64) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        u64::try_from(offset_ms).map_or(Duration::ZERO, Duration::from_millis)
    }
}

/// A behavior applied around one request/response pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultAction {
    /// Override the response status (and maybe the body)
    StatusCode(StatusCodeFault),
    /// Delay handling of the request
    Latency(LatencyFault),
    /// Leave the request and response untouched
    Nop,
}

/// Shared pass-through action
pub static NO_FAULT: FaultAction = FaultAction::Nop;

impl FaultAction {
    pub const fn is_nop(&self) -> bool {
        matches!(self, Self::Nop)
    }
}

impl fmt::Display for FaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusCode(fault) => match fault.body() {
                Some(body) => write!(f, "status {} with body {body:?}", fault.code()),
                None => write!(f, "status {}", fault.code()),
            },
            Self::Latency(fault) if fault.jitter().is_zero() => {
                write!(f, "latency {}ms", fault.latency().as_millis())
            },
            Self::Latency(fault) => write!(f, "latency ±{}ms", fault.jitter().as_millis()),
            Self::Nop => write!(f, "no fault"),
        }
    }
}

/// One entry of a [`WeightedChaos`] list
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedFault {
    pub weight: f64,
    pub action: FaultAction,
}

impl WeightedFault {
    pub const fn new(weight: f64, action: FaultAction) -> Self {
        Self { weight, action }
    }
}

/// Ordered, validated list of weighted faults
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedChaos {
    entries: Vec<WeightedFault>,
}

impl WeightedChaos {
    /// Validate and wrap a list of entries
    ///
    /// Every weight must be finite and non-negative, and together they may
    /// not exceed [`MAX_TOTAL_WEIGHT`].
    pub fn new(entries: Vec<WeightedFault>) -> Result<Self, DomainError> {
        if let Some(bad) = entries
            .iter()
            .find(|entry| !entry.weight.is_finite() || entry.weight < 0.0)
        {
            return Err(DomainError::InvalidWeight(bad.weight));
        }

        let total: f64 = entries.iter().map(|entry| entry.weight).sum();
        if total > MAX_TOTAL_WEIGHT {
            return Err(DomainError::WeightSumExceeded(total));
        }

        Ok(Self { entries })
    }

    /// A list that never selects a fault
    pub const fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Pick the entry whose cumulative bucket contains `draw`
    ///
    /// Returns `None` when `draw` lies past the sum of all weights.
    pub fn choose(&self, draw: f64) -> Option<&FaultAction> {
        let mut remaining = draw;
        for entry in &self.entries {
            if remaining < entry.weight {
                return Some(&entry.action);
            }
            remaining -= entry.weight;
        }
        None
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    pub fn entries(&self) -> &[WeightedFault] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> FaultAction {
        FaultAction::StatusCode(StatusCodeFault::new(code, None).unwrap())
    }

    fn latency_ms(ms: u64) -> FaultAction {
        FaultAction::Latency(LatencyFault::new(Duration::from_millis(ms), Duration::ZERO))
    }

    fn three_buckets() -> WeightedChaos {
        WeightedChaos::new(vec![
            WeightedFault::new(5.0, status(500)),
            WeightedFault::new(10.0, status(429)),
            WeightedFault::new(15.0, latency_ms(100)),
        ])
        .unwrap()
    }

    #[test]
    fn choose_walks_cumulative_buckets() {
        let chaos = three_buckets();
        assert_eq!(chaos.choose(0.0), Some(&status(500)));
        assert_eq!(chaos.choose(2.5), Some(&status(500)));
        assert_eq!(chaos.choose(5.0), Some(&status(429)));
        assert_eq!(chaos.choose(14.99), Some(&status(429)));
        assert_eq!(chaos.choose(15.0), Some(&latency_ms(100)));
        assert_eq!(chaos.choose(30.0), None);
        assert_eq!(chaos.choose(30.1), None);
    }

    #[test]
    fn single_entry_selection() {
        let chaos = WeightedChaos::new(vec![WeightedFault::new(5.0, status(500))]).unwrap();
        assert_eq!(chaos.choose(2.5), Some(&status(500)));
        assert_eq!(chaos.choose(6.0), None);
    }

    #[test]
    fn empty_list_never_selects() {
        let chaos = WeightedChaos::none();
        assert!(chaos.is_empty());
        assert_eq!(chaos.choose(0.0), None);
        assert!(chaos.total_weight().abs() < f64::EPSILON);
    }

    #[test]
    fn full_weight_always_selects() {
        let chaos = WeightedChaos::new(vec![WeightedFault::new(DEFAULT_WEIGHT, status(503))])
            .unwrap();
        assert_eq!(chaos.choose(99.999), Some(&status(503)));
    }

    #[test]
    fn rejects_weight_sum_over_limit() {
        let result = WeightedChaos::new(vec![
            WeightedFault::new(60.0, status(500)),
            WeightedFault::new(50.0, status(502)),
        ]);
        assert_eq!(result, Err(DomainError::WeightSumExceeded(110.0)));
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        let negative = WeightedChaos::new(vec![WeightedFault::new(-1.0, status(500))]);
        assert_eq!(negative, Err(DomainError::InvalidWeight(-1.0)));

        let nan = WeightedChaos::new(vec![WeightedFault::new(f64::NAN, status(500))]);
        assert!(matches!(nan, Err(DomainError::InvalidWeight(_))));
    }

    #[test]
    fn status_code_range() {
        assert!(StatusCodeFault::new(99, None).is_err());
        assert!(StatusCodeFault::new(1000, None).is_err());
        let fault = StatusCodeFault::new(429, Some("slow down".to_string())).unwrap();
        assert_eq!(fault.code(), 429);
        assert_eq!(fault.body(), Some("slow down"));
    }

    #[test]
    fn latency_without_jitter_uses_base() {
        let fault = LatencyFault::new(Duration::from_millis(250), Duration::ZERO);
        assert_eq!(fault.delay_for_offset(-40), Duration::from_millis(250));
    }

    #[test]
    fn latency_with_jitter_ignores_base() {
        let fault = LatencyFault::new(Duration::from_secs(10), Duration::from_millis(50));
        assert_eq!(fault.delay_for_offset(20), Duration::from_millis(20));
        assert_eq!(fault.delay_for_offset(-20), Duration::ZERO);
    }

    #[test]
    fn display_describes_fault() {
        assert_eq!(status(500).to_string(), "status 500");
        assert_eq!(latency_ms(10_000).to_string(), "latency 10000ms");
        assert_eq!(NO_FAULT.to_string(), "no fault");
        let with_body =
            FaultAction::StatusCode(StatusCodeFault::new(429, Some("slow".to_string())).unwrap());
        assert_eq!(with_body.to_string(), r#"status 429 with body "slow""#);
    }
}
