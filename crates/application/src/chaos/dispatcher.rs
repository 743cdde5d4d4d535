//! Weighted chaos dispatcher
//!
//! Draws one fault per request from a validated [`WeightedChaos`] list and
//! resolves it into a [`FaultPlan`] the transport layer can apply. Every
//! request gets its own random generator from the configured source.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::{FaultAction, LatencyFault, NO_FAULT, StatusCodeFault, WeightedChaos};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Produces an independent generator for each draw
pub type RngSource = Arc<dyn Fn() -> StdRng + Send + Sync>;

/// What to do with one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultPlan {
    /// Handle the request normally
    PassThrough,
    /// Sleep before handling the request
    Delay(Duration),
    /// Override the response status, and the body when one is configured
    Status(StatusCodeFault),
}

impl FaultPlan {
    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }
}

/// Seeds a fresh generator from the operating system
fn os_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

/// Selects faults for incoming requests
#[derive(Clone)]
pub struct ChaosDispatcher {
    chaos: Arc<WeightedChaos>,
    rng_source: RngSource,
}

impl fmt::Debug for ChaosDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaosDispatcher")
            .field("chaos", &self.chaos)
            .finish_non_exhaustive()
    }
}

impl Default for ChaosDispatcher {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ChaosDispatcher {
    pub fn new(chaos: WeightedChaos) -> Self {
        Self {
            chaos: Arc::new(chaos),
            rng_source: Arc::new(os_rng),
        }
    }

    /// A dispatcher that never injects anything
    pub fn disabled() -> Self {
        Self::new(WeightedChaos::none())
    }

    /// Replace the generator source, e.g. with a seeded one in tests
    #[must_use]
    pub fn with_rng_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> StdRng + Send + Sync + 'static,
    {
        self.rng_source = Arc::new(source);
        self
    }

    pub fn chaos(&self) -> &WeightedChaos {
        &self.chaos
    }

    /// Whether any fault can ever be selected
    pub fn is_enabled(&self) -> bool {
        self.chaos.total_weight() > 0.0
    }

    /// A uniform draw in `[0, 100)`
    pub fn draw<R: Rng>(rng: &mut R) -> f64 {
        rng.random::<f64>() * 100.0
    }

    /// The action whose bucket contains `draw`, or the no-op
    pub fn select(&self, draw: f64) -> &FaultAction {
        self.chaos.choose(draw).unwrap_or(&NO_FAULT)
    }

    /// Plan a request with a generator from the configured source
    pub fn plan(&self) -> FaultPlan {
        if self.chaos.is_empty() {
            return FaultPlan::PassThrough;
        }
        let mut rng = (self.rng_source)();
        self.plan_with(&mut rng)
    }

    /// Plan a request with the given generator
    pub fn plan_with<R: Rng>(&self, rng: &mut R) -> FaultPlan {
        let action = self.select(Self::draw(rng));
        if !action.is_nop() {
            debug!(fault = %action, "Causing chaos");
        }

        match action {
            FaultAction::Latency(fault) => FaultPlan::Delay(sample_delay(fault, rng)),
            FaultAction::StatusCode(fault) => FaultPlan::Status(fault.clone()),
            FaultAction::Nop => FaultPlan::PassThrough,
        }
    }
}

/// Resolve the delay of a latency fault
///
/// With jitter configured the delay is drawn from `[-jitter, +jitter)`
/// milliseconds and the base latency is not added.
pub fn sample_delay<R: Rng>(fault: &LatencyFault, rng: &mut R) -> Duration {
    let jitter = i64::try_from(fault.jitter().as_millis()).unwrap_or(i64::MAX);
    if jitter == 0 {
        return fault.latency();
    }
    fault.delay_for_offset(rng.random_range(-jitter..jitter))
}
