//! Latency and error injection for route groups.
//!
//! Every route group is wrapped in [`simulate_faults`], which runs two stages
//! in order:
//!
//! 1. **Latency**: sleep for a uniformly drawn number of milliseconds in
//!    `[min_delay_ms, max_delay_ms]`. The sleep is a tokio timer, so other
//!    requests keep being served.
//! 2. **Error**: with probability `error_rate`, answer with a synthetic error
//!    picked uniformly from [`FAULT_PALETTE`] and skip the handler.
//!
//! Randomness comes from a single [`FaultInjector`] holding a seedable
//! `StdRng`, so tests can pin delays and force or suppress faults.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::{format_timestamp, now};

/// Synthetic errors a faulted request can answer with.
pub const FAULT_PALETTE: [(u16, &str); 5] = [
    (500, "Server error occurred"),
    (503, "Service temporarily unavailable"),
    (504, "Network timeout"),
    (500, "Internal server error"),
    (502, "Bad gateway"),
];

/// Per-group simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultProfile {
    /// Lower bound of the artificial delay, inclusive.
    #[serde(default)]
    pub min_delay_ms: u64,
    /// Upper bound of the artificial delay, inclusive.
    #[serde(default)]
    pub max_delay_ms: u64,
    /// Probability in `[0, 1]` of a synthetic error. `None` disables the
    /// error stage for the group.
    #[serde(default)]
    pub error_rate: Option<f64>,
}

impl FaultProfile {
    pub const fn new(min_delay_ms: u64, max_delay_ms: u64, error_rate: Option<f64>) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            error_rate,
        }
    }

    /// Profile with no delay and no errors.
    pub const fn passthrough() -> Self {
        Self::new(0, 0, None)
    }

    /// Check the delay range and error rate.
    pub fn validate(&self) -> Result<(), FaultProfileError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(FaultProfileError::InvalidDelayRange {
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        if let Some(rate) = self.error_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(FaultProfileError::InvalidErrorRate(rate));
            }
        }
        Ok(())
    }
}

/// Invalid fault profile values.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FaultProfileError {
    #[error("invalid delay range: min {min}ms exceeds max {max}ms")]
    InvalidDelayRange { min: u64, max: u64 },

    #[error("invalid error rate: must be 0.0-1.0, got {0}")]
    InvalidErrorRate(f64),
}

/// A synthetic error chosen by the error stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedFault {
    pub status: u16,
    pub message: &'static str,
}

#[derive(Serialize)]
struct FaultBody<'a> {
    error: &'a str,
    timestamp: String,
}

impl IntoResponse for SimulatedFault {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = FaultBody {
            error: self.message,
            timestamp: format_timestamp(&now()),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared random source for both stages.
pub struct FaultInjector {
    rng: Mutex<StdRng>,
    latency_enabled: bool,
    faults_enabled: bool,
}

impl FaultInjector {
    /// Create an injector. A `seed` makes every draw reproducible.
    pub fn new(seed: Option<u64>, latency_enabled: bool, faults_enabled: bool) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            latency_enabled,
            faults_enabled,
        }
    }

    /// Injector that never delays and never faults.
    pub fn disabled() -> Self {
        Self::new(Some(0), false, false)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Draw the artificial delay for one request.
    pub fn draw_delay(&self, profile: &FaultProfile) -> Duration {
        if !self.latency_enabled || profile.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let min = profile.min_delay_ms.min(profile.max_delay_ms);
        let ms = self.with_rng(|rng| rng.random_range(min..=profile.max_delay_ms));
        Duration::from_millis(ms)
    }

    /// Decide whether this request fails, and how.
    pub fn draw_fault(&self, profile: &FaultProfile) -> Option<SimulatedFault> {
        if !self.faults_enabled {
            return None;
        }
        let rate = profile.error_rate?;
        self.with_rng(|rng| {
            if rng.random::<f64>() >= rate {
                return None;
            }
            let (status, message) = FAULT_PALETTE[rng.random_range(0..FAULT_PALETTE.len())];
            Some(SimulatedFault { status, message })
        })
    }
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::new(None, true, true)
    }
}

/// Middleware state for one route group.
#[derive(Clone)]
pub struct GroupFaults {
    pub group: &'static str,
    pub profile: FaultProfile,
    pub injector: Arc<FaultInjector>,
}

impl GroupFaults {
    pub fn new(group: &'static str, profile: FaultProfile, injector: Arc<FaultInjector>) -> Self {
        Self {
            group,
            profile,
            injector,
        }
    }
}

/// Axum middleware running the latency stage and then the error stage.
pub async fn simulate_faults(
    State(faults): State<GroupFaults>,
    request: Request,
    next: Next,
) -> Response {
    let delay = faults.injector.draw_delay(&faults.profile);
    if !delay.is_zero() {
        debug!(group = faults.group, delay_ms = delay.as_millis() as u64, "Simulating latency");
        tokio::time::sleep(delay).await;
    }

    if let Some(fault) = faults.injector.draw_fault(&faults.profile) {
        warn!(
            group = faults.group,
            status = fault.status,
            error = fault.message,
            uri = %request.uri(),
            "Injecting simulated fault"
        );
        return fault.into_response();
    }

    next.run(request).await
}
