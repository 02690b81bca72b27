//! Arrival patterns and service time distributions
//!
//! Distributions do not own a generator. They draw from the run's
//! [`VariateSource`] so every sample lands in the single reproducible stream.

use crate::randomness::VariateSource;
use crate::time::{Seconds, HOUR_SECS, START};
use serde::{Deserialize, Serialize};

/// Trait for generating gaps between consecutive arrivals
pub trait ArrivalPattern: Send {
    /// Time between the previous arrival and the next one.
    fn next_interarrival(&mut self, source: &mut dyn VariateSource) -> Seconds;
}

/// Trait for sampling service times
pub trait ServiceTimeDistribution: Send {
    /// Sample the service time for one job.
    fn sample(&mut self, source: &mut dyn VariateSource) -> Seconds;

    /// Expected service time.
    fn mean(&self) -> Seconds;
}

// =============================================================================
// Arrival Pattern Implementations
// =============================================================================

/// Gaps drawn uniformly from `(0, horizon)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformArrivals {
    horizon: Seconds,
}

impl UniformArrivals {
    /// # Panics
    ///
    /// Panics if `horizon` is not positive.
    pub fn new(horizon: Seconds) -> Self {
        assert!(horizon > 0.0, "Arrival horizon must be positive");
        Self { horizon }
    }

    pub fn horizon(&self) -> Seconds {
        self.horizon
    }
}

impl Default for UniformArrivals {
    fn default() -> Self {
        Self::new(HOUR_SECS)
    }
}

impl ArrivalPattern for UniformArrivals {
    fn next_interarrival(&mut self, source: &mut dyn VariateSource) -> Seconds {
        source.uniform(0.0, self.horizon)
    }
}

/// Fixed gap between arrivals. Draws nothing from the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantArrivals {
    gap: Seconds,
}

impl ConstantArrivals {
    pub fn new(gap: Seconds) -> Self {
        Self { gap }
    }
}

impl ArrivalPattern for ConstantArrivals {
    fn next_interarrival(&mut self, _source: &mut dyn VariateSource) -> Seconds {
        self.gap
    }
}

/// Running arrival clock: each call advances the previous arrival by one gap.
///
/// The first arrival is `start` plus the first gap.
pub struct ArrivalProcess {
    previous: Seconds,
    pattern: Box<dyn ArrivalPattern>,
}

impl ArrivalProcess {
    pub fn new(start: Seconds, pattern: Box<dyn ArrivalPattern>) -> Self {
        Self {
            previous: start,
            pattern,
        }
    }

    /// Uniform gaps over one simulated hour, starting at [`START`].
    pub fn hourly() -> Self {
        Self::new(START, Box::new(UniformArrivals::default()))
    }

    pub fn next_arrival(&mut self, source: &mut dyn VariateSource) -> Seconds {
        self.previous += self.pattern.next_interarrival(source);
        self.previous
    }

    /// The most recently generated arrival (or the start time before the first).
    pub fn previous(&self) -> Seconds {
        self.previous
    }
}

impl std::fmt::Debug for ArrivalProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrivalProcess")
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Service Time Distribution Implementations
// =============================================================================

/// Exponential service times with a fixed mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialServiceTime {
    mean: Seconds,
}

impl ExponentialServiceTime {
    /// # Panics
    ///
    /// Panics if `mean` is not positive.
    pub fn new(mean: Seconds) -> Self {
        assert!(mean > 0.0, "Mean service time must be positive");
        Self { mean }
    }
}

impl ServiceTimeDistribution for ExponentialServiceTime {
    fn sample(&mut self, source: &mut dyn VariateSource) -> Seconds {
        source.exponential(self.mean)
    }

    fn mean(&self) -> Seconds {
        self.mean
    }
}

/// Always returns the same service time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantServiceTime {
    service: Seconds,
}

impl ConstantServiceTime {
    pub fn new(service: Seconds) -> Self {
        Self { service }
    }
}

impl ServiceTimeDistribution for ConstantServiceTime {
    fn sample(&mut self, _source: &mut dyn VariateSource) -> Seconds {
        self.service
    }

    fn mean(&self) -> Seconds {
        self.service
    }
}
