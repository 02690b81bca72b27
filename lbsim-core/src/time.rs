//! Simulation time
//!
//! Time is logical and measured in seconds as `f64`. Arrivals, service times
//! and departures are all expressed in the same unit so the timing arithmetic
//! on jobs stays plain addition.

/// A point in, or span of, simulated time in seconds.
pub type Seconds = f64;

/// One simulated hour, the default arrival horizon.
pub const HOUR_SECS: Seconds = 3600.0;

/// Default start of the arrival sequence.
pub const START: Seconds = 0.0;
