//! Jobs and their timing arithmetic
//!
//! A job is an arrival time and a service time fixed at construction, plus a
//! delay that is recomputed whenever the job is placed behind another one.
//! `wait = delay + service` and `departure = arrival + wait` are always derived,
//! never stored.

use lbsim_core::{Seconds, ServiceTimeDistribution, VariateSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    arrival: Seconds,
    service: Seconds,
    delay: Seconds,
}

impl Job {
    /// Create a job with a known service time and no delay.
    pub fn new(arrival: Seconds, service: Seconds) -> Self {
        Self {
            arrival,
            service,
            delay: 0.0,
        }
    }

    /// Create a job with a known service time that waits behind a job departing
    /// at `prior_departure`.
    pub fn with_prior_departure(arrival: Seconds, service: Seconds, prior_departure: Seconds) -> Self {
        let mut job = Self::new(arrival, service);
        job.recompute_delay(prior_departure);
        job
    }

    /// Create a job arriving at `arrival` with a sampled service time.
    pub fn sample(
        arrival: Seconds,
        service: &mut dyn ServiceTimeDistribution,
        source: &mut dyn VariateSource,
    ) -> Self {
        Self::new(arrival, service.sample(source))
    }

    /// Like [`Job::sample`], with the delay derived from `prior_departure`.
    pub fn sample_after(
        arrival: Seconds,
        prior_departure: Seconds,
        service: &mut dyn ServiceTimeDistribution,
        source: &mut dyn VariateSource,
    ) -> Self {
        Self::with_prior_departure(arrival, service.sample(source), prior_departure)
    }

    /// Re-derive the delay from the departure of the job ahead of this one.
    ///
    /// The delay is clamped at zero; the service time is untouched.
    pub fn recompute_delay(&mut self, prior_departure: Seconds) -> Seconds {
        self.delay = (prior_departure - self.arrival).max(0.0);
        self.delay
    }

    pub fn arrival(&self) -> Seconds {
        self.arrival
    }

    pub fn service(&self) -> Seconds {
        self.service
    }

    pub fn delay(&self) -> Seconds {
        self.delay
    }

    /// Time spent in the node: queueing delay plus service.
    pub fn wait(&self) -> Seconds {
        self.delay + self.service
    }

    pub fn departure(&self) -> Seconds {
        self.arrival + self.wait()
    }
}
