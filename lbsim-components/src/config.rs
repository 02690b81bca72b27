//! Run configuration
//!
//! A [`SimulationConfig`] fully determines a run: the same configuration
//! always produces the same node statistics.

use crate::builder::{
    validate_finite, validate_non_negative, validate_positive, Validate, ValidationResult,
};
use crate::load_balancer::LoadBalanceStrategy;
use lbsim_core::time::{HOUR_SECS, START};
use lbsim_core::{Seconds, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean service time in seconds.
pub const SERVICE_MEAN: Seconds = 4049.0;

/// Where waiting jobs are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// Multi-queue, multi-server: every node owns a queue of the configured
    /// capacity.
    #[serde(rename = "mqms")]
    MultiQueue,
    /// Single-queue, multi-server: nodes are server-only and the dispatcher
    /// owns one queue of the configured capacity.
    #[serde(rename = "sqms")]
    SingleQueue,
}

impl Topology {
    pub const ALL: [Topology; 2] = [Topology::MultiQueue, Topology::SingleQueue];

    pub fn name(&self) -> &'static str {
        match self {
            Topology::MultiQueue => "mqms",
            Topology::SingleQueue => "sqms",
        }
    }

    /// Capacity given to each node's own queue.
    pub fn node_capacity(&self, queue_capacity: usize) -> usize {
        match self {
            Topology::MultiQueue => queue_capacity,
            Topology::SingleQueue => 0,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub nodes: usize,
    pub strategy: LoadBalanceStrategy,
    pub queue_capacity: usize,
    pub jobs: u64,
    pub seed: i64,
    pub topology: Topology,
    /// Time the arrival clock starts from
    pub start: Seconds,
    /// Upper bound of the uniform inter-arrival gap
    pub arrival_horizon: Seconds,
    pub service_mean: Seconds,
}

impl SimulationConfig {
    /// Multi-queue configuration with default seed and timing.
    pub fn new(nodes: usize, strategy: LoadBalanceStrategy, queue_capacity: usize, jobs: u64) -> Self {
        Self {
            nodes,
            strategy,
            queue_capacity,
            jobs,
            seed: DEFAULT_SEED,
            topology: Topology::MultiQueue,
            start: START,
            arrival_horizon: HOUR_SECS,
            service_mean: SERVICE_MEAN,
        }
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_start(mut self, start: Seconds) -> Self {
        self.start = start;
        self
    }

    pub fn with_arrival_horizon(mut self, horizon: Seconds) -> Self {
        self.arrival_horizon = horizon;
        self
    }

    pub fn with_service_mean(mut self, mean: Seconds) -> Self {
        self.service_mean = mean;
        self
    }

    /// Queue size as reported for this topology: the node queue capacity for
    /// multi-queue runs, `0` for single-queue runs whose nodes hold no queue.
    pub fn reported_queue_size(&self) -> usize {
        self.topology.node_capacity(self.queue_capacity)
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> ValidationResult<()> {
        validate_positive("nodes", self.nodes)?;
        validate_positive("jobs", self.jobs)?;
        validate_positive("seed", self.seed)?;
        validate_finite("start", self.start)?;
        validate_non_negative("start", self.start)?;
        validate_finite("arrival_horizon", self.arrival_horizon)?;
        validate_positive("arrival_horizon", self.arrival_horizon)?;
        validate_finite("service_mean", self.service_mean)?;
        validate_positive("service_mean", self.service_mean)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::new(4, LoadBalanceStrategy::Random, 10, 1000);
        assert_eq!(config.seed, 123_456_789);
        assert_eq!(config.topology, Topology::MultiQueue);
        assert_eq!(config.start, 0.0);
        assert_eq!(config.arrival_horizon, 3600.0);
        assert_eq!(config.service_mean, 4049.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_fields_are_named() {
        let config = SimulationConfig::new(0, LoadBalanceStrategy::RoundRobin, 1, 10);
        assert!(config.validate().unwrap_err().to_string().contains("nodes"));

        let config = SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 0);
        assert!(config.validate().unwrap_err().to_string().contains("jobs"));

        let config = SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 5).with_seed(-4);
        assert!(config.validate().unwrap_err().to_string().contains("seed"));

        let config =
            SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 5).with_service_mean(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reported_queue_size() {
        let config = SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 7, 5);
        assert_eq!(config.reported_queue_size(), 7);
        assert_eq!(config.with_topology(Topology::SingleQueue).reported_queue_size(), 0);
    }

    #[test]
    fn test_serde_names() {
        let config = SimulationConfig::new(2, LoadBalanceStrategy::UtilizationBased, 1, 5)
            .with_topology(Topology::SingleQueue);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"utilbased\""));
        assert!(json.contains("\"sqms\""));
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
