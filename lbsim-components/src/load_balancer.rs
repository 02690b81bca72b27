//! Dispatch policies
//!
//! A dispatch policy picks the node that receives the next job. Four
//! strategies are available:
//!
//! ## Round Robin (`roundrobin`)
//! Cycles through the nodes in order. The counter belongs to the policy
//! instance, so independent runs never share it.
//!
//! ## Random (`random`)
//! Uniform pick via `equilikely(0, n - 1)` on the run's variate source.
//!
//! ## Utilization Based (`utilbased`)
//! Drains every node up to the job's arrival, then picks the node whose
//! [`preview_utilization`](ServiceNode::preview_utilization) for the job is
//! smallest.
//!
//! ## Least Connections (`leastcxns`)
//! With queues: drains every node and picks the smallest average queue length.
//! Without queues (every node server-only): picks the node that has processed
//! the fewest jobs.
//!
//! Ties always go to the lowest index.
//!
//! # State probing
//!
//! Utilization-based and least-connections selection mutate nodes while
//! selecting (they drain queues). [`DispatchPolicy::probes_state`] reports
//! this. Nodes are only brought up to date when they are drained, so a node
//! that rarely receives jobs may keep stale figures and keep losing (or
//! winning) comparisons.

use crate::job::Job;
use crate::node::ServiceNode;
use lbsim_core::{ServiceTimeDistribution, SimError, VariateSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadBalanceStrategy {
    #[serde(rename = "roundrobin")]
    RoundRobin,
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "utilbased")]
    UtilizationBased,
    #[serde(rename = "leastcxns")]
    LeastConnections,
}

impl LoadBalanceStrategy {
    pub const ALL: [LoadBalanceStrategy; 4] = [
        LoadBalanceStrategy::RoundRobin,
        LoadBalanceStrategy::Random,
        LoadBalanceStrategy::UtilizationBased,
        LoadBalanceStrategy::LeastConnections,
    ];

    /// Name used on the command line and in report file names.
    pub fn name(&self) -> &'static str {
        match self {
            LoadBalanceStrategy::RoundRobin => "roundrobin",
            LoadBalanceStrategy::Random => "random",
            LoadBalanceStrategy::UtilizationBased => "utilbased",
            LoadBalanceStrategy::LeastConnections => "leastcxns",
        }
    }

    /// Whether selection mutates node state.
    pub fn probes_state(&self) -> bool {
        matches!(
            self,
            LoadBalanceStrategy::UtilizationBased | LoadBalanceStrategy::LeastConnections
        )
    }

    /// Build a fresh policy instance for one run.
    pub fn build(&self) -> Box<dyn DispatchPolicy> {
        match self {
            LoadBalanceStrategy::RoundRobin => Box::new(RoundRobin::new()),
            LoadBalanceStrategy::Random => Box::new(RandomPick),
            LoadBalanceStrategy::UtilizationBased => Box::new(UtilizationBased),
            LoadBalanceStrategy::LeastConnections => Box::new(LeastConnections),
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|strategy| strategy.name()).collect()
    }
}

impl fmt::Display for LoadBalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LoadBalanceStrategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                SimError::Configuration(format!(
                    "unknown load balancing algorithm '{s}', possible choices are: {}",
                    Self::names().join(" ")
                ))
            })
    }
}

/// Chooses the node for a job.
pub trait DispatchPolicy: Send {
    /// Index of the chosen node, or `None` when `nodes` is empty.
    ///
    /// Probing policies may drain the nodes they inspect; they visit nodes in
    /// index order so the mutations are the same on every run.
    fn select(
        &mut self,
        nodes: &mut [ServiceNode],
        job: &Job,
        source: &mut dyn VariateSource,
    ) -> Option<usize>;

    fn strategy(&self) -> LoadBalanceStrategy;

    /// Whether [`select`](DispatchPolicy::select) mutates node state.
    fn probes_state(&self) -> bool {
        self.strategy().probes_state()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    next: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the rotation at `index` instead of zero.
    pub fn starting_at(index: usize) -> Self {
        Self { next: index }
    }
}

impl DispatchPolicy for RoundRobin {
    fn select(
        &mut self,
        nodes: &mut [ServiceNode],
        _job: &Job,
        _source: &mut dyn VariateSource,
    ) -> Option<usize> {
        if nodes.is_empty() {
            return None;
        }
        let chosen = self.next % nodes.len();
        self.next = (chosen + 1) % nodes.len();
        Some(chosen)
    }

    fn strategy(&self) -> LoadBalanceStrategy {
        LoadBalanceStrategy::RoundRobin
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPick;

impl DispatchPolicy for RandomPick {
    fn select(
        &mut self,
        nodes: &mut [ServiceNode],
        _job: &Job,
        source: &mut dyn VariateSource,
    ) -> Option<usize> {
        if nodes.is_empty() {
            return None;
        }
        let last = nodes.len() as i64 - 1;
        Some(source.equilikely(0, last) as usize)
    }

    fn strategy(&self) -> LoadBalanceStrategy {
        LoadBalanceStrategy::Random
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UtilizationBased;

impl DispatchPolicy for UtilizationBased {
    fn select(
        &mut self,
        nodes: &mut [ServiceNode],
        job: &Job,
        _source: &mut dyn VariateSource,
    ) -> Option<usize> {
        if nodes.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 0..nodes.len() {
            nodes[i].drain(job.arrival());
            if nodes[best].preview_utilization(job) > nodes[i].preview_utilization(job) {
                best = i;
            }
        }
        Some(best)
    }

    fn strategy(&self) -> LoadBalanceStrategy {
        LoadBalanceStrategy::UtilizationBased
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeastConnections;

impl DispatchPolicy for LeastConnections {
    fn select(
        &mut self,
        nodes: &mut [ServiceNode],
        job: &Job,
        _source: &mut dyn VariateSource,
    ) -> Option<usize> {
        if nodes.is_empty() {
            return None;
        }
        let mut best = 0;
        if nodes.iter().any(|node| node.capacity() > 0) {
            for i in 0..nodes.len() {
                nodes[i].drain(job.arrival());
                if nodes[best].avg_queue_length() > nodes[i].avg_queue_length() {
                    best = i;
                }
            }
        } else {
            for i in 1..nodes.len() {
                if nodes[best].num_processed() > nodes[i].num_processed() {
                    best = i;
                }
            }
        }
        Some(best)
    }

    fn strategy(&self) -> LoadBalanceStrategy {
        LoadBalanceStrategy::LeastConnections
    }
}

/// Record which node `strategy` picks for `probes` jobs arriving at time zero.
///
/// Each probe job gets a sampled service time; nothing is admitted, so the
/// trace shows the policy's selection pattern against a fixed node snapshot.
pub fn selection_trace(
    strategy: LoadBalanceStrategy,
    nodes: &mut [ServiceNode],
    probes: usize,
    service: &mut dyn ServiceTimeDistribution,
    source: &mut dyn VariateSource,
) -> Vec<usize> {
    let mut policy = strategy.build();
    (0..probes)
        .filter_map(|_| {
            let job = Job::sample(0.0, &mut *service, &mut *source);
            policy.select(&mut *nodes, &job, &mut *source)
        })
        .collect()
}
