//! Simulation engine for both queueing topologies
//!
//! One loop serves both topologies. The [`Topology`] decides who owns the
//! waiting line:
//!
//! - **MQMS**: each node has its own queue. A job goes to the selected node and
//!   is rejected for good if that node refuses it.
//! - **SQMS**: nodes are server-only and the dispatcher owns a shared queue.
//!   Each job is first pushed onto the shared queue (counted as a rejection if
//!   the queue is full), then offered to the selected node regardless. A
//!   successful node admission pops the head of the shared queue.
//!
//! The two SQMS outcomes are independent: a job can be rejected by the shared
//! queue and still be admitted by a node in the same step. Both are reported
//! in the [`Admission`] for that job.
//!
//! Jobs are generated one at a time, dispatched, and resolved before the next
//! one is generated. All randomness comes from the run's own variate source.

use crate::builder::Validate;
use crate::config::{SimulationConfig, Topology};
use crate::job::Job;
use crate::load_balancer::{DispatchPolicy, LoadBalanceStrategy};
use crate::node::ServiceNode;
use crate::queue::FifoQueue;
use lbsim_core::logging::{events, node_span, simulation_span};
use lbsim_core::{
    sim_log_with_time, ArrivalProcess, ExponentialServiceTime, Lehmer, Seconds,
    ServiceTimeDistribution, SimError, UniformArrivals, VariateSource,
};
use metrics::counter;
use tracing::debug;

/// Queue ownership for a run.
#[derive(Debug)]
enum Queues {
    PerNode,
    Shared(FifoQueue<Job>),
}

/// Outcome of offering one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Node chosen by the dispatch policy
    pub node: usize,
    /// Whether that node admitted the job
    pub admitted: bool,
    /// Whether the shared dispatcher queue was full (SQMS only)
    pub queue_rejected: bool,
}

pub struct Simulation {
    config: SimulationConfig,
    nodes: Vec<ServiceNode>,
    queues: Queues,
    policy: Box<dyn DispatchPolicy>,
    source: Box<dyn VariateSource>,
    arrivals: ArrivalProcess,
    service: Box<dyn ServiceTimeDistribution>,
    jobs_offered: u64,
    rejected: u64,
    node_refusals: u64,
}

impl Simulation {
    /// Build a run driven by the reference [`Lehmer`] generator seeded from
    /// the configuration, uniform arrivals and exponential service times.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config
            .validate()
            .map_err(|e| SimError::Configuration(e.to_string()))?;
        let source = Lehmer::new(config.seed)?;
        let arrivals = ArrivalProcess::new(
            config.start,
            Box::new(UniformArrivals::new(config.arrival_horizon)),
        );
        let service = ExponentialServiceTime::new(config.service_mean);
        Self::with_parts(config, Box::new(source), arrivals, Box::new(service))
    }

    /// Build a run from explicit workload parts.
    ///
    /// The configured seed, start, horizon and service mean are not used;
    /// the given source and distributions replace them.
    pub fn with_parts(
        config: SimulationConfig,
        source: Box<dyn VariateSource>,
        arrivals: ArrivalProcess,
        service: Box<dyn ServiceTimeDistribution>,
    ) -> Result<Self, SimError> {
        if config.nodes == 0 {
            return Err(SimError::Configuration(
                "at least one service node is required".to_string(),
            ));
        }

        let node_capacity = config.topology.node_capacity(config.queue_capacity);
        let nodes = (0..config.nodes)
            .map(|id| ServiceNode::new(id, node_capacity))
            .collect();
        let queues = match config.topology {
            Topology::MultiQueue => Queues::PerNode,
            Topology::SingleQueue => Queues::Shared(FifoQueue::new(config.queue_capacity)),
        };

        debug!(
            model = config.topology.name(),
            policy = config.strategy.name(),
            node_capacity,
            "Simulation built"
        );

        Ok(Self {
            policy: config.strategy.build(),
            config,
            nodes,
            queues,
            source,
            arrivals,
            service,
            jobs_offered: 0,
            rejected: 0,
            node_refusals: 0,
        })
    }

    /// Generate the next job: draw its arrival, then its service time.
    pub fn next_job(&mut self) -> Job {
        let arrival = self.arrivals.next_arrival(self.source.as_mut());
        Job::sample(arrival, self.service.as_mut(), self.source.as_mut())
    }

    /// Dispatch `job` and resolve its admission.
    ///
    /// Jobs must be offered in non-decreasing arrival order.
    pub fn offer(&mut self, job: Job) -> Result<Admission, SimError> {
        let model = self.config.topology.name();
        let policy = self.config.strategy.name();
        self.jobs_offered += 1;

        let queue_rejected = match &mut self.queues {
            Queues::PerNode => false,
            Queues::Shared(queue) => {
                let full = queue.enqueue(job.clone()).is_err();
                if full {
                    events::shared_queue_rejected(job.arrival(), queue.len());
                    counter!("lbsim_shared_queue_rejected_total", "model" => model, "policy" => policy)
                        .increment(1);
                }
                full
            }
        };
        if queue_rejected {
            self.rejected += 1;
        }

        let available = self.nodes.len();
        let index = self
            .policy
            .select(&mut self.nodes, &job, self.source.as_mut())
            .ok_or(SimError::EmptyNodeList)?;
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(SimError::NodeOutOfRange { index, available })?;
        events::job_dispatched(job.arrival(), job.service(), index);

        let arrival = job.arrival();
        let admitted = node_span(index).in_scope(|| node.admit(job, arrival));

        if admitted {
            counter!("lbsim_jobs_admitted_total", "model" => model, "policy" => policy).increment(1);
        } else {
            self.node_refusals += 1;
        }

        match &mut self.queues {
            Queues::PerNode => {
                if !admitted {
                    self.rejected += 1;
                    counter!("lbsim_jobs_rejected_total", "model" => model, "policy" => policy)
                        .increment(1);
                }
            }
            Queues::Shared(queue) => {
                if admitted {
                    queue.dequeue();
                }
            }
        }

        Ok(Admission {
            node: index,
            admitted,
            queue_rejected,
        })
    }

    /// Generate and offer one job.
    pub fn step(&mut self) -> Result<Admission, SimError> {
        let job = self.next_job();
        self.offer(job)
    }

    /// Offer the configured number of jobs, less any already offered.
    pub fn run(&mut self) -> Result<(), SimError> {
        let model = self.config.topology.name();
        let policy = self.config.strategy.name();
        let span = simulation_span(model, policy);
        let _guard = span.enter();

        events::simulation_started(
            model,
            policy,
            self.nodes.len(),
            self.config.queue_capacity,
            self.config.jobs,
        );

        while self.jobs_offered < self.config.jobs {
            self.step()?;
        }

        for node in self.nodes.iter().filter(|node| node.num_processed() == 0) {
            sim_log_with_time!(
                warn,
                self.arrivals.previous(),
                node = node.id(),
                "Node processed no jobs; its averages are undefined"
            );
        }
        events::simulation_completed(
            model,
            policy,
            self.jobs_offered,
            self.rejected,
            self.arrivals.previous(),
        );
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn topology(&self) -> Topology {
        self.config.topology
    }

    pub fn strategy(&self) -> LoadBalanceStrategy {
        self.config.strategy
    }

    pub fn nodes(&self) -> &[ServiceNode] {
        &self.nodes
    }

    pub fn jobs_offered(&self) -> u64 {
        self.jobs_offered
    }

    /// Rejections counted by the topology: node refusals for MQMS, shared
    /// queue overflows for SQMS.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Jobs the selected node refused, in either topology.
    pub fn node_refusals(&self) -> u64 {
        self.node_refusals
    }

    /// `rejected / jobs_offered`, or `0.0` before any job was offered.
    pub fn rejection_ratio(&self) -> f64 {
        if self.jobs_offered == 0 {
            return 0.0;
        }
        self.rejected as f64 / self.jobs_offered as f64
    }

    /// Jobs currently held by the shared queue; `None` for MQMS.
    pub fn shared_queue_len(&self) -> Option<usize> {
        match &self.queues {
            Queues::PerNode => None,
            Queues::Shared(queue) => Some(queue.len()),
        }
    }

    /// Most recent generated arrival.
    pub fn clock(&self) -> Seconds {
        self.arrivals.previous()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("nodes", &self.nodes)
            .field("queues", &self.queues)
            .field("jobs_offered", &self.jobs_offered)
            .field("rejected", &self.rejected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbsim_core::{ConstantArrivals, ConstantServiceTime};

    fn scripted(config: SimulationConfig, service: Seconds) -> Simulation {
        Simulation::with_parts(
            config,
            Box::new(Lehmer::default()),
            ArrivalProcess::new(0.0, Box::new(ConstantArrivals::new(1.0))),
            Box::new(ConstantServiceTime::new(service)),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_nodes_is_a_configuration_error() {
        let config = SimulationConfig::new(0, LoadBalanceStrategy::RoundRobin, 1, 10);
        assert!(matches!(Simulation::new(config), Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let config =
            SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 10).with_seed(2_147_483_647);
        assert!(matches!(Simulation::new(config), Err(SimError::InvalidSeed { .. })));
    }

    #[test]
    fn test_seed_above_modulus_is_reduced() {
        let config =
            SimulationConfig::new(2, LoadBalanceStrategy::Random, 1, 10).with_seed(2_147_483_648);
        assert!(Simulation::new(config).is_ok());
    }

    #[test]
    fn test_mqms_rejection_is_final() {
        let config = SimulationConfig::new(1, LoadBalanceStrategy::RoundRobin, 0, 2);
        let mut sim = scripted(config, 10.0);

        let first = sim.offer(Job::new(0.0, 10.0)).unwrap();
        let second = sim.offer(Job::new(5.0, 10.0)).unwrap();
        assert!(first.admitted && !first.queue_rejected);
        assert!(!second.admitted && !second.queue_rejected);
        assert_eq!(sim.rejected(), 1);
        assert_eq!(sim.rejection_ratio(), 0.5);
        assert_eq!(sim.shared_queue_len(), None);
    }

    #[test]
    fn test_sqms_nodes_have_no_queue() {
        let config = SimulationConfig::new(3, LoadBalanceStrategy::Random, 5, 10)
            .with_topology(Topology::SingleQueue);
        let sim = Simulation::new(config).unwrap();
        assert!(sim.nodes().iter().all(|node| node.capacity() == 0));
        assert_eq!(sim.shared_queue_len(), Some(0));
    }

    #[test]
    fn test_sqms_admission_pops_shared_queue() {
        let config = SimulationConfig::new(1, LoadBalanceStrategy::RoundRobin, 2, 3)
            .with_topology(Topology::SingleQueue);
        let mut sim = scripted(config, 10.0);

        sim.offer(Job::new(0.0, 10.0)).unwrap();
        assert_eq!(sim.shared_queue_len(), Some(0));

        let refused = sim.offer(Job::new(1.0, 10.0)).unwrap();
        assert!(!refused.admitted && !refused.queue_rejected);
        assert_eq!(sim.shared_queue_len(), Some(1));
        assert_eq!(sim.rejected(), 0);
        assert_eq!(sim.node_refusals(), 1);
    }

    #[test]
    fn test_run_offers_configured_jobs() {
        let config = SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 6);
        let mut sim = scripted(config, 1.5);
        sim.run().unwrap();
        assert_eq!(sim.jobs_offered(), 6);
        assert_eq!(sim.clock(), 6.0);
        let processed: u64 = sim.nodes().iter().map(ServiceNode::num_processed).sum();
        assert_eq!(processed + sim.rejected(), 6);
    }

    #[test]
    fn test_next_job_draws_arrival_then_service() {
        let config = SimulationConfig::new(2, LoadBalanceStrategy::RoundRobin, 1, 6).with_seed(5);
        let mut sim = Simulation::new(config).unwrap();
        let job = sim.next_job();

        let mut reference = Lehmer::new(5).unwrap();
        let arrival = reference.uniform(0.0, 3600.0);
        let service = reference.exponential(4049.0);
        assert_eq!(job.arrival(), arrival);
        assert_eq!(job.service(), service);
        assert_eq!(job.delay(), 0.0);
    }
}
