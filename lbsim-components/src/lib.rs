//! Dispatch model for the load-balancing simulator.
//!
//! The pieces compose bottom-up:
//!
//! - [`job::Job`]: arrival, service and delay of one unit of work.
//! - [`queue::FifoQueue`]: bounded FIFO used by nodes and by the shared
//!   dispatcher queue.
//! - [`node::ServiceNode`]: a single server with an optional queue and its
//!   running statistics.
//! - [`load_balancer`]: the four dispatch policies.
//! - [`simulation::Simulation`]: the job loop for the multi-queue (MQMS) and
//!   single-queue (SQMS) topologies.
//!
//! # Example
//!
//! ```
//! use lbsim_components::{LoadBalanceStrategy, Simulation, SimulationConfig, Topology};
//!
//! let config = SimulationConfig::new(4, LoadBalanceStrategy::LeastConnections, 5, 200)
//!     .with_topology(Topology::SingleQueue);
//! let mut sim = Simulation::new(config).unwrap();
//! sim.run().unwrap();
//! assert_eq!(sim.jobs_offered(), 200);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod job;
pub mod load_balancer;
pub mod node;
pub mod queue;
pub mod simulation;

pub use builder::{Validate, ValidationError, ValidationResult};
pub use config::{SimulationConfig, Topology, SERVICE_MEAN};
pub use error::QueueError;
pub use job::Job;
pub use load_balancer::{
    selection_trace, DispatchPolicy, LeastConnections, LoadBalanceStrategy, RandomPick, RoundRobin,
    UtilizationBased,
};
pub use node::ServiceNode;
pub use queue::FifoQueue;
pub use simulation::{Admission, Simulation};
