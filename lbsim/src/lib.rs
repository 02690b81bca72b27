//! # lbsim - load-balancing dispatch simulator
//!
//! Compares dispatch policies (round robin, random, utilization-based, least
//! connections) on a pool of service nodes under two queueing topologies:
//! every node with its own bounded queue (MQMS), or server-only nodes behind
//! one shared dispatcher queue (SQMS).
//!
//! ## Example
//!
//! ```
//! use lbsim::prelude::*;
//!
//! let config = SimulationConfig::new(4, LoadBalanceStrategy::RoundRobin, 10, 1000);
//! let summaries = lbsim::run(&RunOptions::new(config)).unwrap();
//! for summary in &summaries {
//!     print!("{summary}");
//! }
//! ```

pub use lbsim_components as components;
pub use lbsim_core as core;
pub use lbsim_metrics as metrics;

pub mod runner;

pub use runner::{run, run_model, selection_distribution, ModelSelection, RunError, RunOptions};

pub mod prelude {
    //! Commonly used types and traits

    pub use lbsim_core::{Lehmer, Seconds, SimError, VariateSource};

    pub use lbsim_components::{
        DispatchPolicy, Job, LoadBalanceStrategy, ServiceNode, Simulation, SimulationConfig,
        Topology,
    };

    pub use lbsim_metrics::{MetricsError, RunSummary};

    pub use crate::runner::{ModelSelection, RunOptions};
}
