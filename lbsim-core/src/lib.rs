//! Core building blocks for the load-balancing dispatch simulator.
//!
//! This crate holds everything the simulation engine calls into but that is
//! not part of the dispatch model itself:
//!
//! - [`randomness`]: the seedable [`VariateSource`] and the reference
//!   [`Lehmer`] generator.
//! - [`dists`]: arrival patterns and service time distributions drawing from
//!   that source.
//! - [`time`]: the logical time unit.
//! - [`error`]: the top-level [`SimError`].
//! - [`logging`]: `tracing` setup and event helpers.
//!
//! # Time Model
//!
//! All timing is logical simulated time in seconds ([`Seconds`]). Nothing
//! reads the wall clock, so a run is fully determined by its configuration
//! and seed.

pub mod dists;
pub mod error;
pub mod logging;
pub mod randomness;
pub mod time;

pub use dists::{
    ArrivalPattern, ArrivalProcess, ConstantArrivals, ConstantServiceTime, ExponentialServiceTime,
    ServiceTimeDistribution, UniformArrivals,
};
pub use error::SimError;
pub use logging::{
    init_simulation_logging, init_simulation_logging_with_level, node_span, simulation_span,
};
pub use randomness::{Lehmer, RngVariates, VariateSource, DEFAULT_SEED};
pub use time::Seconds;
