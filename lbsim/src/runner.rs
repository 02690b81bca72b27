//! Driving whole runs: one or both topologies, reports and exports.

use clap::ValueEnum;
use lbsim_components::{
    selection_trace, LoadBalanceStrategy, ServiceNode, Simulation, SimulationConfig, Topology,
};
use lbsim_core::{ExponentialServiceTime, Lehmer, SimError};
use lbsim_metrics::{append_simlog, export_csv, export_json, MetricsError, RunSummary};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Which topologies to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModelSelection {
    Mqms,
    Sqms,
    /// MQMS first, then SQMS
    #[default]
    Both,
}

impl ModelSelection {
    pub fn topologies(&self) -> &'static [Topology] {
        match self {
            ModelSelection::Mqms => &[Topology::MultiQueue],
            ModelSelection::Sqms => &[Topology::SingleQueue],
            ModelSelection::Both => &Topology::ALL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base configuration; the topology is replaced per model.
    pub config: SimulationConfig,
    pub models: ModelSelection,
    /// Where CSV and JSON files go; `None` writes nothing.
    pub output_dir: Option<PathBuf>,
    pub json: bool,
}

impl RunOptions {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            models: ModelSelection::default(),
            output_dir: None,
            json: false,
        }
    }

    pub fn with_models(mut self, models: ModelSelection) -> Self {
        self.models = models;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Run one topology from a freshly seeded source.
pub fn run_model(config: SimulationConfig) -> Result<RunSummary, SimError> {
    let mut sim = Simulation::new(config)?;
    sim.run()?;
    Ok(RunSummary::from_simulation(&sim))
}

/// Run every selected topology and write its files.
///
/// Each model starts from the configured seed, so a model's results do not
/// depend on which other models ran before it.
pub fn run(options: &RunOptions) -> Result<Vec<RunSummary>, RunError> {
    let mut summaries = Vec::new();
    for &topology in options.models.topologies() {
        let summary = run_model(options.config.clone().with_topology(topology))?;
        info!(
            model = %summary.model,
            policy = %summary.policy,
            rejected = summary.rejected,
            rejection_percent = summary.rejection_percent(),
            "Run finished"
        );

        if let Some(dir) = &options.output_dir {
            export_csv(&summary, dir)?;
            append_simlog(&summary, dir)?;
            if options.json {
                export_json(&summary, dir, true)?;
            }
        }
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Selection traces for every policy against `nodes` idle server-only nodes.
///
/// Each policy sees a fresh node set and a source seeded with `seed`.
pub fn selection_distribution(
    nodes: usize,
    probes: usize,
    seed: i64,
    service_mean: f64,
) -> Result<Vec<Vec<usize>>, SimError> {
    if nodes == 0 {
        return Err(SimError::EmptyNodeList);
    }
    LoadBalanceStrategy::ALL
        .into_iter()
        .map(|strategy| -> Result<Vec<usize>, SimError> {
            let mut pool: Vec<ServiceNode> = (0..nodes).map(ServiceNode::server_only).collect();
            let mut source = Lehmer::new(seed)?;
            let mut service = ExponentialServiceTime::new(service_mean);
            Ok(selection_trace(strategy, &mut pool, probes, &mut service, &mut source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_selection() {
        assert_eq!(ModelSelection::default(), ModelSelection::Both);
        assert_eq!(ModelSelection::Both.topologies(), &Topology::ALL);
        assert_eq!(ModelSelection::Sqms.topologies(), &[Topology::SingleQueue]);
    }

    #[test]
    fn test_models_are_independent_of_order() {
        let config = SimulationConfig::new(3, LoadBalanceStrategy::Random, 2, 400);
        let both = run(&RunOptions::new(config.clone())).unwrap();
        let sqms_only = run(&RunOptions::new(config).with_models(ModelSelection::Sqms)).unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both[1], sqms_only[0]);
    }

    #[test]
    fn test_round_robin_distribution_cycles() {
        let traces = selection_distribution(3, 6, 1, 4049.0).unwrap();
        assert_eq!(traces.len(), 4);
        assert_eq!(traces[0], vec![0, 1, 2, 0, 1, 2]);
        assert!(traces.iter().all(|trace| trace.len() == 6));
        assert!(traces.iter().flatten().all(|&index| index < 3));
    }
}
