//! Post-run statistics
//!
//! A [`RunSummary`] is a snapshot of a finished [`Simulation`]: the rejection
//! figures plus one [`NodeSummary`] per node. Exporters and the console report
//! read only from the summary.
//!
//! Undefined averages (nodes that processed no jobs) are `NaN`, which
//! serializes to `null` in JSON.

use lbsim_components::{LoadBalanceStrategy, ServiceNode, Simulation, Topology};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub sid: usize,
    pub utilization: f64,
    pub avg_service_time: f64,
    pub avg_queue_length: f64,
    pub avg_delay: f64,
    pub jobs: u64,
    /// Capacity of the node's own queue
    pub capacity: usize,
}

impl From<&ServiceNode> for NodeSummary {
    fn from(node: &ServiceNode) -> Self {
        Self {
            sid: node.id(),
            utilization: node.utilization(),
            avg_service_time: node.avg_service_time(),
            avg_queue_length: node.avg_queue_length(),
            avg_delay: node.avg_delay(),
            jobs: node.num_processed(),
            capacity: node.capacity(),
        }
    }
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:>2}, util: {:>7.5}, njobs: {:>6}, avg_s: {:>6.1}",
            self.sid, self.utilization, self.jobs, self.avg_service_time
        )?;
        if self.capacity > 0 {
            write!(
                f,
                ", avg_q: {:>4.3}, avg_d: {:>6.1}",
                self.avg_queue_length, self.avg_delay
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub model: Topology,
    pub policy: LoadBalanceStrategy,
    pub jobs: u64,
    pub nodes: usize,
    /// Queue size as logged: node queue capacity for MQMS, `0` for SQMS
    pub queue_size: usize,
    pub rejected: u64,
    pub rejection_ratio: f64,
    pub node_refusals: u64,
    pub node_stats: Vec<NodeSummary>,
}

impl RunSummary {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let config = sim.config();
        Self {
            model: sim.topology(),
            policy: sim.strategy(),
            jobs: sim.jobs_offered(),
            nodes: config.nodes,
            queue_size: config.reported_queue_size(),
            rejected: sim.rejected(),
            rejection_ratio: sim.rejection_ratio(),
            node_refusals: sim.node_refusals(),
            node_stats: sim.nodes().iter().map(NodeSummary::from).collect(),
        }
    }

    pub fn rejection_percent(&self) -> f64 {
        self.rejection_ratio * 100.0
    }

    /// `<model>_<policy>`, the stem shared by the per-run export files.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.model, self.policy)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rejection amount: {}%",
            significant(self.rejection_percent(), 5)
        )?;
        for node in &self.node_stats {
            writeln!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Format `value` with at most `digits` significant digits, dropping
/// trailing zeros.
pub fn significant(value: f64, digits: usize) -> String {
    if !value.is_finite() || value == 0.0 {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i64;
    let decimals = (digits as i64 - 1 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbsim_components::{Job, SimulationConfig};
    use lbsim_core::{ArrivalProcess, ConstantArrivals, ConstantServiceTime, Lehmer};

    #[test]
    fn test_significant_digits() {
        assert_eq!(significant(50.0, 5), "50");
        assert_eq!(significant(33.333333, 5), "33.333");
        assert_eq!(significant(0.123456, 5), "0.12346");
        assert_eq!(significant(123456.0, 5), "123456");
        assert_eq!(significant(0.0, 5), "0");
    }

    #[test]
    fn test_node_line_matches_node_display() {
        let mut node = ServiceNode::new(3, 2);
        node.admit(Job::new(0.0, 10.0), 0.0);
        node.admit(Job::new(4.0, 10.0), 4.0);
        assert_eq!(NodeSummary::from(&node).to_string(), node.to_string());

        let idle = ServiceNode::server_only(0);
        assert_eq!(NodeSummary::from(&idle).to_string(), idle.to_string());
    }

    #[test]
    fn test_run_summary_report() {
        let config = SimulationConfig::new(1, LoadBalanceStrategy::RoundRobin, 0, 2);
        let mut sim = Simulation::with_parts(
            config,
            Box::new(Lehmer::default()),
            ArrivalProcess::new(0.0, Box::new(ConstantArrivals::new(1.0))),
            Box::new(ConstantServiceTime::new(1.0)),
        )
        .unwrap();
        sim.offer(Job::new(0.0, 10.0)).unwrap();
        sim.offer(Job::new(5.0, 10.0)).unwrap();

        let summary = RunSummary::from_simulation(&sim);
        assert_eq!(summary.file_stem(), "mqms_roundrobin");
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.node_stats.len(), 1);

        let report = summary.to_string();
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("Rejection amount: 50%"));
        assert!(lines.next().unwrap().starts_with("ID:  0, util: 1.00000"));
    }
}
