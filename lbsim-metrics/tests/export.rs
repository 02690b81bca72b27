//! File exports against real simulation runs.

use lbsim_components::{LoadBalanceStrategy, Simulation, SimulationConfig, Topology};
use lbsim_metrics::export::csv::{export_distribution, SimLogAppender, NODE_HEADER};
use lbsim_metrics::{append_simlog, export_csv, export_json, MetricsError, RunSummary};
use std::fs;
use std::path::PathBuf;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lbsim-metrics-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn summary(topology: Topology, strategy: LoadBalanceStrategy) -> RunSummary {
    let config = SimulationConfig::new(3, strategy, 4, 500).with_topology(topology);
    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();
    RunSummary::from_simulation(&sim)
}

#[test]
fn node_table_has_header_and_one_row_per_node() {
    let dir = temp_dir();
    let run = summary(Topology::MultiQueue, LoadBalanceStrategy::RoundRobin);

    let path = export_csv(&run, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "mqms_roundrobin.csv");

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], NODE_HEADER);
    assert_eq!(lines.len(), 4);
    for (sid, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], sid.to_string());
        assert_eq!(fields[5], run.node_stats[sid].jobs.to_string());
    }

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn simlog_rows_accumulate() {
    let dir = temp_dir();
    let mqms = summary(Topology::MultiQueue, LoadBalanceStrategy::LeastConnections);
    let sqms = summary(Topology::SingleQueue, LoadBalanceStrategy::LeastConnections);

    append_simlog(&mqms, &dir).unwrap();
    let path = append_simlog(&sqms, &dir).unwrap();

    let text = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("leastcxns,500,3,4,"));
    assert!(lines[1].starts_with("leastcxns,500,3,0,"));
    assert!(lines.iter().all(|line| line.ends_with(',')));
    // policy, jobs, nodes, queue size, three utilizations, trailing empty field
    assert_eq!(lines[0].split(',').count(), 8);
    assert_eq!(lines[0], SimLogAppender::row(&mqms));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn json_summary_names_model_and_policy() {
    let dir = temp_dir();
    let run = summary(Topology::SingleQueue, LoadBalanceStrategy::UtilizationBased);

    let path = export_json(&run, &dir, true).unwrap();
    assert_eq!(path.file_name().unwrap(), "sqms_utilbased.json");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["model"], "sqms");
    assert_eq!(value["policy"], "utilbased");
    assert_eq!(value["jobs"], 500);
    assert_eq!(value["queue_size"], 0);
    assert_eq!(value["node_stats"].as_array().unwrap().len(), 3);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn distribution_writes_one_line_per_trace() {
    let dir = temp_dir();
    let path = dir.join("lba-data.csv");
    export_distribution(&path, &[vec![0, 1, 2], vec![2, 2, 0]]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "0,1,2\n2,2,0\n");
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_output_directory_is_an_export_error() {
    let dir = std::env::temp_dir().join(format!("lbsim-missing-{}", uuid::Uuid::new_v4()));
    let run = summary(Topology::MultiQueue, LoadBalanceStrategy::Random);
    assert!(matches!(export_csv(&run, &dir), Err(MetricsError::Export(_))));
}
