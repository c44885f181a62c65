/// Integration tests for the simulation engine.
use std::io::BufReader;
use tickbalance_core::{parse_input, run_simulation, SimConfig, SimInput, SimulationEngine};

fn simulate(data: &str) -> String {
    let input = parse_input(BufReader::new(data.as_bytes())).unwrap();
    let mut out = Vec::new();
    run_simulation(&input, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_three_users_one_tick_each() {
    assert_eq!(simulate("1\n1\n3\n"), "1,1,1\n0\n3\n");
}

#[test]
fn test_mixed_batches() {
    // task_amount = 4, capacity = 2.
    let output = simulate("4\n2\n1\n3\n0\n1\n0\n1\n");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1",     // server 0 opened
            "2,2",   // server 0 topped up, server 1 opened and filled
            "2,2",   // empty batch
            "2,2,1", // both full, server 2 opened
            "1,2,1", // servers 0 and 1 empty out after this tick
            "2",     // server 2 takes the new user
            "2",     // draining
            "1",
            "1",
            "0",
            "15", // 5 + 4 + 6 server ticks
        ]
    );
}

#[test]
fn test_header_only_input() {
    assert_eq!(simulate("3\n5\n"), "0\n0\n");
}

#[test]
fn test_drain_output_until_empty() {
    // One server of capacity 3 with users finishing after 2 ticks.
    let output = simulate("2\n3\n3\n");
    assert_eq!(output, "3\n3\n0\n2\n");
}

#[test]
fn test_staggered_departures() {
    // task_amount = 3, capacity = 2: users arrive one per tick.
    let output = simulate("3\n2\n1\n1\n1\n");
    // Tick 1: [1]. Tick 2: [2]. Tick 3: [2,1]; first user done.
    // Drain: tick 4 [1,1]; second user done, server 0 empty (4 ticks).
    // Tick 5 [1]; server 1 empty (3 ticks).
    assert_eq!(output, "1\n2\n2,1\n1,1\n1\n0\n7\n");
}

#[test]
fn test_engine_metrics_match_output() {
    let input = SimInput {
        config: SimConfig::new(3, 2).unwrap(),
        batches: vec![1, 1, 1],
    };
    let mut engine = SimulationEngine::new(input.config);
    let mut out = Vec::new();
    let metrics = engine.run(&input.batches, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    let last = output.lines().last().unwrap();
    assert_eq!(last, metrics.cumulative_ticks.to_string());
    assert_eq!(metrics.total_ticks, 5);
    assert_eq!(metrics.users_admitted, 3);
    assert_eq!(metrics.users_completed, 3);
    assert_eq!(metrics.servers_created, 2);
}

#[test]
fn test_large_run_terminates() {
    let input = SimInput {
        config: SimConfig::new(10, 4).unwrap(),
        batches: (0..500).map(|i| (i % 7) as u32).collect(),
    };
    let mut out = Vec::new();
    let metrics = run_simulation(&input, &mut out).unwrap();
    assert_eq!(metrics.users_admitted, input.total_users());
    assert_eq!(metrics.users_completed, input.total_users());
    assert!(metrics.peak_servers > 0);
}
