/// Integration tests for placement, ticking and eviction.
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tickbalance_core::{Manager, ManagerPhase, Placement, Server, SimConfig};

fn config(task_amount: u64, capacity: u32) -> SimConfig {
    SimConfig::new(task_amount, capacity).unwrap()
}

#[test]
fn test_capacity_invariant_under_random_load() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let cfg = config(4, 3);
    let mut manager = Manager::new(cfg);

    for _ in 0..200 {
        manager.admit_batch(rng.gen_range(0..8));
        for server in manager.servers() {
            assert!(server.peek_active_count() <= cfg.capacity as usize);
        }
        manager.snapshot();
        for server in manager.servers() {
            assert!(server.peek_active_count() >= 1, "empty server survived a tick");
        }
    }
}

#[test]
fn test_first_fit_two_two_one() {
    let mut manager = Manager::new(config(1, 2));
    for _ in 0..5 {
        manager.admit_user();
    }
    assert_eq!(manager.snapshot().counts(), &[2, 2, 1]);
}

#[test]
fn test_admit_fills_only_server_with_space() {
    let cfg = config(1, 2);
    let mut servers = Vec::new();
    for id in 0..4 {
        let mut server = Server::new(id, &cfg);
        server.add_user();
        servers.push(server);
    }
    // A half-empty server sitting between full ones.
    servers.insert(1, Server::new(4, &cfg));
    let mut manager = Manager::from_servers(cfg, servers);

    assert_eq!(manager.admit_user(), Placement::Existing(4));
    assert_eq!(manager.servers()[1].peek_active_count(), 2);
    assert_eq!(manager.servers().len(), 5);
}

#[test]
fn test_single_tick_user_drains_and_evicts() {
    let mut manager = Manager::new(config(1, 2));
    manager.admit_user();
    assert_eq!(manager.servers()[0].peek_active_count(), 1);

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.to_string(), "1");
    assert!(manager.is_empty());
    assert_eq!(manager.cumulative_ticks(), 1);
}

#[test]
fn test_five_servers_fold_five_ticks() {
    let mut manager = Manager::new(config(1, 1));
    manager.admit_batch(5);
    let report = manager.tick();
    assert_eq!(report.servers_evicted, 5);
    assert_eq!(report.ticks_folded, 5);
    assert_eq!(manager.cumulative_ticks(), 5);
}

#[test]
fn test_cumulative_ticks_equals_total_server_lifetime() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut manager = Manager::new(config(3, 2));

    // Each live server contributes one tick per snapshot it lives through.
    let mut expected = 0u64;
    for _ in 0..50 {
        manager.admit_batch(rng.gen_range(0..5));
        expected += manager.servers().len() as u64;
        manager.snapshot();
    }
    manager.close_admissions();
    while !manager.is_empty() {
        expected += manager.servers().len() as u64;
        manager.snapshot();
    }
    assert_eq!(manager.cumulative_ticks(), expected);
}

#[test]
fn test_cumulative_ticks_never_decreases() {
    let mut manager = Manager::new(config(2, 2));
    let mut last = 0;
    for batch in [3, 0, 1, 4, 0, 0, 2] {
        manager.admit_batch(batch);
        manager.snapshot();
        assert!(manager.cumulative_ticks() >= last);
        last = manager.cumulative_ticks();
    }
}

#[test]
fn test_empty_manager_snapshot_is_zero() {
    let mut manager = Manager::new(config(1, 1));
    assert_eq!(manager.snapshot().to_string(), "0");
    assert_eq!(manager.cumulative_ticks(), 0);
}

#[test]
fn test_phase_transitions() {
    let mut manager = Manager::new(config(2, 1));
    manager.admit_batch(2);
    assert_eq!(manager.phase(), ManagerPhase::Accepting);

    manager.close_admissions();
    assert_eq!(manager.phase(), ManagerPhase::Draining);

    manager.snapshot();
    assert_eq!(manager.phase(), ManagerPhase::Draining);
    manager.snapshot();
    assert_eq!(manager.phase(), ManagerPhase::Done);
}
