//! Server manager: first-fit placement, ticking and eviction.
//!
//! The [`Manager`] owns every live [`Server`] in creation order. New users go
//! to the earliest-created server with a free slot; a new server is opened
//! only when none has room. Each call to [`Manager::tick`] (or its reduced
//! form [`Manager::snapshot`]) is one global tick:
//!
//! 1. every server reports its active count and drains one workload unit
//!    from each of its users;
//! 2. servers left without users are partitioned out, keeping creation order;
//! 3. each evicted server's elapsed ticks are folded into the cumulative
//!    total, exactly once.
//!
//! The counts returned describe who was active *during* the tick, so a
//! server that empties on this tick still shows up one last time.

use crate::clock::TickClock;
use crate::config::SimConfig;
use crate::server::Server;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Per-server active-user counts for one tick, in server creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(Vec<usize>);

impl Snapshot {
    /// Wrap per-server counts given in creation order.
    pub fn new(counts: Vec<usize>) -> Self {
        Self(counts)
    }

    /// Per-server counts in creation order.
    pub fn counts(&self) -> &[usize] {
        &self.0
    }

    /// Number of servers that were active.
    pub fn servers(&self) -> usize {
        self.0.len()
    }

    /// Total users that were active.
    pub fn active_users(&self) -> usize {
        self.0.iter().sum()
    }

    /// Whether no server was active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as `c1,c2,...,cn`, or `0` when no server was active.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}

/// Lifecycle phase of a manager.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerPhase {
    /// Admitting new users between ticks.
    #[default]
    Accepting,
    /// Input exhausted: only ticking and evicting.
    Draining,
    /// Every server has been evicted; the cumulative total is final.
    Done,
}

/// Where [`Manager::admit_user`] put a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Joined an existing server with spare capacity.
    Existing(u32),
    /// Opened a new server seeded with this user.
    Opened(u32),
    /// Admissions are closed; the user was not placed.
    Refused,
}

/// Outcome of one global tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Number of the tick just completed, starting at 1.
    pub tick: u64,
    /// Active counts gathered before eviction.
    pub snapshot: Snapshot,
    /// Servers removed at the end of this tick.
    pub servers_evicted: usize,
    /// Users whose workload ran out on this tick.
    pub users_completed: usize,
    /// Elapsed ticks of the evicted servers, added to the cumulative total.
    pub ticks_folded: u64,
}

/// Owns the servers and drives placement and eviction.
#[derive(Debug, Clone)]
pub struct Manager {
    config: SimConfig,
    /// Live servers in creation order.
    servers: Vec<Server>,
    /// Sum of elapsed ticks of every evicted server.
    cumulative_ticks: u64,
    clock: TickClock,
    next_server_id: u32,
    admissions_closed: bool,
    // --- Counters ---
    /// Users accepted since start.
    pub users_admitted: u64,
    /// Servers opened since start.
    pub servers_created: u64,
}

impl Manager {
    /// Create a manager with no servers.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            servers: Vec::new(),
            cumulative_ticks: 0,
            clock: TickClock::new(),
            next_server_id: 0,
            admissions_closed: false,
            users_admitted: 0,
            servers_created: 0,
        }
    }

    /// Create a manager around an existing set of servers, kept in the given
    /// order. New servers get ids above the highest one present.
    ///
    /// Every server must hold at least one user and share `config.capacity`.
    pub fn from_servers(config: SimConfig, servers: Vec<Server>) -> Self {
        debug_assert!(
            servers.iter().all(|s| !s.is_empty()),
            "from_servers: empty server"
        );
        debug_assert!(
            servers.iter().all(|s| s.capacity() == config.capacity),
            "from_servers: capacity mismatch"
        );
        let next_server_id = servers.iter().map(|s| s.id + 1).max().unwrap_or(0);
        Self {
            next_server_id,
            servers_created: servers.len() as u64,
            servers,
            ..Self::new(config)
        }
    }

    /// Parameters every server is created with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Live servers in creation order.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Whether no server is live.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Sum of elapsed ticks over every server evicted so far.
    pub fn cumulative_ticks(&self) -> u64 {
        self.cumulative_ticks
    }

    /// Global ticks taken so far.
    pub fn ticks(&self) -> u64 {
        self.clock.now()
    }

    /// Current lifecycle phase, derived from admissions and live servers.
    pub fn phase(&self) -> ManagerPhase {
        if !self.admissions_closed {
            ManagerPhase::Accepting
        } else if self.servers.is_empty() {
            ManagerPhase::Done
        } else {
            ManagerPhase::Draining
        }
    }

    /// Stop admitting users. Called once the input source is exhausted.
    pub fn close_admissions(&mut self) {
        self.admissions_closed = true;
    }

    /// First server, in creation order, with a free slot.
    pub fn find_server_with_space(&mut self) -> Option<&mut Server> {
        self.servers.iter_mut().find(|s| s.has_space())
    }

    /// Place one user with first-fit, opening a server if none has room.
    pub fn admit_user(&mut self) -> Placement {
        if self.admissions_closed {
            warn!("admission refused: manager is draining");
            return Placement::Refused;
        }
        self.users_admitted += 1;

        if let Some(server) = self.find_server_with_space() {
            server.add_user();
            return Placement::Existing(server.id);
        }

        let id = self.next_server_id;
        self.next_server_id += 1;
        self.servers.push(Server::new(id, &self.config));
        self.servers_created += 1;
        debug!(server_id = id, live = self.servers.len(), "opened server");
        Placement::Opened(id)
    }

    /// Admit `size` users one at a time. Returns the number of servers opened.
    pub fn admit_batch(&mut self, size: u32) -> usize {
        (0..size)
            .filter(|_| matches!(self.admit_user(), Placement::Opened(_)))
            .count()
    }

    /// Active counts right now, without advancing time.
    pub fn peek_counts(&self) -> Snapshot {
        Snapshot::new(
            self.servers
                .iter()
                .map(Server::peek_active_count)
                .collect(),
        )
    }

    /// Snapshot-and-advance: run one global tick and return the counts
    /// gathered before eviction.
    pub fn snapshot(&mut self) -> Snapshot {
        self.tick().snapshot
    }

    /// Run one global tick. See the module docs for the exact order.
    pub fn tick(&mut self) -> TickReport {
        let counts: Vec<usize> = self.servers.iter_mut().map(Server::active_count).collect();
        let remaining: usize = self.servers.iter().map(Server::peek_active_count).sum();
        let users_completed = counts.iter().sum::<usize>() - remaining;

        let (evicted, active): (Vec<_>, Vec<_>) =
            self.servers.drain(..).partition(Server::is_empty);
        self.servers = active;
        let ticks_folded = self.fold_evicted(&evicted);

        let tick = self.clock.advance();
        trace!(
            tick,
            servers = counts.len(),
            evicted = evicted.len(),
            users_completed,
            "tick"
        );

        TickReport {
            tick,
            snapshot: Snapshot::new(counts),
            servers_evicted: evicted.len(),
            users_completed,
            ticks_folded,
        }
    }

    /// Add the elapsed ticks of evicted servers to the cumulative total.
    fn fold_evicted(&mut self, evicted: &[Server]) -> u64 {
        let mut folded = 0;
        for server in evicted {
            debug!(
                server_id = server.id,
                elapsed_ticks = server.elapsed_ticks(),
                "evicted server"
            );
            folded += server.elapsed_ticks();
        }
        self.cumulative_ticks += folded;
        folded
    }

    /// Close admissions and tick until no server is left. Returns one report
    /// per tick taken, in order.
    pub fn run_to_completion(&mut self) -> Vec<TickReport> {
        self.close_admissions();
        let mut reports = Vec::new();
        while !self.servers.is_empty() {
            reports.push(self.tick());
        }
        reports
    }
}
