//! Capacity-bounded server holding a set of users.
//!
//! Each [`Server`] owns up to `capacity` users in admission order and a local
//! tick counter. On every tick it drains one workload unit from each user and
//! evicts the users that have nothing left to do.

use crate::config::SimConfig;
use crate::user::User;
use serde::{Deserialize, Serialize};

/// A simulated server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Creation sequence number, unique within a manager.
    pub id: u32,
    /// Maximum number of users.
    capacity: u32,
    /// Workload given to every user admitted here.
    task_amount: u64,
    /// Active users, in admission order.
    users: Vec<User>,
    /// Ticks this server has lived through.
    elapsed_ticks: u64,
}

impl Server {
    /// Create a server that already holds its first user.
    ///
    /// A server only ever comes into existence to take a user no other
    /// server had room for, so it starts with one occupant.
    pub fn new(id: u32, config: &SimConfig) -> Self {
        Self {
            id,
            capacity: config.capacity,
            task_amount: config.task_amount,
            users: vec![User::new(config.task_amount)],
            elapsed_ticks: 0,
        }
    }

    /// Whether another user fits.
    pub fn has_space(&self) -> bool {
        (self.users.len() as u32) < self.capacity
    }

    /// Admit a new user. Returns false, leaving the server unchanged, if the
    /// server is full.
    pub fn add_user(&mut self) -> bool {
        if !self.has_space() {
            return false;
        }
        self.users.push(User::new(self.task_amount));
        true
    }

    /// Number of users currently held, without advancing time.
    pub fn peek_active_count(&self) -> usize {
        self.users.len()
    }

    /// Snapshot-and-advance: return the number of users active during this
    /// tick, then run the tick.
    ///
    /// This is not a plain getter. Reading the count *is* the tick: the
    /// elapsed counter moves and exhausted users are evicted before the call
    /// returns. Use [`Server::peek_active_count`] for a side-effect-free read.
    pub fn active_count(&mut self) -> usize {
        let count = self.peek_active_count();
        self.advance_tick();
        count
    }

    /// Run one tick: bump the elapsed counter, drain one unit from every
    /// user and evict the exhausted ones. Survivors keep their order.
    ///
    /// Returns the number of users evicted.
    pub fn advance_tick(&mut self) -> usize {
        self.elapsed_ticks += 1;
        for user in &mut self.users {
            user.consume();
        }
        let before = self.users.len();
        self.users.retain(|u| !u.is_exhausted());
        before - self.users.len()
    }

    /// Whether every user has left.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Maximum number of users.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Ticks this server has lived through.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Users in admission order.
    pub fn users(&self) -> &[User] {
        &self.users
    }
}
