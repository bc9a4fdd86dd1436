//! Tracks which requests already triggered the 401 session clear.
//!
//! Keyed by [`RequestId`] so the caller's request is never mutated. The
//! ledger is bounded; the oldest ids are evicted first.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::ports::outbound::RequestId;

pub const DEFAULT_LEDGER_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct LedgerState {
    seen: HashSet<RequestId>,
    order: VecDeque<RequestId>,
}

#[derive(Debug)]
pub struct RetryLedger {
    state: Mutex<LedgerState>,
    capacity: usize,
}

impl Default for RetryLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }
}

impl RetryLedger {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Record `id`. Returns `true` only the first time an id is seen.
    pub fn mark(&self, id: RequestId) -> bool {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Retry ledger lock poisoned, recovering");
                poisoned.into_inner()
            }
        };

        if !state.seen.insert(id) {
            return false;
        }
        state.order.push_back(id);
        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.seen.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, id: RequestId) -> bool {
        match self.state.lock() {
            Ok(state) => state.seen.contains(&id),
            Err(poisoned) => poisoned.into_inner().seen.contains(&id),
        }
    }

    pub fn len(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.order.len(),
            Err(poisoned) => poisoned.into_inner().order.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
