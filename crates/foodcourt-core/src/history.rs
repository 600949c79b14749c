//! Bounded record of recent state fingerprints.
//!
//! After every tick the engine records a fingerprint of the full simulation
//! state. Seeing one again means the simulation can never finish: immediately
//! (a deadlock) or after a cycle (a loop).

use crate::error::TimeLimitCause;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    order: VecDeque<Vec<u8>>,
    seen: HashMap<Vec<u8>, u64>,
}

impl History {
    /// Keeps at most `capacity` fingerprints, evicting the oldest.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity.min(1024)),
            seen: HashMap::new(),
        }
    }

    /// Record the state after `tick`. Fails if the same state was seen
    /// within the window.
    pub fn record(&mut self, tick: u64, fingerprint: Vec<u8>) -> Result<(), TimeLimitCause> {
        if let Some(&previous) = self.seen.get(&fingerprint) {
            return Err(if tick - previous == 1 {
                TimeLimitCause::Deadlock { tick: previous }
            } else {
                TimeLimitCause::Loop {
                    start: previous,
                    end: tick,
                }
            });
        }
        if self.capacity == 0 {
            return Ok(());
        }
        if self.order.len() == self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }
        self.seen.insert(fingerprint.clone(), tick);
        self.order.push_back(fingerprint);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
