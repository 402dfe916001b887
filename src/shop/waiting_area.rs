use crate::config::CustomerId;
use serde::{Deserialize, Serialize};
use std::collections::vec_deque::VecDeque;

/// Bounded FIFO of seated customers. It has no lock of its own: it lives
/// inside the shop state and is only touched under the shop lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingArea {
    capacity: usize,
    chairs: VecDeque<CustomerId>,
}

impl WaitingArea {
    pub fn new(capacity: usize) -> WaitingArea {
        WaitingArea {
            capacity,
            chairs: VecDeque::with_capacity(capacity),
        }
    }

    pub fn try_enqueue(&mut self, customer: CustomerId) -> bool {
        if self.chairs.len() >= self.capacity {
            return false;
        }

        self.chairs.push_back(customer);

        true
    }

    pub fn try_dequeue(&mut self) -> Option<CustomerId> {
        self.chairs.pop_front()
    }

    pub fn snapshot_order(&self) -> Vec<CustomerId> {
        self.chairs.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.chairs.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
