use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::CellPos;

struct FrontierEntry {
    estimated_cost: i32,
    sequence: u64,
    pos: CellPos,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.sequence == other.sequence
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first; among equal estimates the most recently inserted entry
        // wins, so equal keys pop like a stack
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.sequence.cmp(&other.sequence),
            s => s,
        }
    }
}

/// Discovered but not yet expanded cells, ordered by total estimated cost.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Frontier {
        Frontier::default()
    }

    pub fn push(&mut self, pos: CellPos, estimated_cost: i32) {
        self.heap.push(FrontierEntry {
            estimated_cost,
            sequence: self.next_sequence,
            pos,
        });
        self.next_sequence += 1;
    }

    /// Removes the entry with the smallest estimated cost, latest insertion first on ties.
    pub fn pop(&mut self) -> Option<(CellPos, i32)> {
        self.heap.pop().map(|e| (e.pos, e.estimated_cost))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
