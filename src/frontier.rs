use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{GridError, GridResult};
use crate::Pos;

struct SmallestCostHolder {
    priority: u32,
    seq: u64,
    pos: Pos,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap pops the greatest, we want the smallest
        // priority and among equal priorities the earliest insertion.
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// Min-priority queue of cells. Entries with equal priority are popped in insertion order,
/// which makes every search on the same input expand cells in the same order.
/// Does not suppress duplicates.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<SmallestCostHolder>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Frontier {
        Frontier::default()
    }

    /// Pushes `pos`, stamping it with the next sequence number.
    pub fn push(&mut self, priority: u32, pos: Pos) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(SmallestCostHolder { priority, seq, pos });
    }

    pub fn pop_min(&mut self) -> GridResult<Pos> {
        self.pop_min_entry().map(|(_, pos)| pos)
    }

    /// Like [pop_min](Self::pop_min) but also returns the priority the entry was pushed
    /// with, which lets the caller recognise superseded entries.
    pub fn pop_min_entry(&mut self) -> GridResult<(u32, Pos)> {
        self.heap
            .pop()
            .map(|e| (e.priority, e.pos))
            .ok_or(GridError::EmptyFrontier)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
