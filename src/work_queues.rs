// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Queues + visited sets for breadth-first exploration
//!
//! Terms and automaton states are identified by small integers.
//! [IndexQueue] keeps its visited set as a vector of booleans indexed
//! by those integers. [BfsQueue] hashes its elements; it's used when the
//! elements are pairs of states, whose index space is too large to allocate.
//!

use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
};

///
/// A BfsQueue is a queue that doesn't contain duplicate elements.
/// - the push operation adds an element at the end of the queue
///   if this element hasn't been seen before. Otherwise, it's a no-op.
/// - the pop operations takes the element at the front of the queue
///   if the queue is not empty.
#[derive(Debug)]
pub struct BfsQueue<T> {
    queue: VecDeque<T>,
    set: HashSet<T>,
}

impl<T: Eq + Hash + Clone> BfsQueue<T> {
    ///
    /// Create a new queue that contains only `root`
    ///
    pub fn from_root(root: T) -> Self {
        let mut queue = BfsQueue {
            queue: VecDeque::new(),
            set: HashSet::new(),
        };
        queue.push(root);
        queue
    }

    ///
    /// Add an element at the end of the queue if it's not been seen before
    /// - return true if this is a new element
    ///
    pub fn push(&mut self, element: T) -> bool {
        if self.set.insert(element.clone()) {
            self.queue.push_back(element);
            true
        } else {
            false
        }
    }

    ///
    /// Number of distinct elements pushed so far
    ///
    pub fn num_seen(&self) -> usize {
        self.set.len()
    }

    ///
    /// Get the first element in the queue
    ///
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}

///
/// An IndexQueue is a queue of indices that doesn't contain duplicates.
/// - the push operation adds an index at the end of the queue
///   if this index hasn't been seen before. Otherwise, it's a no-op.
/// - the pop operations takes the index at the front of the queue
///   if the queue is not empty.
///
/// An index stays marked as seen after it's been popped.
///
#[derive(Debug, Default)]
pub struct IndexQueue {
    queue: VecDeque<usize>,
    seen: Vec<bool>,
    num_seen: usize,
}

impl IndexQueue {
    ///
    /// Create an empty queue
    ///
    pub fn new() -> Self {
        IndexQueue {
            queue: VecDeque::new(),
            seen: Vec::new(),
            num_seen: 0,
        }
    }

    ///
    /// Create an empty queue for indices in the range [0, size)
    /// - larger indices are still accepted, the visited set grows as needed
    ///
    pub fn with_size(size: usize) -> Self {
        IndexQueue {
            queue: VecDeque::new(),
            seen: vec![false; size],
            num_seen: 0,
        }
    }

    ///
    /// Add an index at the end of the queue if it's not been seen before
    /// - return true if this is a new index
    /// - return false otherwise
    ///
    pub fn push(&mut self, i: usize) -> bool {
        if i >= self.seen.len() {
            self.seen.resize(i + 1, false);
        }
        if self.seen[i] {
            false
        } else {
            self.seen[i] = true;
            self.num_seen += 1;
            self.queue.push_back(i);
            true
        }
    }

    ///
    /// Check whether an index has been pushed at some point
    ///
    pub fn seen(&self, i: usize) -> bool {
        i < self.seen.len() && self.seen[i]
    }

    ///
    /// Number of distinct indices pushed so far
    ///
    pub fn num_seen(&self) -> usize {
        self.num_seen
    }

    ///
    /// Get the first index in the queue
    /// - return None if the queue is empty
    ///
    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }
}
