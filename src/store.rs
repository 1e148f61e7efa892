// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Arena for hash-consing.
//!
//! Objects are owned by the arena and referenced by their index.
//! Two keys that are equal produce the same index, so the index is
//! a unique id for the object.
//!

use std::{
    collections::{hash_map::Entry, HashMap},
    hash::Hash,
};

///
/// Objects that can be hash-consed must implement this trait
///
/// Key is a key/signature type for the hash-consed objects.
/// Each key must be unique to the object.
/// make(i, &k) must construct the full object of key k and index i.
///
pub trait HashConsed {
    /// Key type
    type Key: Eq + Hash + Clone;
    /// Object constructor
    fn make(index: usize, k: &Self::Key) -> Self;
}

///
/// Store
///
/// Objects are stored in a vector, in creation order.
/// The map goes from keys to indices in that vector.
///
#[derive(Debug)]
pub struct Store<T: HashConsed> {
    map: HashMap<T::Key, usize>,
    objects: Vec<T>,
}

impl<T: HashConsed> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HashConsed> Store<T> {
    /// Create an empty store
    pub fn new() -> Store<T> {
        Store {
            map: HashMap::new(),
            objects: Vec::new(),
        }
    }

    /// Number of elements stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Get the index of the object defined by key k
    /// - return the index of an existing object if there's one
    /// - create a fresh object and return its index otherwise
    pub fn make(&mut self, k: T::Key) -> usize {
        match self.map.entry(k) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(e) => {
                let i = self.objects.len();
                self.objects.push(T::make(i, e.key()));
                e.insert(i);
                i
            }
        }
    }

    /// Get an object from its index
    ///
    /// # Panics
    ///
    /// If the index is out of bounds
    pub fn get(&self, index: usize) -> &T {
        &self.objects[index]
    }
}
