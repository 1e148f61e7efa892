// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Decision procedures on automata
//!
//! - emptiness: a state is *live* if a final state is reachable from it, and
//!   *dead* otherwise. The language of an automaton is empty iff its initial
//!   state is dead.
//! - finiteness: the language is finite iff no live state reachable from
//!   the initial state is on a cycle.
//! - equivalence and containment: breadth-first exploration of the product
//!   of two automata built over the same alphabet.
//!
//! The same questions can be asked directly on terms. The [TermManager] methods
//! compile the terms over a shared alphabet and check the resulting automata.
//!

use log::debug;

use crate::{
    automata::Automaton,
    errors::*,
    symbols::Alphabet,
    terms::{TermId, TermManager},
    work_queues::{BfsQueue, IndexQueue},
};

///
/// Bound on the length of the strings of a language
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    /// The language is empty
    Empty,
    /// All strings have length at most n and some string has length n
    Bounded(usize),
    /// The language is infinite
    Unbounded,
}

// colors for depth-first search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl Automaton {
    // predecessor lists
    fn predecessors(&self) -> Vec<Vec<usize>> {
        let mut result = vec![Vec::new(); self.num_states()];
        for s in 0..self.num_states() {
            for &d in self.successors(s) {
                result[d].push(s);
            }
        }
        result
    }

    ///
    /// Live states
    /// - live[s] is true iff some final state is reachable from s
    ///
    pub fn live_states(&self) -> Vec<bool> {
        let pred = self.predecessors();
        let mut queue = IndexQueue::with_size(self.num_states());
        for s in self.final_states() {
            queue.push(s.id());
        }
        while let Some(s) = queue.pop() {
            for &p in &pred[s] {
                queue.push(p);
            }
        }
        (0..self.num_states()).map(|s| queue.seen(s)).collect()
    }

    ///
    /// Reachable states
    /// - reachable[s] is true iff s is reachable from the initial state
    ///
    pub fn reachable_states(&self) -> Vec<bool> {
        let mut queue = IndexQueue::with_size(self.num_states());
        queue.push(self.initial_state().id());
        while let Some(s) = queue.pop() {
            for &d in self.successors(s) {
                queue.push(d);
            }
        }
        (0..self.num_states()).map(|s| queue.seen(s)).collect()
    }

    ///
    /// Check whether a state is dead (no final state is reachable from it)
    ///
    pub fn is_dead(&self, s: usize) -> bool {
        !self.live_states()[s]
    }

    ///
    /// Check whether the language of this automaton is empty
    ///
    pub fn is_empty(&self) -> bool {
        !self.live_states()[self.initial_state().id()]
    }

    //
    // Post-order of the live states reachable from the initial state
    // - return None if there's a cycle through live states
    // - the order is such that every successor of a state s comes before s
    //
    fn live_postorder(&self, live: &[bool]) -> Option<Vec<usize>> {
        let n = self.num_states();
        let mut color = vec![Color::White; n];
        let mut result = Vec::new();
        let init = self.initial_state().id();
        if !live[init] {
            return Some(result);
        }
        // stack of (state, index of the next successor to visit)
        let mut stack = vec![(init, 0)];
        color[init] = Color::Gray;
        while let Some(top) = stack.last_mut() {
            let (s, k) = *top;
            let succ = self.successors(s);
            if k < succ.len() {
                top.1 += 1;
                let d = succ[k];
                if live[d] {
                    match color[d] {
                        Color::White => {
                            color[d] = Color::Gray;
                            stack.push((d, 0));
                        }
                        Color::Gray => return None,
                        Color::Black => (),
                    }
                }
            } else {
                color[s] = Color::Black;
                result.push(s);
                stack.pop();
            }
        }
        Some(result)
    }

    ///
    /// Check whether the language of this automaton is finite
    ///
    pub fn is_finite(&self) -> bool {
        self.live_postorder(&self.live_states()).is_some()
    }

    ///
    /// Length of the longest string accepted
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::{terms::*, analysis::LengthBound};
    ///
    /// let tm = &mut TermManager::new();
    /// let a = tm.symbol('a');
    /// let e = tm.repeat(a, 0, 3).unwrap();
    /// let automaton = tm.compile_inferred(e).unwrap();
    /// assert_eq!(automaton.length_bound(), LengthBound::Bounded(3));
    ///
    /// let e = tm.star(a);
    /// let automaton = tm.compile_inferred(e).unwrap();
    /// assert_eq!(automaton.length_bound(), LengthBound::Unbounded);
    /// ```
    pub fn length_bound(&self) -> LengthBound {
        let live = self.live_states();
        if !live[self.initial_state().id()] {
            return LengthBound::Empty;
        }
        match self.live_postorder(&live) {
            None => LengthBound::Unbounded,
            Some(order) => {
                // longest[s] = length of the longest path from s to a final state
                let mut longest = vec![0; self.num_states()];
                for &s in &order {
                    longest[s] = self
                        .successors(s)
                        .iter()
                        .filter(|&&d| live[d])
                        .map(|&d| longest[d] + 1)
                        .max()
                        .unwrap_or(0);
                }
                LengthBound::Bounded(longest[self.initial_state().id()])
            }
        }
    }

    fn check_same_alphabet(&self, other: &Automaton) -> Result<()> {
        if self.alphabet() == other.alphabet() {
            Ok(())
        } else {
            Err(Error::AlphabetMismatch)
        }
    }

    //
    // Explore the product of self and other and check that f(final1, final2)
    // holds for every reachable pair
    //
    fn product_check(&self, other: &Automaton, f: impl Fn(bool, bool) -> bool) -> Result<bool> {
        self.check_same_alphabet(other)?;
        let root = (self.initial_state().id(), other.initial_state().id());
        let mut queue = BfsQueue::from_root(root);
        while let Some((s1, s2)) = queue.pop() {
            if !f(self.state(s1).is_final(), other.state(s2).is_final()) {
                debug!(
                    "product walk: distinguishing pair ({}, {}) after {} pairs",
                    s1,
                    s2,
                    queue.num_seen()
                );
                return Ok(false);
            }
            for (&d1, &d2) in self.successors(s1).iter().zip(other.successors(s2)) {
                queue.push((d1, d2));
            }
        }
        debug!("product walk: {} pairs", queue.num_seen());
        Ok(true)
    }

    ///
    /// Check whether two automata accept the same language
    ///
    /// # Errors
    ///
    /// Return [Error::AlphabetMismatch] if the two automata have different alphabets.
    ///
    pub fn equivalent(&self, other: &Automaton) -> Result<bool> {
        self.product_check(other, |b1, b2| b1 == b2)
    }

    ///
    /// Check whether the language of self is included in the language of other
    ///
    /// # Errors
    ///
    /// Return [Error::AlphabetMismatch] if the two automata have different alphabets.
    ///
    pub fn is_subset_of(&self, other: &Automaton) -> Result<bool> {
        self.product_check(other, |b1, b2| !b1 || b2)
    }

    ///
    /// Check whether two automata are identical up to a renaming of states
    ///
    /// Only states reachable from the initial states are compared.
    ///
    pub fn isomorphic(&self, other: &Automaton) -> bool {
        if self.alphabet() != other.alphabet() {
            return false;
        }
        let mut map1 = vec![None; self.num_states()];
        let mut map2 = vec![None; other.num_states()];
        let root = (self.initial_state().id(), other.initial_state().id());
        let mut queue = BfsQueue::from_root(root);
        while let Some((s1, s2)) = queue.pop() {
            match (map1[s1], map2[s2]) {
                (None, None) => {
                    map1[s1] = Some(s2);
                    map2[s2] = Some(s1);
                }
                (Some(x), Some(y)) if x == s2 && y == s1 => (),
                _ => return false,
            }
            if self.state(s1).is_final() != other.state(s2).is_final() {
                return false;
            }
            for (&d1, &d2) in self.successors(s1).iter().zip(other.successors(s2)) {
                queue.push((d1, d2));
            }
        }
        true
    }
}

impl TermManager {
    // compile e1 and e2 over the union of their alphabets and `alphabet`
    fn compile_pair(
        &mut self,
        e1: TermId,
        e2: TermId,
        alphabet: &Alphabet,
    ) -> Result<(Automaton, Automaton)> {
        let symbols = self.symbols_of(e1).union(&self.symbols_of(e2));
        let alphabet: Alphabet = alphabet.iter().chain(symbols.iter()).collect();
        let a1 = self.compile(e1, &alphabet)?;
        let a2 = self.compile(e2, &alphabet)?;
        Ok((a1, a2))
    }

    ///
    /// Check whether the language of a term over an alphabet is empty
    ///
    /// Complement makes this depend on the alphabet: `¬(a*)` is empty
    /// over `{a}` but not over `{a, b}`.
    ///
    /// # Errors
    ///
    /// - [Error::Alphabet] if a literal of e contains a symbol not in `alphabet`
    /// - [Error::NonTerminatingConstruction] if the automaton is too large.
    ///
    pub fn is_empty(&mut self, e: TermId, alphabet: &Alphabet) -> Result<bool> {
        Ok(self.compile(e, alphabet)?.is_empty())
    }

    ///
    /// Check whether the language of a term over an alphabet is finite
    ///
    /// The alphabet matters for terms that use complement: `¬a` is finite over
    /// the alphabet `{a}` and infinite over `{a, b}`.
    ///
    /// # Errors
    ///
    /// - [Error::Alphabet] if a literal of e contains a symbol not in `alphabet`
    /// - [Error::NonTerminatingConstruction] if the automaton is too large.
    ///
    pub fn is_finite(&mut self, e: TermId, alphabet: &Alphabet) -> Result<bool> {
        Ok(self.compile(e, alphabet)?.is_finite())
    }

    ///
    /// Check whether two terms define the same language
    ///
    /// Both terms are compiled over the union of `alphabet` and the
    /// symbols of both terms.
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::{terms::*, symbols::Alphabet};
    ///
    /// let tm = &mut TermManager::new();
    /// let a = tm.symbol('a');
    /// let b = tm.symbol('b');
    /// let a_or_b = tm.union(a, b);
    /// let ab = tm.one_of("ab");
    /// assert_eq!(tm.equivalent(a_or_b, ab, &Alphabet::default()), Ok(true));
    /// assert_eq!(tm.equivalent(a, b, &Alphabet::default()), Ok(false));
    /// ```
    ///
    /// # Errors
    ///
    /// Return [Error::NonTerminatingConstruction] if an automaton is too large.
    ///
    pub fn equivalent(&mut self, e1: TermId, e2: TermId, alphabet: &Alphabet) -> Result<bool> {
        if e1 == e2 {
            return Ok(true);
        }
        let (a1, a2) = self.compile_pair(e1, e2, alphabet)?;
        a1.equivalent(&a2)
    }

    ///
    /// Check whether the language of e1 is included in the language of e2
    ///
    /// See [equivalent](Self::equivalent) for the alphabet.
    ///
    /// # Errors
    ///
    /// Return [Error::NonTerminatingConstruction] if an automaton is too large.
    ///
    pub fn is_subset(&mut self, e1: TermId, e2: TermId, alphabet: &Alphabet) -> Result<bool> {
        if e1 == e2 {
            return Ok(true);
        }
        let (a1, a2) = self.compile_pair(e1, e2, alphabet)?;
        a1.is_subset_of(&a2)
    }
}
