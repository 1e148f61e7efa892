// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Counting, random generation, and enumeration of strings
//!
//! A [Generator] is attached to an automaton. It maintains a table of
//! exact counts: `count(s, k)` is the number of distinct strings of length `k`
//! that lead from state `s` to a final state. The table satisfies
//!
//! - `count(s, 0) = 1` if s is final and 0 otherwise,
//! - `count(s, k) = sum of count(delta(s, a), k - 1)` for all symbols `a`
//!   of the alphabet.
//!
//! Counts are arbitrary-precision integers. The table is built bottom-up
//! and extended on demand to the largest length requested so far.
//!
//! Random strings are sampled uniformly: each string of length `n` in the language
//! is produced with probability `1/count(initial, n)`. [Enumeration] lists all the
//! strings of the language up to a given length, ordered by length then by
//! alphabet order.
//!

use std::iter::FusedIterator;

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use crate::{analysis::LengthBound, automata::Automaton, errors::*};

///
/// String generator for an automaton
///
/// # Example
///
/// ```
/// use num_bigint::BigUint;
/// use rand::{rngs::StdRng, SeedableRng};
/// use reglang_derivatives::{terms::*, generation::Generator, symbols::Alphabet};
///
/// let tm = &mut TermManager::new();
/// let a = tm.symbol('a');
/// let bb = tm.string("bb");
/// let u = tm.union(a, bb);
/// let e = tm.star(u);     // (a + bb)*
/// let automaton = tm.compile(e, &Alphabet::from("ab")).unwrap();
///
/// let mut generator = Generator::new(&automaton);
/// assert_eq!(generator.count_accepted(4), BigUint::from(5u32));
///
/// let mut rng = StdRng::seed_from_u64(1234);
/// let s = generator.generate_string(4, &mut rng).unwrap();
/// assert!(["aaaa", "aabb", "abba", "bbaa", "bbbb"].contains(&s.as_str()));
///
/// let all: Vec<String> = generator.enumerate(2).collect();
/// assert_eq!(all, vec!["", "a", "aa", "bb"]);
/// ```
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    automaton: &'a Automaton,
    bound: LengthBound,
    // states reachable from the initial state: they don't accept strings longer than bound
    reachable: Vec<bool>,
    // counts[k][s] = number of strings of length k accepted from state s
    counts: Vec<Box<[BigUint]>>,
}

impl<'a> Generator<'a> {
    /// Create a generator for an automaton
    pub fn new(automaton: &'a Automaton) -> Self {
        let base = automaton
            .states()
            .map(|s| {
                if s.is_final() {
                    BigUint::one()
                } else {
                    BigUint::zero()
                }
            })
            .collect();
        Generator {
            automaton,
            bound: automaton.length_bound(),
            reachable: automaton.reachable_states(),
            counts: vec![base],
        }
    }

    /// Create a generator and fill its table up to length `n`
    pub fn with_max_length(automaton: &'a Automaton, n: usize) -> Self {
        let mut g = Self::new(automaton);
        g.extend_to(n);
        g
    }

    /// The automaton
    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    /// Largest length for which counts are known
    pub fn max_length(&self) -> usize {
        self.counts.len() - 1
    }

    /// Extend the count table to length n
    pub fn extend_to(&mut self, n: usize) {
        if n <= self.max_length() {
            return;
        }
        let previous = self.max_length();
        let a = self.automaton;
        while self.counts.len() <= n {
            let last = &self.counts[self.counts.len() - 1];
            let next: Box<[BigUint]> = (0..a.num_states())
                .map(|s| a.successors(s).iter().map(|&d| &last[d]).sum::<BigUint>())
                .collect();
            self.counts.push(next);
        }
        debug!(
            "count table extended from length {} to {} ({} states)",
            previous,
            n,
            a.num_states()
        );
    }

    /// Number of strings of length k accepted from a state
    ///
    /// The table is not extended when k is larger than the longest string
    /// accepted from a reachable state.
    ///
    /// # Panics
    ///
    /// If state is not a valid state id.
    pub fn count(&mut self, state: usize, k: usize) -> BigUint {
        if self.reachable[state] && self.beyond_bound(k) {
            return BigUint::zero();
        }
        self.extend_to(k);
        self.counts[k][state].clone()
    }

    /// Number of strings of length n in the language
    pub fn count_accepted(&mut self, n: usize) -> BigUint {
        if self.beyond_bound(n) {
            return BigUint::zero();
        }
        let init = self.automaton.initial_state().id();
        self.count(init, n)
    }

    /// Number of strings of length at most n in the language
    pub fn count_up_to(&mut self, n: usize) -> BigUint {
        (0..=n).map(|k| self.count_accepted(k)).sum()
    }

    /// Lengths between 0 and n for which the language contains at least one string
    pub fn valid_lengths(&mut self, n: usize) -> Vec<usize> {
        (0..=n).filter(|&k| !self.count_accepted(k).is_zero()).collect()
    }

    ///
    /// Number of strings of the language that start with `prefix` and have
    /// `k` symbols after it
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if a character of prefix is not in the alphabet.
    ///
    pub fn count_completions(&mut self, prefix: &str, k: usize) -> Result<BigUint> {
        let s = self.automaton.run(self.automaton.initial_state(), prefix)?.id();
        if self.beyond_bound(prefix.chars().count().saturating_add(k)) {
            return Ok(BigUint::zero());
        }
        Ok(self.count(s, k))
    }

    // true if no string of length n can be accepted
    // (nor any suffix of length n from a reachable state)
    fn beyond_bound(&self, n: usize) -> bool {
        match self.bound {
            LengthBound::Empty => true,
            LengthBound::Bounded(m) => n > m,
            LengthBound::Unbounded => false,
        }
    }

    // walk n steps from state s, choosing symbols with probability proportional
    // to the counts, and append the symbols to result
    fn sample_from<R: Rng + ?Sized>(
        &mut self,
        mut s: usize,
        n: usize,
        rng: &mut R,
        result: &mut String,
    ) -> bool {
        self.extend_to(n);
        if self.counts[n][s].is_zero() {
            return false;
        }
        let a = self.automaton;
        for remaining in (1..=n).rev() {
            let mut x = rng.gen_biguint_below(&self.counts[remaining][s]);
            let row = &self.counts[remaining - 1];
            for (k, &d) in a.successors(s).iter().enumerate() {
                let w = &row[d];
                if x < *w {
                    result.push(a.alphabet().symbol(k));
                    s = d;
                    break;
                }
                x -= w;
            }
        }
        debug_assert!(a.state(s).is_final());
        true
    }

    ///
    /// Random string of length n, drawn uniformly from the strings of length n
    /// of the language
    /// - return None if there's no string of length n in the language
    ///
    pub fn generate_string<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Option<String> {
        if self.beyond_bound(n) {
            return None;
        }
        let mut result = String::new();
        let init = self.automaton.initial_state().id();
        if self.sample_from(init, n, rng, &mut result) {
            Some(result)
        } else {
            None
        }
    }

    ///
    /// Random string of the language of the form `prefix.w` where w has length n
    /// - all such strings have the same probability
    /// - return None if there's no such string
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if a character of prefix is not in the alphabet.
    ///
    pub fn generate_with_prefix<R: Rng + ?Sized>(
        &mut self,
        prefix: &str,
        n: usize,
        rng: &mut R,
    ) -> Result<Option<String>> {
        let s = self.automaton.run(self.automaton.initial_state(), prefix)?.id();
        if self.beyond_bound(prefix.chars().count().saturating_add(n)) {
            return Ok(None);
        }
        let mut result = prefix.to_string();
        if self.sample_from(s, n, rng, &mut result) {
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    ///
    /// Iterator: all strings of the language of length at most max_length
    ///
    /// Strings are produced in increasing length order. Strings of the same length
    /// are ordered lexicographically, using the alphabet order.
    ///
    pub fn enumerate(&mut self, max_length: usize) -> Enumeration<'_> {
        // no need to count beyond the longest string
        let table_length = match self.bound {
            LengthBound::Empty => 0,
            LengthBound::Bounded(m) => m.min(max_length),
            LengthBound::Unbounded => max_length,
        };
        self.extend_to(table_length);
        Enumeration {
            automaton: self.automaton,
            counts: &self.counts,
            max_length: table_length.min(max_length),
            empty: self.bound == LengthBound::Empty,
            length: 0,
            stack: Vec::new(),
            prefix: Vec::new(),
        }
    }
}

///
/// Enumeration of the strings of a language
///
/// See [Generator::enumerate]. The enumeration is lazy: strings are constructed
/// one at a time by a depth-first walk of the automaton that skips transitions
/// with zero count. Cloning an enumeration gives an independent iterator
/// that resumes from the same point.
///
#[derive(Debug, Clone)]
pub struct Enumeration<'a> {
    automaton: &'a Automaton,
    counts: &'a [Box<[BigUint]>],
    max_length: usize,
    empty: bool,
    // length of the strings being produced
    length: usize,
    // stack of (state, index of the next symbol to try)
    stack: Vec<(usize, usize)>,
    // symbols along the current path
    prefix: Vec<char>,
}

impl Enumeration<'_> {
    /// Restart the enumeration from the beginning
    pub fn reset(&mut self) {
        self.length = 0;
        self.stack.clear();
        self.prefix.clear();
    }

    fn backtrack(&mut self) {
        self.stack.pop();
        if self.stack.is_empty() {
            self.length += 1;
        } else {
            self.prefix.pop();
        }
    }
}

impl Iterator for Enumeration<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.empty {
            return None;
        }
        let a = self.automaton;
        let init = a.initial_state().id();
        loop {
            if self.stack.is_empty() {
                if self.length > self.max_length {
                    return None;
                }
                if self.counts[self.length][init].is_zero() {
                    self.length += 1;
                    continue;
                }
                self.stack.push((init, 0));
            }
            let remaining = self.length + 1 - self.stack.len();
            if remaining == 0 {
                let word = self.prefix.iter().collect();
                self.backtrack();
                return Some(word);
            }
            let top = self.stack.len() - 1;
            let (s, k) = self.stack[top];
            if k < a.alphabet().len() {
                self.stack[top].1 += 1;
                let d = a.successor(s, k);
                if !self.counts[remaining - 1][d].is_zero() {
                    self.stack.push((d, 0));
                    self.prefix.push(a.alphabet().symbol(k));
                }
            } else {
                self.backtrack();
            }
        }
    }
}

impl FusedIterator for Enumeration<'_> {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{symbols::Alphabet, terms::*};

    // (a + bb + ccc)*
    fn abc_loop(tm: &mut TermManager) -> TermId {
        let a = tm.symbol('a');
        let bb = tm.string("bb");
        let ccc = tm.string("ccc");
        let u = tm.union_list(vec![a, bb, ccc]);
        tm.star(u)
    }

    #[test]
    fn counts() {
        let tm = &mut TermManager::new();
        let e = abc_loop(tm);
        let automaton = tm.compile(e, &Alphabet::from("abc")).unwrap();
        let mut g = Generator::new(&automaton);
        // f(n) = f(n-1) + f(n-2) + f(n-3)
        let expected: [u32; 8] = [1, 1, 2, 4, 7, 13, 24, 44];
        for (n, &x) in expected.iter().enumerate() {
            assert_eq!(g.count_accepted(n), BigUint::from(x));
        }
        assert_eq!(g.max_length(), 7);
        assert_eq!(g.count_up_to(3), BigUint::from(8u32));
        assert_eq!(g.count_completions("bb", 1), Ok(BigUint::one()));
        assert_eq!(g.count_completions("b", 1), Ok(BigUint::one()));
        assert_eq!(g.count_completions("cc", 0), Ok(BigUint::zero()));
        assert_eq!(g.count_completions("x", 0), Err(Error::Alphabet('x')));

        // large counts don't overflow
        let big = g.count_accepted(200);
        assert!(big > BigUint::from(u64::MAX));
    }

    #[test]
    fn enumeration_order() {
        let tm = &mut TermManager::new();
        let e = abc_loop(tm);
        let automaton = tm.compile(e, &Alphabet::from("abc")).unwrap();
        let mut g = Generator::new(&automaton);
        let all: Vec<String> = g.enumerate(3).collect();
        assert_eq!(
            all,
            vec!["", "a", "aa", "bb", "aaa", "abb", "bba", "ccc"]
        );

        let mut it = g.enumerate(5);
        let first: Vec<String> = it.by_ref().take(3).collect();
        let copy = it.clone();
        let rest: Vec<String> = it.collect();
        assert_eq!(first, vec!["", "a", "aa"]);
        assert_eq!(copy.collect::<Vec<_>>(), rest);
        // 28 strings of length at most 5
        assert_eq!(rest.len(), 28 - 3);
    }

    #[test]
    fn enumeration_restart() {
        let tm = &mut TermManager::new();
        let e = tm.one_of("xy");
        let automaton = tm.compile(e, &Alphabet::from("xyz")).unwrap();
        let mut g = Generator::new(&automaton);
        let mut it = g.enumerate(10);
        assert_eq!(it.next().as_deref(), Some("x"));
        assert_eq!(it.next().as_deref(), Some("y"));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        it.reset();
        assert_eq!(it.next().as_deref(), Some("x"));
    }

    #[test]
    fn enumeration_sizes() {
        let tm = &mut TermManager::new();
        let a = tm.symbol('a');
        let b = tm.symbol('b');
        let a_star = tm.star(a);
        let ab = tm.concat(a_star, b);
        let e = tm.negation(ab);
        let automaton = tm.compile(e, &Alphabet::from("ab")).unwrap();
        let mut g = Generator::new(&automaton);
        for n in 0..6 {
            let k = g.enumerate(n).count();
            assert_eq!(BigUint::from(k), g.count_up_to(n));
        }
    }

    #[test]
    fn negation_at_length_two() {
        // seven strings of length 2 over {a, b, c} are not ab or ba
        let tm = &mut TermManager::new();
        let ab = tm.string("ab");
        let ba = tm.string("ba");
        let u = tm.union(ab, ba);
        let e = tm.negation(u);
        let automaton = tm.compile(e, &Alphabet::from("abc")).unwrap();
        let mut g = Generator::new(&automaton);
        assert_eq!(g.count_accepted(2), BigUint::from(7u32));
        let words: Vec<String> = g.enumerate(2).filter(|w| w.len() == 2).collect();
        assert_eq!(words, vec!["aa", "ac", "bb", "bc", "ca", "cb", "cc"]);
    }

    #[test]
    fn empty_and_finite_languages() {
        let tm = &mut TermManager::new();
        let empty = tm.empty();
        let automaton = tm.compile(empty, &Alphabet::from("ab")).unwrap();
        let mut g = Generator::new(&automaton);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(g.generate_string(0, &mut rng), None);
        assert_eq!(g.generate_string(3, &mut rng), None);
        assert_eq!(g.enumerate(4).next(), None);
        assert!(g.valid_lengths(5).is_empty());

        let hello = tm.string("hello");
        let automaton = tm.compile_inferred(hello).unwrap();
        let mut g = Generator::new(&automaton);
        assert_eq!(g.generate_string(5, &mut rng).as_deref(), Some("hello"));
        assert_eq!(g.generate_string(4, &mut rng), None);
        assert_eq!(g.generate_string(1000, &mut rng), None);
        // no table growth beyond the longest string
        assert_eq!(g.max_length(), 5);
        assert_eq!(g.valid_lengths(10), vec![5]);
        assert_eq!(g.enumerate(100).collect::<Vec<_>>(), vec!["hello"]);

        let a = tm.symbol('a');
        let a_star = tm.star(a);
        let automaton = tm.compile_inferred(a_star).unwrap();
        let mut g = Generator::new(&automaton);
        assert_eq!(g.generate_string(0, &mut rng).as_deref(), Some(""));
        assert_eq!(g.generate_string(3, &mut rng).as_deref(), Some("aaa"));
        assert_eq!(g.valid_lengths(3), vec![0, 1, 2, 3]);
    }

    #[test]
    fn uniform_generation() {
        let tm = &mut TermManager::new();
        let e = abc_loop(tm);
        let automaton = tm.compile(e, &Alphabet::from("abc")).unwrap();
        let mut g = Generator::new(&automaton);
        let mut rng = StdRng::seed_from_u64(42);
        let mut freq: HashMap<String, usize> = HashMap::new();
        let trials = 8000;
        for _ in 0..trials {
            let s = g.generate_string(3, &mut rng).unwrap();
            *freq.entry(s).or_insert(0) += 1;
        }
        println!("frequencies: {:?}", freq);
        assert_eq!(freq.len(), 4);
        for (s, &n) in &freq {
            assert!(tm.matches(e, s));
            // expected 2000 each
            assert!((1700..2300).contains(&n), "{} generated {} times", s, n);
        }
    }

    #[test]
    fn prefix_generation() {
        let tm = &mut TermManager::new();
        let e = abc_loop(tm);
        let automaton = tm.compile(e, &Alphabet::from("abc")).unwrap();
        let mut g = Generator::new(&automaton);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let s = g.generate_with_prefix("cc", 4, &mut rng).unwrap().unwrap();
            assert!(s.starts_with("ccc"));
            assert_eq!(s.len(), 6);
            assert!(tm.matches(e, &s));
        }
        assert_eq!(g.generate_with_prefix("b", 0, &mut rng), Ok(None));
        assert_eq!(
            g.generate_with_prefix("bz", 1, &mut rng),
            Err(Error::Alphabet('z'))
        );
    }

    #[test]
    fn finite_language_table() {
        let tm = &mut TermManager::new();
        let ab = tm.string("ab");
        let automaton = tm.compile(ab, &Alphabet::from("ab")).unwrap();
        let mut g = Generator::new(&automaton);
        let mut rng = StdRng::seed_from_u64(3);
        let init = automaton.initial_state().id();

        // lengths past the longest string don't grow the table
        assert_eq!(g.generate_with_prefix("a", 2_000_000, &mut rng), Ok(None));
        assert_eq!(g.count_completions("a", 2_000_000), Ok(BigUint::zero()));
        assert_eq!(g.count(init, 1_000_000), BigUint::zero());
        assert_eq!(g.count_accepted(usize::MAX), BigUint::zero());
        assert_eq!(g.max_length(), 0);

        assert_eq!(
            g.generate_with_prefix("a", 1, &mut rng),
            Ok(Some("ab".to_string()))
        );
        assert_eq!(g.count_completions("", 2), Ok(BigUint::one()));
        assert_eq!(g.count_completions("b", 1), Ok(BigUint::zero()));
        assert!(g.max_length() <= 2);
    }
}
