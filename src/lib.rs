// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Regular languages via derivatives
//!
//! # Overview
//!
//! This crate represents regular expressions as hash-consed terms and manipulates them
//! algebraically: union, intersection, complement, concatenation, and bounded or unbounded
//! repetition are all first-class operations. Terms are built by a
//! [TermManager](crate::terms::TermManager), which normalizes them so that equal terms
//! share a single [TermId](crate::terms::TermId).
//!
//! The key operation is the Brzozowski derivative. Module [terms](crate::terms) implements
//! derivatives and uses them to compile terms to deterministic finite-state automata over
//! an explicit [Alphabet](crate::symbols::Alphabet). Module [automata](crate::automata)
//! defines the automaton type.
//!
//! On automata, module [analysis](crate::analysis) decides emptiness, finiteness, equivalence,
//! and inclusion. Module [generation](crate::generation) counts the strings of each length
//! with exact arithmetic, samples strings uniformly at random, and enumerates all strings up
//! to a given length. Module [graph](crate::graph) builds a labeled graph of an automaton
//! for display.
//!
//! # Example
//!
//! ```
//! use reglang_derivatives::{generation::Generator, symbols::Alphabet, terms::*};
//!
//! let tm = &mut TermManager::new();
//! let abc = Alphabet::from("abc");
//!
//! // strings that contain "ab" but don't end with "c"
//! let any = tm.any_of(&abc);
//! let any_star = tm.star(any);
//! let ab = tm.string("ab");
//! let contains_ab = tm.concat_list(vec![any_star, ab, any_star]);
//! let c = tm.symbol('c');
//! let ends_with_c = tm.concat(any_star, c);
//! let e = tm.difference(contains_ab, ends_with_c);
//!
//! let automaton = tm.compile(e, &abc).unwrap();
//! assert!(!automaton.is_empty());
//! assert!(!automaton.is_finite());
//!
//! let mut generator = Generator::new(&automaton);
//! let words: Vec<String> = generator.enumerate(3).collect();
//! assert_eq!(words, vec!["ab", "aab", "aba", "abb", "bab", "cab"]);
//! ```
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod analysis;
pub mod automata;
pub mod errors;
pub mod generation;
pub mod graph;
pub mod symbols;
pub mod terms;

mod store;
mod work_queues;
