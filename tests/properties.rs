// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for terms, automata, and generation
//!
//! Random terms over the alphabet {a, b} are compared against a brute-force
//! reading of their languages on all short strings.

use std::collections::BTreeSet;

use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use reglang_derivatives::{
    analysis::LengthBound,
    automata::{Automaton, BuildLimits},
    generation::Generator,
    symbols::{Alphabet, SymbolSet},
    terms::{TermId, TermManager},
};

const SYMBOLS: [char; 2] = ['a', 'b'];
const MAX_LEN: usize = 4;

/// Shape of a term, independent of any manager
#[derive(Debug, Clone)]
enum Shape {
    Empty,
    Epsilon,
    Literal(Vec<char>),
    Concat(Box<Shape>, Box<Shape>),
    Union(Box<Shape>, Box<Shape>),
    Inter(Box<Shape>, Box<Shape>),
    Not(Box<Shape>),
    Star(Box<Shape>),
    Repeat(Box<Shape>, u32, u32),
}

fn build(tm: &mut TermManager, shape: &Shape) -> TermId {
    match shape {
        Shape::Empty => tm.empty(),
        Shape::Epsilon => tm.epsilon(),
        Shape::Literal(s) => tm.literal(SymbolSet::new(s.iter().copied())),
        Shape::Concat(x, y) => {
            let x = build(tm, x);
            let y = build(tm, y);
            tm.concat(x, y)
        }
        Shape::Union(x, y) => {
            let x = build(tm, x);
            let y = build(tm, y);
            tm.union(x, y)
        }
        Shape::Inter(x, y) => {
            let x = build(tm, x);
            let y = build(tm, y);
            tm.inter(x, y)
        }
        Shape::Not(x) => {
            let x = build(tm, x);
            tm.negation(x)
        }
        Shape::Star(x) => {
            let x = build(tm, x);
            tm.star(x)
        }
        Shape::Repeat(x, min, max) => {
            let x = build(tm, x);
            tm.repeat(x, *min, *max).unwrap()
        }
    }
}

/// Generate random term shapes with bounded depth
fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Empty),
        Just(Shape::Epsilon),
        prop::sample::subsequence(SYMBOLS.to_vec(), 1..=2).prop_map(Shape::Literal),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(x, y)| Shape::Concat(Box::new(x), Box::new(y))),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| Shape::Union(Box::new(x), Box::new(y))),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| Shape::Inter(Box::new(x), Box::new(y))),
            inner.clone().prop_map(|x| Shape::Not(Box::new(x))),
            inner.clone().prop_map(|x| Shape::Star(Box::new(x))),
            (inner, 0u32..3, 0u32..3).prop_map(|(x, min, k)| Shape::Repeat(Box::new(x), min, min + k)),
        ]
    })
}

/// All strings over {a, b} of length at most n
fn all_strings(n: usize) -> Vec<String> {
    let mut result = vec![String::new()];
    let mut start = 0;
    for _ in 0..n {
        let end = result.len();
        for i in start..end {
            for &c in &SYMBOLS {
                let mut w = result[i].clone();
                w.push(c);
                result.push(w);
            }
        }
        start = end;
    }
    result
}

/// Language of a term restricted to strings of length at most MAX_LEN
fn language(tm: &mut TermManager, e: TermId) -> BTreeSet<String> {
    all_strings(MAX_LEN)
        .into_iter()
        .filter(|w| tm.matches(e, w))
        .collect()
}

fn manager() -> TermManager {
    TermManager::with_limits(BuildLimits::new(10_000))
}

fn compile(tm: &mut TermManager, e: TermId) -> Automaton {
    tm.compile(e, &Alphabet::new(SYMBOLS.iter().copied())).unwrap()
}

fn enumerate(automaton: &Automaton) -> BTreeSet<String> {
    Generator::new(automaton).enumerate(MAX_LEN).collect()
}

proptest! {
    #[test]
    fn prop_nullable_is_empty_string_membership(shape in arb_shape()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        prop_assert_eq!(tm.nullable(e), tm.matches(e, ""));
        let s = tm.star(e);
        prop_assert!(tm.nullable(s));
        let n = tm.negation(e);
        prop_assert_eq!(tm.nullable(n), !tm.nullable(e));
    }

    #[test]
    fn prop_derivative_is_left_quotient(shape in arb_shape()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        for &c in &SYMBOLS {
            let d = tm.derivative(e, c);
            for w in all_strings(MAX_LEN - 1) {
                let cw = format!("{}{}", c, w);
                prop_assert_eq!(tm.matches(d, &w), tm.matches(e, &cw));
            }
        }
    }

    #[test]
    fn prop_automaton_agrees_with_term(shape in arb_shape()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        let automaton = compile(tm, e);
        for w in all_strings(MAX_LEN) {
            prop_assert_eq!(automaton.accepts(&w).unwrap(), tm.matches(e, &w));
        }
        prop_assert_eq!(enumerate(&automaton), language(tm, e));
    }

    #[test]
    fn prop_set_operations(s1 in arb_shape(), s2 in arb_shape()) {
        let tm = &mut manager();
        let e1 = build(tm, &s1);
        let e2 = build(tm, &s2);
        let l1 = language(tm, e1);
        let l2 = language(tm, e2);

        let u = tm.union(e1, e2);
        let i = tm.inter(e1, e2);
        let n = tm.negation(e1);
        let au = compile(tm, u);
        let ai = compile(tm, i);
        let an = compile(tm, n);

        let expected: BTreeSet<String> = l1.union(&l2).cloned().collect();
        prop_assert_eq!(enumerate(&au), expected);
        let expected: BTreeSet<String> = l1.intersection(&l2).cloned().collect();
        prop_assert_eq!(enumerate(&ai), expected);
        let expected: BTreeSet<String> = all_strings(MAX_LEN)
            .into_iter()
            .filter(|w| !l1.contains(w))
            .collect();
        prop_assert_eq!(enumerate(&an), expected);
    }

    #[test]
    fn prop_concatenation(s1 in arb_shape(), s2 in arb_shape()) {
        let tm = &mut manager();
        let e1 = build(tm, &s1);
        let e2 = build(tm, &s2);
        let l1 = language(tm, e1);
        let l2 = language(tm, e2);
        let c = tm.concat(e1, e2);
        let ac = compile(tm, c);

        let mut expected = BTreeSet::new();
        for x in &l1 {
            for y in &l2 {
                if x.len() + y.len() <= MAX_LEN {
                    expected.insert(format!("{}{}", x, y));
                }
            }
        }
        prop_assert_eq!(enumerate(&ac), expected);
    }

    #[test]
    fn prop_counts_match_enumeration(shape in arb_shape()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        let automaton = compile(tm, e);
        let mut g = Generator::new(&automaton);
        for n in 0..=MAX_LEN {
            let total = g.count_up_to(n);
            let listed = g.enumerate(n).count();
            prop_assert_eq!(total, BigUint::from(listed));
        }
    }

    #[test]
    fn prop_generated_strings_are_accepted(shape in arb_shape(), seed in any::<u64>()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        let automaton = compile(tm, e);
        let mut g = Generator::new(&automaton);
        let mut rng = StdRng::seed_from_u64(seed);
        for n in 0..=MAX_LEN {
            match g.generate_string(n, &mut rng) {
                Some(w) => {
                    prop_assert_eq!(w.chars().count(), n);
                    prop_assert!(tm.matches(e, &w));
                }
                None => prop_assert_eq!(g.count_accepted(n), BigUint::from(0u32)),
            }
        }
    }

    #[test]
    fn prop_de_morgan(s1 in arb_shape(), s2 in arb_shape()) {
        let tm = &mut manager();
        let alphabet = Alphabet::new(SYMBOLS.iter().copied());
        let e1 = build(tm, &s1);
        let e2 = build(tm, &s2);
        let u = tm.union(e1, e2);
        let left = tm.negation(u);
        let n1 = tm.negation(e1);
        let n2 = tm.negation(e2);
        let right = tm.inter(n1, n2);
        prop_assert_eq!(tm.equivalent(left, right, &alphabet), Ok(true));

        let i = tm.inter(e1, e2);
        prop_assert_eq!(tm.is_subset(i, e1, &alphabet), Ok(true));
        prop_assert_eq!(tm.is_subset(e2, u, &alphabet), Ok(true));
    }

    #[test]
    fn prop_rebuild_is_isomorphic(shape in arb_shape()) {
        let tm1 = &mut manager();
        let e1 = build(tm1, &shape);
        let a1 = compile(tm1, e1);
        // extra terms in the second manager shift the ids
        let tm2 = &mut manager();
        let _ = tm2.string("abba");
        let e2 = build(tm2, &shape);
        let a2 = compile(tm2, e2);
        prop_assert!(a1.isomorphic(&a2));
        prop_assert_eq!(a1.num_states(), a2.num_states());
    }

    #[test]
    fn prop_finiteness_matches_length_bound(shape in arb_shape()) {
        let tm = &mut manager();
        let e = build(tm, &shape);
        let automaton = compile(tm, e);
        let mut g = Generator::new(&automaton);
        match automaton.length_bound() {
            LengthBound::Empty => {
                prop_assert!(automaton.is_empty());
                prop_assert!(g.valid_lengths(MAX_LEN).is_empty());
            }
            LengthBound::Bounded(m) => {
                // the longest string visits each state at most once
                prop_assert!(automaton.is_finite());
                prop_assert!(m < automaton.num_states());
                prop_assert!(g.count_accepted(m) > BigUint::from(0u32));
                let lengths = g.valid_lengths(m);
                prop_assert_eq!(lengths.last(), Some(&m));
            }
            LengthBound::Unbounded => {
                prop_assert!(!automaton.is_finite());
                // an infinite language has a string of length between n and 2n
                let n = automaton.num_states();
                prop_assert!(!g.valid_lengths(2 * n).iter().all(|&k| k < n));
            }
        }
    }
}
