// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Regular-language terms
//!
//! This module defines the abstract syntax of terms [BaseTerm] and the
//! stored term type [Term]. Terms are built using a [TermManager], which
//! provides hash consing: every term is identified by a [TermId] and two
//! terms with the same canonical syntax have the same id.
//!
//! The constructors of [TermManager] normalize their result before
//! hash-consing it (e.g., unions are flattened, sorted, and stripped of
//! duplicates). This normalization never changes the language of a term.
//! It's incomplete: two terms with different ids may still denote the same
//! language. But it's enough to ensure that the set of derivatives of any term
//! is finite, which is what the automaton construction requires.
//!
//! [TermManager] also implements the *derivative* operation. The derivative of a
//! term R with respect to a symbol c is another term S that defines all the strings
//! that can follow c in the language of R. For example, the derivative of
//! `(ab + b)*` with respect to `a` is `b(ab + b)*`.
//!
//! Derivatives allow one to convert terms to deterministic automata (see
//! [compile](TermManager::compile)) and to check whether a string belongs to
//! the language of a term (see [matches](TermManager::matches)).
//!

use std::collections::HashMap;
use std::fmt::Display;

use log::{debug, trace, warn};

use crate::automata::{Automaton, AutomatonBuilder, BuildLimits};
use crate::errors::*;
use crate::store::*;
use crate::symbols::*;
use crate::work_queues::IndexQueue;

///
/// Handle to a term stored in a [TermManager]
///
/// Ids are assigned in creation order. A term's children always have
/// smaller ids than the term itself.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(usize);

impl TermId {
    /// Index of this term in its manager
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
///
/// Abstract syntax for terms
///
pub enum BaseTerm {
    /// Empty language
    EmptySet,

    /// The language that contains only the empty string
    EmptyString,

    /// Strings of length one whose symbol is in a set
    Literal(SymbolSet),

    /// Concatenation of two languages
    Concat(TermId, TermId),

    /// Union of two or more languages
    Union(Box<[TermId]>),

    /// Intersection of two or more languages
    Inter(Box<[TermId]>),

    /// Complement of a language
    Negation(TermId),

    /// Kleene closure
    Star(TermId),

    /// Repetition between `min` and `max` times (inclusive)
    Repeat(TermId, u32, u32),
}

impl BaseTerm {
    /// Check whether this term is EmptySet, EmptyString or a Literal
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            BaseTerm::EmptySet | BaseTerm::EmptyString | BaseTerm::Literal(_)
        )
    }

    /// Direct sub-terms
    pub fn children(&self) -> Vec<TermId> {
        let mut v = Vec::new();
        self.push_children(&mut v);
        v
    }

    fn push_children(&self, v: &mut Vec<TermId>) {
        match self {
            BaseTerm::EmptySet | BaseTerm::EmptyString | BaseTerm::Literal(_) => (),
            BaseTerm::Concat(left, right) => {
                v.push(*left);
                v.push(*right);
            }
            BaseTerm::Union(args) | BaseTerm::Inter(args) => v.extend_from_slice(args),
            BaseTerm::Negation(t) | BaseTerm::Star(t) | BaseTerm::Repeat(t, ..) => v.push(*t),
        }
    }
}

///
/// Stored term
///
/// A term includes its abstract syntax tree and its unique id.
///
#[derive(Debug)]
pub struct Term {
    expr: BaseTerm,
    id: TermId,
}

impl Term {
    /// Abstract syntax tree
    pub fn expr(&self) -> &BaseTerm {
        &self.expr
    }

    /// Unique id
    pub fn id(&self) -> TermId {
        self.id
    }
}

impl HashConsed for Term {
    type Key = BaseTerm;

    fn make(index: usize, k: &Self::Key) -> Self {
        Term {
            expr: k.clone(),
            id: TermId(index),
        }
    }
}

/// A store for constructing terms using hash-consing.
///
/// For all terms t1 and t2 built by the same manager, we have
/// expr(t1) == expr(t2) iff t1 == t2.
///
/// The manager also keeps a cache of derivatives, which is shared by
/// all automaton constructions that go through it.
///
/// # Example
///
/// ```
/// use reglang_derivatives::terms::*;
///
/// let tm = &mut TermManager::new();
/// let ab = tm.string("ab");
/// let b = tm.symbol('b');
/// let sum = tm.union(ab, b);    // ab + b
/// let e = tm.star(sum);         // (ab + b)*
///
/// let d1 = tm.derivative(e, 'b'); // derivative of e w.r.t. 'b'
/// assert_eq!(d1, e);
///
/// let d2 = tm.derivative(e, 'a'); // b(ab + b)*
/// assert!(tm.matches(d2, "bbab"));
/// assert!(!tm.nullable(d2));
/// ```
#[derive(Debug)]
pub struct TermManager {
    store: Store<Term>,
    nullable: Vec<bool>, // nullable[i] = whether term i contains the empty string
    empty: TermId,
    epsilon: TermId,
    full: TermId, // complement of empty
    deriv_cache: HashMap<(TermId, char), TermId>,
    limits: BuildLimits,
}

/// collect the operands of a union
fn flatten_union(tm: &TermManager, t: TermId, v: &mut Vec<TermId>) {
    match tm.expr(t) {
        BaseTerm::Union(args) => v.extend_from_slice(args),
        _ => v.push(t),
    }
}

/// collect the operands of an intersection
fn flatten_inter(tm: &TermManager, t: TermId, v: &mut Vec<TermId>) {
    match tm.expr(t) {
        BaseTerm::Inter(args) => v.extend_from_slice(args),
        _ => v.push(t),
    }
}

impl TermManager {
    /// Create a new manager with default [BuildLimits]
    pub fn new() -> Self {
        Self::with_limits(BuildLimits::default())
    }

    /// Create a new manager with the given limits on automaton construction
    pub fn with_limits(limits: BuildLimits) -> Self {
        let mut tm = TermManager {
            store: Store::new(),
            nullable: Vec::new(),
            empty: TermId(0),
            epsilon: TermId(0),
            full: TermId(0),
            deriv_cache: HashMap::new(),
            limits,
        };
        tm.empty = tm.make(BaseTerm::EmptySet);
        tm.epsilon = tm.make(BaseTerm::EmptyString);
        tm.full = tm.make(BaseTerm::Negation(tm.empty));
        tm
    }

    /// Limits used by [compile](Self::compile)
    pub fn limits(&self) -> BuildLimits {
        self.limits
    }

    /// Change the limits used by [compile](Self::compile)
    pub fn set_limits(&mut self, limits: BuildLimits) {
        self.limits = limits
    }

    /// Number of distinct terms built so far
    pub fn num_terms(&self) -> usize {
        self.store.len()
    }

    /// Number of derivatives in the cache
    pub fn num_cached_derivatives(&self) -> usize {
        self.deriv_cache.len()
    }

    ///
    /// Empty the derivative cache
    ///
    /// Terms stay valid. Derivatives are recomputed on demand after this call,
    /// and they have the same ids as before.
    ///
    pub fn clear_derivative_cache(&mut self) {
        debug!(
            "clearing {} cached derivatives ({} terms in store)",
            self.deriv_cache.len(),
            self.num_terms()
        );
        self.deriv_cache = HashMap::new();
    }

    /// Get a stored term
    ///
    /// # Panics
    ///
    /// If t was not created by this manager.
    pub fn term(&self, t: TermId) -> &Term {
        self.store.get(t.0)
    }

    /// Abstract syntax of a term
    pub fn expr(&self, t: TermId) -> &BaseTerm {
        &self.term(t).expr
    }

    /// Check whether the empty string belongs to the language of t
    pub fn nullable(&self, t: TermId) -> bool {
        self.nullable[t.0]
    }

    /// Object that formats t using [Display]
    pub fn show(&self, t: TermId) -> Show<'_> {
        Show {
            manager: self,
            term: t,
        }
    }

    fn compute_nullable(&self, e: &BaseTerm) -> bool {
        match e {
            BaseTerm::EmptySet => false,
            BaseTerm::EmptyString => true,
            BaseTerm::Literal(_) => false,
            BaseTerm::Concat(left, right) => self.nullable(*left) && self.nullable(*right),
            BaseTerm::Union(args) => args.iter().any(|&x| self.nullable(x)),
            BaseTerm::Inter(args) => args.iter().all(|&x| self.nullable(x)),
            BaseTerm::Negation(x) => !self.nullable(*x),
            BaseTerm::Star(_) => true,
            BaseTerm::Repeat(x, min, _) => *min == 0 || self.nullable(*x),
        }
    }

    /// Internal hash-consing constructor: no simplification
    fn make(&mut self, e: BaseTerm) -> TermId {
        let nullable = self.compute_nullable(&e);
        let i = self.store.make(e);
        if i == self.nullable.len() {
            self.nullable.push(nullable);
        }
        TermId(i)
    }

    //
    // CONSTRUCTORS
    //

    /// The empty language
    pub fn empty(&self) -> TermId {
        self.empty
    }

    /// The language that contains only the empty string
    pub fn epsilon(&self) -> TermId {
        self.epsilon
    }

    /// The full language
    ///
    /// This is the complement of [empty](Self::empty): for any alphabet,
    /// it contains all strings over that alphabet.
    pub fn full(&self) -> TermId {
        self.full
    }

    /// One-symbol strings whose symbol is in `set`
    /// - return the empty language if `set` is empty
    pub fn literal(&mut self, set: SymbolSet) -> TermId {
        if set.is_empty() {
            self.empty
        } else {
            self.make(BaseTerm::Literal(set))
        }
    }

    /// The one-symbol string `c`
    pub fn symbol(&mut self, c: char) -> TermId {
        self.literal(SymbolSet::singleton(c))
    }

    /// Any one of the symbols in `s` (like `[abc]`)
    pub fn one_of(&mut self, s: &str) -> TermId {
        self.literal(SymbolSet::from(s))
    }

    /// Any one symbol of an alphabet
    pub fn any_of(&mut self, alphabet: &Alphabet) -> TermId {
        self.literal(alphabet.to_set())
    }

    /// Any one symbol of an alphabet that is not in `set` (like `[^abc]`)
    pub fn none_of(&mut self, set: &SymbolSet, alphabet: &Alphabet) -> TermId {
        self.literal(alphabet.to_set().difference(set))
    }

    /// The language that contains the string `s` and nothing else
    pub fn string(&mut self, s: &str) -> TermId {
        let mut result = self.epsilon;
        for c in s.chars().rev() {
            let c = self.symbol(c);
            result = self.concat(c, result);
        }
        result
    }

    /// Concatenation of two languages
    ///
    /// Concatenations are kept right-associated: the left operand of a
    /// stored Concat is never itself a Concat.
    pub fn concat(&mut self, e1: TermId, e2: TermId) -> TermId {
        match (self.expr(e1), self.expr(e2)) {
            // empty . R --> empty
            (BaseTerm::EmptySet, _) | (_, BaseTerm::EmptySet) => self.empty,
            // epsilon . R --> R
            (BaseTerm::EmptyString, _) => e2,
            (_, BaseTerm::EmptyString) => e1,
            // S . full --> full if S is nullable
            _ if e2 == self.full && self.nullable(e1) => e2,
            _ => {
                // (x1 . (x2 . ... xn)) . e2 --> x1 . (x2 . ... (xn . e2))
                let mut spine = Vec::new();
                let mut last = e1;
                while let BaseTerm::Concat(x, y) = *self.expr(last) {
                    spine.push(x);
                    last = y;
                }
                let mut result = self.make(BaseTerm::Concat(last, e2));
                for &x in spine.iter().rev() {
                    result = self.make(BaseTerm::Concat(x, result));
                }
                result
            }
        }
    }

    /// Concatenation of multiple languages, in order
    /// - return [epsilon](Self::epsilon) if the list is empty
    pub fn concat_list(&mut self, a: impl IntoIterator<Item = TermId>) -> TermId {
        let v: Vec<TermId> = a.into_iter().collect();
        let mut result = self.epsilon;
        for &x in v.iter().rev() {
            result = self.concat(x, result);
        }
        result
    }

    // Union of the terms in v: no operand of v is a union
    fn make_union(&mut self, mut v: Vec<TermId>) -> TermId {
        // merge the literals into one
        let mut symbols: Option<SymbolSet> = None;
        v.retain(|&t| match self.store.get(t.0).expr() {
            BaseTerm::Literal(s) => {
                symbols = Some(match &symbols {
                    None => s.clone(),
                    Some(acc) => acc.union(s),
                });
                false
            }
            _ => true,
        });
        if let Some(s) = symbols {
            let lit = self.literal(s);
            v.push(lit);
        }

        v.sort_unstable();
        v.dedup();
        v.retain(|&t| t != self.empty);
        if v.contains(&self.full) || self.has_complementary_pair(&v) {
            return self.full;
        }
        // epsilon is redundant if another operand is nullable
        if v.len() >= 2 && v.contains(&self.epsilon) {
            let other_nullable = v.iter().any(|&t| t != self.epsilon && self.nullable(t));
            if other_nullable {
                let eps = self.epsilon;
                v.retain(|&t| t != eps);
            }
        }
        match v.len() {
            0 => self.empty,
            1 => v[0],
            _ => self.make(BaseTerm::Union(v.into())),
        }
    }

    // Intersection of the terms in v: no operand of v is an intersection
    fn make_inter(&mut self, mut v: Vec<TermId>) -> TermId {
        let mut symbols: Option<SymbolSet> = None;
        v.retain(|&t| match self.store.get(t.0).expr() {
            BaseTerm::Literal(s) => {
                symbols = Some(match &symbols {
                    None => s.clone(),
                    Some(acc) => acc.inter(s),
                });
                false
            }
            _ => true,
        });
        if let Some(s) = symbols {
            let lit = self.literal(s);
            v.push(lit);
        }

        v.sort_unstable();
        v.dedup();
        v.retain(|&t| t != self.full);
        if v.contains(&self.empty) || self.has_complementary_pair(&v) {
            return self.empty;
        }
        if v.contains(&self.epsilon) {
            // the intersection is either epsilon or empty
            return if v.iter().all(|&t| self.nullable(t)) {
                self.epsilon
            } else {
                self.empty
            };
        }
        match v.len() {
            0 => self.full,
            1 => v[0],
            _ => self.make(BaseTerm::Inter(v.into())),
        }
    }

    // check whether a sorted vector contains both X and complement(X)
    fn has_complementary_pair(&self, v: &[TermId]) -> bool {
        v.iter().any(|&t| match self.expr(t) {
            BaseTerm::Negation(x) => v.binary_search(x).is_ok(),
            _ => false,
        })
    }

    /// Union of two languages
    pub fn union(&mut self, e1: TermId, e2: TermId) -> TermId {
        let mut v = Vec::new();
        flatten_union(self, e1, &mut v);
        flatten_union(self, e2, &mut v);
        self.make_union(v)
    }

    /// Union of several languages
    /// - return the empty language if the list is empty
    pub fn union_list(&mut self, a: impl IntoIterator<Item = TermId>) -> TermId {
        let mut v = Vec::new();
        for t in a {
            flatten_union(self, t, &mut v);
        }
        self.make_union(v)
    }

    /// Intersection of two languages
    pub fn inter(&mut self, e1: TermId, e2: TermId) -> TermId {
        let mut v = Vec::new();
        flatten_inter(self, e1, &mut v);
        flatten_inter(self, e2, &mut v);
        self.make_inter(v)
    }

    /// Intersection of several languages
    /// - return the full language if the list is empty
    pub fn inter_list(&mut self, a: impl IntoIterator<Item = TermId>) -> TermId {
        let mut v = Vec::new();
        for t in a {
            flatten_inter(self, t, &mut v);
        }
        self.make_inter(v)
    }

    /// Complement of a language
    pub fn negation(&mut self, e: TermId) -> TermId {
        match self.expr(e) {
            BaseTerm::Negation(x) => *x,
            _ => self.make(BaseTerm::Negation(e)),
        }
    }

    /// Strings of `e1` that are not in `e2`
    pub fn difference(&mut self, e1: TermId, e2: TermId) -> TermId {
        let not_e2 = self.negation(e2);
        self.inter(e1, not_e2)
    }

    /// Kleene star
    pub fn star(&mut self, e: TermId) -> TermId {
        match self.expr(e) {
            BaseTerm::EmptySet | BaseTerm::EmptyString => self.epsilon,
            BaseTerm::Star(_) => e,
            _ => self.make(BaseTerm::Star(e)),
        }
    }

    /// One or more repetitions of `e`
    pub fn plus(&mut self, e: TermId) -> TermId {
        let s = self.star(e);
        self.concat(e, s)
    }

    /// Zero or one occurrence of `e`
    pub fn optional(&mut self, e: TermId) -> TermId {
        self.mk_repeat(e, 0, 1)
    }

    /// Between `min` and `max` repetitions of `e`
    ///
    /// # Errors
    ///
    /// Return [Error::InvalidTerm] if `min > max`.
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::{terms::*, errors::Error};
    ///
    /// let tm = &mut TermManager::new();
    /// let a = tm.symbol('a');
    /// let e = tm.repeat(a, 2, 3).unwrap();
    /// assert!(tm.matches(e, "aaa"));
    /// assert!(!tm.matches(e, "a"));
    ///
    /// assert_eq!(tm.repeat(a, 3, 2), Err(Error::InvalidTerm { min: 3, max: 2 }));
    /// ```
    pub fn repeat(&mut self, e: TermId, min: u32, max: u32) -> Result<TermId> {
        if min > max {
            Err(Error::InvalidTerm { min, max })
        } else {
            Ok(self.mk_repeat(e, min, max))
        }
    }

    /// `min` or more repetitions of `e`
    pub fn repeat_at_least(&mut self, e: TermId, min: u32) -> TermId {
        let prefix = self.mk_repeat(e, min, min);
        let s = self.star(e);
        self.concat(prefix, s)
    }

    // requires min <= max
    fn mk_repeat(&mut self, e: TermId, min: u32, max: u32) -> TermId {
        debug_assert!(min <= max);
        if max == 0 {
            // R{0,0} --> epsilon
            return self.epsilon;
        }
        // R{m,n} --> R{0,n} if R is nullable
        let min = if self.nullable(e) { 0 } else { min };
        if max == 1 && (min == 1 || self.nullable(e)) {
            return e;
        }
        match self.expr(e) {
            // (R*){m,n} --> R* when n > 0
            BaseTerm::Star(_) => e,
            BaseTerm::EmptySet => {
                if min == 0 {
                    self.epsilon
                } else {
                    self.empty
                }
            }
            BaseTerm::EmptyString => self.epsilon,
            _ => self.make(BaseTerm::Repeat(e, min, max)),
        }
    }

    //
    // DERIVATIVES
    //

    // terms whose derivative is needed to compute the derivative of t
    fn derivative_dependencies(&self, t: TermId) -> Vec<TermId> {
        match self.expr(t) {
            BaseTerm::Concat(left, right) => {
                if self.nullable(*left) {
                    vec![*left, *right]
                } else {
                    vec![*left]
                }
            }
            e => e.children(),
        }
    }

    // derivative of a term whose dependencies are all in the cache
    fn cached(&self, t: TermId, c: char) -> TermId {
        self.deriv_cache[&(t, c)]
    }

    fn combine_derivative(&mut self, t: TermId, c: char) -> TermId {
        match self.expr(t).clone() {
            BaseTerm::EmptySet | BaseTerm::EmptyString => self.empty,
            BaseTerm::Literal(s) => {
                if s.contains(c) {
                    self.epsilon
                } else {
                    self.empty
                }
            }
            BaseTerm::Concat(left, right) => {
                let d1 = self.cached(left, c);
                let d1 = self.concat(d1, right);
                if self.nullable(left) {
                    let d2 = self.cached(right, c);
                    self.union(d1, d2)
                } else {
                    d1
                }
            }
            BaseTerm::Union(args) => {
                let d: Vec<TermId> = args.iter().map(|&x| self.cached(x, c)).collect();
                self.union_list(d)
            }
            BaseTerm::Inter(args) => {
                let d: Vec<TermId> = args.iter().map(|&x| self.cached(x, c)).collect();
                self.inter_list(d)
            }
            BaseTerm::Negation(x) => {
                let d = self.cached(x, c);
                self.negation(d)
            }
            BaseTerm::Star(x) => {
                let d = self.cached(x, c);
                self.concat(d, t)
            }
            BaseTerm::Repeat(x, min, max) => {
                // max >= 1 since R{0,0} is epsilon
                let d = self.cached(x, c);
                let rest = self.mk_repeat(x, min.saturating_sub(1), max - 1);
                self.concat(d, rest)
            }
        }
    }

    ///
    /// Derivative with respect to a symbol
    ///
    /// The derivative of e with respect to c is a term e1 such that
    /// every string of e that starts with c is formed by concatenating c and
    /// a string of e1. So the language of e1 is
    ///  L(e1) = { w | c.w is in L(e) }
    ///
    /// Derivatives are cached. Sub-terms are processed with an explicit
    /// stack so deep terms don't exhaust the call stack.
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::terms::*;
    ///
    /// let tm = &mut TermManager::new();
    /// let abc = tm.string("abc");
    /// let acc = tm.string("acc");
    /// let e = tm.union(abc, acc);
    ///
    /// // the derivative of 'abc + acc' w.r.t. 'a' is 'bc + cc'
    /// let d = tm.derivative(e, 'a');
    /// let bc = tm.string("bc");
    /// let cc = tm.string("cc");
    /// assert_eq!(d, tm.union(bc, cc));
    /// ```
    pub fn derivative(&mut self, e: TermId, c: char) -> TermId {
        if let Some(&d) = self.deriv_cache.get(&(e, c)) {
            return d;
        }
        let mut stack = vec![(e, false)];
        while let Some((t, expanded)) = stack.pop() {
            if self.deriv_cache.contains_key(&(t, c)) {
                continue;
            }
            if expanded {
                let d = self.combine_derivative(t, c);
                self.deriv_cache.insert((t, c), d);
            } else {
                stack.push((t, true));
                for x in self.derivative_dependencies(t) {
                    if !self.deriv_cache.contains_key(&(x, c)) {
                        stack.push((x, false));
                    }
                }
            }
        }
        self.cached(e, c)
    }

    ///
    /// Derivative with respect to a string
    ///
    /// - if s is empty, the result is e
    /// - if s is of the form a.w, the result is the derivative of (derivative e a) w.r.t. w
    ///
    pub fn word_derivative(&mut self, e: TermId, s: &str) -> TermId {
        s.chars().fold(e, |t, c| self.derivative(t, c))
    }

    ///
    /// Check whether a string belongs to the language of a term
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::terms::*;
    ///
    /// let tm = &mut TermManager::new();
    ///
    /// // (ac + bc)*
    /// let ac = tm.string("ac");
    /// let bc = tm.string("bc");
    /// let sum = tm.union(ac, bc);
    /// let e = tm.star(sum);
    ///
    /// assert!(tm.matches(e, "acacbc"));
    /// assert!(tm.matches(e, ""));
    /// assert!(!tm.matches(e, "ab"));
    /// ```
    pub fn matches(&mut self, e: TermId, s: &str) -> bool {
        let d = self.word_derivative(e, s);
        self.nullable(d)
    }

    //
    // SUB-TERMS AND SYMBOLS
    //

    /// All sub-terms of t (including t) without duplicates, in breadth-first order
    pub fn sub_terms(&self, t: TermId) -> Vec<TermId> {
        let mut queue = IndexQueue::with_size(t.0 + 1);
        let mut result = Vec::new();
        let mut children = Vec::new();
        queue.push(t.0);
        while let Some(i) = queue.pop() {
            let x = TermId(i);
            result.push(x);
            children.clear();
            self.expr(x).push_children(&mut children);
            for y in &children {
                queue.push(y.0);
            }
        }
        result
    }

    /// All symbols that occur in the literals of t
    pub fn symbols_of(&self, t: TermId) -> SymbolSet {
        self.sub_terms(t)
            .into_iter()
            .filter_map(|x| match self.expr(x) {
                BaseTerm::Literal(s) => Some(s.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Alphabet inferred from the literals of t
    pub fn alphabet_of(&self, t: TermId) -> Alphabet {
        self.symbols_of(t).iter().collect()
    }

    //
    // AUTOMATON CONSTRUCTION
    //

    ///
    /// Compile a term to a deterministic finite-state automaton
    ///
    /// The states are the derivatives of `e` reachable by strings of `alphabet`,
    /// explored breadth-first. Symbols are processed in alphabet order, so
    /// compiling the same term over the same alphabet always numbers states
    /// the same way. State 0 is the initial state (i.e., the state of `e`).
    ///
    /// # Errors
    ///
    /// - [Error::Alphabet] if a literal of `e` contains a symbol that's not in `alphabet`
    /// - [Error::NonTerminatingConstruction] if the automaton would have more states than
    ///   allowed by this manager's [BuildLimits]
    ///
    /// # Example
    ///
    /// ```
    /// use reglang_derivatives::{terms::*, symbols::Alphabet};
    ///
    /// let tm = &mut TermManager::new();
    ///
    /// // (ac + bc)*
    /// let ac = tm.string("ac");
    /// let bc = tm.string("bc");
    /// let sum = tm.union(ac, bc);
    /// let e = tm.star(sum);
    ///
    /// let auto = tm.compile(e, &Alphabet::from("abc")).unwrap();
    /// assert_eq!(auto.num_states(), 3);
    /// assert_eq!(auto.accepts("acbcbc"), Ok(true));
    /// ```
    pub fn compile(&mut self, e: TermId, alphabet: &Alphabet) -> Result<Automaton> {
        alphabet.check_covers(&self.symbols_of(e))?;

        let max_states = self.limits.max_states;
        let mut builder = AutomatonBuilder::new(&e, alphabet.clone());
        let mut queue = IndexQueue::new();
        queue.push(e.0);
        while let Some(i) = queue.pop() {
            let t = TermId(i);
            if self.nullable(t) {
                builder.mark_final(&t);
            }
            for (k, c) in alphabet.iter().enumerate() {
                let d = self.derivative(t, c);
                if queue.push(d.0) {
                    trace!("new state {}: {}", queue.num_seen() - 1, self.show(d));
                    if queue.num_seen() > max_states {
                        warn!(
                            "aborting construction for {}: more than {} states",
                            e, max_states
                        );
                        return Err(Error::NonTerminatingConstruction { limit: max_states });
                    }
                }
                builder.add_transition(&t, k, &d);
            }
        }
        let (mut automaton, keys) = builder.build_with_keys()?;
        automaton.attach_terms(&keys);
        debug!(
            "compiled {} over {}: {} states, {} final, {} terms in store",
            e,
            alphabet,
            automaton.num_states(),
            automaton.num_final_states(),
            self.num_terms()
        );
        Ok(automaton)
    }

    ///
    /// Compile a term over the alphabet of its own literals
    ///
    /// See [alphabet_of](Self::alphabet_of) and [compile](Self::compile).
    ///
    pub fn compile_inferred(&mut self, e: TermId) -> Result<Automaton> {
        let alphabet = self.alphabet_of(e);
        self.compile(e, &alphabet)
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

///
/// Display wrapper for a term
///
/// See [show](TermManager::show).
///
#[derive(Debug, Clone, Copy)]
pub struct Show<'a> {
    manager: &'a TermManager,
    term: TermId,
}

impl<'a> Show<'a> {
    fn with(&self, t: TermId) -> Show<'a> {
        Show {
            manager: self.manager,
            term: t,
        }
    }

    // write either t or '(t)' when t is a sub-term
    fn write_sub(&self, f: &mut std::fmt::Formatter<'_>, t: TermId) -> std::fmt::Result {
        if self.manager.expr(t).is_atomic() {
            write!(f, "{}", self.with(t))
        } else {
            write!(f, "({})", self.with(t))
        }
    }

    // operand of a union or intersection: all other operators bind tighter
    fn write_operand(&self, f: &mut std::fmt::Formatter<'_>, t: TermId) -> std::fmt::Result {
        match self.manager.expr(t) {
            BaseTerm::Concat(..)
            | BaseTerm::Negation(_)
            | BaseTerm::Star(_)
            | BaseTerm::Repeat(..) => write!(f, "{}", self.with(t)),
            _ => self.write_sub(f, t),
        }
    }

    // element of a concatenation: postfix operators bind tighter
    fn write_factor(&self, f: &mut std::fmt::Formatter<'_>, t: TermId) -> std::fmt::Result {
        match self.manager.expr(t) {
            BaseTerm::Star(_) | BaseTerm::Repeat(..) => write!(f, "{}", self.with(t)),
            _ => self.write_sub(f, t),
        }
    }

    fn write_list(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        l: &[TermId],
        symbol: char,
    ) -> std::fmt::Result {
        for (i, &t) in l.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", symbol)?;
            }
            self.write_operand(f, t)?;
        }
        Ok(())
    }
}

impl Display for Show<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.manager.expr(self.term) {
            BaseTerm::EmptySet => write!(f, "\u{2205}"),
            BaseTerm::EmptyString => write!(f, "\u{03B5}"),
            BaseTerm::Literal(s) => write!(f, "{}", s),
            BaseTerm::Concat(x, y) => {
                self.write_factor(f, *x)?;
                let mut rest = *y;
                while let BaseTerm::Concat(x, y) = self.manager.expr(rest) {
                    self.write_factor(f, *x)?;
                    rest = *y;
                }
                self.write_factor(f, rest)
            }
            BaseTerm::Union(args) => self.write_list(f, args, '+'),
            BaseTerm::Inter(args) => self.write_list(f, args, '&'),
            BaseTerm::Negation(x) => {
                write!(f, "\u{00AC}")?;
                self.write_sub(f, *x)
            }
            BaseTerm::Star(x) => {
                self.write_sub(f, *x)?;
                write!(f, "*")
            }
            BaseTerm::Repeat(x, min, max) => {
                self.write_sub(f, *x)?;
                if min == max {
                    write!(f, "{{{}}}", min)
                } else {
                    write!(f, "{{{},{}}}", min, max)
                }
            }
        }
    }
}
