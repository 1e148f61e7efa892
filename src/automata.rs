// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Deterministic finite-state automata
//!
//! An automaton is built over an explicit [Alphabet]. States are indexed by an integer
//! from 0 to N-1 where N is the number of states. The transition function is total:
//! every state has exactly one successor for every symbol of the alphabet. It's stored
//! as a dense table indexed by `(state, symbol index)`.
//!
//! Automata built from terms (see [compile](crate::terms::TermManager::compile)) record
//! the term (i.e., the residual language) of each state.
//!
//! An [AutomatonBuilder] constructs an automaton from a list of transitions between
//! states identified by arbitrary keys.
//!

use std::{collections::HashMap, fmt::Display, hash::Hash};

use crate::{errors::*, symbols::Alphabet, terms::TermId};

///
/// Limits on automaton construction
///
/// Compiling a term explores its derivatives. The number of distinct
/// derivatives is finite, but it can be very large. Construction
/// fails with [Error::NonTerminatingConstruction] if more than
/// `max_states` states are discovered.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildLimits {
    /// Maximal number of states
    pub max_states: usize,
}

impl BuildLimits {
    /// Default bound on the number of states
    pub const DEFAULT_MAX_STATES: usize = 100_000;

    /// Limits with the given bound
    pub fn new(max_states: usize) -> Self {
        BuildLimits { max_states }
    }
}

impl Default for BuildLimits {
    fn default() -> Self {
        BuildLimits::new(Self::DEFAULT_MAX_STATES)
    }
}

///
/// Deterministic finite state automaton
///
#[derive(Debug, Clone)]
pub struct Automaton {
    // alphabet
    alphabet: Alphabet,
    // number of final states
    num_final_states: usize,
    // index of the initial state
    initial_state: usize,
    // array of states
    states: Box<[State]>,
    // delta[s * alphabet.len() + k] = successor of state s for the k-th symbol
    delta: Box<[usize]>,
}

///
/// State of an automaton
///
#[derive(Debug, Clone)]
pub struct State {
    // id of a state (an index between 0 and num_states)
    id: usize,
    // whether this state is final
    is_final: bool,
    // residual language if the automaton was built from a term
    term: Option<TermId>,
}

impl State {
    /// Id of this state
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check whether this state is final (accepting)
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Term whose language is accepted from this state
    ///
    /// This is None unless the automaton was built by compiling a term.
    pub fn term(&self) -> Option<TermId> {
        self.term
    }
}

///
/// Iterator to list the transitions from a state
/// - transitions are given as pairs (symbol, successor state) in alphabet order
///
#[derive(Debug)]
pub struct EdgeIterator<'a> {
    automaton: &'a Automaton,
    state: usize,
    index: usize,
}

impl<'a> Iterator for EdgeIterator<'a> {
    type Item = (char, &'a State);

    fn next(&mut self) -> Option<Self::Item> {
        let a = self.automaton;
        let k = self.index;
        if k < a.alphabet.len() {
            self.index += 1;
            Some((a.alphabet.symbol(k), &a.states[a.successor(self.state, k)]))
        } else {
            None
        }
    }
}

impl Automaton {
    /// Alphabet of this automaton
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Get the initial state
    pub fn initial_state(&self) -> &State {
        &self.states[self.initial_state]
    }

    /// Get a state from its id
    ///
    /// # Panics
    ///
    /// If id is not a valid state id.
    pub fn state(&self, id: usize) -> &State {
        &self.states[id]
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of final states
    pub fn num_final_states(&self) -> usize {
        self.num_final_states
    }

    /// Iterator: all states in increasing id order
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Iterator: final states
    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_final)
    }

    /// Id of the successor of state `s` for the symbol of index `k`
    ///
    /// # Panics
    ///
    /// If `s` or `k` is out of bounds.
    pub fn successor(&self, s: usize, k: usize) -> usize {
        let n = self.alphabet.len();
        assert!(k < n);
        self.delta[s * n + k]
    }

    /// Successor of a state for a symbol
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if c is not in the alphabet.
    pub fn next(&self, s: &State, c: char) -> Result<&State> {
        let k = self.alphabet.checked_index(c)?;
        Ok(&self.states[self.successor(s.id, k)])
    }

    /// State reached from `s` by reading a string
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if a character of `str` is not in the alphabet.
    pub fn run<'a>(&'a self, s: &'a State, str: &str) -> Result<&'a State> {
        let mut state = s.id;
        for c in str.chars() {
            let k = self.alphabet.checked_index(c)?;
            state = self.successor(state, k);
        }
        Ok(&self.states[state])
    }

    /// Check whether the automaton accepts a string
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if a character of `str` is not in the alphabet.
    pub fn accepts(&self, str: &str) -> Result<bool> {
        Ok(self.run(self.initial_state(), str)?.is_final)
    }

    /// Iterator: transitions from a state
    pub fn edges<'a>(&'a self, s: &State) -> EdgeIterator<'a> {
        EdgeIterator {
            automaton: self,
            state: s.id,
            index: 0,
        }
    }

    /// Successors of state `s` as a slice indexed by symbol index
    pub(crate) fn successors(&self, s: usize) -> &[usize] {
        let n = self.alphabet.len();
        &self.delta[s * n..(s + 1) * n]
    }

    // record the term of each state: keys[i] is the term of state i
    pub(crate) fn attach_terms(&mut self, keys: &[TermId]) {
        for (s, &t) in self.states.iter_mut().zip(keys) {
            s.term = Some(t)
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.id)
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                ""
            } else {
                "s"
            }
        }

        writeln!(f, "{} states", self.num_states())?;
        writeln!(f, "alphabet: {}", self.alphabet)?;
        writeln!(f, "initial state: {}", self.initial_state())?;
        write!(f, "final state{}:", plural(self.num_final_states))?;
        for s in self.final_states() {
            write!(f, " {}", s)?;
        }
        writeln!(f)?;
        writeln!(f, "transitions:")?;
        for s in self.states.iter() {
            for (c, d) in self.edges(s) {
                writeln!(f, "  \u{03B4}({}, {}) = {}", s, c.escape_debug(), d)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct StateInConstruction {
    is_final: bool,
    // transitions[k] = successor for the k-th symbol
    transitions: Vec<Option<usize>>,
}

impl StateInConstruction {
    fn new(alphabet_size: usize) -> StateInConstruction {
        StateInConstruction {
            is_final: false,
            transitions: vec![None; alphabet_size],
        }
    }
}

///
/// Automaton builder
///
/// States are identified by keys of type `T`. They are numbered in order of
/// first occurrence: the initial state has id 0, the next state mentioned in a call to
/// [add_transition](Self::add_transition) or other methods gets id 1, and so forth.
///
/// # Example
///
/// ```
/// use reglang_derivatives::{automata::*, symbols::Alphabet};
///
/// // strings that end with 'b'
/// let mut builder = AutomatonBuilder::new(&"start", Alphabet::from("ab"));
/// builder
///     .add_transition(&"start", 0, &"start")
///     .add_transition(&"start", 1, &"end")
///     .add_transition(&"end", 0, &"start")
///     .add_transition(&"end", 1, &"end")
///     .mark_final(&"end");
/// let automaton = builder.build().unwrap();
/// assert_eq!(automaton.num_states(), 2);
/// assert_eq!(automaton.accepts("aab"), Ok(true));
/// assert_eq!(automaton.accepts("ba"), Ok(false));
/// ```
#[derive(Debug)]
pub struct AutomatonBuilder<T> {
    alphabet: Alphabet,
    id_map: HashMap<T, usize>,
    keys: Vec<T>,
    states: Vec<StateInConstruction>,
}

impl<T: Eq + Hash + Clone> AutomatonBuilder<T> {
    fn get_state_id(&mut self, state: &T) -> usize {
        match self.id_map.get(state) {
            Some(i) => *i,
            None => {
                let i = self.states.len();
                self.states.push(StateInConstruction::new(self.alphabet.len()));
                self.keys.push(state.clone());
                self.id_map.insert(state.clone(), i);
                i
            }
        }
    }

    ///
    /// Create a new builder
    ///
    /// - initial_state = initial state for the resulting automaton
    /// - alphabet = the automaton's alphabet
    ///
    pub fn new(initial_state: &T, alphabet: Alphabet) -> Self {
        let mut new = AutomatonBuilder {
            alphabet,
            id_map: HashMap::new(),
            keys: Vec::new(),
            states: Vec::new(),
        };
        new.get_state_id(initial_state);
        new
    }

    /// Number of states seen so far
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    ///
    /// Mark a final state
    ///
    pub fn mark_final(&mut self, state: &T) -> &mut Self {
        let i = self.get_state_id(state);
        self.states[i].is_final = true;
        self
    }

    ///
    /// Add a transition for the symbol of index k
    ///
    /// A later transition from the same state and symbol overrides the earlier one.
    ///
    /// # Panics
    ///
    /// If k is not a valid symbol index.
    ///
    pub fn add_transition(&mut self, state: &T, k: usize, next: &T) -> &mut Self {
        assert!(k < self.alphabet.len());
        let i = self.get_state_id(state);
        let j = self.get_state_id(next);
        self.states[i].transitions[k] = Some(j);
        self
    }

    ///
    /// Add a transition for symbol c
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if c is not in the alphabet.
    ///
    pub fn add_symbol_transition(&mut self, state: &T, c: char, next: &T) -> Result<&mut Self> {
        let k = self.alphabet.checked_index(c)?;
        Ok(self.add_transition(state, k, next))
    }

    ///
    /// Construct an automaton and return the key of each state
    /// - the key of state i is at index i in the returned vector
    /// - fails with [Error::NonTotalTransitions] if a state has no transition for some symbol
    ///
    pub fn build_with_keys(self) -> Result<(Automaton, Vec<T>)> {
        let n = self.alphabet.len();
        let mut num_final_states = 0;
        let mut delta = Vec::with_capacity(self.states.len() * n);
        let mut state_array = Vec::with_capacity(self.states.len());
        for (i, s) in self.states.iter().enumerate() {
            for t in &s.transitions {
                match *t {
                    Some(j) => delta.push(j),
                    None => return Err(Error::NonTotalTransitions(i)),
                }
            }
            if s.is_final {
                num_final_states += 1;
            }
            state_array.push(State {
                id: i,
                is_final: s.is_final,
                term: None,
            });
        }
        let automaton = Automaton {
            alphabet: self.alphabet,
            num_final_states,
            initial_state: 0,
            states: state_array.into(),
            delta: delta.into(),
        };
        Ok((automaton, self.keys))
    }

    ///
    /// Construct an automaton
    /// - fails with [Error::NonTotalTransitions] if a state has no transition for some symbol
    ///
    pub fn build(self) -> Result<Automaton> {
        Ok(self.build_with_keys()?.0)
    }
}
