// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error codes
//!

use thiserror::Error;

///
/// Errors produced by term construction, automaton construction,
/// and automaton queries
///
/// Not finding a string of a requested length is not an error: generation
/// functions return `None` in that case.
///
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A repetition `R{min, max}` with `min > max`.
    #[error("invalid repetition bounds {{{min},{max}}}")]
    InvalidTerm {
        /// lower bound
        min: u32,
        /// upper bound
        max: u32,
    },

    /// The derivative closure produced more states than allowed.
    ///
    /// The derivative algebra has finitely many residuals for every term,
    /// so this signals either a pathological input or a bound that's too small.
    #[error("automaton construction exceeded {limit} states")]
    NonTerminatingConstruction {
        /// the state bound that was exceeded
        limit: usize,
    },

    /// A symbol that does not belong to the declared alphabet.
    ///
    /// This is reported when a term names a symbol missing from the alphabet
    /// an automaton is built over, and when an input string contains
    /// such a symbol.
    #[error("symbol {0:?} is not in the alphabet")]
    Alphabet(char),

    /// Two automata built over different alphabets were combined.
    #[error("automata are defined over different alphabets")]
    AlphabetMismatch,

    /// A state in an [AutomatonBuilder][crate::automata::AutomatonBuilder]
    /// is missing a transition for some symbol of the alphabet.
    #[error("state {0} does not have a transition for every symbol")]
    NonTotalTransitions(usize),
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
