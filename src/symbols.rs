// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Symbol sets and alphabets
//!
//! A symbol is a Rust `char`. Two structures are built on top of it:
//!
//! - A [SymbolSet] is a finite set of symbols. It's the label of a literal term:
//!   the literal `[abc]` matches any one-symbol string `a`, `b`, or `c`.
//! - An [Alphabet] is the finite set of symbols an automaton is built over.
//!   The alphabet fixes an order on symbols: transitions, counting, and
//!   enumeration all go through the alphabet in that order.
//!
//! Both are stored as sorted slices without duplicates, so two sets with the same
//! elements are equal and hash identically.
//!
//! A [SymbolRange] is an interval of consecutive symbols. Ranges are used to
//! present sets compactly (e.g., `[a-z]` instead of listing 26 symbols).
//!

use std::{fmt::Display, iter::FromIterator};

use crate::errors::*;

/// sort and remove duplicates
fn sorted_symbols(iter: impl IntoIterator<Item = char>) -> Box<[char]> {
    let mut v: Vec<char> = iter.into_iter().collect();
    v.sort_unstable();
    v.dedup();
    v.into()
}

///
/// Interval of consecutive symbols `[first, last]` with `first <= last`
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct SymbolRange {
    /// first symbol in the range
    pub first: char,
    /// last symbol in the range
    pub last: char,
}

impl SymbolRange {
    /// Range that contains a single symbol
    pub fn singleton(c: char) -> Self {
        SymbolRange { first: c, last: c }
    }

    /// Check whether c is in the range
    pub fn contains(&self, c: char) -> bool {
        self.first <= c && c <= self.last
    }

    /// Check whether this range contains a single symbol
    pub fn is_singleton(&self) -> bool {
        self.first == self.last
    }
}

impl Display for SymbolRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_singleton() {
            write!(f, "{}", self.first.escape_debug())
        } else {
            write!(f, "{}-{}", self.first.escape_debug(), self.last.escape_debug())
        }
    }
}

///
/// Group a sorted list of symbols into maximal ranges of consecutive code points
///
pub fn compact_ranges(symbols: &[char]) -> Vec<SymbolRange> {
    let mut result: Vec<SymbolRange> = Vec::new();
    for &c in symbols {
        match result.last_mut() {
            Some(r) if (r.last as u32) + 1 == c as u32 => r.last = c,
            _ => result.push(SymbolRange::singleton(c)),
        }
    }
    result
}

// write a list of ranges between brackets
fn write_ranges(f: &mut std::fmt::Formatter<'_>, symbols: &[char]) -> std::fmt::Result {
    write!(f, "[")?;
    for r in compact_ranges(symbols) {
        if (r.last as u32) == (r.first as u32) + 1 {
            // two symbols: a-b is not shorter than ab
            write!(f, "{}{}", r.first.escape_debug(), r.last.escape_debug())?;
        } else {
            write!(f, "{}", r)?;
        }
    }
    write!(f, "]")
}

///
/// Finite set of symbols
///
/// The set may be empty. A literal term built from an empty set is
/// the empty language.
///
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Default)]
pub struct SymbolSet(Box<[char]>);

impl SymbolSet {
    /// Set of all symbols produced by an iterator
    pub fn new(iter: impl IntoIterator<Item = char>) -> Self {
        SymbolSet(sorted_symbols(iter))
    }

    /// Set that contains a single symbol
    pub fn singleton(c: char) -> Self {
        SymbolSet(Box::new([c]))
    }

    /// All symbols in a range `[first, last]`
    ///
    /// The result is empty if `first > last`.
    pub fn range(first: char, last: char) -> Self {
        SymbolSet::new(first..=last)
    }

    /// Check whether c is in this set
    pub fn contains(&self, c: char) -> bool {
        self.0.binary_search(&c).is_ok()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether this set contains exactly one symbol
    pub fn is_singleton(&self) -> bool {
        self.0.len() == 1
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The symbols in increasing order
    pub fn symbols(&self) -> &[char] {
        &self.0
    }

    /// Iterator: symbols in increasing order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Union of two sets
    pub fn union(&self, other: &SymbolSet) -> SymbolSet {
        SymbolSet::new(self.iter().chain(other.iter()))
    }

    /// Intersection of two sets
    pub fn inter(&self, other: &SymbolSet) -> SymbolSet {
        SymbolSet(self.iter().filter(|&c| other.contains(c)).collect())
    }

    /// Elements of self that are not in other
    pub fn difference(&self, other: &SymbolSet) -> SymbolSet {
        SymbolSet(self.iter().filter(|&c| !other.contains(c)).collect())
    }
}

impl FromIterator<char> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        SymbolSet::new(iter)
    }
}

impl From<&str> for SymbolSet {
    fn from(s: &str) -> Self {
        SymbolSet::new(s.chars())
    }
}

impl Display for SymbolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            [] => write!(f, "[]"),
            [c] => write!(f, "{}", c.escape_debug()),
            s => write_ranges(f, s),
        }
    }
}

///
/// Alphabet: a finite, ordered set of symbols
///
/// An automaton is built for a term and an alphabet. Its transition
/// function is total on this alphabet and undefined for any other symbol.
/// Symbol `alphabet.symbol(i)` has index `i`. The indices follow the
/// natural order on `char`.
///
#[derive(Debug, PartialEq, Eq, Clone, Hash, Default)]
pub struct Alphabet {
    symbols: Box<[char]>,
}

impl Alphabet {
    /// Alphabet that contains all symbols produced by an iterator
    pub fn new(iter: impl IntoIterator<Item = char>) -> Self {
        Alphabet {
            symbols: sorted_symbols(iter),
        }
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check whether the alphabet is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols, in order
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Iterator: all symbols, in order
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Symbol of index i
    ///
    /// # Panics
    ///
    /// If i is out of bounds.
    pub fn symbol(&self, i: usize) -> char {
        self.symbols[i]
    }

    /// Index of symbol c or None if c is not in the alphabet
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.symbols.binary_search(&c).ok()
    }

    /// Index of symbol c
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if c is not in the alphabet.
    pub fn checked_index(&self, c: char) -> Result<usize> {
        self.index_of(c).ok_or(Error::Alphabet(c))
    }

    /// Check whether c is in the alphabet
    pub fn contains(&self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    /// Check whether every symbol of a set is in the alphabet
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] with the first missing symbol.
    pub fn check_covers(&self, set: &SymbolSet) -> Result<()> {
        match set.iter().find(|&c| !self.contains(c)) {
            Some(c) => Err(Error::Alphabet(c)),
            None => Ok(()),
        }
    }

    /// Convert a string to a sequence of symbol indices
    ///
    /// # Errors
    ///
    /// Return [Error::Alphabet] if a character of s is not in the alphabet.
    pub fn encode(&self, s: &str) -> Result<Vec<usize>> {
        s.chars().map(|c| self.checked_index(c)).collect()
    }

    /// All symbols of the alphabet as a set
    pub fn to_set(&self) -> SymbolSet {
        SymbolSet(self.symbols.clone())
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Alphabet::new(iter)
    }
}

impl From<&str> for Alphabet {
    fn from(s: &str) -> Self {
        Alphabet::new(s.chars())
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c.escape_debug())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_set_basics() {
        let s = SymbolSet::from("cabca");
        assert_eq!(s.symbols(), &['a', 'b', 'c']);
        assert_eq!(s.len(), 3);
        assert!(s.contains('b'));
        assert!(!s.contains('d'));
        assert!(!s.is_singleton());
        assert_eq!(s, SymbolSet::range('a', 'c'));
        assert!(SymbolSet::range('z', 'a').is_empty());

        let t = SymbolSet::from("bcd");
        assert_eq!(s.union(&t), SymbolSet::from("abcd"));
        assert_eq!(s.inter(&t), SymbolSet::from("bc"));
        assert_eq!(s.difference(&t), SymbolSet::singleton('a'));
        assert!(s.inter(&SymbolSet::from("xyz")).is_empty());
    }

    #[test]
    fn symbol_set_display() {
        assert_eq!(SymbolSet::singleton('a').to_string(), "a");
        assert_eq!(SymbolSet::from("ab").to_string(), "[ab]");
        assert_eq!(SymbolSet::from("abcdxz").to_string(), "[a-dxz]");
        assert_eq!(SymbolSet::from("0123456789").to_string(), "[0-9]");
        assert_eq!(SymbolSet::default().to_string(), "[]");
    }

    #[test]
    fn ranges() {
        let v = compact_ranges(&['a', 'b', 'c', 'e', 'g', 'h']);
        assert_eq!(
            v,
            vec![
                SymbolRange { first: 'a', last: 'c' },
                SymbolRange::singleton('e'),
                SymbolRange { first: 'g', last: 'h' },
            ]
        );
        assert!(v[0].contains('b'));
        assert!(!v[0].contains('d'));
        assert!(compact_ranges(&[]).is_empty());
    }

    #[test]
    fn alphabet_indices() {
        let a = Alphabet::from("dcba");
        assert_eq!(a.len(), 4);
        assert_eq!(a.symbol(0), 'a');
        assert_eq!(a.index_of('c'), Some(2));
        assert_eq!(a.index_of('z'), None);
        assert_eq!(a.checked_index('z'), Err(Error::Alphabet('z')));
        assert_eq!(a.encode("abd"), Ok(vec![0, 1, 3]));
        assert_eq!(a.encode("axd"), Err(Error::Alphabet('x')));
        assert_eq!(a.check_covers(&SymbolSet::from("ab")), Ok(()));
        assert_eq!(
            a.check_covers(&SymbolSet::from("aqz")),
            Err(Error::Alphabet('q'))
        );
        assert_eq!(a.to_string(), "{a, b, c, d}");
        assert_eq!(a.to_set(), SymbolSet::from("abcd"));
    }
}
