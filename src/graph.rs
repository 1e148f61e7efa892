// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Graph view of an automaton
//!
//! A [GraphView] is a labeled graph meant for visualization. Each state is a node.
//! All transitions between the same pair of states are merged into one edge, labeled
//! by the list of symbols that trigger them. These symbols are compacted into ranges
//! of consecutive characters (e.g., `a-z`).
//!
//! A full view includes every state. A live view includes only the initial state
//! and the live states reachable from it, so the sink state and other dead states
//! are omitted. Edges are kept if both ends are in the view: if the initial state
//! is dead, the live view has no other edge than a self-loop on that state.
//!

use std::{collections::BTreeMap, fmt::Display};

use crate::{
    automata::Automaton,
    symbols::{compact_ranges, SymbolRange},
    terms::TermId,
};

/// Node of a graph view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// State id
    pub id: usize,
    /// Whether the state is final
    pub accepting: bool,
    /// Whether the state is the initial state
    pub initial: bool,
    /// Residual term of the state, if known
    pub term: Option<TermId>,
}

/// Edge of a graph view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Source state id
    pub source: usize,
    /// Target state id
    pub target: usize,
    /// Symbols of all transitions from source to target
    pub symbols: Vec<SymbolRange>,
}

impl GraphEdge {
    /// Check whether symbol c labels this edge
    pub fn has_symbol(&self, c: char) -> bool {
        self.symbols.iter().any(|r| r.contains(c))
    }
}

///
/// Nodes and edges of an automaton
///
/// # Example
///
/// ```
/// use reglang_derivatives::{graph::GraphView, symbols::Alphabet, terms::*};
///
/// let tm = &mut TermManager::new();
/// let az = tm.literal(('a'..='z').collect());
/// let e = tm.star(az);
/// let automaton = tm.compile(e, &Alphabet::from("abcdefghijklmnopqrstuvwxyz0")).unwrap();
///
/// let view = GraphView::live(&automaton);
/// assert_eq!(view.nodes.len(), 1);
/// assert_eq!(view.edges.len(), 1);
/// assert_eq!(view.edges[0].symbols[0].to_string(), "a-z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphView {
    /// Nodes sorted by id
    pub nodes: Vec<GraphNode>,
    /// Edges sorted by source then target
    pub edges: Vec<GraphEdge>,
    /// Id of the initial state
    pub initial: usize,
}

impl GraphView {
    // view restricted to the states s such that keep[s] is true
    fn build(automaton: &Automaton, keep: &[bool]) -> Self {
        let initial = automaton.initial_state().id();
        let nodes = automaton
            .states()
            .filter(|s| keep[s.id()])
            .map(|s| GraphNode {
                id: s.id(),
                accepting: s.is_final(),
                initial: s.id() == initial,
                term: s.term(),
            })
            .collect();

        let mut edges = Vec::new();
        for s in automaton.states().filter(|s| keep[s.id()]) {
            // symbols grouped by target, in increasing order
            let mut targets: BTreeMap<usize, Vec<char>> = BTreeMap::new();
            for (c, d) in automaton.edges(s) {
                if keep[d.id()] {
                    targets.entry(d.id()).or_default().push(c);
                }
            }
            for (target, symbols) in targets {
                edges.push(GraphEdge {
                    source: s.id(),
                    target,
                    symbols: compact_ranges(&symbols),
                });
            }
        }

        GraphView {
            nodes,
            edges,
            initial,
        }
    }

    /// View of all the states and transitions
    pub fn full(automaton: &Automaton) -> Self {
        Self::build(automaton, &vec![true; automaton.num_states()])
    }

    /// View of the initial state and the live states reachable from it
    pub fn live(automaton: &Automaton) -> Self {
        let live = automaton.live_states();
        let reachable = automaton.reachable_states();
        let initial = automaton.initial_state().id();
        let keep: Vec<bool> = (0..automaton.num_states())
            .map(|s| s == initial || (live[s] && reachable[s]))
            .collect();
        Self::build(automaton, &keep)
    }

    /// Get a node from its state id
    pub fn node(&self, id: usize) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Iterator: edges whose source is the given state
    pub fn out_edges(&self, source: usize) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.source == source)
    }
}

impl Display for GraphView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for n in &self.nodes {
            write!(f, "s{}", n.id)?;
            if n.initial {
                write!(f, " (initial)")?;
            }
            if n.accepting {
                write!(f, " (accepting)")?;
            }
            writeln!(f)?;
        }
        for e in &self.edges {
            write!(f, "  s{} -> s{} [", e.source, e.target)?;
            for (i, r) in e.symbols.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", r)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
