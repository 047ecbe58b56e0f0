//! Core search traits.
//!
//! These are intentionally minimal and domain-agnostic. The grid routing
//! problem is one implementation; the engine only ever sees these interfaces.

use std::hash::Hash;

use crate::heuristic::Heuristic;
use crate::search::{Frontier, NodeId, SearchTree};

/// Value type usable as a search state.
///
/// States are compared by value; the explored set hashes them.
pub trait State: Clone + Eq + Hash {}

impl<T> State for T where T: Clone + Eq + Hash {}

/// A search problem: initial state, operators, transitions and step costs.
pub trait Problem {
    type State: State;
    type Action: Copy;

    fn initial_state(&self) -> Self::State;

    /// Operators valid in `state`, in the order they should be tried.
    fn operators(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor of `state` under `action`, or `None` when the action is not
    /// applicable there.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Option<Self::State>;

    fn goal_test(&self, state: &Self::State) -> bool;

    /// Cost of the step `parent --action--> successor`.
    fn path_cost(&self, parent: &Self::State, action: Self::Action, successor: &Self::State) -> u64;
}

/// A problem that can estimate the remaining cost to its goal.
pub trait Informed: Problem {
    fn estimate(&self, state: &Self::State, heuristic: Heuristic) -> u64;
}

/// Frontier discipline of a search variant.
///
/// `insert` is the only behavioral difference between variants: it decides
/// where freshly expanded children go relative to the pending nodes.
pub trait Strategy<P: Problem> {
    fn insert(
        &mut self,
        problem: &P,
        tree: &SearchTree<P::State, P::Action>,
        expanded: Vec<NodeId>,
        frontier: &mut Frontier,
    );

    /// Nodes deeper than this are goal-tested but never expanded.
    fn depth_limit(&self) -> Option<usize> {
        None
    }
}
