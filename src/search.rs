//! Generic graph-search engine.
//!
//! The engine owns nothing between runs. Each call builds a fresh node tree,
//! frontier and explored set; only the expansion counter survives the call so
//! callers can compare strategies.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::traits::{Problem, Strategy};

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node<S, A> {
    pub state: S,
    pub parent: Option<NodeId>,
    pub action: Option<A>,
    pub path_cost: u64,
    pub depth: usize,
}

/// Arena holding every node generated during one run.
///
/// Parents are referenced by index, so the tree is a plain vector with back
/// links and no shared ownership.
#[derive(Debug, Clone)]
pub struct SearchTree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A: Copy> SearchTree<S, A> {
    fn with_root(state: S) -> Self {
        Self {
            nodes: vec![Node {
                state,
                parent: None,
                action: None,
                path_cost: 0,
                depth: 0,
            }],
        }
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, node: Node<S, A>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Actions from the root to `id`, in travel order.
    pub fn actions_to(&self, id: NodeId) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.node(id).depth);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(action) = node.action {
                actions.push(action);
            }
            current = node.parent;
        }
        actions.reverse();
        actions
    }
}

/// Pending nodes, ordered by `(priority, sequence)`.
///
/// Sequence numbers grow for [`Frontier::push_back`] and shrink for
/// [`Frontier::push_front`], which lets a single heap act as a FIFO queue, a
/// LIFO stack or a priority queue with insertion-order tie-breaks.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<(u64, i64, NodeId)>>,
    next_back: i64,
    next_front: i64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `node` behind every pending node of the same priority.
    pub fn push_back(&mut self, node: NodeId, priority: u64) {
        self.heap.push(Reverse((priority, self.next_back, node)));
        self.next_back += 1;
    }

    /// Queues `node` ahead of every pending node.
    pub fn push_front(&mut self, node: NodeId) {
        self.next_front -= 1;
        self.heap.push(Reverse((0, self.next_front, node)));
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse((_, _, node))| node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Goal node of a successful run, detached from its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<S, A> {
    pub goal: S,
    pub actions: Vec<A>,
    pub path_cost: u64,
    pub depth: usize,
}

#[derive(Debug, Default)]
pub struct SearchEngine {
    nodes_expanded: usize,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes expanded by the most recent run.
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Runs graph search on `problem` with `strategy` ordering the frontier.
    ///
    /// Returns `None` when the frontier empties without reaching the goal.
    pub fn search<P, S>(&mut self, problem: &P, strategy: &mut S) -> Option<Solution<P::State, P::Action>>
    where
        P: Problem,
        S: Strategy<P>,
    {
        self.nodes_expanded = 0;
        self.run(problem, strategy)
    }

    /// Depth-first search re-run with bounds `0..=max_depth` until the goal is
    /// found. The expansion counter sums every bound tried.
    pub fn iterative_deepening<P>(&mut self, problem: &P, max_depth: usize) -> Option<Solution<P::State, P::Action>>
    where
        P: Problem,
    {
        self.nodes_expanded = 0;
        for limit in 0..=max_depth {
            let mut strategy = crate::strategy::DepthLimited::new(limit);
            if let Some(solution) = self.run(problem, &mut strategy) {
                return Some(solution);
            }
            debug!(limit, expanded = self.nodes_expanded, "depth bound exhausted");
        }
        None
    }

    fn run<P, S>(&mut self, problem: &P, strategy: &mut S) -> Option<Solution<P::State, P::Action>>
    where
        P: Problem,
        S: Strategy<P>,
    {
        let depth_limit = strategy.depth_limit();
        let mut tree = SearchTree::with_root(problem.initial_state());
        let mut frontier = Frontier::new();
        frontier.push_back(tree.root(), 0);
        // Shallowest depth each state was expanded at.
        let mut explored: HashMap<P::State, usize> = HashMap::new();

        while let Some(id) = frontier.pop() {
            let node = tree.node(id);
            if problem.goal_test(&node.state) {
                trace!(
                    expanded = self.nodes_expanded,
                    generated = tree.len(),
                    pending = frontier.len(),
                    cost = node.path_cost,
                    "goal reached"
                );
                return Some(Solution {
                    goal: node.state.clone(),
                    actions: tree.actions_to(id),
                    path_cost: node.path_cost,
                    depth: node.depth,
                });
            }

            if depth_limit.is_some_and(|limit| node.depth > limit) {
                continue;
            }

            match explored.entry(node.state.clone()) {
                Entry::Occupied(mut seen) => {
                    // Only depth-limited runs revisit a state, and only when
                    // reaching it shallower than before.
                    if depth_limit.is_none() || *seen.get() <= node.depth {
                        continue;
                    }
                    seen.insert(node.depth);
                }
                Entry::Vacant(slot) => {
                    slot.insert(node.depth);
                }
            }

            let children = self.expand(problem, &mut tree, id);
            strategy.insert(problem, &tree, children, &mut frontier);
        }

        trace!(expanded = self.nodes_expanded, generated = tree.len(), "frontier exhausted");
        None
    }

    fn expand<P>(&mut self, problem: &P, tree: &mut SearchTree<P::State, P::Action>, id: NodeId) -> Vec<NodeId>
    where
        P: Problem,
    {
        self.nodes_expanded += 1;

        let parent = tree.node(id).clone();
        let mut children = Vec::new();
        for action in problem.operators(&parent.state) {
            if let Some(successor) = problem.apply(&parent.state, action) {
                let step = problem.path_cost(&parent.state, action, &successor);
                let child = tree.push(Node {
                    state: successor,
                    parent: Some(id),
                    action: Some(action),
                    path_cost: parent.path_cost + step,
                    depth: parent.depth + 1,
                });
                children.push(child);
            }
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{BreadthFirst, DepthFirst, UniformCost};

    /// Walk along a line `0..len` where each step right costs `cost[i]` and
    /// each step left costs 1.
    struct Line {
        costs: Vec<u64>,
        goal: i64,
    }

    impl Problem for Line {
        type State = i64;
        type Action = i64;

        fn initial_state(&self) -> i64 {
            0
        }

        fn operators(&self, _state: &i64) -> Vec<i64> {
            vec![-1, 1]
        }

        fn apply(&self, state: &i64, action: i64) -> Option<i64> {
            let next = state + action;
            (next >= 0 && next <= self.costs.len() as i64).then_some(next)
        }

        fn goal_test(&self, state: &i64) -> bool {
            *state == self.goal
        }

        fn path_cost(&self, parent: &i64, action: i64, _successor: &i64) -> u64 {
            if action > 0 {
                self.costs[*parent as usize]
            } else {
                1
            }
        }
    }

    #[test]
    fn test_frontier_orders() {
        let mut frontier = Frontier::new();
        frontier.push_back(NodeId(1), 0);
        frontier.push_back(NodeId(2), 0);
        frontier.push_front(NodeId(3));
        frontier.push_back(NodeId(4), 0);
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(order, vec![NodeId(3), NodeId(1), NodeId(2), NodeId(4)]);

        frontier.push_back(NodeId(5), 7);
        frontier.push_back(NodeId(6), 2);
        frontier.push_back(NodeId(7), 2);
        assert_eq!(frontier.pop(), Some(NodeId(6)));
        assert_eq!(frontier.pop(), Some(NodeId(7)));
        assert_eq!(frontier.pop(), Some(NodeId(5)));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_start_is_goal() {
        let problem = Line { costs: vec![1, 1], goal: 0 };
        let mut engine = SearchEngine::new();
        let solution = engine.search(&problem, &mut BreadthFirst).expect("trivial");
        assert!(solution.actions.is_empty());
        assert_eq!(solution.path_cost, 0);
        assert_eq!(engine.nodes_expanded(), 0);
    }

    #[test]
    fn test_unreachable_goal_returns_none() {
        let problem = Line { costs: vec![1, 1], goal: 9 };
        let mut engine = SearchEngine::new();
        assert!(engine.search(&problem, &mut DepthFirst).is_none());
        // Every state on the line is expanded exactly once.
        assert_eq!(engine.nodes_expanded(), 3);
    }

    #[test]
    fn test_counter_resets_between_runs() {
        let problem = Line { costs: vec![5, 1, 1], goal: 3 };
        let mut engine = SearchEngine::new();
        engine.search(&problem, &mut UniformCost);
        let first = engine.nodes_expanded();
        engine.search(&problem, &mut UniformCost);
        assert_eq!(engine.nodes_expanded(), first);
    }

    #[test]
    fn test_path_reconstruction() {
        let problem = Line { costs: vec![5, 1, 2], goal: 3 };
        let mut engine = SearchEngine::new();
        let solution = engine.search(&problem, &mut UniformCost).expect("reachable");
        assert_eq!(solution.actions, vec![1, 1, 1]);
        assert_eq!(solution.path_cost, 8);
        assert_eq!(solution.depth, 3);
        assert_eq!(solution.goal, 3);
    }

    #[test]
    fn test_iterative_deepening_sums_expansions() {
        let problem = Line { costs: vec![1, 1, 1, 1], goal: 4 };
        let mut engine = SearchEngine::new();
        let solution = engine.iterative_deepening(&problem, 10).expect("reachable");
        assert_eq!(solution.depth, 4);
        // Bounds 0..=3 each expand at least one node.
        assert!(engine.nodes_expanded() >= 4);
    }
}
