//! Frontier disciplines and the strategy selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::heuristic::Heuristic;
use crate::search::{Frontier, NodeId, SearchTree};
use crate::traits::{Informed, Problem, Strategy};

/// FIFO: children go behind the whole frontier.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl<P: Problem> Strategy<P> for BreadthFirst {
    fn insert(&mut self, _problem: &P, _tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        for id in expanded {
            frontier.push_back(id, 0);
        }
    }
}

/// LIFO: children go ahead of the frontier, first child first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

impl<P: Problem> Strategy<P> for DepthFirst {
    fn insert(&mut self, _problem: &P, _tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        for id in expanded.into_iter().rev() {
            frontier.push_front(id);
        }
    }
}

/// Depth-first ordering with a depth bound; one pass of iterative deepening.
#[derive(Debug, Clone, Copy)]
pub struct DepthLimited {
    limit: usize,
}

impl DepthLimited {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl<P: Problem> Strategy<P> for DepthLimited {
    fn insert(&mut self, problem: &P, tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        Strategy::<P>::insert(&mut DepthFirst, problem, tree, expanded, frontier);
    }

    fn depth_limit(&self) -> Option<usize> {
        Some(self.limit)
    }
}

/// Lowest cumulative path cost first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCost;

impl<P: Problem> Strategy<P> for UniformCost {
    fn insert(&mut self, _problem: &P, tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        for id in expanded {
            frontier.push_back(id, tree.node(id).path_cost);
        }
    }
}

/// Lowest heuristic estimate first, ignoring the cost so far.
#[derive(Debug, Clone, Copy)]
pub struct GreedyBestFirst {
    pub heuristic: Heuristic,
}

impl<P: Informed> Strategy<P> for GreedyBestFirst {
    fn insert(&mut self, problem: &P, tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        for id in expanded {
            let estimate = problem.estimate(&tree.node(id).state, self.heuristic);
            frontier.push_back(id, estimate);
        }
    }
}

/// Lowest cost so far plus heuristic estimate first.
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    pub heuristic: Heuristic,
}

impl<P: Informed> Strategy<P> for AStar {
    fn insert(&mut self, problem: &P, tree: &SearchTree<P::State, P::Action>, expanded: Vec<NodeId>, frontier: &mut Frontier) {
        for id in expanded {
            let node = tree.node(id);
            let estimate = problem.estimate(&node.state, self.heuristic);
            frontier.push_back(id, node.path_cost + estimate);
        }
    }
}

/// Strategy selector accepted by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyCode {
    #[serde(rename = "BF")]
    BreadthFirst,
    #[serde(rename = "DF")]
    DepthFirst,
    #[serde(rename = "UC")]
    UniformCost,
    #[serde(rename = "GR1")]
    GreedyH1,
    #[serde(rename = "GR2")]
    GreedyH2,
    #[serde(rename = "AS1")]
    #[default]
    AStarH1,
    #[serde(rename = "AS2")]
    AStarH2,
    #[serde(rename = "ID")]
    IterativeDeepening,
}

impl StrategyCode {
    pub const ALL: [StrategyCode; 8] = [
        StrategyCode::BreadthFirst,
        StrategyCode::DepthFirst,
        StrategyCode::UniformCost,
        StrategyCode::GreedyH1,
        StrategyCode::GreedyH2,
        StrategyCode::AStarH1,
        StrategyCode::AStarH2,
        StrategyCode::IterativeDeepening,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            StrategyCode::BreadthFirst => "BF",
            StrategyCode::DepthFirst => "DF",
            StrategyCode::UniformCost => "UC",
            StrategyCode::GreedyH1 => "GR1",
            StrategyCode::GreedyH2 => "GR2",
            StrategyCode::AStarH1 => "AS1",
            StrategyCode::AStarH2 => "AS2",
            StrategyCode::IterativeDeepening => "ID",
        }
    }

    /// Heuristic used by the informed variants.
    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            StrategyCode::GreedyH1 | StrategyCode::AStarH1 => Some(Heuristic::Manhattan),
            StrategyCode::GreedyH2 | StrategyCode::AStarH2 => Some(Heuristic::ScaledManhattan),
            _ => None,
        }
    }

    /// True for the variants guaranteed to return a minimum-cost route.
    pub fn is_cost_optimal(&self) -> bool {
        match self {
            StrategyCode::UniformCost => true,
            StrategyCode::AStarH1 | StrategyCode::AStarH2 => {
                self.heuristic().is_some_and(|heuristic| heuristic.is_admissible())
            }
            _ => false,
        }
    }
}

impl fmt::Display for StrategyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StrategyCode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyCode::ALL
            .into_iter()
            .find(|code| code.code() == s)
            .ok_or_else(|| PlanError::UnknownStrategy(s.to_string()))
    }
}
