//! Grid routing: binds the search engine to a store -> customer delivery.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cost::Cost;
use crate::grid::{Grid, Position};
use crate::heuristic::Heuristic;
use crate::route::{reversed, Action, Route};
use crate::search::SearchEngine;
use crate::strategy::{AStar, BreadthFirst, DepthFirst, GreedyBestFirst, StrategyCode, UniformCost};
use crate::traits::{Informed, Problem};

/// One truck leaving `start` for `goal` on a fixed grid.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryProblem<'a> {
    grid: &'a Grid,
    start: Position,
    goal: Position,
}

impl<'a> DeliveryProblem<'a> {
    pub fn new(grid: &'a Grid, start: Position, goal: Position) -> Self {
        Self { grid, start, goal }
    }

    /// Drives `actions` from `from`, returning where the truck ends up and
    /// what the trip cost, or `None` if some step cannot be taken.
    pub fn replay(&self, from: Position, actions: &[Action]) -> Option<(Position, u64)> {
        actions.iter().try_fold((from, 0u64), |(position, cost), &action| {
            let next = self.apply(&position, action)?;
            Some((next, cost + self.path_cost(&position, action, &next)))
        })
    }

    /// Builds the round trip for a found outbound leg.
    ///
    /// Both legs are re-driven against the grid. A leg that does not land where
    /// it should, or an outbound cost that disagrees with the search, yields
    /// `None`.
    pub fn round_trip(&self, outbound: Vec<Action>, search_cost: u64) -> Option<Route> {
        match self.replay(self.start, &outbound) {
            Some((end, cost)) if end == self.goal && cost == search_cost => {
                let inbound = reversed(&outbound);
                match self.replay(self.goal, &inbound) {
                    Some((back, return_cost)) if back == self.start => Some(Route {
                        outbound,
                        inbound,
                        outbound_cost: cost,
                        return_cost,
                    }),
                    _ => {
                        debug!(start = %self.start, goal = %self.goal, "return leg not drivable");
                        None
                    }
                }
            }
            replayed => {
                warn!(
                    start = %self.start,
                    goal = %self.goal,
                    ?replayed,
                    search_cost,
                    "outbound route failed replay"
                );
                None
            }
        }
    }

    fn step(&self, from: Position, action: Action) -> Option<Position> {
        match action.delta() {
            Some((dx, dy)) => {
                let next = from.offset(dx, dy);
                (self.grid.contains(next) && !self.grid.is_blocked(from, next)).then_some(next)
            }
            None => self.grid.tunnel_at(from)?.other_end(from),
        }
    }
}

impl Problem for DeliveryProblem<'_> {
    type State = Position;
    type Action = Action;

    fn initial_state(&self) -> Position {
        self.start
    }

    fn operators(&self, state: &Position) -> Vec<Action> {
        let mut operators: Vec<Action> = Action::MOVES
            .into_iter()
            .filter(|&action| self.step(*state, action).is_some())
            .collect();
        if self.grid.tunnel_at(*state).is_some() {
            operators.push(Action::Tunnel);
        }
        operators
    }

    fn apply(&self, state: &Position, action: Action) -> Option<Position> {
        self.step(*state, action)
    }

    fn goal_test(&self, state: &Position) -> bool {
        *state == self.goal
    }

    fn path_cost(&self, parent: &Position, action: Action, successor: &Position) -> u64 {
        match action {
            Action::Tunnel => self
                .grid
                .tunnel_at(*parent)
                .map_or_else(|| parent.manhattan(successor), |tunnel| tunnel.cost()),
            _ => u64::from(self.grid.traffic_cost(*parent, *successor)),
        }
    }
}

impl Informed for DeliveryProblem<'_> {
    fn estimate(&self, state: &Position, heuristic: Heuristic) -> u64 {
        heuristic.estimate(*state, self.goal)
    }
}

/// Outcome of routing a single store -> customer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairResult {
    /// `None` when no drivable round trip exists.
    pub route: Option<Route>,
    pub nodes_expanded: usize,
}

impl PairResult {
    pub fn cost(&self) -> Cost {
        self.route
            .as_ref()
            .map_or(Cost::Unreachable, |route| Cost::Finite(route.cost()))
    }
}

/// Searches one pair with `strategy` and validates the resulting round trip.
pub fn plan_route(grid: &Grid, start: Position, goal: Position, strategy: StrategyCode) -> PairResult {
    let problem = DeliveryProblem::new(grid, start, goal);
    let mut engine = SearchEngine::new();

    let solution = match strategy {
        StrategyCode::BreadthFirst => engine.search(&problem, &mut BreadthFirst),
        StrategyCode::DepthFirst => engine.search(&problem, &mut DepthFirst),
        StrategyCode::UniformCost => engine.search(&problem, &mut UniformCost),
        StrategyCode::GreedyH1 | StrategyCode::GreedyH2 => {
            let mut greedy = GreedyBestFirst {
                heuristic: heuristic_of(strategy),
            };
            engine.search(&problem, &mut greedy)
        }
        StrategyCode::AStarH1 | StrategyCode::AStarH2 => {
            let mut astar = AStar {
                heuristic: heuristic_of(strategy),
            };
            engine.search(&problem, &mut astar)
        }
        StrategyCode::IterativeDeepening => engine.iterative_deepening(&problem, grid.area()),
    };

    let route = solution.and_then(|found| problem.round_trip(found.actions, found.path_cost));
    PairResult {
        route,
        nodes_expanded: engine.nodes_expanded(),
    }
}

fn heuristic_of(strategy: StrategyCode) -> Heuristic {
    strategy.heuristic().unwrap_or(Heuristic::Manhattan)
}

/// Pairwise results for every store (rows) and customer (columns).
#[derive(Debug, Clone)]
pub struct RouteMatrix {
    stores: usize,
    customers: usize,
    cells: Vec<PairResult>,
}

impl RouteMatrix {
    /// Routes every store -> customer pair of `grid` exactly once.
    ///
    /// With `parallel` set, pairs are spread over the rayon pool. Each pair
    /// gets its own engine and writes only its own cell.
    pub fn compute(grid: &Grid, strategy: StrategyCode, parallel: bool) -> Self {
        let stores = grid.stores();
        let customers = grid.customers();
        let pairs = stores.len() * customers.len();

        let route_pair = |index: usize| {
            let (store, customer) = (index / customers.len(), index % customers.len());
            let result = plan_route(grid, stores[store], customers[customer], strategy);
            debug!(
                store,
                customer,
                cost = %result.cost(),
                expanded = result.nodes_expanded,
                "routed pair"
            );
            result
        };

        let cells: Vec<PairResult> = if parallel {
            (0..pairs).into_par_iter().map(route_pair).collect()
        } else {
            (0..pairs).map(route_pair).collect()
        };

        Self {
            stores: stores.len(),
            customers: customers.len(),
            cells,
        }
    }

    pub fn store_count(&self) -> usize {
        self.stores
    }

    pub fn customer_count(&self) -> usize {
        self.customers
    }

    pub fn get(&self, store: usize, customer: usize) -> &PairResult {
        &self.cells[store * self.customers + customer]
    }

    pub fn cost(&self, store: usize, customer: usize) -> Cost {
        self.get(store, customer).cost()
    }
}
