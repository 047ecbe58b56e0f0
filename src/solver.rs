//! Delivery planner solver: assigns every customer to the store serving it.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cost::Cost;
use crate::error::PlanError;
use crate::grid::Grid;
use crate::input::PlanningInput;
use crate::route::Route;
use crate::routing::RouteMatrix;
use crate::strategy::StrategyCode;

/// How often the exhaustive search looks at the clock, in visited nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssignmentPolicy {
    /// Enumerate all store choices for every customer; exact, exponential.
    #[default]
    Exhaustive,
    /// Cheapest store per customer, decided independently.
    Greedy,
    /// Kuhn-Munkres over store slots; honors `store_capacity`.
    MinCostMatching,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Search strategy used for every store -> customer pair.
    pub strategy: StrategyCode,
    pub policy: AssignmentPolicy,
    /// Route the pairs on the rayon thread pool.
    pub parallel: bool,
    /// Maximum nodes the exhaustive assignment search may visit.
    pub assignment_budget: Option<u64>,
    /// Wall-clock limit for the exhaustive assignment search.
    pub assignment_deadline: Option<Duration>,
    /// Maximum customers per store; only `MinCostMatching` enforces it.
    pub store_capacity: Option<usize>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyCode::AStarH1,
            policy: AssignmentPolicy::Exhaustive,
            parallel: true,
            assignment_budget: None,
            assignment_deadline: None,
            store_capacity: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnassignedReason {
    /// No store has a drivable round trip to the customer.
    Unreachable,
    /// Every store that could reach the customer was already full.
    NoReachableCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedCustomer {
    pub customer: usize,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Complete,
    BudgetExhausted,
    DeadlineReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub customer: usize,
    pub route: Route,
    /// Round-trip cost.
    pub cost: u64,
    pub nodes_expanded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePlan {
    pub store: usize,
    pub customers: Vec<usize>,
    pub deliveries: Vec<Delivery>,
    pub total_cost: u64,
    pub nodes_expanded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerResult {
    /// Stores with at least one assigned customer, by store index.
    pub stores: Vec<StorePlan>,
    pub unassigned: Vec<UnassignedCustomer>,
    pub total_cost: u64,
    pub termination: Termination,
}

impl PlannerResult {
    /// Store serving `customer`, if any.
    pub fn store_of(&self, customer: usize) -> Option<usize> {
        self.stores
            .iter()
            .find(|plan| plan.customers.contains(&customer))
            .map(|plan| plan.store)
    }
}

/// Validates `input` and plans it.
pub fn solve_input(input: PlanningInput, options: SolveOptions) -> Result<PlannerResult, PlanError> {
    let grid = input.into_grid()?;
    solve(&grid, options)
}

pub fn solve(grid: &Grid, options: SolveOptions) -> Result<PlannerResult, PlanError> {
    info!(
        strategy = %options.strategy,
        policy = ?options.policy,
        stores = grid.stores().len(),
        customers = grid.customers().len(),
        "planning deliveries"
    );

    let matrix = RouteMatrix::compute(grid, options.strategy, options.parallel);

    let mut unassigned = Vec::new();
    let mut reachable = Vec::new();
    for customer in 0..matrix.customer_count() {
        if (0..matrix.store_count()).any(|store| matrix.cost(store, customer).is_finite()) {
            reachable.push(customer);
        } else {
            unassigned.push(UnassignedCustomer {
                customer,
                reason: UnassignedReason::Unreachable,
            });
        }
    }

    let (choices, termination) = match options.policy {
        AssignmentPolicy::Greedy => (assign_greedy(&matrix, &reachable), Termination::Complete),
        AssignmentPolicy::Exhaustive => assign_exhaustive(&matrix, &reachable, &options)?,
        AssignmentPolicy::MinCostMatching => {
            let capacity = options.store_capacity.unwrap_or(reachable.len());
            (assign_matching(&matrix, &reachable, capacity)?, Termination::Complete)
        }
    };

    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); matrix.store_count()];
    for (&customer, &store) in reachable.iter().zip(&choices) {
        if matrix.cost(store, customer).is_finite() {
            assigned[store].push(customer);
        } else {
            unassigned.push(UnassignedCustomer {
                customer,
                reason: UnassignedReason::NoReachableCapacity,
            });
        }
    }
    unassigned.sort_by_key(|entry| entry.customer);

    let stores: Vec<StorePlan> = assigned
        .into_iter()
        .enumerate()
        .filter(|(_, customers)| !customers.is_empty())
        .map(|(store, mut customers)| {
            customers.sort_unstable();
            store_plan(&matrix, store, customers)
        })
        .collect();

    let total_cost: u64 = stores.iter().map(|plan| plan.total_cost).sum();

    info!(
        total_cost,
        unassigned = unassigned.len(),
        ?termination,
        "planning finished"
    );

    Ok(PlannerResult {
        stores,
        unassigned,
        total_cost,
        termination,
    })
}

fn store_plan(matrix: &RouteMatrix, store: usize, customers: Vec<usize>) -> StorePlan {
    let deliveries: Vec<Delivery> = customers
        .iter()
        .filter_map(|&customer| {
            let pair = matrix.get(store, customer);
            pair.route.as_ref().map(|route| Delivery {
                customer,
                route: route.clone(),
                cost: route.cost(),
                nodes_expanded: pair.nodes_expanded,
            })
        })
        .collect();

    StorePlan {
        store,
        total_cost: deliveries.iter().map(|delivery| delivery.cost).sum(),
        nodes_expanded: deliveries.iter().map(|delivery| delivery.nodes_expanded).sum(),
        customers,
        deliveries,
    }
}

// ============================================================================
// Assignment Policies
// ============================================================================

/// Cheapest store for each customer; ties go to the lowest store index.
fn assign_greedy(matrix: &RouteMatrix, customers: &[usize]) -> Vec<usize> {
    customers
        .iter()
        .map(|&customer| {
            (0..matrix.store_count())
                .min_by_key(|&store| matrix.cost(store, customer))
                .unwrap_or(0)
        })
        .collect()
}

/// Backtracking over every store choice of every customer.
fn assign_exhaustive(
    matrix: &RouteMatrix,
    customers: &[usize],
    options: &SolveOptions,
) -> Result<(Vec<usize>, Termination), PlanError> {
    // Cheapest store first, so the first complete assignment is the greedy one
    // and a truncated run never keeps an unreachable pair it could avoid.
    let store_order: Vec<Vec<usize>> = customers
        .iter()
        .map(|&customer| {
            let mut stores: Vec<usize> = (0..matrix.store_count()).collect();
            stores.sort_by_key(|&store| matrix.cost(store, customer));
            stores
        })
        .collect();

    let mut search = ExhaustiveAssignment {
        matrix,
        customers,
        store_order,
        budget: options.assignment_budget,
        deadline: options.assignment_deadline,
        started: Instant::now(),
        visited: 0,
        current: Vec::with_capacity(customers.len()),
        best: None,
        stopped: None,
    };
    search.visit(0, Cost::ZERO);

    if let Some(reason) = search.stopped {
        warn!(
            visited = search.visited,
            ?reason,
            found = search.best.is_some(),
            "exhaustive assignment stopped early"
        );
    }

    match search.best {
        Some((_, choices)) => Ok((choices, search.stopped.unwrap_or(Termination::Complete))),
        None => Err(PlanError::AssignmentAborted),
    }
}

struct ExhaustiveAssignment<'a> {
    matrix: &'a RouteMatrix,
    customers: &'a [usize],
    store_order: Vec<Vec<usize>>,
    budget: Option<u64>,
    deadline: Option<Duration>,
    started: Instant,
    visited: u64,
    current: Vec<usize>,
    best: Option<(Cost, Vec<usize>)>,
    stopped: Option<Termination>,
}

impl ExhaustiveAssignment<'_> {
    fn visit(&mut self, depth: usize, cost: Cost) {
        self.visited += 1;
        if let Some(reason) = self.limit_reached() {
            self.stopped = Some(reason);
            return;
        }

        if depth == self.customers.len() {
            let improves = match &self.best {
                Some((best_cost, _)) => cost < *best_cost,
                None => true,
            };
            if improves {
                self.best = Some((cost, self.current.clone()));
            }
            return;
        }

        let customer = self.customers[depth];
        for index in 0..self.store_order[depth].len() {
            let store = self.store_order[depth][index];
            self.current.push(store);
            self.visit(depth + 1, cost + self.matrix.cost(store, customer));
            self.current.pop();
            if self.stopped.is_some() {
                return;
            }
        }
    }

    fn limit_reached(&self) -> Option<Termination> {
        if self.budget.is_some_and(|budget| self.visited > budget) {
            return Some(Termination::BudgetExhausted);
        }
        if let Some(deadline) = self.deadline {
            let check = self.visited == 1 || self.visited % DEADLINE_CHECK_INTERVAL == 0;
            if check && self.started.elapsed() >= deadline {
                return Some(Termination::DeadlineReached);
            }
        }
        None
    }
}

/// Min-cost matching of customers onto `capacity` slots per store.
fn assign_matching(matrix: &RouteMatrix, customers: &[usize], capacity: usize) -> Result<Vec<usize>, PlanError> {
    // No store can take more than every customer.
    let capacity = capacity.min(customers.len());
    let slots = matrix.store_count().checked_mul(capacity).unwrap_or(usize::MAX);
    if customers.len() > slots {
        return Err(PlanError::InsufficientCapacity {
            customers: customers.len(),
            slots,
        });
    }
    if customers.is_empty() {
        return Ok(Vec::new());
    }

    // Unreachable cells cost more than every finite cell together.
    let finite_total: u64 = customers
        .iter()
        .flat_map(|&customer| (0..matrix.store_count()).map(move |store| (store, customer)))
        .filter_map(|(store, customer)| matrix.cost(store, customer).finite())
        .fold(0u64, u64::saturating_add);
    let unreachable = to_weight(finite_total.saturating_add(1));

    let weights: Vec<Vec<i64>> = customers
        .iter()
        .map(|&customer| {
            (0..slots)
                .map(|slot| match matrix.cost(slot / capacity, customer) {
                    Cost::Finite(cost) => to_weight(cost),
                    Cost::Unreachable => unreachable,
                })
                .collect()
        })
        .collect();

    Ok(hungarian(&weights)
        .into_iter()
        .map(|slot| slot / capacity)
        .collect())
}

fn to_weight(cost: u64) -> i64 {
    i64::try_from(cost).unwrap_or(i64::MAX / 4).min(i64::MAX / 4)
}

/// Kuhn-Munkres with potentials for an `n x m` matrix, `n <= m`.
///
/// Returns the column chosen for every row.
fn hungarian(weights: &[Vec<i64>]) -> Vec<usize> {
    let rows = weights.len();
    let cols = weights.first().map_or(0, Vec::len);
    let infinity = i64::MAX / 2;

    // 1-based; column 0 is a virtual start column.
    let mut row_potential = vec![0i64; rows + 1];
    let mut col_potential = vec![0i64; cols + 1];
    let mut owner = vec![0usize; cols + 1];
    let mut way = vec![0usize; cols + 1];

    for row in 1..=rows {
        owner[0] = row;
        let mut col = 0;
        let mut min_slack = vec![infinity; cols + 1];
        let mut used = vec![false; cols + 1];

        loop {
            used[col] = true;
            let current_row = owner[col];
            let mut delta = infinity;
            let mut next_col = 0;

            for j in 1..=cols {
                if used[j] {
                    continue;
                }
                let slack = weights[current_row - 1][j - 1] - row_potential[current_row] - col_potential[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = col;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    next_col = j;
                }
            }

            for j in 0..=cols {
                if used[j] {
                    row_potential[owner[j]] += delta;
                    col_potential[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            col = next_col;
            if owner[col] == 0 {
                break;
            }
        }

        loop {
            let previous = way[col];
            owner[col] = owner[previous];
            col = previous;
            if col == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; rows];
    for j in 1..=cols {
        if owner[j] != 0 {
            assignment[owner[j] - 1] = j - 1;
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(weights: &[Vec<i64>]) -> i64 {
        fn go(weights: &[Vec<i64>], row: usize, used: &mut Vec<bool>) -> i64 {
            if row == weights.len() {
                return 0;
            }
            let mut best = i64::MAX;
            for col in 0..used.len() {
                if !used[col] {
                    used[col] = true;
                    best = best.min(weights[row][col] + go(weights, row + 1, used));
                    used[col] = false;
                }
            }
            best
        }
        let cols = weights.first().map_or(0, Vec::len);
        go(weights, 0, &mut vec![false; cols])
    }

    fn total(weights: &[Vec<i64>], assignment: &[usize]) -> i64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| weights[row][col])
            .sum()
    }

    #[test]
    fn test_hungarian_square() {
        let weights = vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]];
        let assignment = hungarian(&weights);
        assert_eq!(total(&weights, &assignment), 5);
        assert_eq!(total(&weights, &assignment), brute_force(&weights));
    }

    #[test]
    fn test_hungarian_rectangular() {
        let weights = vec![vec![7, 3, 9, 1], vec![2, 8, 4, 1]];
        let assignment = hungarian(&weights);
        assert_ne!(assignment[0], assignment[1]);
        assert_eq!(total(&weights, &assignment), brute_force(&weights));
        assert_eq!(total(&weights, &assignment), 3);
    }

    #[test]
    fn test_hungarian_empty() {
        assert!(hungarian(&[]).is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = SolveOptions::default();
        assert_eq!(options.strategy, StrategyCode::AStarH1);
        assert_eq!(options.policy, AssignmentPolicy::Exhaustive);
        assert!(options.assignment_budget.is_none());
    }
}
