//! The 5x4 sample grid used throughout the integration tests.
//!
//! ```text
//!   y
//!   3   .  -3-  .  -2-  T  -2-  .  -4-  .
//!       2       1       4       3       1
//!   2   .  -2-  .  -1-  T  -2-  .  -1-  C2
//!       3       1       2       1       3
//!   1   .  -1-  .  -3-  .  -X-  .  -2-  .
//!       1       2       3       X       1
//!   0   S  -2-  .  -1-  .  -3-  .  -4-  C1
//!       0       1       2       3       4   x
//! ```
//!
//! Every road has the same cost in both directions; `X` marks blocked roads
//! and `T` the two ends of the tunnel (2,2) <-> (2,3). `up` increases y.

#![allow(dead_code)]

use grid_delivery::grid::{Grid, Position};
use grid_delivery::input::{PlanningInput, TrafficEdge};

pub const STORE: Position = Position::new(0, 0);
pub const CUSTOMER_ROW: Position = Position::new(4, 0);
pub const CUSTOMER_UPPER: Position = Position::new(4, 2);
pub const TUNNEL: (Position, Position) = (Position::new(2, 2), Position::new(2, 3));

/// One-way optimal cost to (4,0): right x4 along row 0.
pub const CUSTOMER_ROW_ONE_WAY: u64 = 10;
/// One-way optimal cost to (4,2): up,right,up,right,right,right.
pub const CUSTOMER_UPPER_ONE_WAY: u64 = 7;

/// Undirected roads as `(x1, y1, x2, y2, cost)`.
const ROADS: &[(i32, i32, i32, i32, i64)] = &[
    // Row 0
    (0, 0, 1, 0, 2),
    (1, 0, 2, 0, 1),
    (2, 0, 3, 0, 3),
    (3, 0, 4, 0, 4),
    // Row 1
    (0, 1, 1, 1, 1),
    (1, 1, 2, 1, 3),
    (2, 1, 3, 1, 0),
    (3, 1, 4, 1, 2),
    // Row 2
    (0, 2, 1, 2, 2),
    (1, 2, 2, 2, 1),
    (2, 2, 3, 2, 2),
    (3, 2, 4, 2, 1),
    // Row 3
    (0, 3, 1, 3, 3),
    (1, 3, 2, 3, 2),
    (2, 3, 3, 3, 2),
    (3, 3, 4, 3, 4),
    // Column 0
    (0, 0, 0, 1, 1),
    (0, 1, 0, 2, 3),
    (0, 2, 0, 3, 2),
    // Column 1
    (1, 0, 1, 1, 2),
    (1, 1, 1, 2, 1),
    (1, 2, 1, 3, 1),
    // Column 2
    (2, 0, 2, 1, 3),
    (2, 1, 2, 2, 2),
    (2, 2, 2, 3, 4),
    // Column 3
    (3, 0, 3, 1, 0),
    (3, 1, 3, 2, 1),
    (3, 2, 3, 3, 3),
    // Column 4
    (4, 0, 4, 1, 1),
    (4, 1, 4, 2, 3),
    (4, 2, 4, 3, 1),
];

/// Both directions of every road.
pub fn sample_traffic() -> Vec<TrafficEdge> {
    ROADS
        .iter()
        .flat_map(|&(x1, y1, x2, y2, cost)| {
            let a = Position::new(x1, y1);
            let b = Position::new(x2, y2);
            [TrafficEdge::new(a, b, cost), TrafficEdge::new(b, a, cost)]
        })
        .collect()
}

/// Planning input with the given stores and customers on the sample map.
pub fn sample_input_with(stores: Vec<Position>, customers: Vec<Position>) -> PlanningInput {
    PlanningInput {
        width: 5,
        height: 4,
        customer_count: customers.len(),
        store_count: stores.len(),
        stores,
        customers,
        tunnels: vec![TUNNEL],
        traffic: sample_traffic(),
    }
}

/// One store at (0,0), customers at (4,0) and (4,2).
pub fn sample_input() -> PlanningInput {
    sample_input_with(vec![STORE], vec![CUSTOMER_ROW, CUSTOMER_UPPER])
}

pub fn sample_grid() -> Grid {
    sample_input().into_grid().expect("sample grid is valid")
}

pub fn sample_grid_with(stores: Vec<Position>, customers: Vec<Position>) -> Grid {
    sample_input_with(stores, customers)
        .into_grid()
        .expect("sample grid is valid")
}
