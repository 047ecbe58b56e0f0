//! Static delivery map: bounds, directed traffic costs and tunnels.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Traffic cost of an edge the input does not mention.
pub const DEFAULT_TRAFFIC_COST: u32 = 1;

/// Traffic cost marking a blocked road.
pub const BLOCKED: u32 = 0;

/// Integer grid coordinate. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Two positions connected regardless of adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunnel {
    pub a: Position,
    pub b: Position,
}

impl Tunnel {
    pub fn new(a: Position, b: Position) -> Self {
        Self { a, b }
    }

    /// Transit cost through the tunnel: Manhattan distance between entrances.
    pub fn cost(&self) -> u64 {
        self.a.manhattan(&self.b)
    }

    /// The far entrance as seen from `entrance`, or `None` if `entrance` is
    /// not one of this tunnel's ends.
    pub fn other_end(&self, entrance: Position) -> Option<Position> {
        if entrance == self.a {
            Some(self.b)
        } else if entrance == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Read-only delivery map.
///
/// Built once from validated input (see [`crate::input`]) and shared by
/// reference with every search of a planning run.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    traffic: HashMap<(Position, Position), u32>,
    tunnels: Vec<Tunnel>,
    tunnel_at: HashMap<Position, usize>,
    stores: Vec<Position>,
    customers: Vec<Position>,
}

impl Grid {
    /// Assembles a grid. Callers are expected to have validated the parts;
    /// [`crate::input::PlanningInput::into_grid`] does so.
    pub(crate) fn from_parts(
        width: i32,
        height: i32,
        traffic: HashMap<(Position, Position), u32>,
        tunnels: Vec<Tunnel>,
        stores: Vec<Position>,
        customers: Vec<Position>,
    ) -> Self {
        let mut tunnel_at = HashMap::with_capacity(tunnels.len() * 2);
        for (index, tunnel) in tunnels.iter().enumerate() {
            tunnel_at.insert(tunnel.a, index);
            tunnel_at.insert(tunnel.b, index);
        }

        Self {
            width,
            height,
            traffic,
            tunnels,
            tunnel_at,
            stores,
            customers,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells, the upper bound used for iterative deepening.
    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// Directed traffic cost of `from -> to`. Absent edges cost
    /// [`DEFAULT_TRAFFIC_COST`]; [`BLOCKED`] means impassable.
    pub fn traffic_cost(&self, from: Position, to: Position) -> u32 {
        self.traffic
            .get(&(from, to))
            .copied()
            .unwrap_or(DEFAULT_TRAFFIC_COST)
    }

    pub fn is_blocked(&self, from: Position, to: Position) -> bool {
        self.traffic_cost(from, to) == BLOCKED
    }

    /// The tunnel with an entrance at `position`, if any.
    pub fn tunnel_at(&self, position: Position) -> Option<&Tunnel> {
        self.tunnel_at
            .get(&position)
            .map(|&index| &self.tunnels[index])
    }

    pub fn stores(&self) -> &[Position] {
        &self.stores
    }

    pub fn customers(&self) -> &[Position] {
        &self.customers
    }
}
