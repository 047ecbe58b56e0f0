//! Planning input as handed over by a grid-description collaborator.
//!
//! Parsing any particular text format happens outside this crate; this module
//! only validates the structured data and builds the [`Grid`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::grid::{Grid, Position, Tunnel};

/// A directed traffic edge. Cost 0 blocks the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficEdge {
    pub from: Position,
    pub to: Position,
    pub cost: i64,
}

impl TrafficEdge {
    pub fn new(from: Position, to: Position, cost: i64) -> Self {
        Self { from, to, cost }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanningInput {
    pub width: i32,
    pub height: i32,
    pub customer_count: usize,
    pub store_count: usize,
    pub stores: Vec<Position>,
    pub customers: Vec<Position>,
    #[serde(default)]
    pub tunnels: Vec<(Position, Position)>,
    #[serde(default)]
    pub traffic: Vec<TrafficEdge>,
}

impl PlanningInput {
    /// Validates the input and builds the grid.
    ///
    /// Fails on the first problem found; nothing is partially built.
    pub fn into_grid(self) -> Result<Grid, InputError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(InputError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        check_count("store", self.store_count, self.stores.len())?;
        check_count("customer", self.customer_count, self.customers.len())?;

        let in_bounds = |position: &Position| {
            position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
        };

        for position in &self.stores {
            if !in_bounds(position) {
                return Err(InputError::OutOfBounds {
                    field: "store",
                    position: *position,
                });
            }
        }
        for position in &self.customers {
            if !in_bounds(position) {
                return Err(InputError::OutOfBounds {
                    field: "customer",
                    position: *position,
                });
            }
        }

        let mut entrances = HashSet::with_capacity(self.tunnels.len() * 2);
        let mut tunnels = Vec::with_capacity(self.tunnels.len());
        for &(a, b) in &self.tunnels {
            for entrance in [a, b] {
                if !in_bounds(&entrance) {
                    return Err(InputError::OutOfBounds {
                        field: "tunnel",
                        position: entrance,
                    });
                }
            }
            if a == b {
                return Err(InputError::DegenerateTunnel(a));
            }
            for entrance in [a, b] {
                if !entrances.insert(entrance) {
                    return Err(InputError::SharedTunnelEntrance(entrance));
                }
            }
            tunnels.push(Tunnel::new(a, b));
        }

        let mut traffic = HashMap::with_capacity(self.traffic.len());
        for edge in &self.traffic {
            for end in [edge.from, edge.to] {
                if !in_bounds(&end) {
                    return Err(InputError::OutOfBounds {
                        field: "traffic",
                        position: end,
                    });
                }
            }
            let cost = u32::try_from(edge.cost).map_err(|_| InputError::NegativeCost {
                from: edge.from,
                to: edge.to,
                cost: edge.cost,
            })?;
            // Later entries for the same edge win.
            traffic.insert((edge.from, edge.to), cost);
        }

        Ok(Grid::from_parts(
            self.width,
            self.height,
            traffic,
            tunnels,
            self.stores,
            self.customers,
        ))
    }
}

impl TryFrom<PlanningInput> for Grid {
    type Error = InputError;

    fn try_from(input: PlanningInput) -> Result<Self, Self::Error> {
        input.into_grid()
    }
}

fn check_count(field: &'static str, declared: usize, supplied: usize) -> Result<(), InputError> {
    if declared != supplied {
        return Err(InputError::CountMismatch {
            field,
            declared,
            supplied,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> PlanningInput {
        PlanningInput {
            width: 3,
            height: 3,
            customer_count: 1,
            store_count: 1,
            stores: vec![Position::new(0, 0)],
            customers: vec![Position::new(2, 2)],
            tunnels: vec![(Position::new(0, 2), Position::new(2, 0))],
            traffic: vec![TrafficEdge::new(Position::new(0, 0), Position::new(1, 0), 0)],
        }
    }

    #[test]
    fn test_valid_input_builds_grid() {
        let grid = base_input().into_grid().expect("valid input");
        assert_eq!(grid.stores(), &[Position::new(0, 0)]);
        assert!(grid.is_blocked(Position::new(0, 0), Position::new(1, 0)));
        assert!(grid.tunnel_at(Position::new(2, 0)).is_some());
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let mut input = base_input();
        input.customer_count = 2;
        assert_eq!(
            input.into_grid().unwrap_err(),
            InputError::CountMismatch {
                field: "customer",
                declared: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let mut input = base_input();
        input.height = 0;
        assert!(matches!(input.into_grid(), Err(InputError::EmptyGrid { .. })));
    }

    #[test]
    fn test_out_of_bounds_store_is_rejected() {
        let mut input = base_input();
        input.stores = vec![Position::new(3, 0)];
        assert!(matches!(
            input.into_grid(),
            Err(InputError::OutOfBounds { field: "store", .. })
        ));
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let mut input = base_input();
        input
            .traffic
            .push(TrafficEdge::new(Position::new(1, 0), Position::new(1, 1), -2));
        assert!(matches!(input.into_grid(), Err(InputError::NegativeCost { cost: -2, .. })));
    }

    #[test]
    fn test_shared_tunnel_entrance_is_rejected() {
        let mut input = base_input();
        input.tunnels.push((Position::new(2, 0), Position::new(1, 1)));
        assert_eq!(
            input.into_grid().unwrap_err(),
            InputError::SharedTunnelEntrance(Position::new(2, 0))
        );
    }

    #[test]
    fn test_degenerate_tunnel_is_rejected() {
        let mut input = base_input();
        input.tunnels = vec![(Position::new(1, 1), Position::new(1, 1))];
        assert_eq!(
            input.into_grid().unwrap_err(),
            InputError::DegenerateTunnel(Position::new(1, 1))
        );
    }
}
