//! Remaining-cost estimates for informed strategies.
//!
//! Both estimates are built on the Manhattan distance to the goal. Every
//! directional step costs at least 1 and a tunnel costs exactly the Manhattan
//! distance between its entrances, so h1 never overestimates.

use serde::{Deserialize, Serialize};

use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Manhattan distance to the goal. Admissible.
    Manhattan,
    /// 1.5 times the Manhattan distance, truncated. Can overestimate.
    ScaledManhattan,
}

impl Heuristic {
    pub fn estimate(&self, from: Position, goal: Position) -> u64 {
        let distance = from.manhattan(&goal);
        match self {
            Heuristic::Manhattan => distance,
            Heuristic::ScaledManhattan => distance * 3 / 2,
        }
    }

    pub fn is_admissible(&self) -> bool {
        matches!(self, Heuristic::Manhattan)
    }
}
