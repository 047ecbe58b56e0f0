//! Delivery route representation.
//!
//! A route is kept as the two action sequences the truck drives. Rendering to
//! text or drawing happens at the boundary, not within the planner core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator applied to a truck position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Tunnel,
}

impl Action {
    /// Directional moves in the order they are offered to the search.
    pub const MOVES: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Grid offset of a directional move; `None` for [`Action::Tunnel`].
    pub fn delta(&self) -> Option<(i32, i32)> {
        match self {
            Action::Up => Some((0, 1)),
            Action::Down => Some((0, -1)),
            Action::Left => Some((-1, 0)),
            Action::Right => Some((1, 0)),
            Action::Tunnel => None,
        }
    }

    /// The action that undoes this one.
    pub fn inverse(&self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Tunnel => Action::Tunnel,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Tunnel => "tunnel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Literal reversal of `actions`: the way back along the same roads.
pub fn reversed(actions: &[Action]) -> Vec<Action> {
    actions.iter().rev().map(Action::inverse).collect()
}

/// One token of the flattened route output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteStep {
    Move(Action),
    /// Separates the outbound leg from the return leg.
    Return,
}

impl fmt::Display for RouteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStep::Move(action) => fmt::Display::fmt(action, f),
            RouteStep::Return => f.write_str("|RETURN|"),
        }
    }
}

/// A validated round trip from a store to a customer and back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub outbound: Vec<Action>,
    pub inbound: Vec<Action>,
    pub outbound_cost: u64,
    pub return_cost: u64,
}

impl Route {
    /// Round-trip cost, the externally visible cost of the delivery.
    pub fn cost(&self) -> u64 {
        self.outbound_cost + self.return_cost
    }

    /// Outbound actions, the return delimiter, then return actions.
    pub fn steps(&self) -> Vec<RouteStep> {
        let mut steps = Vec::with_capacity(self.outbound.len() + self.inbound.len() + 1);
        steps.extend(self.outbound.iter().copied().map(RouteStep::Move));
        steps.push(RouteStep::Return);
        steps.extend(self.inbound.iter().copied().map(RouteStep::Move));
        steps
    }

    /// Steps joined with commas, e.g. `right,right,|RETURN|,left,left`.
    pub fn plan_string(&self) -> String {
        self.steps()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
