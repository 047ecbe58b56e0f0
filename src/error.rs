//! Error types for input validation and planning.

use std::fmt;

use crate::grid::Position;

/// Planning input that cannot be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyGrid { width: i32, height: i32 },
    CountMismatch {
        field: &'static str,
        declared: usize,
        supplied: usize,
    },
    OutOfBounds {
        field: &'static str,
        position: Position,
    },
    NegativeCost {
        from: Position,
        to: Position,
        cost: i64,
    },
    DegenerateTunnel(Position),
    SharedTunnelEntrance(Position),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::EmptyGrid { width, height } => {
                write!(f, "grid must have positive size, got {}x{}", width, height)
            }
            InputError::CountMismatch {
                field,
                declared,
                supplied,
            } => write!(
                f,
                "{} count declared as {} but {} supplied",
                field, declared, supplied
            ),
            InputError::OutOfBounds { field, position } => {
                write!(f, "{} position {} lies outside the grid", field, position)
            }
            InputError::NegativeCost { from, to, cost } => {
                write!(f, "traffic {} -> {} has negative cost {}", from, to, cost)
            }
            InputError::DegenerateTunnel(position) => {
                write!(f, "tunnel at {} connects a position to itself", position)
            }
            InputError::SharedTunnelEntrance(position) => {
                write!(f, "position {} is the entrance of more than one tunnel", position)
            }
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    InvalidInput(InputError),
    UnknownStrategy(String),
    /// Capacity-limited matching has fewer store slots than customers.
    InsufficientCapacity { customers: usize, slots: usize },
    /// Exhaustive assignment stopped before completing any assignment.
    AssignmentAborted,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidInput(err) => write!(f, "invalid input: {}", err),
            PlanError::UnknownStrategy(code) => write!(f, "unknown strategy: {}", code),
            PlanError::InsufficientCapacity { customers, slots } => write!(
                f,
                "{} customers cannot be seated on {} store slots",
                customers, slots
            ),
            PlanError::AssignmentAborted => {
                write!(f, "assignment search stopped before any complete assignment")
            }
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::InvalidInput(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InputError> for PlanError {
    fn from(err: InputError) -> Self {
        PlanError::InvalidInput(err)
    }
}
