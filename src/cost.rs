//! Route cost with an explicit "no route" value.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Cost of a delivery, or [`Cost::Unreachable`] when no route exists.
///
/// `Unreachable` orders above every finite cost and absorbs addition, so any
/// sum containing it is itself unreachable and loses every comparison with a
/// finite alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cost {
    Finite(u64),
    Unreachable,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);

    pub fn is_finite(&self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            Cost::Finite(value) => Some(*value),
            Cost::Unreachable => None,
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::ZERO
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Cost::Finite(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => a.checked_add(b).map_or(Cost::Unreachable, Cost::Finite),
            _ => Cost::Unreachable,
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{}", value),
            Cost::Unreachable => f.write_str("unreachable"),
        }
    }
}
