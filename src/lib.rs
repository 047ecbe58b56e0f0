//! grid-delivery core
//!
//! Strategy-pluggable graph search applied to store-to-customer delivery on a
//! grid with directed traffic costs, blocked roads and tunnels, plus the
//! assignment step that splits customers between stores.

pub mod cost;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod input;
pub mod route;
pub mod routing;
pub mod search;
pub mod solver;
pub mod strategy;
pub mod traits;
