//! Test fixtures for grid-delivery.
//!
//! Provides the hand-checked 5x4 sample grid and small input builders.

pub mod sample_grid;

pub use sample_grid::*;
