//! Heuristics module for the TSP.
//!
//! This module exports the construction heuristics, the genetic operators
//! and the generation loop that drives them.

pub mod construction;
pub mod crossover;
pub mod mutation;
pub mod genetic;

pub use construction::*;
pub use crossover::*;
pub use mutation::*;
pub use genetic::*;
