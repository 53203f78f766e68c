//! GA-TSP Solver Library
//!
//! A genetic algorithm for the Traveling Salesman Problem.
//!
//! # Features
//!
//! - Euclidean and Manhattan metrics, or any custom distance function
//! - Input-order, nearest-neighbour and random construction of the initial population
//! - Order-preserving splice crossover and segment-swap mutation
//! - Truncation selection with convergence, time-budget and generation-cap stopping rules
//! - Multi-seed benchmarking
//!
//! # Example
//!
//! ```no_run
//! use ga_tsp_solver::instance::{DistanceMetric, Point};
//! use ga_tsp_solver::heuristics::genetic::{solve, GAConfig};
//!
//! let points = vec![
//!     Point::new(0, 0.0, 0.0),
//!     Point::new(1, 10.0, 0.0),
//!     Point::new(2, 10.0, 10.0),
//!     Point::new(3, 0.0, 10.0),
//! ];
//!
//! let solution = solve(&points, &GAConfig::default(), &DistanceMetric::Euclidean).unwrap();
//!
//! println!("Solution cost: {:.2}", solution.cost);
//! ```

pub mod error;
pub mod instance;
pub mod tour;
pub mod population;
pub mod solution;
pub mod heuristics;
pub mod benchmark;

pub use error::SolverError;
pub use heuristics::genetic::{solve, solve_with_observer, GAConfig, GeneticAlgorithm};
pub use instance::{DistanceMetric, Instance, Metric, Point};
pub use solution::{Solution, Termination};
pub use tour::Tour;
