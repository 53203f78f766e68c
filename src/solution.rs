//! Solution reporting.
//!
//! A [`Solution`] is what a run hands back to its caller: the best tour
//! found, expressed as points, together with how and why the run stopped.

use crate::instance::{Instance, Point};
use crate::tour::Tour;
use serde::{Deserialize, Serialize};

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The best cost stopped improving for longer than the patience
    Converged,
    /// The wall-clock budget ran out
    TimedOut,
    /// The generation cap was reached
    GenerationLimit,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Termination::Converged => "converged",
            Termination::TimedOut => "timed out",
            Termination::GenerationLimit => "generation limit",
        };
        f.write_str(s)
    }
}

/// Represents the result of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Points in visiting order; the circuit closes back to the first one
    pub tour: Vec<Point>,
    /// Total closed-circuit cost
    pub cost: f64,
    /// Number of generations run
    pub generations: usize,
    pub termination: Termination,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Distance metric the cost was measured with
    pub metric: String,
    pub seed: u64,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Solution {
    /// Create a solution from the best tour of a run
    pub fn from_tour(
        instance: &Instance,
        tour: &Tour,
        generations: usize,
        termination: Termination,
        seed: u64,
    ) -> Self {
        Solution {
            tour: tour.points(instance),
            cost: tour.cost(),
            generations,
            termination,
            algorithm: "GeneticAlgorithm".to_string(),
            metric: instance.metric_name().to_string(),
            seed,
            computation_time: 0.0,
        }
    }

    /// Ids of the visited points, in order
    pub fn route_ids(&self) -> Vec<usize> {
        self.tour.iter().map(|p| p.id).collect()
    }

    /// Check if every point of the instance is visited exactly once
    pub fn is_complete(&self, instance: &Instance) -> bool {
        if self.tour.len() != instance.dimension() {
            return false;
        }

        let mut ids = self.route_ids();
        ids.sort_unstable();
        ids.dedup();
        let mut expected: Vec<usize> = instance.points().iter().map(|p| p.id).collect();
        expected.sort_unstable();
        ids == expected
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Metric: {}", self.metric)?;
        writeln!(f, "  Generations: {} ({})", self.generations, self.termination)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Tour: {:?}", self.route_ids())
    }
}
