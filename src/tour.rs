//! Tour representation.
//!
//! A tour is a permutation of the instance's point positions with its
//! closed-circuit cost cached alongside. The only way to build one is
//! through [`Tour::new`], which computes the cost from the route, so a
//! tour's cost can never go stale.

use crate::instance::{Instance, Point};

/// One candidate solution
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    route: Vec<usize>,
    cost: f64,
}

impl Tour {
    /// Create a tour from a route of point positions
    pub fn new(instance: &Instance, route: Vec<usize>) -> Self {
        let cost = instance.tour_cost(&route);
        Tour { route, cost }
    }

    pub fn route(&self) -> &[usize] {
        &self.route
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// The visited points, in tour order
    pub fn points(&self, instance: &Instance) -> Vec<Point> {
        self.route.iter().map(|&i| *instance.point(i)).collect()
    }

    /// Cost recomputed from the route, ignoring the cached value
    pub fn recompute_cost(&self, instance: &Instance) -> f64 {
        instance.tour_cost(&self.route)
    }

    /// Check if every position `0..n` appears exactly once
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.route.len() != n {
            return false;
        }

        let mut seen = vec![false; n];
        for &i in &self.route {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }

    /// Get the position of a point in the tour
    pub fn position(&self, point: usize) -> Option<usize> {
        self.route.iter().position(|&n| n == point)
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tour(cost {:.2}, {:?})", self.cost, self.route)
    }
}
