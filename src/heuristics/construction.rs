//! Construction heuristics for the initial population.

use crate::instance::Instance;
use crate::population::Population;
use crate::tour::Tour;
use ordered_float::OrderedFloat;
use rand::prelude::*;

pub trait ConstructionHeuristic {
    fn construct(&self, instance: &Instance, rng: &mut dyn RngCore) -> Tour;
    fn name(&self) -> &str;
}

/// Visits the points in the order they were given.
pub struct InputOrderHeuristic;

impl ConstructionHeuristic for InputOrderHeuristic {
    fn construct(&self, instance: &Instance, _rng: &mut dyn RngCore) -> Tour {
        Tour::new(instance, (0..instance.dimension()).collect())
    }

    fn name(&self) -> &str {
        "InputOrder"
    }
}

/// Nearest Neighbor Heuristic
///
/// Builds a tour by repeatedly visiting the nearest unvisited point. Ties go
/// to the lowest point id, so the result is deterministic.
pub struct NearestNeighborHeuristic {
    /// Position of the first point visited
    pub start: usize,
}

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic { start: 0 }
    }

    fn find_nearest(&self, instance: &Instance, current: usize, visited: &[bool]) -> Option<usize> {
        (0..instance.dimension())
            .filter(|&n| !visited[n])
            .min_by_key(|&n| (OrderedFloat(instance.distance(current, n)), instance.point(n).id))
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, instance: &Instance, _rng: &mut dyn RngCore) -> Tour {
        let n = instance.dimension();
        let start = self.start.min(n - 1);

        let mut route = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        route.push(start);
        visited[start] = true;

        let mut current = start;
        while let Some(next) = self.find_nearest(instance, current, &visited) {
            route.push(next);
            visited[next] = true;
            current = next;
        }

        Tour::new(instance, route)
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

/// Keeps the first point and visits the others in uniformly random order.
pub struct RandomHeuristic;

impl ConstructionHeuristic for RandomHeuristic {
    fn construct(&self, instance: &Instance, rng: &mut dyn RngCore) -> Tour {
        let mut route: Vec<usize> = (0..instance.dimension()).collect();
        route[1..].shuffle(rng);
        Tour::new(instance, route)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Seed a population of `size` tours: the input order, one nearest-neighbour
/// tour, and `size - 2` random tours.
pub fn seed_population(instance: &Instance, size: usize, rng: &mut dyn RngCore) -> Population {
    let mut population = Population::new(size);

    let nearest = NearestNeighborHeuristic::new();
    let anchors: [&dyn ConstructionHeuristic; 2] = [&InputOrderHeuristic, &nearest];
    for heuristic in anchors {
        let tour = heuristic.construct(instance, rng);
        log::debug!("[GA] {} seed cost {:.3}", heuristic.name(), tour.cost());
        population.insert(tour);
    }

    for _ in 0..size.saturating_sub(2) {
        population.insert(RandomHeuristic.construct(instance, rng));
    }

    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{DistanceMetric, Point};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> Instance {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 10.0, 0.0),
            Point::new(2, 10.0, 10.0),
            Point::new(3, 0.0, 10.0),
        ];
        Instance::new("square", points, &DistanceMetric::Euclidean).unwrap()
    }

    #[test]
    fn test_nearest_neighbor_square_is_perimeter() {
        let instance = square();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tour = NearestNeighborHeuristic::new().construct(&instance, &mut rng);

        // From (0,0) both (10,0) and (0,10) are at distance 10: lowest id wins.
        assert_eq!(tour.route(), &[0, 1, 2, 3]);
        assert!((tour.cost() - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_nearest_neighbor_tie_break_uses_point_id() {
        let points = vec![
            Point::new(10, 0.0, 0.0),
            Point::new(5, 0.0, 3.0),
            Point::new(2, 3.0, 0.0),
        ];
        let instance = Instance::new("tie", points, &DistanceMetric::Euclidean).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tour = NearestNeighborHeuristic::new().construct(&instance, &mut rng);

        assert_eq!(tour.route(), &[0, 2, 1]);
    }

    #[test]
    fn test_random_keeps_first_point() {
        let points = (0..12).map(|i| Point::new(i, i as f64, (i * i) as f64)).collect();
        let instance = Instance::new("curve", points, &DistanceMetric::Manhattan).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let tour = RandomHeuristic.construct(&instance, &mut rng);
            assert_eq!(tour.route()[0], 0);
            assert!(tour.is_permutation_of(12));
        }
    }

    #[test]
    fn test_seed_population_layout() {
        let instance = square();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let population = seed_population(&instance, 6, &mut rng);

        assert_eq!(population.len(), 6);
        assert_eq!(population.get(0).unwrap().route(), &[0, 1, 2, 3]);
        assert!(population.iter().all(|t| t.is_permutation_of(4)));
    }
}
