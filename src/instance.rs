//! Module for parsing and representing TSP instances.
//!
//! An instance is a fixed list of planar points together with the distance
//! matrix induced by the chosen metric. Point lists are read from plain text
//! files with one `name x y` record per line.

use crate::error::SolverError;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Side of the square canvas used when generating random points.
pub const CANVAS_SIZE: f64 = 500.0;

/// A point to visit.
///
/// Identity is the `id`: two points at the same coordinates are still
/// distinct points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Point { id, x, y }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Symmetric, non-negative cost between two points.
pub trait Metric {
    fn distance(&self, a: &Point, b: &Point) -> f64;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Metric for F
where
    F: Fn(&Point, &Point) -> f64,
{
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        self(a, b)
    }
}

/// Built-in distance functions
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line distance
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences
    Manhattan,
}

impl Metric for DistanceMetric {
    #[inline]
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        match self {
            DistanceMetric::Euclidean => (dx * dx + dy * dy).sqrt(),
            DistanceMetric::Manhattan => dx.abs() + dy.abs(),
        }
    }

    fn name(&self) -> &str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
        }
    }
}

/// Represents a complete TSP instance
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    /// Name of the instance
    pub name: String,
    /// Points in input order; tours refer to them by position
    points: Vec<Point>,
    /// Display name of each point
    labels: Vec<String>,
    /// Name of the metric the matrix was built with
    metric: String,
    /// Precomputed distance matrix
    #[serde(skip)]
    distance_matrix: Vec<Vec<f64>>,
}

impl Instance {
    /// Build an instance from points, checking that it can be optimized.
    pub fn new<M>(name: &str, points: Vec<Point>, metric: &M) -> Result<Self, SolverError>
    where
        M: Metric + ?Sized,
    {
        if points.len() < 2 {
            return Err(SolverError::InvalidInput(format!(
                "at least 2 points are required, got {}",
                points.len()
            )));
        }

        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(SolverError::InvalidInput(format!(
                    "point {} has non-finite coordinates ({}, {})",
                    p.id, p.x, p.y
                )));
            }
            if !seen.insert(p.id) {
                return Err(SolverError::InvalidInput(format!("duplicate point id {}", p.id)));
            }
        }

        let distance_matrix = Self::compute_distance_matrix(&points, metric);
        let labels = points.iter().map(|p| p.id.to_string()).collect();

        Ok(Instance {
            name: name.to_string(),
            points,
            labels,
            metric: metric.name().to_string(),
            distance_matrix,
        })
    }

    /// Replace the display labels (one per point, in input order).
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self, SolverError> {
        if labels.len() != self.points.len() {
            return Err(SolverError::InvalidInput(format!(
                "{} labels given for {} points",
                labels.len(),
                self.points.len()
            )));
        }
        self.labels = labels;
        Ok(self)
    }

    /// Parse a point list: one `name x y` record per line, separated by spaces.
    pub fn from_file<P, M>(path: P, metric: &M) -> Result<Self, SolverError>
    where
        P: AsRef<Path>,
        M: Metric + ?Sized,
    {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut points = Vec::new();
        let mut labels = Vec::new();
        for (id, record) in reader.deserialize::<(String, f64, f64)>().enumerate() {
            let (label, x, y) = record?;
            points.push(Point::new(id, x, y));
            labels.push(label);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(&name, points, metric)?.with_labels(labels)
    }

    /// Generate `n` points uniformly on the square canvas. Deterministic via seed.
    pub fn random<M>(n: usize, seed: u64, metric: &M) -> Result<Self, SolverError>
    where
        M: Metric + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..n)
            .map(|id| {
                let x = rng.gen_range(0.0..CANVAS_SIZE).round();
                let y = rng.gen_range(0.0..CANVAS_SIZE).round();
                Point::new(id, x, y)
            })
            .collect();

        Self::new(&format!("random-{}-{}", n, seed), points, metric)
    }

    fn compute_distance_matrix<M>(points: &[Point], metric: &M) -> Vec<Vec<f64>>
    where
        M: Metric + ?Sized,
    {
        let n = points.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance(&points[i], &points[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        matrix
    }

    /// Get the distance between the points at positions `i` and `j`
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Number of points
    pub fn dimension(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> &Point {
        &self.points[index]
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn metric_name(&self) -> &str {
        &self.metric
    }

    /// Length of the closed circuit through `route`, including the edge back
    /// to the first point.
    pub fn tour_cost(&self, route: &[usize]) -> f64 {
        if route.len() < 2 {
            return 0.0;
        }

        let mut cost = 0.0;
        for pair in route.windows(2) {
            cost += self.distance(pair[0], pair[1]);
        }

        cost + self.distance(route[route.len() - 1], route[0])
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.distance(i, j));
            }
        }

        let avg_distance = distances.iter().sum::<f64>() / distances.len() as f64;
        let min_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        let (min_x, max_x) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        let (min_y, max_y) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            metric: self.metric.clone(),
            bounds: (min_x, min_y, max_x, max_y),
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    /// (min_x, min_y, max_x, max_y)
    pub bounds: (f64, f64, f64, f64),
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Points: {}", self.dimension)?;
        writeln!(f, "  Metric: {}", self.metric)?;
        writeln!(f, "  Bounds: ({:.1}, {:.1}) - ({:.1}, {:.1})", min_x, min_y, max_x, max_y)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 10.0, 0.0),
            Point::new(2, 10.0, 10.0),
            Point::new(3, 0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_identity() {
        let a = Point::new(1, 3.0, 4.0);
        let b = Point::new(2, 3.0, 4.0);
        let c = Point::new(1, 0.0, 0.0);

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_distance_metrics() {
        let a = Point::new(0, 0.0, 0.0);
        let b = Point::new(1, 3.0, 4.0);

        assert!((DistanceMetric::Euclidean.distance(&a, &b) - 5.0).abs() < 1e-10);
        assert!((DistanceMetric::Manhattan.distance(&a, &b) - 7.0).abs() < 1e-10);
        assert!((DistanceMetric::Euclidean.distance(&b, &a) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_colocated_points_have_zero_distance() {
        let points = vec![Point::new(0, 1.0, 1.0), Point::new(1, 1.0, 1.0)];
        let instance = Instance::new("dup", points, &DistanceMetric::Euclidean).unwrap();

        assert_eq!(instance.distance(0, 1), 0.0);
    }

    #[test]
    fn test_custom_metric_closure() {
        let chebyshev = |a: &Point, b: &Point| (a.x - b.x).abs().max((a.y - b.y).abs());
        let instance = Instance::new("cheb", square(), &chebyshev).unwrap();

        assert_eq!(instance.metric_name(), "custom");
        assert!((instance.distance(0, 2) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_tour_cost_closes_the_circuit() {
        let instance = Instance::new("square", square(), &DistanceMetric::Euclidean).unwrap();

        assert!((instance.tour_cost(&[0, 1, 2, 3]) - 40.0).abs() < 1e-10);
        let diagonal = 20.0 + 2.0 * 200f64.sqrt();
        assert!((instance.tour_cost(&[0, 2, 1, 3]) - diagonal).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let one = vec![Point::new(0, 0.0, 0.0)];
        assert!(matches!(
            Instance::new("one", one, &DistanceMetric::Euclidean),
            Err(SolverError::InvalidInput(_))
        ));

        let dup = vec![Point::new(7, 0.0, 0.0), Point::new(7, 1.0, 0.0)];
        assert!(matches!(
            Instance::new("dup", dup, &DistanceMetric::Euclidean),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("ga_tsp_solver_instance_test.txt");
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "Paris 0 0").unwrap();
            writeln!(file, "Lyon 10 0").unwrap();
            writeln!(file, "Nice 10 10").unwrap();
        }

        let instance = Instance::from_file(&path, &DistanceMetric::Manhattan).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.dimension(), 3);
        assert_eq!(instance.label(1), "Lyon");
        assert_eq!(instance.point(2).id, 2);
        assert!((instance.distance(0, 2) - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_random_instance_is_seeded() {
        let a = Instance::random(20, 7, &DistanceMetric::Euclidean).unwrap();
        let b = Instance::random(20, 7, &DistanceMetric::Euclidean).unwrap();

        assert_eq!(a.dimension(), 20);
        for (p, q) in a.points().iter().zip(b.points()) {
            assert_eq!((p.x, p.y), (q.x, q.y));
            assert!(p.x >= 0.0 && p.x <= CANVAS_SIZE);
        }
    }
}
