//! Order-preserving splice crossover.
//!
//! A contiguous segment of one parent is spliced into the other parent at the
//! same positions. Points of the receiving parent that belong to the donated
//! segment are blanked first; blanked slots outside the segment are kept as
//! free slots, and any receiver point still sitting inside the segment range
//! is swapped out into one of them before being overwritten. Every receiver
//! point not in the donated segment therefore survives exactly once, even
//! when the two segments share points.

use crate::error::SolverError;
use crate::heuristics::genetic::GAConfig;
use crate::instance::Instance;
use crate::tour::Tour;
use rand::Rng;

/// Half-open position range `[begin, end)` shared by both parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub begin: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(begin: usize, len: usize) -> Self {
        Segment { begin, end: begin + len }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}

/// `floor(fraction * route_len)`, at least 1 and at most `route_len`.
pub fn segment_size(route_len: usize, fraction: f64) -> usize {
    ((fraction * route_len as f64).floor() as usize).clamp(1, route_len.max(1))
}

/// Draw a segment lying fully inside `[0, route_len)`.
pub fn random_segment<R: Rng + ?Sized>(route_len: usize, fraction: f64, rng: &mut R) -> Segment {
    let size = segment_size(route_len, fraction);
    let begin = rng.gen_range(0..=route_len - size);
    Segment::new(begin, size)
}

/// Build one child: `receiver` with `donor[segment]` spliced in.
///
/// Returns `None` when the parents are not permutations of the same points.
pub fn splice(receiver: &[usize], donor: &[usize], segment: Segment) -> Option<Vec<usize>> {
    let n = receiver.len();
    if donor.len() != n || segment.end > n {
        return None;
    }

    let donated = &donor[segment.begin..segment.end];
    let mut in_donated = vec![false; n];
    for &p in donated {
        *in_donated.get_mut(p)? = true;
    }

    let mut child: Vec<Option<usize>> = Vec::with_capacity(n);
    let mut free_slots = Vec::with_capacity(segment.len());
    for (i, &p) in receiver.iter().enumerate() {
        if *in_donated.get(p)? {
            child.push(None);
            if i < segment.begin || i >= segment.end {
                free_slots.push(i);
            }
        } else {
            child.push(Some(p));
        }
    }

    for i in segment.begin..segment.end {
        if child[i].is_some() {
            let slot = free_slots.pop()?;
            child.swap(i, slot);
        }
        child[i] = Some(donated[i - segment.begin]);
    }

    child.into_iter().collect()
}

/// Produce both children of `mom` and `dad` for a fixed segment.
pub fn crossover_pair(
    mom: &[usize],
    dad: &[usize],
    segment: Segment,
) -> Result<(Vec<usize>, Vec<usize>), SolverError> {
    if mom.len() != dad.len() {
        return Err(SolverError::InvalidInput(format!(
            "parents differ in length: {} vs {}",
            mom.len(),
            dad.len()
        )));
    }

    let child1 = splice(mom, dad, segment);
    let child2 = splice(dad, mom, segment);
    match (child1, child2) {
        (Some(c1), Some(c2)) => Ok((c1, c2)),
        _ => Err(SolverError::InvalidInput(
            "parents are not permutations of the same points".to_string(),
        )),
    }
}

/// Cross two parents, producing `2 * floor(children_fraction * L)` children.
///
/// With `resample_segment_per_child` off, all children come from the same
/// segment and are therefore copies of the same pair.
pub fn crossover<R: Rng + ?Sized>(
    instance: &Instance,
    mom: &Tour,
    dad: &Tour,
    config: &GAConfig,
    rng: &mut R,
) -> Result<Vec<Tour>, SolverError> {
    let n = mom.len();
    if n != dad.len() {
        return Err(SolverError::InvalidInput(format!(
            "parents differ in length: {} vs {}",
            n,
            dad.len()
        )));
    }
    if n == 0 {
        return Err(SolverError::InvalidInput("empty parent tours".to_string()));
    }

    let children_count = (config.crossover_children_fraction * n as f64).floor() as usize;
    let segment = random_segment(n, config.crossover_segment_fraction, rng);

    let mut children = Vec::with_capacity(2 * children_count);
    if config.resample_segment_per_child {
        for i in 0..children_count {
            let segment = if i == 0 {
                segment
            } else {
                random_segment(n, config.crossover_segment_fraction, rng)
            };
            let (c1, c2) = crossover_pair(mom.route(), dad.route(), segment)?;
            children.push(Tour::new(instance, c1));
            children.push(Tour::new(instance, c2));
        }
    } else if children_count > 0 {
        let (c1, c2) = crossover_pair(mom.route(), dad.route(), segment)?;
        let first = Tour::new(instance, c1);
        let second = Tour::new(instance, c2);
        for _ in 0..children_count {
            children.push(first.clone());
            children.push(second.clone());
        }
    }

    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{DistanceMetric, Point};
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_permutation(route: &[usize], n: usize) -> bool {
        let mut sorted = route.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    fn hexagon() -> Instance {
        let points = (0..6)
            .map(|i| {
                let a = i as f64 * std::f64::consts::PI / 3.0;
                Point::new(i, 10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        Instance::new("hexagon", points, &DistanceMetric::Euclidean).unwrap()
    }

    #[test]
    fn test_splice_with_overlapping_segments() {
        let mom = [0, 1, 2, 3, 4, 5];
        let dad = [5, 4, 3, 2, 1, 0];
        let segment = Segment::new(1, 3);

        let (c1, c2) = crossover_pair(&mom, &dad, segment).unwrap();

        assert_eq!(c1, vec![0, 4, 3, 2, 1, 5]);
        assert_eq!(c2, vec![5, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_splice_full_segment_copies_donor() {
        let mom = [0, 1, 2, 3];
        let dad = [2, 0, 3, 1];

        let (c1, c2) = crossover_pair(&mom, &dad, Segment::new(0, 4)).unwrap();

        assert_eq!(c1, dad.to_vec());
        assert_eq!(c2, mom.to_vec());
    }

    #[test]
    fn test_mismatched_parents_are_rejected() {
        assert!(matches!(
            crossover_pair(&[0, 1, 2], &[0, 1], Segment::new(0, 1)),
            Err(SolverError::InvalidInput(_))
        ));
        assert!(matches!(
            crossover_pair(&[0, 1, 2], &[0, 1, 1], Segment::new(0, 3)),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_segment_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let segment = random_segment(7, 0.5, &mut rng);
            assert_eq!(segment.len(), 3);
            assert!(segment.end <= 7);
        }
        assert_eq!(segment_size(7, 0.0), 1);
        assert_eq!(segment_size(7, 1.0), 7);
    }

    #[test]
    fn test_crossover_children_are_permutations() {
        let instance = hexagon();
        let config = GAConfig {
            crossover_children_fraction: 0.5,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut route: Vec<usize> = (0..6).collect();

        for _ in 0..1000 {
            route.shuffle(&mut rng);
            let mom = Tour::new(&instance, route.clone());
            route.shuffle(&mut rng);
            let dad = Tour::new(&instance, route.clone());

            let children = crossover(&instance, &mom, &dad, &config, &mut rng).unwrap();
            assert_eq!(children.len(), 6);
            for child in &children {
                assert!(child.is_permutation_of(6));
                assert!((child.cost() - child.recompute_cost(&instance)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_literal_mode_duplicates_children() {
        let instance = hexagon();
        let config = GAConfig {
            crossover_children_fraction: 0.5,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mom = Tour::new(&instance, vec![0, 1, 2, 3, 4, 5]);
        let dad = Tour::new(&instance, vec![3, 5, 1, 0, 4, 2]);

        let children = crossover(&instance, &mom, &dad, &config, &mut rng).unwrap();

        assert_eq!(children[0], children[2]);
        assert_eq!(children[1], children[3]);
    }

    #[test]
    fn test_zero_children_fraction_produces_nothing() {
        let instance = hexagon();
        let config = GAConfig {
            crossover_children_fraction: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mom = Tour::new(&instance, vec![0, 1, 2, 3, 4, 5]);

        let children = crossover(&instance, &mom, &mom, &config, &mut rng).unwrap();
        assert!(children.is_empty());
    }

    proptest! {
        #[test]
        fn prop_splice_preserves_permutation(
            seed in any::<u64>(),
            n in 2usize..40,
            fraction in 0.0f64..=1.0,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut mom: Vec<usize> = (0..n).collect();
            let mut dad = mom.clone();
            mom.shuffle(&mut rng);
            dad.shuffle(&mut rng);

            let segment = random_segment(n, fraction, &mut rng);
            let (c1, c2) = crossover_pair(&mom, &dad, segment).unwrap();

            prop_assert!(is_permutation(&c1, n));
            prop_assert!(is_permutation(&c2, n));
            prop_assert_eq!(&c1[segment.begin..segment.end], &dad[segment.begin..segment.end]);
            prop_assert_eq!(&c2[segment.begin..segment.end], &mom[segment.begin..segment.end]);
        }
    }
}
