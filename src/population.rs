//! Population store.
//!
//! Tours live in a plain vector so that parents and mutation targets can be
//! sampled by index. Truncation selection goes through a min-heap keyed by
//! `(cost, insertion index)`, which keeps equal-cost ties deterministic.

use crate::tour::Tour;
use ordered_float::OrderedFloat;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Largest target size a run may ask for
pub const MAX_POPULATION_SIZE: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Tour>,
    target_size: usize,
}

impl Population {
    pub fn new(target_size: usize) -> Self {
        Population {
            members: Vec::with_capacity(target_size.min(MAX_POPULATION_SIZE).saturating_mul(2)),
            target_size,
        }
    }

    /// Number of tours kept after each selection
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn insert(&mut self, tour: Tour) {
        self.members.push(tour);
    }

    pub fn get(&self, index: usize) -> Option<&Tour> {
        self.members.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tour> {
        self.members.iter()
    }

    /// Uniformly random index into the current members.
    ///
    /// Panics on an empty population.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.members.len())
    }

    fn rank_key(&self, index: usize) -> (OrderedFloat<f64>, usize) {
        (OrderedFloat(self.members[index].cost()), index)
    }

    /// Cheapest tour
    pub fn best(&self) -> Option<&Tour> {
        (0..self.members.len())
            .min_by_key(|&i| self.rank_key(i))
            .map(|i| &self.members[i])
    }

    /// The `k` cheapest tours, cheapest first
    pub fn k_best(&self, k: usize) -> Vec<&Tour> {
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        order.sort_by_key(|&i| self.rank_key(i));
        order.into_iter().take(k).map(|i| &self.members[i]).collect()
    }

    /// The two cheapest tours
    pub fn elite_pair(&self) -> Option<(&Tour, &Tour)> {
        match self.k_best(2).as_slice() {
            [mom, dad] => Some((*mom, *dad)),
            _ => None,
        }
    }

    /// Truncation selection: pop the minimum `target_size` times and discard
    /// whatever is left. Survivors are stored cheapest first.
    pub fn select(&mut self) {
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> =
            (0..self.members.len()).map(|i| Reverse(self.rank_key(i))).collect();

        let mut slots: Vec<Option<Tour>> = std::mem::take(&mut self.members)
            .into_iter()
            .map(Some)
            .collect();

        let keep = self.target_size.min(slots.len());
        let mut survivors = Vec::with_capacity(self.target_size * 2);
        for _ in 0..keep {
            if let Some(Reverse((_, index))) = heap.pop() {
                if let Some(tour) = slots[index].take() {
                    survivors.push(tour);
                }
            }
        }

        self.members = survivors;
    }
}
