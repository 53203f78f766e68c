//! Genetic Algorithm for the TSP.
//!
//! Each generation runs, in this order:
//! - splice crossover of the two cheapest tours (the elite pair)
//! - splice crossover of extra parent pairs sampled uniformly, with replacement
//! - segment-swap mutation of uniformly sampled members, kept alongside the originals
//! - truncation selection back to the target population size
//!
//! All randomness comes from one `ChaCha8Rng`, drawn in that order, so a run
//! is reproducible from its seed whenever no time budget is set.

use crate::error::SolverError;
use crate::heuristics::construction::seed_population;
use crate::heuristics::crossover::crossover;
use crate::heuristics::mutation::mutate;
use crate::instance::{Instance, Metric, Point};
use crate::population::{Population, MAX_POPULATION_SIZE};
use crate::solution::{Solution, Termination};
use crate::tour::Tour;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Genetic Algorithm configuration (the run parameters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GAConfig {
    /// Target population size; `None` keeps one individual per point
    pub population_size: Option<usize>,
    /// Length of the spliced segment, as a fraction of the route
    pub crossover_segment_fraction: f64,
    /// Child pairs per crossover, as a fraction of the route length
    pub crossover_children_fraction: f64,
    /// Draw a new segment for every child pair instead of reusing the first
    pub resample_segment_per_child: bool,
    /// Total length of the two swapped segments, as a fraction of the route
    pub mutation_swap_fraction: f64,
    /// Mutated copies per generation, as a fraction of the population
    pub mutation_fraction: f64,
    /// Sampled parent pairs per generation, as a fraction of the population
    pub extra_parent_fraction: f64,
    /// Generations without improvement tolerated before converging.
    /// Ignored when a time limit is set.
    pub patience: usize,
    /// Wall-clock budget in seconds
    pub time_limit: Option<f64>,
    /// Hard cap on the number of generations
    pub max_generations: Option<usize>,
    /// Random seed
    pub seed: u64,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: None,
            crossover_segment_fraction: 0.5,
            crossover_children_fraction: 0.1,
            resample_segment_per_child: false,
            mutation_swap_fraction: 0.2,
            mutation_fraction: 1.0,
            extra_parent_fraction: 0.02,
            patience: 100,
            time_limit: None,
            max_generations: None,
            seed: 42,
        }
    }
}

impl GAConfig {
    /// Reject parameters that would make a run meaningless or never stop.
    pub fn validate(&self) -> Result<(), SolverError> {
        let fractions = [
            ("crossover_segment_fraction", self.crossover_segment_fraction),
            ("crossover_children_fraction", self.crossover_children_fraction),
            ("mutation_swap_fraction", self.mutation_swap_fraction),
            ("mutation_fraction", self.mutation_fraction),
            ("extra_parent_fraction", self.extra_parent_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(SolverError::out_of_range(name, value, "must lie in [0, 1]"));
            }
        }

        if let Some(size) = self.population_size {
            if size < 2 {
                return Err(SolverError::out_of_range(
                    "population_size",
                    size,
                    "at least 2 tours are needed for the elite pair",
                ));
            }
            if size > MAX_POPULATION_SIZE {
                return Err(SolverError::out_of_range(
                    "population_size",
                    size,
                    "at most 1000000 tours",
                ));
            }
        }

        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(SolverError::out_of_range(
                    "time_limit",
                    limit,
                    "must be a positive number of seconds",
                ));
            }
        }

        if self.patience == 0 && self.time_limit.is_none() && self.max_generations.is_none() {
            return Err(SolverError::out_of_range(
                "patience",
                self.patience,
                "zero patience needs a time limit or a generation cap",
            ));
        }

        Ok(())
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Evolving,
    Terminated(Termination),
}

/// Read-only progress hook called after every generation.
///
/// `best_tour` holds positions into the point list the run was built from:
/// for [`solve`] and [`solve_with_observer`], index `i` is `points[i]`.
pub trait GenerationObserver {
    fn on_generation(&mut self, generation: usize, best_cost: f64, best_tour: &Tour);
}

impl<F> GenerationObserver for F
where
    F: FnMut(usize, f64, &Tour),
{
    fn on_generation(&mut self, generation: usize, best_cost: f64, best_tour: &Tour) {
        self(generation, best_cost, best_tour)
    }
}

/// Observer that ignores every generation
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_generation(&mut self, _generation: usize, _best_cost: f64, _best_tour: &Tour) {}
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm {
    config: GAConfig,
    instance: Instance,
    population: Population,
    rng: ChaCha8Rng,
    generation: usize,
    no_improve_count: usize,
    best_cost: f64,
    state: RunState,
}

impl GeneticAlgorithm {
    pub fn new(instance: Instance, config: GAConfig) -> Result<Self, SolverError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(instance, config, rng)
    }

    /// Use an explicit random source instead of one seeded from the config
    pub fn with_rng(
        instance: Instance,
        config: GAConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, SolverError> {
        config.validate()?;
        let population_size = config.population_size.unwrap_or(instance.dimension());

        Ok(GeneticAlgorithm {
            config,
            instance,
            population: Population::new(population_size),
            rng,
            generation: 0,
            no_improve_count: 0,
            best_cost: f64::INFINITY,
            state: RunState::Initializing,
        })
    }

    fn initialize_population(&mut self) {
        let size = self.population.target_size();
        self.population = seed_population(&self.instance, size, &mut self.rng);
        self.best_cost = self.population.best().map_or(f64::INFINITY, |t| t.cost());
        self.state = RunState::Evolving;

        log::info!(
            "[GA] Initialized population: {} tours over {} points, best cost {:.3}",
            self.population.len(),
            self.instance.dimension(),
            self.best_cost
        );
    }

    /// Run one generation: crossover, mutation, selection.
    ///
    /// Does nothing once the run has terminated.
    pub fn step(&mut self) -> Result<(), SolverError> {
        match self.state {
            RunState::Terminated(_) => return Ok(()),
            RunState::Initializing => self.initialize_population(),
            RunState::Evolving => {}
        }

        let size = self.population.len();

        let elite_children = {
            let (mom, dad) = self.population.elite_pair().ok_or_else(|| {
                SolverError::InvalidInput("population too small for an elite pair".to_string())
            })?;
            crossover(&self.instance, mom, dad, &self.config, &mut self.rng)?
        };
        for child in elite_children {
            self.population.insert(child);
        }

        let extra_pairs = (self.config.extra_parent_fraction * size as f64).floor() as usize;
        for _ in 0..extra_pairs {
            let mom = self.population.sample_index(&mut self.rng);
            let dad = self.population.sample_index(&mut self.rng);
            let children = match (self.population.get(mom), self.population.get(dad)) {
                (Some(mom), Some(dad)) => {
                    crossover(&self.instance, mom, dad, &self.config, &mut self.rng)?
                }
                _ => Vec::new(),
            };
            for child in children {
                self.population.insert(child);
            }
        }

        let mutations = (self.population.len() as f64 * self.config.mutation_fraction).floor() as usize;
        for _ in 0..mutations {
            let target = self.population.sample_index(&mut self.rng);
            if let Some(tour) = self.population.get(target) {
                let mutated = mutate(&self.instance, tour, &self.config, &mut self.rng);
                self.population.insert(mutated);
            }
        }

        self.population.select();
        self.generation += 1;

        let best = self.population.best().map_or(f64::INFINITY, |t| t.cost());
        if best < self.best_cost {
            self.best_cost = best;
            self.no_improve_count = 0;
        } else {
            self.no_improve_count += 1;
        }

        Ok(())
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Result<Solution, SolverError> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Run until convergence, time-out or the generation cap, reporting every
    /// generation to `observer`.
    pub fn run_with_observer<O>(&mut self, observer: &mut O) -> Result<Solution, SolverError>
    where
        O: GenerationObserver + ?Sized,
    {
        let start = Instant::now();

        if self.state == RunState::Initializing {
            self.initialize_population();
        }

        while self.state == RunState::Evolving {
            if let Some(limit) = self.config.time_limit {
                if start.elapsed().as_secs_f64() > limit {
                    self.state = RunState::Terminated(Termination::TimedOut);
                    break;
                }
            }
            if let Some(max) = self.config.max_generations {
                if self.generation >= max {
                    self.state = RunState::Terminated(Termination::GenerationLimit);
                    break;
                }
            }

            self.step()?;

            if let Some(best) = self.population.best() {
                observer.on_generation(self.generation, best.cost(), best);
            }

            log::debug!(
                "[GA] Gen {}  Best cost {:.3}  Stagnant {}  Elapsed {:.2}s",
                self.generation,
                self.best_cost,
                self.no_improve_count,
                start.elapsed().as_secs_f64()
            );

            if self.config.time_limit.is_none() && self.no_improve_count > self.config.patience {
                self.state = RunState::Terminated(Termination::Converged);
            }
        }

        let termination = match self.state {
            RunState::Terminated(t) => t,
            _ => Termination::Converged,
        };

        let best = self.population.best().ok_or_else(|| {
            SolverError::InvalidInput("population is empty".to_string())
        })?;
        let mut solution = Solution::from_tour(
            &self.instance,
            best,
            self.generation,
            termination,
            self.config.seed,
        );
        solution.computation_time = start.elapsed().as_secs_f64();

        log::info!(
            "[GA] {} after {} generations, best cost {:.3} in {:.2}s",
            termination,
            self.generation,
            solution.cost,
            solution.computation_time
        );

        Ok(solution)
    }

    /// Cheapest tour currently in the population
    pub fn best(&self) -> Option<&Tour> {
        self.population.best()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Get current generation
    pub fn current_generation(&self) -> usize {
        self.generation
    }
}

/// Optimize a tour through `points`. Blocks until the run terminates.
pub fn solve<M>(points: &[Point], config: &GAConfig, metric: &M) -> Result<Solution, SolverError>
where
    M: Metric + ?Sized,
{
    solve_with_observer(points, config, metric, &mut NoopObserver)
}

/// [`solve`], reporting every generation to `observer`.
pub fn solve_with_observer<M, O>(
    points: &[Point],
    config: &GAConfig,
    metric: &M,
    observer: &mut O,
) -> Result<Solution, SolverError>
where
    M: Metric + ?Sized,
    O: GenerationObserver + ?Sized,
{
    let instance = Instance::new("points", points.to_vec(), metric)?;
    let mut ga = GeneticAlgorithm::new(instance, config.clone())?;
    ga.run_with_observer(observer)
}
