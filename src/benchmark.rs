//! Benchmarking module.
//!
//! Runs the genetic algorithm several times with consecutive seeds,
//! collects per-run results and aggregates them per instance.

use crate::error::SolverError;
use crate::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use crate::instance::Instance;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Result of a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub instance: String,
    pub dimension: usize,
    pub seed: u64,
    pub cost: f64,
    pub generations: usize,
    pub termination: String,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics over the runs of one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub instance: String,
    pub runs: usize,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub avg_cost: f64,
    /// Sample standard deviation of cost (0 for a single run)
    pub std_cost: f64,
    pub avg_generations: f64,
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per instance
    pub num_runs: usize,
    /// Seed of the first run; run `i` uses `base_seed + i`
    pub base_seed: u64,
    /// Run the seeds in parallel
    pub parallel: bool,
    /// Parameters shared by every run (its `seed` is overridden)
    pub ga: GAConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            parallel: true,
            ga: GAConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    fn run_once(instance: &Instance, config: &GAConfig, seed: u64) -> Result<RunResult, SolverError> {
        let config = GAConfig {
            seed,
            ..config.clone()
        };
        let mut ga = GeneticAlgorithm::new(instance.clone(), config)?;
        let solution = ga.run()?;

        Ok(RunResult {
            instance: instance.name.clone(),
            dimension: instance.dimension(),
            seed,
            cost: solution.cost,
            generations: solution.generations,
            termination: solution.termination.to_string(),
            time: solution.computation_time,
        })
    }

    /// Run all seeds on an instance
    pub fn run(&mut self, instance: &Instance) -> Result<(), SolverError> {
        self.config.ga.validate()?;
        log::info!(
            "Running benchmark on instance: {} ({} runs)",
            instance.name,
            self.config.num_runs
        );

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|i| self.config.base_seed + i)
            .collect();
        let ga = &self.config.ga;

        let results: Vec<RunResult> = if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| Self::run_once(instance, ga, seed))
                .collect::<Result<_, _>>()?
        } else {
            seeds
                .iter()
                .map(|&seed| Self::run_once(instance, ga, seed))
                .collect::<Result<_, _>>()?
        };

        self.results.extend(results);
        Ok(())
    }

    /// Compute statistics for each instance
    pub fn compute_statistics(&self) -> Vec<RunStatistics> {
        let mut by_instance: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();
        for result in &self.results {
            by_instance.entry(result.instance.as_str()).or_default().push(result);
        }

        by_instance
            .into_iter()
            .map(|(instance, results)| {
                let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let generations: Vec<f64> = results.iter().map(|r| r.generations as f64).collect();

                let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };

                RunStatistics {
                    instance: instance.to_string(),
                    runs: results.len(),
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(0.0, f64::max),
                    avg_cost: costs.iter().mean(),
                    std_cost,
                    avg_generations: generations.iter().mean(),
                    avg_time: times.iter().mean(),
                }
            })
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), SolverError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), SolverError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        GA-TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&format!("{:<25} {:>6} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
            "Instance", "Runs", "Best Cost", "Avg Cost", "Std", "Avg Gens", "Avg Time"));
        report.push_str("-".repeat(91).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!("{:<25} {:>6} {:>12.2} {:>12.2} {:>10.2} {:>10.1} {:>10.4}\n",
                stat.instance,
                stat.runs,
                stat.best_cost,
                stat.avg_cost,
                stat.std_cost,
                stat.avg_generations,
                stat.avg_time));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}
