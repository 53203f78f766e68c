//! GA-TSP Solver - Command Line Interface
//!
//! Solves Traveling Salesman instances with a genetic algorithm.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ga_tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use ga_tsp_solver::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use ga_tsp_solver::heuristics::genetic::{GAConfig, GeneticAlgorithm};
use ga_tsp_solver::instance::{DistanceMetric, Instance};
use ga_tsp_solver::tour::Tour;
use ga_tsp_solver::SolverError;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ga-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "A genetic algorithm solver for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        ga: GaArgs,

        /// Output solution to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full tour
        #[arg(short, long)]
        verbose: bool,

        /// Hide the progress spinner
        #[arg(long)]
        quiet: bool,
    },

    /// Run the solver several times with consecutive seeds
    Benchmark {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        ga: GaArgs,

        /// Number of runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Run seeds one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Analyze an instance
    Analyze {
        #[command(flatten)]
        source: Source,

        /// Distance metric
        #[arg(long, value_enum, default_value = "euclidean")]
        metric: Metric,
    },
}

#[derive(Args)]
struct Source {
    /// Point list, one `name x y` record per line
    #[arg(short, long, conflicts_with = "random")]
    points: Option<PathBuf>,

    /// Generate this many random points instead of reading a file
    #[arg(long)]
    random: Option<usize>,

    /// Seed for random points
    #[arg(long, default_value = "1")]
    instance_seed: u64,
}

#[derive(Args)]
struct GaArgs {
    /// Distance metric
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: Metric,

    /// Population size (defaults to the number of points)
    #[arg(long)]
    population: Option<usize>,

    /// Crossover segment length, as a fraction of the route
    #[arg(long, default_value = "0.5")]
    segment_fraction: f64,

    /// Child pairs per crossover, as a fraction of the route
    #[arg(long, default_value = "0.1")]
    children_fraction: f64,

    /// Draw a new crossover segment for every child pair
    #[arg(long)]
    resample_segments: bool,

    /// Mutation swap length, as a fraction of the route
    #[arg(long, default_value = "0.2")]
    swap_fraction: f64,

    /// Mutated copies per generation, as a fraction of the population
    #[arg(long, default_value = "1.0")]
    mutation_fraction: f64,

    /// Extra sampled parent pairs, as a fraction of the population
    #[arg(long, default_value = "0.02")]
    parent_fraction: f64,

    /// Stagnant generations before stopping (ignored with --time-limit)
    #[arg(long, default_value = "100")]
    patience: usize,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Maximum number of generations
    #[arg(long)]
    max_generations: Option<usize>,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Metric {
    /// Straight-line distance
    Euclidean,
    /// Sum of absolute coordinate differences
    Manhattan,
}

impl From<Metric> for DistanceMetric {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Euclidean => DistanceMetric::Euclidean,
            Metric::Manhattan => DistanceMetric::Manhattan,
        }
    }
}

impl GaArgs {
    fn to_config(&self) -> GAConfig {
        GAConfig {
            population_size: self.population,
            crossover_segment_fraction: self.segment_fraction,
            crossover_children_fraction: self.children_fraction,
            resample_segment_per_child: self.resample_segments,
            mutation_swap_fraction: self.swap_fraction,
            mutation_fraction: self.mutation_fraction,
            extra_parent_fraction: self.parent_fraction,
            patience: self.patience,
            time_limit: self.time_limit,
            max_generations: self.max_generations,
            seed: self.seed,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { source, ga, output, verbose, quiet } => {
            solve_instance(&source, &ga, output, verbose, quiet)
        }

        Commands::Benchmark { source, ga, runs, output, sequential } => {
            run_benchmark(&source, &ga, runs, &output, sequential)
        }

        Commands::Analyze { source, metric } => analyze_instance(&source, metric),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_instance(source: &Source, metric: Metric) -> Result<Instance, SolverError> {
    let metric = DistanceMetric::from(metric);
    match (&source.points, source.random) {
        (Some(path), _) => {
            println!("Loading points from {:?}...", path);
            Instance::from_file(path, &metric)
        }
        (None, n) => Instance::random(n.unwrap_or(50), source.instance_seed, &metric),
    }
}

fn solve_instance(
    source: &Source,
    args: &GaArgs,
    output: Option<PathBuf>,
    verbose: bool,
    quiet: bool,
) -> Result<(), SolverError> {
    let config = args.to_config();
    let instance = load_instance(source, args.metric)?;
    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Solving {} ({} points)...", instance.name, instance.dimension());

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    bar.set_style(ProgressStyle::default_spinner());
    let mut observer = |generation: usize, best_cost: f64, _best: &Tour| {
        bar.set_message(format!("generation {}  best cost {:.2}", generation, best_cost));
        bar.tick();
    };

    let mut ga = GeneticAlgorithm::new(instance, config)?;
    let solution = ga.run_with_observer(&mut observer)?;
    bar.finish_and_clear();

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Metric: {}", solution.metric);
    println!("Cost: {:.2}", solution.cost);
    println!("Generations: {} ({})", solution.generations, solution.termination);
    println!("Time: {:.4}s", solution.computation_time);

    if verbose {
        let instance = ga.instance();
        let labels: Vec<&str> = ga
            .best()
            .map(|t| t.route().iter().map(|&i| instance.label(i)).collect())
            .unwrap_or_default();
        println!("\nTour: {}", labels.join(" -> "));
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn run_benchmark(
    source: &Source,
    args: &GaArgs,
    runs: usize,
    output: &PathBuf,
    sequential: bool,
) -> Result<(), SolverError> {
    let instance = load_instance(source, args.metric)?;

    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed: args.seed,
        parallel: !sequential,
        ga: args.to_config(),
    };

    let mut benchmark = Benchmark::new(config);
    println!("Benchmarking {} (n={}) over {} runs...", instance.name, instance.dimension(), runs);
    benchmark.run(&instance)?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze_instance(source: &Source, metric: Metric) -> Result<(), SolverError> {
    let instance = load_instance(source, metric)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let nn = NearestNeighborHeuristic::new().construct(&instance, &mut rng);
    let input_order = instance.tour_cost(&(0..instance.dimension()).collect::<Vec<_>>());

    println!("Quick Solution Estimates:");
    println!("  Input order: {:.2}", input_order);
    println!("  Nearest Neighbor: {:.2}", nn.cost());

    Ok(())
}
