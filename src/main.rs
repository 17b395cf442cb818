use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use knapsack::report::{self, SolveRecord};
use knapsack::{Instance, SolveStatus, SolverConfig, solve};

#[derive(Parser, Debug)]
#[command(version, about = "solve a 0/1 knapsack dataset to proven optimality")]
struct Options {
    /// Dataset file in the .kna format
    #[arg(default_value = "data/sample.kna")]
    dataset: PathBuf,

    /// Wall-clock budget for the search, in seconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Node-expansion budget for the search
    #[arg(short, long)]
    node_limit: Option<u64>,

    /// Directory the record and chart artifacts are written to
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::parse();

    let instance = match Instance::from_path(&options.dataset) {
        Ok(instance) => instance,
        Err(err) => {
            eprintln!("error reading dataset {}: {err}", options.dataset.display());
            exit(1);
        }
    };

    println!("Knapsack capacity: {}", instance.capacity());
    println!("Number of items: {}", instance.len());

    let mut config = SolverConfig::new();
    if let Some(seconds) = options.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }
    if let Some(nodes) = options.node_limit {
        config = config.with_node_limit(nodes);
    }

    let solution = solve(&instance, &config);

    if solution.status == SolveStatus::Infeasible {
        println!("No solution found.");
        exit(1);
    }

    println!("Solution found:");
    println!("  - Selected items: {:?}", solution.selected);
    println!("  - Total profit: {}", solution.objective_value);
    println!(
        "  - Total weight: {} out of a capacity of {}",
        solution.weight_used,
        instance.capacity()
    );
    println!("  - Status: {}", solution.status);
    println!(
        "  - Solve time (ms): {:.3}",
        solution.elapsed.as_secs_f64() * 1000.0
    );

    let dataset_name = options
        .dataset
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| options.dataset.display().to_string());
    let record = SolveRecord::new(&dataset_name, &instance, &solution);

    fs::create_dir_all(&options.output_dir)?;
    let record_path = report::write_record(&record, &options.output_dir)?;
    println!("Results exported to {}", record_path.display());
    let chart_path = report::write_chart(&record, &options.output_dir)?;
    println!("Chart saved to {}", chart_path.display());

    Ok(())
}
