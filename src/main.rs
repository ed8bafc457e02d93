//! Alliance GA CLI - Evolve alliance strategies from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use alliance_ga::{
    compute::{AllianceSimulator, SimulationOutcome, evolution::EvolutionEngine},
    schema::{EvolutionConfig, Genome, Zone},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--example") => print_example_config(),
        Some("--help") | Some("-h") => print_usage(&args[0]),
        Some("replay") => replay(&args[2..]),
        _ => evolve(&args[0], &args[1..]),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [--trace <out.json>]", program);
    eprintln!("       {} replay <genome.json> [config.json]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Evolve robot alliance strategies with a genetic algorithm.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Evolution configuration (default settings if omitted)");
    eprintln!("  --trace      Write the best alliance's congestion trace as JSON");
    eprintln!("  replay       Simulate a saved genome and print its trace as JSON");
}

fn load_config(path: Option<&String>) -> EvolutionConfig {
    match path {
        Some(path) => EvolutionConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path, e);
            std::process::exit(1);
        }),
        None => EvolutionConfig::default(),
    }
}

/// Arguments of the evolve command.
#[derive(Debug, Default, PartialEq)]
struct EvolveArgs {
    config_path: Option<String>,
    trace_path: Option<PathBuf>,
}

fn parse_evolve_args(args: &[String]) -> Result<EvolveArgs, String> {
    let mut parsed = EvolveArgs::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--trace" {
            let path = iter.next().ok_or("--trace requires an output path")?;
            parsed.trace_path = Some(PathBuf::from(path));
        } else if arg.starts_with("--") {
            return Err(format!("Unknown option: {}", arg));
        } else if let Some(previous) = &parsed.config_path {
            return Err(format!("Unexpected argument {} after config {}", arg, previous));
        } else {
            parsed.config_path = Some(arg.clone());
        }
    }

    Ok(parsed)
}

fn evolve(program: &str, args: &[String]) {
    let EvolveArgs {
        config_path,
        trace_path,
    } = parse_evolve_args(args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!();
        print_usage(program);
        std::process::exit(1);
    });

    let config = load_config(config_path.as_ref());

    println!("Alliance Evolution");
    println!("==================");
    println!("Population: {}", config.population_size);
    println!("Generations: {}", config.generations);
    println!(
        "Match: {}s in {}s steps ({} steps)",
        config.match_config.match_duration,
        config.match_config.step_duration,
        config.match_config.step_count()
    );
    println!();

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let result = engine.run_with_callback(|progress| {
        println!(
            "Generation {}: best fitness = {:.1}",
            progress.generation, progress.best_fitness
        );
    });

    println!();
    println!("Best genome after evolution:");
    match serde_json::to_string_pretty(&result.best.genome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing genome: {}", e),
    }
    println!("Best fitness: {:.1}", result.best.fitness);
    println!(
        "Time: {:.2}s ({:.1} evals/s, seed {})",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second, result.stats.random_seed
    );

    if let Some(path) = trace_path {
        let outcome = engine.replay(&result.best.genome);
        write_trace(&path, &outcome);
    }
}

fn replay(args: &[String]) {
    let Some(genome_path) = args.first() else {
        eprintln!("replay requires a genome file");
        std::process::exit(1);
    };
    let config = load_config(args.get(1));

    let genome: Genome = fs::read_to_string(genome_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            eprintln!("Error loading genome {}: {}", genome_path, e);
            std::process::exit(1);
        });

    let simulator = AllianceSimulator::new(config.match_config);
    let outcome = simulator
        .simulate_checked(&genome, &config.bounds, true)
        .unwrap_or_else(|e| {
            eprintln!("Invalid genome: {}", e);
            std::process::exit(1);
        });

    if let Some(trace) = &outcome.trace {
        for zone in Zone::ALL {
            let series = trace.zone(zone);
            let peak = series.iter().copied().max().unwrap_or(0);
            eprintln!("{:?}: peak {} robots", zone, peak);
        }
    }
    eprintln!("Fitness: {:.1}", outcome.fitness);

    match serde_json::to_string(&outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing trace: {}", e);
            std::process::exit(1);
        }
    }
}

fn write_trace(path: &PathBuf, outcome: &SimulationOutcome) {
    let json = serde_json::to_string_pretty(outcome).unwrap_or_else(|e| {
        eprintln!("Error serializing trace: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = fs::write(path, json) {
        eprintln!("Error writing trace {}: {}", path.display(), e);
        std::process::exit(1);
    }
    println!("Congestion trace written to {}", path.display());
}

fn print_example_config() {
    let config = EvolutionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_config_and_trace() {
        let parsed = parse_evolve_args(&args(&["run.json", "--trace", "out.json"])).unwrap();
        assert_eq!(parsed.config_path.as_deref(), Some("run.json"));
        assert_eq!(parsed.trace_path, Some(PathBuf::from("out.json")));

        assert_eq!(parse_evolve_args(&[]).unwrap(), EvolveArgs::default());
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        let err = parse_evolve_args(&args(&["--trcae", "out.json"])).unwrap_err();
        assert!(err.contains("--trcae"));
    }

    #[test]
    fn test_parse_rejects_missing_trace_path() {
        assert!(parse_evolve_args(&args(&["--trace"])).is_err());
    }

    #[test]
    fn test_parse_rejects_second_config() {
        assert!(parse_evolve_args(&args(&["a.json", "b.json"])).is_err());
    }
}
