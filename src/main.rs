//! chorda CLI - run string simulations from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chorda::{RunOptions, Simulation, SimulationConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: {} <config.json> <out-dir> [flags]", args[0]);
        eprintln!();
        eprintln!("Run a string simulation from a JSON configuration, writing");
        eprintln!("history streams and an animation into <out-dir>.");
        eprintln!();
        eprintln!("Flags:");
        eprintln!("  --no-anim   Skip frame rendering and GIF encoding");
        eprintln!("  --no-files  Skip the field/particle history streams");
        eprintln!("  --quiet     No per-step progress logging");
        eprintln!();
        eprintln!("An example configuration is printed with --example.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let out_dir = PathBuf::from(&args[2]);

    let mut opts = RunOptions::default();
    for flag in &args[3..] {
        match flag.as_str() {
            "--no-anim" => opts.animate = false,
            "--no-files" => opts.write_files = false,
            "--quiet" => opts.progress = false,
            other => {
                eprintln!("Unknown flag: {other}");
                std::process::exit(1);
            }
        }
    }

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {e}");
        std::process::exit(1);
    });
    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {e}");
        std::process::exit(1);
    });

    println!("String Simulation");
    println!("=================");
    println!("{config}");
    println!("Courant number: {:.4}", config.celerity() * config.dt / config.dx());
    println!();

    let mut sim = Simulation::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let start = Instant::now();
    match sim.run(&out_dir, &opts) {
        Ok(artifacts) => {
            println!("Done in {:.2}s", start.elapsed().as_secs_f32());
            if let Some(p) = artifacts.field_file {
                println!("  field history:    {}", p.display());
            }
            if let Some(p) = artifacts.particle_file {
                println!("  particle history: {}", p.display());
            }
            if let Some(p) = artifacts.animation {
                println!("  animation:        {}", p.display());
            }
        }
        Err(e) => {
            eprintln!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}

fn print_example_config() {
    let config = SimulationConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
