use clap::{Parser, ValueEnum};
use std::fs;
use std::time::Instant;
use topograph::parameters::references;
use topograph::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationCli {
    Horizontal,
    Vertical,
}

impl From<OrientationCli> for Orientation {
    fn from(value: OrientationCli) -> Self {
        match value {
            OrientationCli::Horizontal => Orientation::Horizontal,
            OrientationCli::Vertical => Orientation::Vertical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Validate a pipeline topology document", long_about = None)]
struct Cli {
    /// Path to the topology JSON file. The bundled sample is used when omitted.
    topology_path: Option<String>,

    /// Path to a node definitions JSON file replacing the bundled catalogue
    #[arg(short, long)]
    definitions: Option<String>,

    /// Print the topology as it reads after mapping it through the canvas
    #[arg(short, long)]
    print: bool,

    /// List every `${parameter}` reference by node and property
    #[arg(short, long)]
    references: bool,

    /// Print the computed canvas positions
    #[arg(short, long, value_enum)]
    layout: Option<OrientationCli>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let registry = match &cli.definitions {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read definitions file '{}': {}", path, e))
            });
            SchemaRegistry::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()))
        }
        None => SchemaRegistry::builtin().unwrap_or_else(|e| exit_with_error(&e.to_string())),
    };

    let topology = match &cli.topology_path {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read topology file '{}': {}", path, e))
            });
            TopologyDocument::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()))
        }
        None => {
            println!("No topology file provided. Using the bundled sample.");
            topograph::data::sample_topology().unwrap_or_else(|e| exit_with_error(&e.to_string()))
        }
    };

    let mapper = Mapper::new(&registry)
        .with_orientation(cli.layout.map(Orientation::from).unwrap_or_default());
    let canvas = mapper
        .to_canvas(&topology)
        .unwrap_or_else(|e| exit_with_error(&format!("Mapping failed: {}", e)));
    let mapped = mapper.to_topology(&canvas, &topology.header());

    let declared: Vec<&str> = mapped
        .properties
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    let candidate = ValidationCandidate::topology(&mapped.name, &canvas, &registry, declared)
        .with_name_check(false);
    let mut engine = ValidationEngine::new();
    let errors = engine.validate(&candidate, None).to_vec();
    let duration = start.elapsed();

    println!(
        "Topology '{}': {} nodes, {} edges",
        mapped.name,
        canvas.nodes().len(),
        canvas.edges().len()
    );
    if cli.layout.is_some() {
        for node in canvas.nodes() {
            println!(
                "  {:<24} ({:>7.1}, {:>7.1})",
                node.name, node.position.x, node.position.y
            );
        }
    }
    if cli.references {
        for reference in references(&mapped) {
            println!(
                "  {}.{} -> ${{{}}}",
                reference.node_name,
                reference.property.join("."),
                reference.parameter
            );
        }
    }
    if mapped != topology {
        println!("Note: the document does not round-trip unchanged through the canvas.");
    }
    if cli.print {
        match mapped.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with_error(&e.to_string()),
        }
    }

    println!("{}", ErrorFormatter::format_report(&errors));
    println!("Checked in {:?}", duration);

    if !errors.is_empty() {
        std::process::exit(1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(2);
}
