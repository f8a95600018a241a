use anyhow::Context;
use clap::{Parser, Subcommand};
use mapforge_loader::{LoadOutcome, ParsedMap, WorldLoader};
use mapforge_template::TemplateSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mapforge-cli", about = "Load and inspect mapforge worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a parsed map against a template set and print a summary
    Load {
        /// Parsed map JSON file
        #[arg(short, long)]
        map: PathBuf,
        /// Template set JSON file (array of templates)
        #[arg(short, long)]
        templates: PathBuf,
    },
    /// Load a map and inspect one cell
    Cell {
        /// Parsed map JSON file
        #[arg(short, long)]
        map: PathBuf,
        /// Template set JSON file (array of templates)
        #[arg(short, long)]
        templates: PathBuf,
        /// 1-based cell x coordinate
        #[arg(short)]
        x: i32,
        /// 1-based cell y coordinate
        #[arg(short)]
        y: i32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Load { map, templates } => {
            let LoadOutcome { world, report } = load(&map, &templates)?;

            println!("grid: {}x{}", world.width(), world.height());
            println!("instances: {}", world.instances().len());
            println!("pending ground changes: {}", world.changes().len());
            println!("regions:");
            for (path, region) in world.regions().iter() {
                println!("  {} anchored at ({}, {})", path, region.anchor.0, region.anchor.1);
            }
            println!("{report}");
        }
        Commands::Cell {
            map,
            templates,
            x,
            y,
        } => {
            let LoadOutcome { world, .. } = load(&map, &templates)?;

            let ground = world.ground_at(x, y)?;
            match world.instances().resolve(ground) {
                Some(instance) => println!("ground: {} ({})", instance.path(), ground),
                None => println!("ground: unset"),
            }
            match world.region_at(x, y)? {
                Some(region) => {
                    if let Some(instance) = world.instances().resolve(region) {
                        println!("region: {} ({})", instance.path(), region);
                    }
                }
                None => println!("region: none"),
            }
        }
    }

    Ok(())
}

fn load(map: &Path, templates: &Path) -> anyhow::Result<LoadOutcome> {
    let templates = TemplateSet::load_json(templates)
        .with_context(|| format!("loading templates from {}", templates.display()))?;
    let data = std::fs::read_to_string(map)
        .with_context(|| format!("reading map from {}", map.display()))?;
    let parsed: ParsedMap = serde_json::from_str(&data).context("parsing map JSON")?;

    let loader = WorldLoader::new(templates);
    Ok(loader.load(&parsed)?)
}
