use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser as ClapParser, Subcommand};
use redpnr_core::{CellLibrary, Netlist, RotatedCells};
use redpnr_io::{load_library, load_netlist, load_routing, PlacementSnapshot, PnrConfig, RoutedOutput};
use redpnr_place::Placer;
use redpnr_route::RouteExtractor;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Place(args) => place(args),
        Command::Route(args) => route(args),
    }
}

#[derive(ClapParser)]
#[command(
    version,
    about,
    long_about = "Place logic cells and route their nets on a voxel redstone grid"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Anneal a placement for a netlist and save it as a snapshot.
    Place(PlaceArgs),
    /// Stamp routed nets over a saved placement.
    Route(RouteArgs),
}

/// Inputs shared by both subcommands.
#[derive(Args)]
struct Design {
    /// Cell library JSON.
    #[arg(short, long)]
    library: PathBuf,
    /// Netlist JSON.
    #[arg(short, long)]
    netlist: PathBuf,
    /// Run configuration JSON; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Empty voxels added around every cell, with a stone base under it.
    #[arg(long, default_value_t = 0)]
    pad: usize,
}

#[derive(Args)]
struct PlaceArgs {
    #[command(flatten)]
    design: Design,
    /// Where the placement snapshot is written.
    #[arg(short, long, default_value = "placement.json")]
    out: PathBuf,
    /// Initial annealing temperature.
    #[arg(long)]
    t0: Option<f64>,
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct RouteArgs {
    #[command(flatten)]
    design: Design,
    /// Placement snapshot written by `place`.
    #[arg(short, long)]
    snapshot: PathBuf,
    /// Routing JSON: per net, pin endpoints and waypoints.
    #[arg(short, long)]
    routing: PathBuf,
    /// Extra layers above the placed cells for routing.
    #[arg(long, default_value_t = 0)]
    headroom: usize,
    /// Where the routed layout is written.
    #[arg(short, long, default_value = "routed.json")]
    out: PathBuf,
}

struct Loaded {
    config: PnrConfig,
    netlist: Netlist,
    cells: RotatedCells,
}

fn load(design: &Design) -> anyhow::Result<Loaded> {
    let config = PnrConfig::load_or_default(design.config.as_deref())
        .with_context(|| format!("Failed to read configuration {:?}", design.config))?;
    let library: CellLibrary = load_library(&design.library, &config.registry, design.pad)
        .with_context(|| format!("Failed to load cell library {}", design.library.display()))?;
    let cells = library.pregenerate(&config.registry);
    let netlist = load_netlist(&design.netlist)
        .with_context(|| format!("Failed to load netlist {}", design.netlist.display()))?;
    Ok(Loaded {
        config,
        netlist,
        cells,
    })
}

fn place(args: PlaceArgs) -> anyhow::Result<()> {
    let Loaded {
        mut config,
        netlist,
        cells,
    } = load(&args.design)?;
    if let Some(seed) = args.seed {
        config.placer.seed = seed;
    }
    let t0 = args.t0.unwrap_or(config.placer.initial_temperature);
    let iterations = args.iterations.unwrap_or(config.placer.iterations);

    let placer = Placer::new(&netlist, &cells, &config.registry, config.placer.clone())
        .with_context(|| "Netlist does not match the cell library")?;
    let (initial, dimensions) = placer.initial_placement().with_context(|| "Initial placement failed")?;
    let annealed = placer
        .simulated_annealing_placement(&initial, dimensions, t0, iterations)
        .with_context(|| "Annealing failed")?;
    let (placement, dimensions) = placer.shrink(&annealed).with_context(|| "Shrinking failed")?;

    let overlaps = placer.overlaps(&placement)?;
    if !overlaps.is_empty() {
        log::warn!("{} overlapping instance pairs remain: {:?}", overlaps.len(), overlaps);
    }

    let snapshot = PlacementSnapshot::new(placement, dimensions);
    snapshot
        .save(&args.out)
        .with_context(|| format!("Failed to write snapshot {}", args.out.display()))?;
    println!("placement {} ({}) written to {}", snapshot.id, dimensions, args.out.display());
    Ok(())
}

fn route(args: RouteArgs) -> anyhow::Result<()> {
    let Loaded { config, netlist, cells } = load(&args.design)?;
    let snapshot = PlacementSnapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let routing = load_routing(&args.routing)
        .with_context(|| format!("Failed to load routing {}", args.routing.display()))?;

    let placer = Placer::new(&netlist, &cells, &config.registry, config.placer.clone())
        .with_context(|| "Netlist does not match the cell library")?;
    let dimensions = snapshot.dimensions.grow(args.headroom, 0, 0);
    let placed = placer
        .placement_to_layout(dimensions, &snapshot.placement)
        .with_context(|| format!("Failed to materialize placement {}", snapshot.id))?;

    let extractor = RouteExtractor::new(&config.registry, config.extractor.clone());
    let extracted = extractor
        .extract_routing(&routing)
        .with_context(|| "Route extraction failed")?;
    let layout = extractor
        .extract_layout(&extracted, &placed)
        .with_context(|| "Stamping routes failed")?;

    let output = RoutedOutput {
        snapshot: snapshot.id,
        layout,
        routing: extracted,
    };
    output
        .save(&args.out)
        .with_context(|| format!("Failed to write routed layout {}", args.out.display()))?;
    println!("routed layout {} written to {}", dimensions, args.out.display());
    Ok(())
}
