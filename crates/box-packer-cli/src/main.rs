use std::time::{Duration, Instant};

use anyhow::Context;
use box_packer_core::{BoxPacker, PackStats, PackerConfig, Placement, Size};
use clap::{ArgAction, Parser, Subcommand};
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "box-packer",
    about = "Search for low-waste layouts of rectangles inside a fixed container",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the given items and print every reported solution
    Pack(PackArgs),
    /// Pack random items once and print time + stats
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Items as WxH (e.g. 3x2)
    #[arg(required = true, help_heading = "Input")]
    items: Vec<Size>,

    // Container
    /// Container width
    #[arg(long, help_heading = "Container")]
    width: u32,
    /// Container height
    #[arg(long, help_heading = "Container")]
    height: u32,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = false, help_heading = "Container")]
    allow_rotation: bool,

    // Search
    /// Initial waste ceiling (free cells skipped before a branch is pruned)
    #[arg(long, help_heading = "Search")]
    waste_limit: Option<u64>,
    /// Stop at the first solution that places every item
    #[arg(long, default_value_t = false, help_heading = "Search")]
    first: bool,

    // Output
    /// Print one JSON object per solution instead of text
    #[arg(long, default_value_t = false, help_heading = "Output")]
    json: bool,
    /// Print the configuration in this format (json|yaml) and exit
    #[arg(long, value_parser = ["json", "yaml"], help_heading = "Output")]
    print_config: Option<String>,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Container width
    #[arg(long, default_value_t = 16)]
    width: u32,
    /// Container height
    #[arg(long, default_value_t = 16)]
    height: u32,
    /// Number of random items
    #[arg(long, default_value_t = 8)]
    count: usize,
    /// Smallest item side
    #[arg(long, default_value_t = 1)]
    min: u32,
    /// Largest item side
    #[arg(long, default_value_t = 8)]
    max: u32,
    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = false)]
    allow_rotation: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Bench(args) => run_bench(args),
    }
}

#[derive(Serialize)]
struct SolutionRecord<'a> {
    solution: usize,
    area: u64,
    complete: bool,
    placements: &'a [Placement],
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    let cfg = PackerConfig::builder()
        .with_dimensions(args.width, args.height)
        .allow_rotation(args.allow_rotation)
        .waste_limit(args.waste_limit)
        .build();

    if let Some(format) = &args.print_config {
        let text = match format.as_str() {
            "yaml" => serde_yaml::to_string(&cfg).context("serialize config as YAML")?,
            _ => serde_json::to_string_pretty(&cfg).context("serialize config as JSON")?,
        };
        println!("{text}");
        return Ok(());
    }

    let mut packer = BoxPacker::with_config(cfg).context("invalid container")?;
    packer.insert_all(args.items.iter().copied());
    let total = packer.placeable_count();
    if total < args.items.len() {
        warn!(
            skipped = args.items.len() - total,
            "items with a zero side or larger than the container are left out"
        );
    }
    info!(
        width = args.width,
        height = args.height,
        items = total,
        "packing"
    );

    let mut count = 0usize;
    let mut write_error: Option<anyhow::Error> = None;
    let stats = packer.pack(|placements: &[Placement]| {
        count += 1;
        let complete = is_complete(placements, total);
        let area: u64 = placements.iter().map(|p| p.rect.area()).sum();
        if args.json {
            let record = SolutionRecord {
                solution: count,
                area,
                complete,
                placements,
            };
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    write_error = Some(e.into());
                    return true;
                }
            }
        } else {
            print_solution(count, area, complete, placements);
        }
        args.first && complete
    });
    if let Some(e) = write_error {
        return Err(e).context("write solution");
    }

    if stats.solutions_reported == 0 {
        warn!("no item fits into the container");
    }
    report_stats(&stats);
    Ok(())
}

/// A solution is complete once it places every item the container can take.
fn is_complete(placements: &[Placement], placeable: usize) -> bool {
    placements.len() == placeable
}

fn print_solution(n: usize, area: u64, complete: bool, placements: &[Placement]) {
    println!(
        "solution {n}: {} items, area {area}{}",
        placements.len(),
        if complete { " (complete)" } else { "" }
    );
    for p in placements {
        println!(
            "  #{:<4} {}x{} at ({}, {})",
            p.index, p.rect.w, p.rect.h, p.rect.x, p.rect.y
        );
    }
}

fn report_stats(stats: &PackStats) {
    info!("{}", stats.summary());
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        b.min >= 1 && b.min <= b.max,
        "invalid side range {}..={}",
        b.min,
        b.max
    );
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let items: Vec<Size> = (0..b.count)
        .map(|_| Size::new(rng.gen_range(b.min..=b.max), rng.gen_range(b.min..=b.max)))
        .collect();

    let mut packer =
        BoxPacker::new(b.width, b.height, b.allow_rotation).context("invalid container")?;
    packer.insert_all(items);

    let start = Instant::now();
    let stats = packer.pack_all();
    let dur = start.elapsed();
    println!(
        "items={} occupancy={:.2}% solutions={} iterations={} time={}",
        stats.item_count,
        stats.occupancy() * 100.0,
        stats.solutions_reported,
        stats.iterations,
        bench_fmt_dur(dur)
    );
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
