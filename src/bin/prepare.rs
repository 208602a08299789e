//! Offline preprocessing: node-based graph in, edge-expanded graph out.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

use wayfarer::expand;
use wayfarer::formats::{crc, edge_nodes, expanded, node_graph, node_map, restrictions};
use wayfarer::profile;

#[derive(Parser)]
#[command(name = "wayfarer-prepare")]
#[command(about = "Expand a node-based road graph into a query-ready edge-based graph", long_about = None)]
#[command(version)]
struct Args {
    /// Input graph in .osrm format
    #[arg(short, long)]
    input: PathBuf,

    /// Restrictions file in .osrm.restrictions format
    #[arg(short, long)]
    restrictions: Option<PathBuf>,

    /// Speed profile applied during expansion
    #[arg(short, long, default_value = "car")]
    profile: String,

    /// Number of threads to use
    #[arg(short, long)]
    threads: Option<usize>,

    /// Path to a configuration file with key=value lines
    #[arg(short, long, default_value = "prepare.conf")]
    config: PathBuf,
}

fn sibling_file(base: &PathBuf, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Config file values fill in anything the command line left unset.
fn apply_config(args: &mut Args) -> Result<()> {
    if !args.config.is_file() {
        return Ok(());
    }
    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("malformed config line: {line}");
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "restrictions" => {
                if args.restrictions.is_none() {
                    args.restrictions = Some(PathBuf::from(value));
                }
            }
            "profile" => {
                // the command-line default is "car"; only override it when
                // the user did not pass --profile explicitly
                if args.profile == "car" {
                    args.profile = value.to_string();
                }
            }
            "threads" => {
                if args.threads.is_none() {
                    args.threads = Some(value.parse().context("threads in config file")?);
                }
            }
            other => bail!("unknown config key: {other}"),
        }
    }
    Ok(())
}

fn run(mut args: Args) -> Result<()> {
    let total_timer = Instant::now();

    apply_config(&mut args)?;

    if !args.input.is_file() {
        bail!("Input file {} not found!", args.input.display());
    }

    let hardware_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let requested_threads = args.threads.unwrap_or(hardware_threads);
    if requested_threads < 1 {
        bail!("Number of threads must be 1 or larger");
    }

    let restrictions_path = args
        .restrictions
        .unwrap_or_else(|| sibling_file(&args.input, ".restrictions"));

    println!("Input file: {}", args.input.display());
    println!("Restrictions file: {}", restrictions_path.display());
    println!("Profile: {}", args.profile);
    println!("Threads: {}", requested_threads);
    if requested_threads != hardware_threads {
        println!(
            "The recommended number of threads is {hardware_threads}! \
             This setting may have performance side-effects."
        );
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(requested_threads)
        .build_global()
        .ok();

    let speed_profile = profile::by_name(&args.profile)?;

    let expansion_timer = Instant::now();

    let restriction_list = restrictions::read(&restrictions_path)?;
    let data = node_graph::read(&args.input, restriction_list)?;
    println!(
        "{} restrictions, {} bollard nodes, {} traffic lights",
        data.restrictions.len(),
        data.barrier_nodes.len(),
        data.traffic_lights.len()
    );

    println!("Generating edge-expanded graph representation");
    let mut result = expand::expand(&data, speed_profile.as_ref())?;
    println!(
        "  ✓ {} edge-based nodes, {} edge-based edges",
        result.node_count,
        result.edge_based_edges.len()
    );
    let expansion_seconds = expansion_timer.elapsed().as_secs_f64();

    println!("writing node map ...");
    let entries: Vec<node_map::NodeMapEntry> = data
        .coordinates
        .iter()
        .zip(&data.external_ids)
        .map(|(&coordinate, &external_id)| node_map::NodeMapEntry {
            coordinate,
            external_id,
        })
        .collect();
    node_map::write(sibling_file(&args.input, ".nodes"), &entries)?;

    println!("writing edge-based node geometry ...");
    edge_nodes::write(sibling_file(&args.input, ".ebnodes"), &result.edge_based_nodes)?;

    println!("using {} CRC32 computation", crc::describe());
    let check_sum = edge_nodes::checksum(&result.edge_based_nodes);
    println!("CRC32: {check_sum}");

    result
        .edge_based_edges
        .par_sort_unstable_by_key(|e| (e.source, e.target));

    let output_path = sibling_file(&args.input, ".expanded");
    expanded::write(
        &output_path,
        check_sum,
        result.node_count,
        &result.edge_based_edges,
    )?;
    println!("  ✓ Wrote {}", output_path.display());

    println!(
        "Preprocessing : {:.3} seconds",
        total_timer.elapsed().as_secs_f64()
    );
    if expansion_seconds > 0.0 {
        println!(
            "Expansion : {:.0} nodes/sec and {:.0} edges/sec",
            data.node_count as f64 / expansion_seconds,
            result.node_count as f64 / expansion_seconds
        );
    }
    println!("finished preparing");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(error) = run(args) {
        tracing::warn!("{:#}", error);
        std::process::exit(1);
    }
}
