//! Spatial splitting for cross-validation
//!
//! Scoring a gridder needs observations it was not fitted on. This example
//! splits a synthetic GPS station network (vertical velocities along a
//! coastline) two ways and reports how the halves are distributed:
//!
//! - a random shuffle split, which leaves test stations right next to
//!   training stations and so overstates the gridder's skill;
//! - a block shuffle split, which holds out whole 1-degree blocks.
//!
//! Run with `cargo run --example splitting -- --verbose`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geosplit_algorithms::validation::{train_test_split, SplitMethod, SplitParams, SplitResult};
use geosplit_core::{Observations, Region};

#[derive(Parser)]
#[command(name = "splitting", about = "Compare random and block train/test splits")]
struct Args {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Number of synthetic stations
    #[arg(short, long, default_value = "800")]
    stations: usize,

    /// Block size in degrees for the block split
    #[arg(long, default_value = "1.0")]
    spacing: f64,

    /// Fraction of stations held out for testing
    #[arg(long, default_value = "0.25")]
    test_size: f64,

    /// Random seed
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

/// Stations scattered along a diagonal coastline band, denser in the south.
fn synthetic_gps(n: usize) -> Result<Observations> {
    let mut lon = Vec::with_capacity(n);
    let mut lat = Vec::with_capacity(n);
    let mut velocity_up = Vec::with_capacity(n);

    for i in 0..n {
        let t = (i as f64 * 0.618_033_988_75).fract();
        let u = (i as f64 * 0.754_877_666_25).fract();
        let along = t * t; // cluster towards the south-east end
        let y = 32.5 + 9.5 * (1.0 - along);
        let x = -124.3 + 7.0 * along + 2.5 * u;
        lon.push(x);
        lat.push(y);
        // Subsidence in the central valley, uplift elsewhere (mm/yr)
        velocity_up.push(2.0 * (x + 120.0).cos() - 3.0 * (-((y - 36.5) / 1.5).powi(2)).exp());
    }

    Ok(Observations::from_vecs(lon, lat, vec![velocity_up])?)
}

/// Quadrant of the region each station falls in, as (sw, se, nw, ne).
fn quadrant_counts(obs: &Observations, region: &Region) -> [usize; 4] {
    let mid_x = region.west + region.width() / 2.0;
    let mid_y = region.south + region.height() / 2.0;
    let mut counts = [0; 4];
    for (&x, &y) in obs.easting().iter().zip(obs.northing().iter()) {
        let q = usize::from(x >= mid_x) + 2 * usize::from(y >= mid_y);
        counts[q] += 1;
    }
    counts
}

fn report(title: &str, split: &SplitResult, region: &Region) {
    println!("{}", title);
    println!(
        "  train: {:>4} stations   test: {:>4} stations ({:.1}% held out)",
        split.n_train(),
        split.n_test(),
        100.0 * split.test_fraction()
    );
    let train = quadrant_counts(&split.train, region);
    let test = quadrant_counts(&split.test, region);
    for (name, (tr, te)) in ["SW", "SE", "NW", "NE"].iter().zip(train.iter().zip(&test)) {
        println!("  {}: {:>4} train / {:>4} test", name, tr, te);
    }
    if let Some(blocks) = &split.blocks {
        let (rows, cols) = blocks.grid().shape();
        println!(
            "  blocks: {} non-empty of {} x {} grid",
            blocks.n_blocks(),
            rows,
            cols
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose)?;

    let data = synthetic_gps(args.stations)?;
    let region = data.region()?;
    info!(
        "Region: W {:.2} E {:.2} S {:.2} N {:.2}",
        region.west, region.east, region.south, region.north
    );

    // Picking points at random is NOT the best way to split spatially
    // correlated data, but it is the common baseline.
    let shuffle = train_test_split(
        &data,
        SplitParams {
            method: SplitMethod::Random,
            test_size: args.test_size,
            spacing: None,
            random_seed: Some(args.seed),
        },
    )
    .context("Failed to compute shuffle split")?;

    // Blocks keep neighbouring stations on the same side of the split.
    let block = train_test_split(
        &data,
        SplitParams::block(args.spacing)
            .with_test_size(args.test_size)
            .with_random_seed(args.seed),
    )
    .context("Failed to compute block shuffle split")?;

    report("Shuffle Split", &shuffle, &region);
    report("Block Shuffle Split", &block, &region);

    Ok(())
}
