use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use svanim::{Animator, Collection, Options};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svanim")]
#[command(about = "Staggered stroke animation timing for SVG icon sets", long_about = None)]
struct Cli {
    /// Measured shapes as JSON (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Options file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of animation segments per icon
    #[arg(long)]
    segments: Option<u32>,

    /// Animate shapes in document order regardless of length
    #[arg(long)]
    no_split: bool,

    /// Animate shapes last-to-first
    #[arg(long)]
    reverse: bool,

    /// Explicit stroke length break points
    #[arg(long, value_delimiter = ',')]
    break_points: Option<Vec<u32>>,

    /// Keep going when an icon fails, writing the icons that succeeded
    #[arg(short, long)]
    keep_going: bool,

    /// Print a summary
    #[arg(short, long)]
    stats: bool,

    /// Log timing decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "svanim=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cli.input)?
    };
    let collection = Collection::from_json(&input)?;

    // Build options
    let mut options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(segments) = cli.segments {
        options.animation_segments = segments;
    }
    if cli.no_split {
        options.split_short_animations = false;
    }
    if cli.reverse {
        options.reverse_animation_order = true;
    }
    if cli.break_points.is_some() {
        options.break_point_list = cli.break_points;
    }

    // Animate
    let animator = Animator::new(options)?;
    let (animated, failed) = if cli.keep_going {
        let mut animated = std::collections::BTreeMap::new();
        let mut failed = 0usize;
        for (key, result) in animator.animate_each(&collection) {
            match result {
                Ok(shapes) => {
                    animated.insert(key, shapes);
                }
                Err(e) => {
                    eprintln!("{}", report(&e));
                    failed += 1;
                }
            }
        }
        (animated, failed)
    } else {
        match animator.animate_collection(&collection) {
            Ok(animated) => (animated, 0),
            Err(e) => return Err(report(&e).into()),
        }
    };

    // Write output
    let output = serde_json::to_string_pretty(&animated)?;
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(output.as_bytes())?;
        io::stdout().write_all(b"\n")?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    // Print stats if requested
    if cli.stats {
        let shapes: usize = animated.values().map(Vec::len).sum();
        let strokes = animated
            .values()
            .flatten()
            .filter(|s| s.timing.stroke)
            .count();
        eprintln!(
            "{} icons, {} shapes ({} stroke, {} fill), {} failed",
            animated.len(),
            shapes,
            strokes,
            shapes - strokes,
            failed
        );
    }

    if failed > 0 {
        return Err(format!("{} icons failed to animate", failed).into());
    }

    Ok(())
}

/// An error followed by its causes, separated by colons.
fn report(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
