mod app;
mod render;

use clap::Parser;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
struct Args {
    /// cells per side of the square board
    #[arg(long, default_value_t = 100)]
    size: usize,

    /// milliseconds between generations
    #[arg(long, default_value_t = 16)]
    ms: u64,

    /// RNG seed for the starting soup; wall clock when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    });

    app::run(args.size, args.ms, seed)
}
