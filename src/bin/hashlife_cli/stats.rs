use crate::util::print_population;
use anyhow::Result;
use clap::Args;
use hashlife_core::{pattern, HashLife};

#[derive(Args, Debug)]
pub(super) struct StatsArgs {
    /// Path to the file containing the pattern in plaintext format
    pattern: String,
}

pub(super) fn run_stats(args: StatsArgs) -> Result<()> {
    let timer = std::time::Instant::now();
    let mut life = HashLife::new();
    let root = pattern::from_file(&mut life, &args.pattern)?;
    println!("Depth: {}", life.depth(root));
    print_population(&life.population(root));
    print_distribution(&pattern::depth_distribution(&life, root));
    println!(
        "Computed stats in {:.1} secs",
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_distribution(distribution: &[u64]) {
    println!("Distribution of node sizes (side lengths of the squares):");
    let nodes_total = distribution.iter().sum::<u64>();
    println!("total -> {nodes_total}");
    for (i, &x) in distribution.iter().enumerate() {
        let percent = x * 100 / nodes_total;
        if percent == 0 {
            continue;
        }
        println!("2^{:<4}->{:>3}%", i, percent);
    }
}
