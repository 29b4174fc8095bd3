use crate::util::{format_number, print_population};
use anyhow::{anyhow, Result};
use clap::Args;
use hashlife_core::{pattern, GoLEngine, HashLife, HashLifeEngine};

/// Clears the terminal and moves the cursor home.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

#[derive(Args, Debug)]
pub(super) struct RunArgs {
    /// Path to a plaintext pattern; a random field is generated when omitted
    #[arg(short, long)]
    pattern: Option<String>,

    /// How many times the field is doubled
    #[arg(short, long, default_value_t = 10_000)]
    expansions: u32,

    /// The random field has side length 2^start_depth
    #[arg(short = 'd', long, default_value_t = 4)]
    start_depth: u32,

    /// Seed of the random field; taken from the OS when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Remove empty borders after every doubling
    #[arg(short, long)]
    trim: bool,

    /// Print the resulting field if it is small enough
    #[arg(long)]
    show: bool,

    /// Count population of the resulting field
    #[arg(long)]
    population: bool,

    /// Stack size of the simulation thread in MiB; recursion depth grows with the field
    #[arg(long, default_value_t = 256)]
    stack_mib: usize,
}

pub(super) fn run_simulation(args: RunArgs) -> Result<()> {
    let stack_size = args.stack_mib << 20;
    std::thread::Builder::new()
        .name("hashlife".into())
        .stack_size(stack_size)
        .spawn(move || simulate(args))?
        .join()
        .map_err(|_| anyhow!("Simulation thread panicked"))?
}

fn simulate(args: RunArgs) -> Result<()> {
    let timer = std::time::Instant::now();
    let mut life = HashLife::new();
    let root = match &args.pattern {
        Some(path) => pattern::from_file(&mut life, path)?,
        None => pattern::random_of_depth(&mut life, args.start_depth, args.seed)?,
    };
    let mut engine = HashLifeEngine::from_node(life, root);
    println!(
        "Loaded pattern in {:.1} secs",
        timer.elapsed().as_secs_f64()
    );

    let timer = std::time::Instant::now();
    for i in 1..=args.expansions {
        engine.update();
        if args.trim {
            engine.trim();
        }
        if i % 1000 == 0 {
            log::info!("{i} of {} doublings, depth {}", args.expansions, engine.depth());
        }
    }
    let seconds = timer.elapsed().as_secs_f64();

    println!("{}", engine.statistics());
    println!("Total number of doublings in size: {}", args.expansions);
    println!("Generation: {}", format_number(&engine.generation()));
    println!("Time elapsed: {seconds:.3} seconds");

    if args.population {
        print_population(&engine.population());
    }
    if args.show {
        match pattern::render(engine.session(), engine.root()) {
            Ok(field) => print!("{CLEAR_SCREEN}{field}"),
            Err(e) => log::warn!("Not showing the field: {e:#}"),
        }
    }
    Ok(())
}
