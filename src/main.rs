use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

mod cube;
mod membership;
mod search;

use cube::Cube;
use membership::ParticipantId;
use search::parallel::{ParallelConfig, TcpLink, run_worker};
use search::{CubeSource, DistributedSolver, SequentialSolver, SolveConfig, SolveResult, Solver};

// --- Command Line Arguments ---

#[derive(Parser, Debug)]
#[command(name = "rubiks")]
#[command(about = "rubiks - count every optimal solution of a scrambled cube")]
#[command(version)]
struct Args {
    /// Edge length of the cube
    #[arg(long, default_value_t = 3)]
    size: usize,

    /// Number of random twists used to scramble the cube
    #[arg(long, default_value_t = 11)]
    twists: u32,

    /// Seed for the scrambling random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Load the cube from a text file instead of scrambling
    #[arg(long)]
    file: Option<PathBuf>,

    /// Local worker threads besides the coordinator (default: CPU count - 1)
    #[arg(long)]
    workers: Option<usize>,

    /// Accept remote workers on this address
    #[arg(long, conflicts_with_all = ["connect", "sequential"])]
    listen: Option<SocketAddr>,

    /// Run as a worker for the coordinator at this address
    #[arg(long, conflicts_with = "sequential")]
    connect: Option<SocketAddr>,

    /// Search in a single thread
    #[arg(long)]
    sequential: bool,

    /// Levels of the search tree expanded into jobs for each bound
    #[arg(long, default_value_t = 2)]
    expand_depth: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_cube(config: &SolveConfig) -> Result<Cube> {
    match &config.source {
        CubeSource::File(path) => config
            .build_cube()
            .with_context(|| format!("Cannot load cube from file {}", path.display())),
        CubeSource::Scrambled => config.build_cube().context("Cannot scramble cube"),
    }
}

fn print_header(config: &SolveConfig, cube: &Cube) {
    match &config.source {
        CubeSource::Scrambled => println!(
            "Searching for solution for cube of size {}, twists = {}, seed = {}",
            config.size, config.twists, config.seed
        ),
        CubeSource::File(path) => println!(
            "Searching for solution for cube of size {} loaded from {}",
            cube.size(),
            path.display()
        ),
    }
    print!("{}", cube);
}

fn solve(args: &Args, cube: &Cube) -> Result<SolveResult> {
    let mut solver: Box<dyn Solver> = if args.sequential {
        Box::new(SequentialSolver)
    } else {
        let parallel = ParallelConfig::default()
            .with_expand_depth(args.expand_depth)
            .with_listen_option(args.listen);
        let parallel = match args.workers {
            Some(workers) => parallel.with_workers(workers),
            None => parallel,
        };
        tracing::info!(workers = parallel.num_workers, "starting coordinator");
        Box::new(DistributedSolver::new(parallel))
    };

    print!("Bound now:");
    let result = solver
        .solve(cube, &mut |bound| {
            print!(" {}", bound);
            let _ = std::io::stdout().flush();
        })
        .context("Search failed")?;
    println!();

    Ok(result)
}

fn run_remote_worker(addr: SocketAddr) -> Result<()> {
    let mut link =
        TcpLink::connect(addr).with_context(|| format!("Cannot connect to coordinator at {}", addr))?;
    let id = ParticipantId(std::process::id());
    tracing::info!(%addr, worker = %id, "connected to coordinator");

    let report = run_worker(id, &mut link).context("Worker stopped")?;
    tracing::info!(
        jobs = report.jobs_solved,
        solutions = report.solutions_found,
        "coordinator finished"
    );
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if let Some(addr) = args.connect {
        return run_remote_worker(addr);
    }

    let config = SolveConfig::default()
        .with_size(args.size)
        .with_twists(args.twists)
        .with_seed(args.seed)
        .with_file_option(args.file.clone());
    let cube = load_cube(&config)?;
    print_header(&config, &cube);

    let result = solve(&args, &cube)?;
    println!("{}", result.summary());
    eprintln!(
        "Solving cube took {} milliseconds",
        result.statistics.elapsed_time.as_millis()
    );
    tracing::debug!(
        bounds = result.statistics.bounds_tried,
        jobs = result.statistics.total_jobs(),
        dispatch_rate = result.statistics.dispatch_rate(),
        "search statistics"
    );
    Ok(())
}

// --- Main Function ---
fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // help and version go to stdout and are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
