use clap::{Parser, ValueEnum};
use math_audio_sade::{
    Init, ParallelConfig, Population, Sade, SadeConfigBuilder, Variant,
    problems::{PROBLEM_NAMES, problem_by_name},
    recorder::{save_log, write_log_csv},
};
use serde::Serialize;
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "run_sade",
    about = "Run self-adaptive differential evolution on a selected benchmark function"
)]
struct Cli {
    /// Name of the benchmark function to optimize (use --list-functions to see available options)
    #[arg(long)]
    function: Option<String>,

    /// Dimensionality of the problem
    #[arg(long, default_value_t = 10)]
    dim: usize,

    /// Number of generations per evolve call
    #[arg(long, default_value_t = 500)]
    generations: u32,

    /// Number of individuals in the population (at least 7)
    #[arg(long, default_value_t = 20)]
    population: usize,

    /// Mutation variant: a number in [1, 18] or a name such as rand1exp or best3bin
    #[arg(long, default_value = "2")]
    variant: String,

    /// Self-adaptation scheme: 1 = jDE, 2 = iDE
    #[arg(long, default_value_t = 1)]
    variant_adptv: u32,

    /// Stop when the fitness gap between best and worst falls below this value
    #[arg(long, default_value_t = 1e-6)]
    ftol: f64,

    /// Stop when the distance between best and worst falls below this value
    #[arg(long, default_value_t = 1e-6)]
    xtol: f64,

    /// Keep adapted F and CR between successive evolve calls
    #[arg(long)]
    memory: bool,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Log one line every N generations (0 = silent)
    #[arg(long, default_value_t = 50)]
    verbosity: u32,

    /// Number of successive evolve calls
    #[arg(long, default_value_t = 1)]
    calls: u32,

    /// Initialization scheme for the population
    #[arg(long, value_enum, default_value_t = InitChoice::Random)]
    init: InitChoice,

    /// Write the log of the last call to this CSV file ("-" = records directory)
    #[arg(long)]
    csv: Option<String>,

    /// Print a JSON summary instead of plain text
    #[arg(long)]
    json: bool,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InitChoice {
    LatinHypercube,
    Random,
}

impl From<InitChoice> for Init {
    fn from(choice: InitChoice) -> Self {
        match choice {
            InitChoice::LatinHypercube => Init::LatinHypercube,
            InitChoice::Random => Init::Random,
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    function: &'a str,
    dimension: usize,
    variant: String,
    adaptation: String,
    seed: u64,
    calls: u32,
    fevals: u64,
    exit: Option<String>,
    best_f: f64,
    best_x: Vec<f64>,
    elapsed_seconds: f64,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    if args.list_functions {
        println!("Available test functions ({}):", PROBLEM_NAMES.len());
        for name in PROBLEM_NAMES {
            println!("- {name}");
        }
        return;
    }

    let function_name = match &args.function {
        Some(name) => name.trim(),
        None => {
            eprintln!("Error: --function must be provided unless --list-functions is used.");
            process::exit(2);
        }
    };

    if let Err(e) = run(&args, function_name) {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}

fn run(args: &Cli, function_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let problem = problem_by_name(function_name, args.dim)?;
    let variant: Variant = args.variant.parse()?;

    let mut builder = SadeConfigBuilder::new()
        .generations(args.generations)
        .variant(variant.id())
        .variant_adptv(args.variant_adptv)
        .f_tol(args.ftol)
        .x_tol(args.xtol)
        .memory(args.memory)
        .verbosity(args.verbosity);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut algo = Sade::new(builder.build()?)?;

    let pop_seed = algo.seed();
    let mut pop = Population::with_init(
        problem,
        args.population,
        pop_seed,
        args.init.into(),
        &ParallelConfig::default(),
    )?;
    let dimension = pop.problem().dimension();

    if !args.json {
        println!(
            "Running sade on '{}' ({}D, {} individuals) with variant {} ({})...",
            pop.problem().name(),
            dimension,
            pop.size(),
            variant.id(),
            variant
        );
    }

    let start = Instant::now();
    for _ in 0..args.calls {
        pop = algo.evolve(pop)?;
    }
    let elapsed = start.elapsed();

    if let Some(target) = &args.csv {
        let path = if target == "-" {
            save_log(function_name, algo.log())?
        } else {
            let path = PathBuf::from(target);
            write_log_csv(algo.log(), &path)?;
            path
        };
        if !args.json {
            println!("Log written to {}", path.display());
        }
    }

    let best = pop.best_idx().ok_or("empty population")?;
    let best_x = pop.get_x().row(best).to_vec();
    let best_f = pop.get_f()[[best, 0]];

    if args.json {
        let summary = Summary {
            function: function_name,
            dimension,
            variant: variant.to_string(),
            adaptation: algo.adaptation().to_string(),
            seed: algo.seed(),
            calls: args.calls,
            fevals: pop.problem().fevals(),
            exit: algo.last_exit().map(|e| e.to_string()),
            best_f,
            best_x,
            elapsed_seconds: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\nEvolution completed in {:.2?}", elapsed);
    if let Some(exit) = algo.last_exit() {
        println!("Exit condition: {}", exit);
    }
    println!("Evaluations: {}", pop.problem().fevals());
    println!("Best objective: {:.6e}", best_f);

    let mut best_vector = String::new();
    for (idx, value) in best_x.iter().enumerate() {
        if idx > 0 {
            best_vector.push_str(", ");
        }
        let _ = write!(&mut best_vector, "{value:.6}");
    }
    println!("Best parameters: [{}]", best_vector);
    Ok(())
}
