use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use monkey::driver::{self, Outcome};
use monkey::env::Env;
use monkey::evaluator::Evaluator;
use monkey::{repl, Error};

/// Monkey is a small dynamically typed language with first-class functions.
/// Without a FILE, an interactive session is started.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Script to run.
    #[clap(value_parser)]
    file: Option<PathBuf>,

    /// Continue in an interactive session after running FILE, keeping its bindings.
    #[clap(short, long, action)]
    interactive: bool,

    /// Print the tokens of FILE instead of running it.
    #[clap(long, action, requires = "file")]
    tokens: bool,

    /// Print the parsed program of FILE instead of running it.
    #[clap(long, action, requires = "file", conflicts_with = "tokens")]
    ast: bool,
}

fn main() {
    monkey::init_tracing();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> monkey::Result<()> {
    let evaluator = Evaluator::new(Env::new().shared());

    if let Some(path) = &args.file {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        if args.tokens {
            driver::print_tokens(&source, io::stdout().lock())?;
            return Ok(());
        }

        if args.ast {
            driver::print_ast(&source, io::stdout().lock())?;
            return Ok(());
        }

        let outcome = driver::run_script(&source, io::stdout().lock(), &evaluator, args.interactive)?;
        if outcome == Outcome::Done {
            return Ok(());
        }
    }

    repl::start(io::stdin().lock(), io::stdout(), &evaluator)?;
    Ok(())
}
