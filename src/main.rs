use clap::{Parser as ClapParser, Subcommand};
use sieve_lang::cli::{self, CheckOptions, CliError, GuessOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sieve")]
#[command(about = "Sieve - typed search predicates with completion")]
#[command(version)]
struct Cli {
    /// Log filter directive (overrides RUST_LOG), e.g. "debug" or "sieve_lang=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a predicate literal and print it as JSON
    Check {
        /// The predicate literal, e.g. "created before 3 days ago"
        literal: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print ranked completions for a partial literal
    Guess {
        /// The partial literal typed so far
        partial: String,

        /// Print one JSON projection per line
        #[arg(long)]
        json: bool,
    },

    /// Describe the built-in grammar
    Grammar {
        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Print a plain-text reference card instead of JSON
        #[arg(long)]
        overview: bool,
    },

    /// Drive the editor from a script of text and key lines
    Replay {
        /// The script (reads from stdin if not provided)
        script: Option<String>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli.command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let grammar = cli::load_grammar()?;

    match command {
        Commands::Check { literal, pretty } => {
            let options = CheckOptions { literal, pretty };
            let output = cli::execute_check(&options, &grammar)?;
            println!("{}", cli::render_json(&output, options.pretty)?);
        }
        Commands::Guess { partial, json } => {
            let options = GuessOptions { partial, json };
            for line in cli::execute_guess(&options, &grammar)? {
                println!("{}", line);
            }
        }
        Commands::Grammar { pretty, overview } => {
            if overview {
                print!("{}", cli::grammar_overview(&grammar));
            } else {
                println!("{}", cli::describe_grammar(&grammar, pretty)?);
            }
        }
        Commands::Replay { script } => {
            let script = match script {
                Some(s) => s,
                None if !atty::is(atty::Stream::Stdin) => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
                None => String::new(),
            };
            print!("{}", cli::execute_replay(&script, &grammar)?);
        }
    }
    Ok(())
}
