use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use commands::ast::ast;
use commands::check::check;
use commands::read_source;
use commands::run::run;
use commands::tokens::tokens;
use config::resolve_config;
use dulce_core::render_error;

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "dulce")]
#[command(about = "Runs programs written in Dulce, the candy scripting language.")]
struct Cli {
    /// TOML configuration file (defaults to ./dulce.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on the console
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Do not print the AST after a successful run
    #[arg(long, global = true)]
    no_ast: bool,

    /// Let `devolveme` end only the function that ran it
    #[arg(long, global = true)]
    reset_return: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lex, parse, analyze and run a program
    Run {
        /// Source file, or `-` for stdin
        path: String,
    },
    /// Lex, parse and analyze without running
    Check {
        path: String,
    },
    /// Print the token stream
    Tokens {
        path: String,
    },
    /// Print the parsed AST as JSON
    Ast {
        path: String,
    },
}

fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(cli.config.as_deref())?;

    let console_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.logger.console_level()?
    };
    let file_level = config.logger.file_level()?;
    let log_dir = cli.log_dir.or(config.logger.dir.clone());
    dulce_logger::init(log_dir, console_level, file_level)?;

    let mut options = config.interpreter.options;
    if cli.reset_return {
        options.reset_return_on_call = true;
    }
    let show_ast = config.interpreter.show_ast && !cli.no_ast;

    debug!("Comando: {:?}", cli.command);

    match cli.command {
        Commands::Run { path } => run(&read_source(&path)?, options, show_ast),
        Commands::Check { path } => check(&read_source(&path)?),
        Commands::Tokens { path } => tokens(&read_source(&path)?),
        Commands::Ast { path } => ast(&read_source(&path)?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(e));
            ExitCode::FAILURE
        }
    }
}
