use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scicalc::calculator::{Calculator, NumberFormat};
use scicalc::config::{self, Config};
use scicalc::error::CalcError;
use scicalc::ui::{Keypad, Menu, parse_keys};

#[derive(Parser)]
#[command(name = "scicalc", version, about = "Scientific calculator")]
struct Cli {
    /// Path to a config file (defaults to <config dir>/scicalc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of entries shown by history views
    #[arg(long, global = true)]
    history_window: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive numbered menu (default)
    Menu,
    /// Evaluate one expression and print the result
    Eval {
        expression: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Press a whitespace-separated sequence of keypad keys
    Keys { sequence: String },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(window) = cli.history_window {
        config.history_window = window;
        config.validate()?;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    info!(?config, "starting calculator");

    let format: NumberFormat = config.number_format();
    let mut calculator = Calculator::with_format(config.history_window, format);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            let mut menu = Menu::new(stdin.lock(), io::stdout(), calculator, format);
            menu.run().context("menu failed")?;
        }
        Command::Eval { expression, json } => {
            let evaluation = calculator
                .evaluate(&expression)
                .map_err(CalcError::from)?;
            if json {
                println!("{}", serde_json::to_string(&evaluation)?);
            } else {
                println!("{}", format.format(evaluation.result));
            }
        }
        Command::Keys { sequence } => {
            let keys = parse_keys(&sequence)?;
            let mut keypad = Keypad::new(calculator);
            for key in keys {
                keypad.press(key)?;
                if let Some(view) = keypad.history_view() {
                    println!("History:\n{}", view);
                }
            }
            println!("{:>1} {}", keypad.memory_indicator(), keypad.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
