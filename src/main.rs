//! YaoXiang console - CLI

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use yaoxiang_console::repl::{run_script, LineRepl, LineReplConfig};
use yaoxiang_console::util::config::{self, ConsoleConfig};
use yaoxiang_console::util::logger::{self, LogLevel};
use yaoxiang_console::{Context, Value, NAME, VERSION};

/// Interactive console for YaoXiang console script
#[derive(Parser, Debug)]
#[command(name = "yaoxiang-console")]
#[command(author = "YaoXiang Team")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/yaoxiang/console.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prompt label
    #[arg(long, global = true, value_name = "LABEL")]
    label: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive console
    Repl,

    /// Feed a file through the console, printing a transcript
    Run {
        /// Script to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate code and print the results
    Eval {
        /// Code to evaluate
        #[arg(value_name = "CODE")]
        code: String,
    },
}

fn load_config(args: &Args) -> Result<ConsoleConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => config::load_user_config().context("Failed to load user config")?,
    };
    if let Some(label) = &args.label {
        config.repl.label = label.clone();
    }
    if !io::stdout().is_terminal() {
        config.repl.colors = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_with_level(if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    let config = load_config(&args)?;
    tracing::debug!(?config, "configuration loaded");

    match args.command {
        None | Some(Commands::Repl) => {
            let mut line_config = LineReplConfig::from(&config.repl);
            if line_config.history_file.is_none() {
                line_config.history_file = config::default_history_path();
            }
            let mut repl = LineRepl::with_config(line_config).context("Failed to start line editor")?;
            let mut context = Context::from_config(Value::Main, &config);
            repl.run(&mut context).context("Console session failed")?;
        }
        Some(Commands::Run { file }) => {
            let reader = File::open(&file)
                .map(BufReader::new)
                .with_context(|| format!("Failed to open: {}", file.display()))?;
            let mut context = Context::from_config(Value::Main, &config);
            run_script(&mut context, reader)
                .with_context(|| format!("Failed to run: {}", file.display()))?;
        }
        Some(Commands::Eval { code }) => {
            let mut context = Context::from_config(Value::Main, &config);
            let finished = code.lines().all(|line| context.process_line(line));
            if finished && !context.source().is_empty() {
                anyhow::bail!("Incomplete input: {}", context.source());
            }
        }
    }

    Ok(())
}
