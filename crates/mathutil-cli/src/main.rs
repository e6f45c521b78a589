use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod suites;

use commands::calc::{CalcArgs, Operation};

/// MathUtil demo: arithmetic utility plus a lifecycle-aware test harness.
///
/// Runs the bundled MathUtil suites through the harness, or evaluates
/// the arithmetic operations directly.
///
/// EXAMPLES:
///     mathutil test                   Run every suite
///     mathutil test testMul -v        Run one case, one line per case
///     mathutil test --lifecycle       Show the hook order of every suite
///     mathutil div 10 3               Integer division
///
/// ENVIRONMENT VARIABLES:
///     MATHUTIL_JSON              Set to '1' for JSON test output by default
///     MATHUTIL_LOG               Tracing filter (e.g. 'debug', 'mathutil_harness=trace')
///     MATHUTIL_SEQUENTIAL        Set to '1' to run suites one after another
///     MATHUTIL_RUNTIME_VERSION   Runtime version conditions are checked against
///     NO_COLOR                   Set to disable colored output
#[derive(Parser)]
#[command(name = "mathutil")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    debug: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MathUtil test suites
    ///
    /// Runs every registered suite through the full lifecycle: one-time
    /// setup, per-case setup, the case, per-case teardown, one-time
    /// teardown. Skipped and aborted cases do not fail the run.
    ///
    /// EXAMPLES:
    ///     mathutil test                      Run all tests
    ///     mathutil test "add test"           Filter by name or display name
    ///     mathutil test --sequential         Disable parallelism
    ///     mathutil test --runtime-version 2  Pretend a newer toolchain
    #[command(visible_alias = "t")]
    Test {
        /// Filter tests by name pattern
        pattern: Option<String>,
        /// Run suites sequentially instead of parallel
        #[arg(long)]
        sequential: bool,
        /// Verbose output (show all test names)
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Print the lifecycle journal of every suite
        #[arg(long)]
        lifecycle: bool,
        /// Path to configuration file (defaults to ./mathutil.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Runtime version conditions are checked against (e.g. 1.70)
        #[arg(long)]
        runtime_version: Option<String>,
    },

    /// Add two integers (wrapping on overflow)
    Add {
        #[arg(allow_negative_numbers = true)]
        a: i32,
        #[arg(allow_negative_numbers = true)]
        b: i32,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Multiply two integers (wrapping on overflow)
    Mul {
        #[arg(allow_negative_numbers = true)]
        a: i32,
        #[arg(allow_negative_numbers = true)]
        b: i32,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Divide two integers, truncating toward zero
    ///
    /// Dividing by zero is an error and exits with status 1.
    Div {
        #[arg(allow_negative_numbers = true)]
        a: i32,
        #[arg(allow_negative_numbers = true)]
        b: i32,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     mathutil completions bash > ~/.bash_completions/mathutil.bash
    ///     mathutil completions zsh > ~/.zfunc/_mathutil
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(debug: u8, config: &config::Config) {
    // Priority: MATHUTIL_LOG > -d flags > default (warn)
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::new(directives),
        None => match debug {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::from_env();
    init_tracing(cli.debug, &config);

    if config.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Test {
            pattern,
            sequential,
            verbose,
            no_color,
            json,
            lifecycle,
            config: config_path,
            runtime_version,
        } => {
            let args = commands::test::TestArgs {
                pattern,
                sequential,
                verbose,
                no_color: no_color || config.no_color,
                json: json || config.default_json,
                lifecycle,
                config: config_path,
                runtime_version,
            };
            let summary = commands::test::run(args)?;
            // Exit with code 1 if any tests failed
            if !summary.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Add { a, b, json } => commands::calc::run(CalcArgs {
            operation: Operation::Add,
            a,
            b,
            json,
        })?,
        Commands::Mul { a, b, json } => commands::calc::run(CalcArgs {
            operation: Operation::Mul,
            a,
            b,
            json,
        })?,
        Commands::Div { a, b, json } => commands::calc::run(CalcArgs {
            operation: Operation::Div,
            a,
            b,
            json,
        })?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
