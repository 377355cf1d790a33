// src/main.rs
use clap::Parser;
use line_miner_rs::cli::{self, Action};
use line_miner_rs::config::{self, Config, InputPolicy, OutputFormat};
use line_miner_rs::input::LineSource;
use line_miner_rs::miner::hasher;
use line_miner_rs::{
    ConsoleSink, EventSink, JsonSink, MinerError, OsNonceSource, Session, SessionEnd, init_logging,
    run_local,
};
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Main entry point for the line miner
///
/// # Returns
/// - `Ok(())` on successful execution, including shutdown by Ctrl-C
/// - `Err(MinerError)` if any operation fails
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        Action::Start(opts) => start_session(opts),
        Action::Hash(opts) => hash_lines(opts),
        Action::Verify(opts) => verify_solution(opts),
        Action::Config(opts) => generate_config(opts),
    }
}

/// Runs the interactive session over stdin
///
/// # Operations
/// 1. Initializes logging
/// 2. Loads configuration and applies CLI overrides
/// 3. Spawns one job per non-empty stdin line
/// 4. Stops on Ctrl-C, or once stdin closes and every job finished
fn start_session(opts: cli::StartOptions) -> Result<(), MinerError> {
    init_logging();

    let mut config = opts.mining.resolve()?;
    if opts.sequential {
        config.session.input = InputPolicy::Sequential;
    }

    let stdin = BufReader::new(tokio::io::stdin()).lines();
    run_session(&config, stdin, true)
}

/// Mines the lines given on the command line, all at once
fn hash_lines(opts: cli::HashOptions) -> Result<(), MinerError> {
    init_logging();

    let mut config = opts.mining.resolve()?;
    config.session.input = InputPolicy::Concurrent;

    let lines: VecDeque<String> = opts.lines.into_iter().collect();
    run_session(&config, lines, false)
}

/// Drives a session on the single-threaded scheduler until it ends
fn run_session<S: LineSource>(
    config: &Config,
    source: S,
    interactive: bool,
) -> Result<(), MinerError> {
    let sink = create_sink(config.session.output, interactive);

    let report = run_local(async {
        let session = Session::new(
            config.difficulty,
            config.session.input,
            Rc::clone(&sink),
            OsNonceSource,
        )?;
        session.run(source, interrupted()).await
    })??;

    if report.end == SessionEnd::Interrupted {
        log::info!("Shutting down");
    }
    sink.flush()
}

/// Builds the stdout sink for the configured output format
///
/// Only the text format prompts; JSON output stays one object per line.
fn create_sink(format: OutputFormat, interactive: bool) -> Rc<dyn EventSink> {
    match format {
        OutputFormat::Text if interactive => Rc::new(ConsoleSink::interactive(std::io::stdout())),
        OutputFormat::Text => Rc::new(ConsoleSink::new(std::io::stdout())),
        OutputFormat::Json => Rc::new(JsonSink::new(std::io::stdout())),
    }
}

/// Resolves on Ctrl-C
///
/// If the signal handler cannot be installed the session simply runs until
/// its input is exhausted.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Checks a solution and reports the verdict
fn verify_solution(opts: cli::VerifyOptions) -> Result<(), MinerError> {
    let valid = hasher::verify(&opts.line, &opts.nonce, &opts.digest, opts.difficulty)?;
    if valid {
        println!("valid");
        Ok(())
    } else {
        Err(MinerError::InputError(format!(
            "digest does not match line and nonce at difficulty {}",
            opts.difficulty
        )))
    }
}

/// Generates configuration template file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Wrote {}", opts.output.display());
    Ok(())
}
