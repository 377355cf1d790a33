// src/cli/commands.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Line Miner CLI - proof-of-work over lines of text
#[derive(Parser, Debug)]
#[command(name = "line-miner")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Read lines from stdin and mine each one until Ctrl-C or end of input
    Start(StartOptions),

    /// Mine the given lines and exit once all are done
    Hash(HashOptions),

    /// Check a reported solution
    Verify(VerifyOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Settings shared by the mining commands; each overrides the config file
#[derive(Args, Debug, Default)]
pub struct MiningOverrides {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Leading zero hex digits required (overrides config)
    #[arg(short, long)]
    pub difficulty: Option<u32>,

    /// Rounds between cooperative yields (overrides config)
    #[arg(short, long)]
    pub yield_every: Option<u64>,

    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Options for the interactive session
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Difficulty, config and output settings
    #[command(flatten)]
    pub mining: MiningOverrides,

    /// Wait for each job to finish before reading the next line
    #[arg(short, long)]
    pub sequential: bool,
}

/// Options for one-shot hashing
#[derive(Parser, Debug)]
pub struct HashOptions {
    /// Lines to mine
    #[arg(required = true)]
    pub lines: Vec<String>,

    /// Difficulty, config and output settings
    #[command(flatten)]
    pub mining: MiningOverrides,
}

/// Options for checking a solution
#[derive(Parser, Debug)]
pub struct VerifyOptions {
    /// The hashed line
    #[arg(short, long)]
    pub line: String,

    /// Hex encoded 20-byte nonce
    #[arg(short, long)]
    pub nonce: String,

    /// Hex digest reported for the line and nonce
    #[arg(short = 'g', long)]
    pub digest: String,

    /// Leading zero hex digits the digest must have
    #[arg(short, long, default_value_t = 5)]
    pub difficulty: u32,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "line-miner.toml")]
    pub output: PathBuf,
}
