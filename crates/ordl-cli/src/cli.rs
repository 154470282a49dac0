use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ordl",
    about = "Order Ledger: tamper-evident, hash-linked audit log of orders",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Append simulated orders from concurrent workers and validate the chain
    Simulate(SimulateArgs),
    /// Verify an exported chain and print an audit report
    Verify(VerifyArgs),
    /// Print blocks of an exported chain, or look one up by order id
    Show(ShowArgs),
}

#[derive(Args, Default)]
pub struct SimulateArgs {
    /// Number of orders to append
    #[arg(short = 'n', long)]
    pub orders: Option<usize>,
    /// Number of concurrent worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Write the resulting chain to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
    /// Corrupt the exported block at this index (integrity drill)
    #[arg(long, requires = "export")]
    pub tamper: Option<usize>,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    pub path: PathBuf,
    #[arg(long)]
    pub order_id: Option<String>,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}
