use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mcs-it",
    about = "Server status integration tests: compare live status against expected documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two JSON status documents
    Diff(DiffArgs),
    /// Check every configured server against its expected status
    Test(TestArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Expected status document
    pub expected: PathBuf,
    /// Actual status document
    pub actual: PathBuf,
    /// Dotted field paths removed from the actual document before comparing
    #[arg(long = "ignore")]
    pub ignore: Vec<String>,
}

#[derive(Args)]
pub struct TestArgs {
    /// Harness configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Server fixtures file, overrides the config
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Directory of captured status documents named `<id>.json`
    #[arg(long, default_value = "statuses")]
    pub statuses: PathBuf,
    /// Results directory, overrides the config
    #[arg(long)]
    pub results: Option<PathBuf>,
    /// Do not write per-server results
    #[arg(long, conflicts_with = "results")]
    pub no_save: bool,
}
