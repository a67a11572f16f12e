//! CLI surface for the wayfare binary.

use clap::Parser;

/// Travel planning assistant.
#[derive(Parser, Debug)]
#[command(name = "wayfare", version, about = "Travel planning assistant with tool calling")]
pub struct Cli {
    /// Model override for the primary agent.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Verbose agent logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single query and exit; omit for an interactive session.
    pub query: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
