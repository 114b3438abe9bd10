use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "enroll", version, about = "AABB Aracaju membership enrollment")]
pub struct Cli {
    /// Submissions file (overrides ENROLLMENT_STORE_PATH)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Maximum size of the submissions file in bytes
    #[arg(long, global = true)]
    pub quota_bytes: Option<usize>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Fill in a new membership proposal
    Wizard,
    /// Review stored proposals
    Admin {
        #[command(subcommand)]
        action: AdminCmd,
    },
    /// Ask the virtual assistant about plans and documents
    Chat {
        /// Model id on OpenRouter (overrides ENROLLMENT_CHAT_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminCmd {
    /// List proposals, newest first
    List {
        /// Filter by name, CPF or proposal number
        #[arg(long)]
        search: Option<String>,
    },
    /// Counters per status
    Stats,
    /// Print the paper form of a proposal
    Show { id: String },
    Approve { id: String },
    Reject { id: String },
    Delete {
        id: String,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
}
