use clap::{Parser, Subcommand, ValueEnum};

use crate::dashboard::SortOrder;

#[derive(Parser)]
#[command(name = "conversight")]
#[command(author, version, about = "Browse and analyse recorded customer conversations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOrder::NewestFirst,
            SortArg::Oldest => SortOrder::OldestFirst,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from the terminal when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Create a business account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        business_name: String,

        #[arg(short, long)]
        password: Option<String>,
    },

    /// Confirm an email address with the token from the verification mail
    Verify { token: String },

    /// List conversations, optionally filtered by a search query
    List {
        #[arg(short, long)]
        query: Option<String>,

        /// Reorder by creation time instead of server order
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },

    /// Show one conversation with its emotion scores
    Show {
        id: i64,

        /// Also print the full transcript
        #[arg(short, long)]
        transcript: bool,
    },

    /// Emotion totals and sentiment distribution across all conversations
    Stats {
        /// Print the chart series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a conversation after confirmation
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive search over the conversation list
    Browse,
}
