//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Which records a listing or search covers
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// Records not yet watched
    Pending,
    /// Records already struck through
    Seen,
    /// Everything
    All,
}

impl ScopeArg {
    pub fn to_scope(self) -> cinevote_domain::SearchScope {
        match self {
            ScopeArg::Pending => cinevote_domain::SearchScope::Pending,
            ScopeArg::Seen => cinevote_domain::SearchScope::Resolved,
            ScopeArg::All => cinevote_domain::SearchScope::All,
        }
    }
}

/// Which field a search runs against
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SearchByArg {
    Title,
    Proposer,
}

/// How a tied round is resolved
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TieArg {
    /// Uniformly choose one of the tied leaders
    Random,
    /// Run a short extra round over the tied leaders only
    Runoff,
}

impl TieArg {
    pub fn to_breaker(self) -> cinevote_domain::TieBreaker {
        match self {
            TieArg::Random => cinevote_domain::TieBreaker::Random,
            TieArg::Runoff => cinevote_domain::TieBreaker::Runoff,
        }
    }
}

/// CLI arguments for cinevote
#[derive(Parser, Debug)]
#[command(name = "cinevote")]
#[command(author, version, about = "Shared movie shortlist with time-boxed voting rounds")]
#[command(long_about = r#"
Cinevote keeps a movie shortlist in a shared rich-text document and runs
time-boxed voting rounds over it. Watched movies are struck through in the
document itself, never deleted, so the full history stays visible.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./cinevote.toml     Project-level config
3. ~/.config/cinevote/config.toml   Global config

Example:
  cinevote list --scope pending
  cinevote search "dune" --by title
  cinevote vote --count 3 --minutes 5 --tie runoff
  cinevote --snapshot fixtures/list.json inspect
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use a local JSON snapshot instead of the remote document
    #[arg(long, value_name = "FILE", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List shortlist records, paginated
    List {
        /// Which records to include
        #[arg(long, value_enum, default_value = "pending")]
        scope: ScopeArg,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Pick one pending record at random
    Pick {
        /// Restrict the pick to one proposer (case-insensitive substring)
        #[arg(long, value_name = "NAME")]
        proposer: Option<String>,
    },

    /// Search the shortlist
    Search {
        /// The query text
        query: String,

        /// Which field to search
        #[arg(long, value_enum, default_value = "title")]
        by: SearchByArg,

        /// Which records to include
        #[arg(long, value_enum, default_value = "all")]
        scope: ScopeArg,
    },

    /// Mark a pending record as watched (strike it through)
    Resolve {
        /// Title to match against pending records
        title: String,
    },

    /// Run a voting round over random pending candidates
    Vote {
        /// Number of candidates to draw
        #[arg(long, value_name = "N")]
        count: Option<usize>,

        /// Votes allowed per voter
        #[arg(long, value_name = "M")]
        max_votes: Option<usize>,

        /// Round length in minutes
        #[arg(long, value_name = "T")]
        minutes: Option<i64>,

        /// How to resolve a tied round
        #[arg(long, value_enum, default_value = "random")]
        tie: TieArg,
    },

    /// Show cutoff and delimiter diagnostics for the document
    Inspect,
}
