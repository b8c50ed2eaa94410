use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "pickleball-ladder backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if it does not exist yet
    Init,
    /// Print the current leaderboard to the terminal
    Leaderboard {
        /// Restrict the ranking to one group's members
        #[arg(short, long)]
        group: Option<i64>,
        /// Minimum games before an entity is ranked
        #[arg(short, long, default_value_t = 0)]
        min_games: u32,
    },
}
