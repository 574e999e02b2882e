use clap::Parser;

use crate::utils::version;

/// Runs a scripted walk-through of the component library against a fresh
/// store and prints what happened.
#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// User the demo interactions are made as
    #[arg(short, long, value_name = "ID", default_value_t = 1)]
    pub user_id: u64,

    /// Number of pages in the paginated demo view
    #[arg(short, long, value_name = "COUNT", default_value_t = 3)]
    pub pages: usize,

    /// Overrides `store.history_limit` from the config file
    #[arg(long, value_name = "LIMIT")]
    pub history: Option<usize>,

    /// Print the final state as JSON
    #[arg(long)]
    pub dump_state: bool,
}
