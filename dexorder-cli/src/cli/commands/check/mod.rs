pub mod handler;

use clap::Args;

pub use handler::handle_check_command;

#[derive(Args, Debug)]
pub struct CheckCommands {
    /// Maximum number of drifted rows to list
    #[arg(long, default_value_t = 20)]
    pub max_rows: usize,
}
