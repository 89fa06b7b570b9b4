pub mod handler;

use clap::Args;

pub use handler::handle_reorder_command;

#[derive(Args, Debug)]
pub struct ReorderCommands {
    /// Compute and report orders without writing them
    #[arg(long)]
    pub dry_run: bool,
}
