pub mod handler;

use clap::{Args, ValueEnum};

pub use handler::handle_show_command;

#[derive(Args, Debug)]
pub struct ShowCommands {
    /// Which table to print
    #[arg(value_enum)]
    pub kind: ShowKind,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print at most this many rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Families,
    Variants,
    Entities,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}
