pub mod check;
pub mod migrate;
pub mod reorder;
pub mod show;

pub use check::CheckCommands;
pub use reorder::ReorderCommands;
pub use show::ShowCommands;
