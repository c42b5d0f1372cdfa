pub mod app;
mod commands;
mod interactive;

pub use app::App;
pub use commands::{execute_command, Args, Commands};
pub use interactive::InteractiveShell;
