#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command, SearchArgs};
pub use settings::Settings;
