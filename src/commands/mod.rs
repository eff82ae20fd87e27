mod config_cmd;
mod log;
mod macros;
mod plans;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use log::{DeleteCommand, LogCommand};
pub use macros::{TodayCommand, WeekCommand};
pub use plans::PlansCommand;
pub use sync_cmd::SyncCommand;

use caltrax_core::{FileStore, RestClient};
use clap::ValueEnum;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Local store rooted at the configured data directory.
pub fn file_store(config: &Config) -> FileStore {
    FileStore::new(config.data_dir.value.clone())
}

/// Remote client, if one is configured.
pub fn remote_client(config: &Config) -> Option<RestClient> {
    config.remote.client()
}
