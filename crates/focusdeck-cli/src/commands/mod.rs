pub mod config;
pub mod stats;
pub mod subject;
pub mod task;
pub mod timer;

use focusdeck_core::storage::{data_dir, ConfigStore, SessionLog};

/// Open both stores in the shared data directory.
pub fn open_stores() -> Result<(ConfigStore, SessionLog), Box<dyn std::error::Error>> {
    let dir = data_dir()?;
    let config = ConfigStore::open_at(dir.join("config.toml"))?;
    let log = SessionLog::open_at(dir.join("learning_logs.csv"));
    Ok((config, log))
}
