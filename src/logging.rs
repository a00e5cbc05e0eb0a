use std::fs::OpenOptions;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LoggingConfig;

/// Install the global logger described by `config`.
///
/// Records go to the configured file when one is set and can be opened,
/// otherwise to stderr. Best-effort: a logger that cannot be installed is
/// silently skipped, the shell runs without one.
pub fn init(config: &LoggingConfig) {
    let level = config.level_filter();
    if level == LevelFilter::Off {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    if let Some(path) = config.file_path() {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
            let _ = WriteLogger::init(level, log_config, file);
            return;
        }
    }

    // Never stdout: it may be the write end of a pipeline.
    let _ = WriteLogger::init(level, log_config, std::io::stderr());
}
