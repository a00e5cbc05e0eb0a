use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Maximum level written: off, error, warn, info, debug or trace.
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file path; empty means stderr.
    #[serde(default)]
    pub file: String,
}

/// Statuses the exec layer reports on behalf of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecConfig {
    /// A child whose program could not be found or started.
    #[serde(default = "default_exec_failure_status")]
    pub exec_failure_status: i32,
    /// A subshell whose inner line finished with a nonzero status.
    #[serde(default = "default_subshell_failure_status")]
    pub subshell_failure_status: i32,
}

fn default_level() -> String {
    "warn".into()
}

fn default_exec_failure_status() -> i32 {
    127
}

fn default_subshell_failure_status() -> i32 {
    5
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: String::new(),
        }
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            exec_failure_status: default_exec_failure_status(),
            subshell_failure_status: default_subshell_failure_status(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level; unknown names fall back to `warn`.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::Warn)
    }

    /// Log file with `~` expanded, or `None` to log to stderr.
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.file.trim();
        if file.is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(file).as_ref()))
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    logging: LoggingOverlay,
    #[serde(default)]
    exec: ExecOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ExecOverlay {
    exec_failure_status: Option<i32>,
    subshell_failure_status: Option<i32>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/tuxsh/config.toml (if exists)
    ///
    /// Every key present in the overlay overrides the default.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/tuxsh/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/tuxsh/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("tuxsh: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (scalar overrides).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let l = overlay.logging;
        if let Some(v) = l.level {
            self.logging.level = v;
        }
        if let Some(v) = l.file {
            self.logging.file = v;
        }

        let e = overlay.exec;
        if let Some(v) = e.exec_failure_status {
            self.exec.exec_failure_status = v;
        }
        if let Some(v) = e.subshell_failure_status {
            self.exec.subshell_failure_status = v;
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.logging.level_filter(), LevelFilter::Warn);
        assert!(config.logging.file_path().is_none());
        assert_eq!(config.exec, ExecConfig::default());
    }

    #[test]
    fn default_exec_statuses() {
        let config = Config::default_config();
        assert_eq!(config.exec.exec_failure_status, 127);
        assert_eq!(config.exec.subshell_failure_status, 5);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.exec, ExecConfig::default());
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_overrides_level() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [logging]
            level = "debug"
        "#,
        );
        assert_eq!(config.logging.level_filter(), LevelFilter::Debug);
        // Untouched keys keep their defaults
        assert!(config.logging.file.is_empty());
        assert_eq!(config.exec.exec_failure_status, 127);
    }

    #[test]
    fn overlay_overrides_exec_statuses() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [exec]
            exec_failure_status = 126
        "#,
        );
        assert_eq!(config.exec.exec_failure_status, 126);
        assert_eq!(config.exec.subshell_failure_status, 5);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.exec, ExecConfig::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn unknown_level_falls_back_to_warn() {
        let logging = LoggingConfig {
            level: "chatty".into(),
            file: String::new(),
        };
        assert_eq!(logging.level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn log_file_expands_tilde() {
        let logging = LoggingConfig {
            level: "info".into(),
            file: "/var/log/tuxsh.log".into(),
        };
        assert_eq!(logging.file_path(), Some(PathBuf::from("/var/log/tuxsh.log")));

        let logging = LoggingConfig {
            level: "info".into(),
            file: "~/tuxsh.log".into(),
        };
        let path = logging.file_path().unwrap();
        assert!(!path.starts_with("~"), "tilde not expanded: {}", path.display());
        assert!(path.ends_with("tuxsh.log"));
    }
}
