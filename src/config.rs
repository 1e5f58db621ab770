//! Configuration: where `emuview.json` lives and what it holds.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::debounce::RESIZE_DEBOUNCE_MS;
use crate::core::props::ViewportProps;

/// Config file name
pub const CONFIG_FILE: &str = "emuview.json";

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI args → ENV var (EMUVIEW_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| {
            std::env::var("EMUVIEW_CONFIG_DIR")
                .ok()
                .map(PathBuf::from)
        });

        Self { config_dir }
    }
}

/// Get path to a configuration file
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. EMUVIEW_CONFIG_DIR environment variable
/// 3. Local folder IF the config file exists there
/// 4. Platform-specific config directory from dirs-next
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    get_config_dir(config).join(name)
}

/// Create the config directory if missing
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let dir = get_config_dir(config);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }
    Ok(())
}

fn get_config_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir()
        && current_dir.join(CONFIG_FILE).exists()
    {
        return current_dir;
    }

    if let Some(dir) = dirs_next::config_dir() {
        return dir.join("emuview");
    }

    PathBuf::from(".")
}

/// Persisted viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub device_emulation: bool,
    pub inspect: bool,
    /// Window-resize debounce
    pub resize_debounce_ms: u64,
    /// Recent viewport events kept by the host shell
    pub event_log_len: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 0.0,
            device_emulation: false,
            inspect: false,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            event_log_len: 64,
        }
    }
}

impl ViewportConfig {
    /// Load from `path`. Missing file gives defaults; malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Carry the session's last viewport settings over to the next start
    pub fn remember(&mut self, props: &ViewportProps) {
        self.width = props.width;
        self.height = props.height;
        self.padding = props.padding;
        self.device_emulation = props.is_device_emulation_enabled;
        self.inspect = props.is_inspect_enabled;
    }

    /// Initial host props
    pub fn initial_props(&self) -> ViewportProps {
        ViewportProps {
            width: self.width,
            height: self.height,
            padding: self.padding,
            is_device_emulation_enabled: self.device_emulation,
            is_inspect_enabled: self.inspect,
            ..Default::default()
        }
    }
}
