//! Configuration file support.
//!
//! Server access, preview layout and timing are read from a versioned JSON
//! file. Every field has a default, so a partial file is enough.

use std::path::{Path, PathBuf};
use std::time::Duration;

use node_host::Color;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_IMAGE_BYTES, DEFAULT_SERVER_URL, DEFAULT_USER_AGENT};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level {:?}", other)),
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor server access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base address of the editor server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Work on this input directory instead of talking to a server
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// User agent for remote image requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout; also bounds how long a single remote fetch may stall
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Largest image body accepted
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

fn default_base_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            input_dir: None,
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl ServerConfig {
    /// Build an HTTP agent with the configured timeouts and user agent.
    pub fn agent(&self) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(self.connect_timeout_secs))
            .timeout_read(Duration::from_secs(self.read_timeout_secs))
            .timeout_write(Duration::from_secs(self.read_timeout_secs))
            .user_agent(&self.user_agent)
            .build()
    }
}

/// Geometry and style of the in-node preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Distance from the node top to the preview, below the widgets
    #[serde(default = "default_top_margin")]
    pub top_margin: f32,

    /// Horizontal space kept free around the preview (both sides together)
    #[serde(default = "default_side_padding")]
    pub side_padding: f32,

    /// Space kept free below the preview for the caption
    #[serde(default = "default_caption_margin")]
    pub caption_margin: f32,

    /// Smallest available height, even on very short nodes
    #[serde(default = "default_min_height")]
    pub min_height: f32,

    /// Caption baseline below the preview's bottom edge
    #[serde(default = "default_caption_offset")]
    pub caption_offset: f32,

    #[serde(default = "default_caption_font")]
    pub caption_font: String,

    /// CSS hex color of the caption
    #[serde(default = "default_caption_color")]
    pub caption_color: String,
}

fn default_top_margin() -> f32 {
    160.0
}

fn default_side_padding() -> f32 {
    20.0
}

fn default_caption_margin() -> f32 {
    25.0
}

fn default_min_height() -> f32 {
    50.0
}

fn default_caption_offset() -> f32 {
    15.0
}

fn default_caption_font() -> String {
    "11px Arial".to_string()
}

fn default_caption_color() -> String {
    "#aaa".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_margin: default_top_margin(),
            side_padding: default_side_padding(),
            caption_margin: default_caption_margin(),
            min_height: default_min_height(),
            caption_offset: default_caption_offset(),
            caption_font: default_caption_font(),
            caption_color: default_caption_color(),
        }
    }
}

impl LayoutConfig {
    /// Caption color, falling back to the default gray on a malformed value.
    pub fn caption_color(&self) -> Color {
        Color::from_hex(&self.caption_color).unwrap_or_else(|| {
            log::warn!("Invalid caption color {:?}", self.caption_color);
            Color::rgb(0xaa as f32 / 255.0, 0xaa as f32 / 255.0, 0xaa as f32 / 255.0)
        })
    }
}

/// Preview behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Delay between a workflow configure and the preview reload
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,

    /// Replace files of the same name on upload
    #[serde(default = "default_overwrite_uploads")]
    pub overwrite_uploads: bool,
}

fn default_reload_delay_ms() -> u64 {
    100
}

fn default_overwrite_uploads() -> bool {
    true
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            reload_delay_ms: default_reload_delay_ms(),
            overwrite_uploads: default_overwrite_uploads(),
        }
    }
}

impl PreviewSettings {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub preview: PreviewSettings,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl PreviewConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            layout: LayoutConfig::default(),
            preview: PreviewSettings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "source-preview.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("source-preview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("source-preview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but cannot be parsed is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Self::new();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                Self::new()
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
