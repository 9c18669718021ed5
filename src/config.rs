use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "TECHTREE_CONFIG";

/// Config file picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "techtree.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub techtree: TechtreeConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Run settings
#[derive(Debug, Clone, Deserialize)]
pub struct TechtreeConfig {
    /// Image file to produce; the graph description goes to `<output>.dot`
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Skip documents that fail to parse instead of aborting
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for TechtreeConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: default_log_level(),
            keep_going: false,
        }
    }
}

/// External renderer settings
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_render_enabled")]
    pub enabled: bool,
    /// Graphviz executable
    #[serde(default = "default_render_command")]
    pub command: String,
    /// Value passed as `-T<format>`
    #[serde(default = "default_render_format")]
    pub format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: default_render_enabled(),
            command: default_render_command(),
            format: default_render_format(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("techtree.svg")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_render_enabled() -> bool {
    true
}

fn default_render_command() -> String {
    "dot".to_string()
}

fn default_render_format() -> String {
    "svg".to_string()
}

impl Config {
    /// Load configuration.
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for a config file in this order:
    /// 1. `path`, when given
    /// 2. Path specified in the TECHTREE_CONFIG environment variable
    /// 3. ./techtree.toml, if it exists
    ///
    /// Without any config file the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let config = match explicit {
            Some(config_path) => Self::from_file(&config_path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.techtree.output.as_os_str().is_empty() {
            anyhow::bail!("techtree.output must not be empty");
        }

        if self.render.command.trim().is_empty() {
            anyhow::bail!("render.command must not be empty");
        }

        if self.render.format.is_empty()
            || !self.render.format.chars().all(|c| c.is_ascii_alphanumeric() || c == ':')
        {
            anyhow::bail!(
                "render.format must be a Graphviz output format such as svg or png, got {:?}",
                self.render.format
            );
        }

        Ok(())
    }

    /// Image file the run produces
    pub fn output(&self) -> &Path {
        &self.techtree.output
    }
}
