use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::Viewport,
    params::{ParamError, Parameters},
    solver::SolverKind,
};

fn default_title() -> String {
    "Farmer's Crop Optimisation".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// What the result panel shows once a parameter changes after a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultDisplay {
    /// Keep the previous result text until the next solve.
    #[default]
    KeepStale,
    /// Clear the panel as soon as the parameters change.
    HideStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub graph: Viewport,
    #[serde(default)]
    pub initial: Parameters,
    #[serde(default)]
    pub solver: SolverKind,
    #[serde(default)]
    pub result_display: ResultDisplay,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            window: WindowConfig::default(),
            graph: Viewport::default(),
            initial: Parameters::default(),
            solver: SolverKind::default(),
            result_display: ResultDisplay::default(),
            server: ServerConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("initial parameters: {0}")]
    Params(#[from] ParamError),
    #[error("window must have a positive size, got {width}x{height}")]
    Window { width: i32, height: i32 },
    #[error("graph must have a positive size, got {width}x{height}")]
    Graph { width: i32, height: i32 },
    #[error("graph {graph:?} does not fit inside a {width}x{height} window")]
    GraphOutsideWindow {
        graph: Viewport,
        width: i32,
        height: i32,
    },
}

impl AppConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(text).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial.validate()?;

        let WindowConfig { width, height } = self.window;
        if width <= 0 || height <= 0 {
            return Err(ConfigError::Window { width, height });
        }

        let graph = self.graph;
        if graph.width <= 0 || graph.height <= 0 {
            return Err(ConfigError::Graph {
                width: graph.width,
                height: graph.height,
            });
        }
        if graph.origin_x < 0 || graph.origin_y < 0 || graph.right() > width || graph.bottom() > height
        {
            return Err(ConfigError::GraphOutsideWindow {
                graph,
                width,
                height,
            });
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<AppConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Loads `file` when given, otherwise falls back to the built-in defaults.
    pub fn load_or_default(&self, file: Option<&Path>) -> Result<AppConfig> {
        match file {
            Some(file) => self.load(file),
            None => Ok(AppConfig::default()),
        }
    }
}
