use std::fs;
use std::path::{Path, PathBuf};
use dulce_core::language::InterpreterOptions;
use log::LevelFilter;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "dulce.toml";

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logger: LoggerConfig,
    pub interpreter: InterpreterConfig,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: String,
    pub file_level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: "warn".to_string(),
            file_level: "debug".to_string(),
            dir: None,
        }
    }
}

impl LoggerConfig {
    pub fn console_level(&self) -> Result<LevelFilter, Box<dyn std::error::Error>> {
        level_from(&self.level)
    }

    pub fn file_level(&self) -> Result<LevelFilter, Box<dyn std::error::Error>> {
        level_from(&self.file_level)
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub show_ast: bool,
    #[serde(flatten)]
    pub options: InterpreterOptions,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            show_ast: true,
            options: InterpreterOptions::default(),
        }
    }
}

fn level_from(name: &str) -> Result<LevelFilter, Box<dyn std::error::Error>> {
    dulce_logger::parse_level(name)
        .ok_or_else(|| format!("Nivel de log inválido: '{}'", name).into())
}

pub fn parse_config(content: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let config: Config = toml::de::from_str(content)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("No se pudo leer la configuración '{}': {}", path.display(), e))?;
    parse_config(&content)
        .map_err(|e| format!("No se pudo interpretar la configuración '{}': {}", path.display(), e).into())
}

/// An explicit path must exist; otherwise `dulce.toml` is picked up when
/// present and the defaults are used when it is not.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_PATH);
            if fallback.is_file() {
                load_config(fallback)
            } else {
                Ok(Config::default())
            }
        }
    }
}
