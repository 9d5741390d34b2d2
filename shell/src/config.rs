use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::error::{Result, ShellError};

const USER_CONFIG: &str = ".config/ish/config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Label printed at the start of the prompt.
	pub prompt: String,
	pub color: bool,
	/// Longest accepted input line, in bytes.
	pub max_line_length: usize,
	pub log_level: String,
	pub log_file: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Config {
		Config {
			prompt: "ish".to_string(),
			color: true,
			max_line_length: 4096,
			log_level: "warn".to_string(),
			log_file: None,
		}
	}
}

impl Config {
	pub fn from_toml(content: &str) -> Result<Config> {
		let config: Config = toml::from_str(content).map_err(|e| ShellError::Config(e.to_string()))?;
		if config.max_line_length == 0 {
			return Err(ShellError::Config("max_line_length must be positive".to_string()));
		}
		config.level_filter()?;
		Ok(config)
	}

	pub fn from_file(path: &Path) -> Result<Config> {
		let content = fs::read_to_string(path)
			.map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))?;
		Config::from_toml(&content)
	}

	pub fn load(explicit: Option<&Path>) -> Result<Config> {
		if let Some(path) = explicit {
			return Config::from_file(path);
		}
		let home = match std::env::var_os("HOME") {
			Some(home) => PathBuf::from(home),
			None => return Ok(Config::default()),
		};
		let path = home.join(USER_CONFIG);
		if !path.is_file() {
			return Ok(Config::default());
		}
		Ok(Config::from_file(&path).unwrap_or_else(|e| {
			eprintln!("ish: {}", e);
			Config::default()
		}))
	}

	pub fn level_filter(&self) -> Result<LevelFilter> {
		self.log_level.parse().map_err(|_| ShellError::Config(format!("unknown log level '{}'", self.log_level)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn empty_file_gives_defaults() {
		let config = Config::from_toml("").unwrap();
		assert_eq!(config.prompt, "ish");
		assert!(config.color);
		assert_eq!(config.max_line_length, 4096);
		assert_eq!(config.level_filter().unwrap(), LevelFilter::Warn);
		assert!(config.log_file.is_none());
	}

	#[test]
	fn fields_override() {
		let config = Config::from_toml(r#"
			prompt = "myShell"
			color = false
			max_line_length = 256
			log_level = "debug"
			log_file = "/tmp/ish.log"
		"#).unwrap();
		assert_eq!(config.prompt, "myShell");
		assert!(!config.color);
		assert_eq!(config.max_line_length, 256);
		assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
		assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ish.log")));
	}

	#[test]
	fn bad_values_are_rejected() {
		assert_matches!(Config::from_toml("max_line_length = 0"), Err(ShellError::Config(_)));
		assert_matches!(Config::from_toml("log_level = \"loud\""), Err(ShellError::Config(_)));
		assert_matches!(Config::from_toml("prompt = 3"), Err(ShellError::Config(_)));
		assert_matches!(Config::from_toml("colour = true"), Err(ShellError::Config(_)));
	}

	#[test]
	fn explicit_missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("none.toml");
		assert_matches!(Config::load(Some(path.as_path())), Err(ShellError::Config(_)));
	}

	#[test]
	fn explicit_file_loads() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ish.toml");
		fs::write(&path, "prompt = \"x\"\n").unwrap();
		assert_eq!(Config::load(Some(path.as_path())).unwrap().prompt, "x");
	}
}
