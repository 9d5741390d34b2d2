use std::path::Path;

use crate::config::Config;

const CYAN: &str = "\x1B[36m";
const YELLOW: &str = "\x1B[33m";
const RESET: &str = "\x1B[0m";

/// `cwd` with a leading `home` replaced by `~`.
pub fn display_dir(cwd: &Path, home: Option<&Path>) -> String {
	match home.and_then(|home| cwd.strip_prefix(home).ok()) {
		Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
		Some(rest) => format!("~/{}", rest.display()),
		None => cwd.display().to_string(),
	}
}

pub fn render(config: &Config, cwd: &Path, home: Option<&Path>) -> String {
	let dir = display_dir(cwd, home);
	if config.color {
		format!("{}{} {}{}{} >> {}", CYAN, config.prompt, YELLOW, dir, CYAN, RESET)
	} else {
		format!("{} {} >> ", config.prompt, dir)
	}
}
