use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use nix::unistd;

use crate::error::{Result, ShellError};

pub type Builtin = fn(&[String]) -> Result<()>;

pub fn home_dir() -> PathBuf {
	env::var_os("HOME").map_or_else(|| PathBuf::from("/"), PathBuf::from)
}

pub fn builtin_pwd(_: &[String]) -> Result<()> {
	let cwd = env::current_dir()?;
	let mut stdout = io::stdout();
	writeln!(stdout, "{}", cwd.display())?;
	stdout.flush()?;
	Ok(())
}

pub fn builtin_cd(words: &[String]) -> Result<()> {
	let target = match words.get(1).map(String::as_str) {
		None | Some("~") => home_dir(),
		Some(path) => PathBuf::from(path),
	};
	unistd::chdir(&target).map_err(|e| ShellError::Chdir { path: target, source: e })
}

pub fn match_builtin(name: &str) -> Option<Builtin> {
	match name {
		"cd" => Some(builtin_cd),
		"pwd" => Some(builtin_pwd),
		_ => None,
	}
}
