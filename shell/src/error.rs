use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("cannot create pipe: {0}")]
	PipeCreation(#[source] Errno),
	#[error("{}: {source}", .path.display())]
	FileOpen { path: PathBuf, #[source] source: io::Error },
	#[error("missing file name after '{0}'")]
	InvalidRedirection(String),
	#[error("fork failed: {0}")]
	Fork(#[source] Errno),
	#[error("{command}: {source}")]
	Exec { command: String, #[source] source: Errno },
	#[error("cd: {}: {source}", .path.display())]
	Chdir { path: PathBuf, #[source] source: Errno },
	#[error("empty command in pipeline")]
	EmptyCommand,
	#[error("input line longer than {limit} bytes, discarded")]
	LineTooLong { limit: usize },
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	#[error("config: {0}")]
	Config(String),
}

impl ShellError {
	/// Errors after which the controller cannot go on reading lines.
	pub fn is_fatal(&self) -> bool {
		matches!(self, ShellError::Fork(_))
	}
}

pub type Result<T> = std::result::Result<T, ShellError>;
