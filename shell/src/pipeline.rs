use std::iter;
use std::os::fd::OwnedFd;

use log::debug;
use nix::fcntl::OFlag;
use nix::unistd;

use crate::error::{Result, ShellError};
use crate::redirect;
use crate::types::{Pipeline, Stage};

fn make_pipes(count: usize) -> Result<(Vec<OwnedFd>, Vec<OwnedFd>)> {
	let mut reads = Vec::with_capacity(count);
	let mut writes = Vec::with_capacity(count);
	for _ in 0 .. count {
		let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(ShellError::PipeCreation)?;
		reads.push(pipe_read);
		writes.push(pipe_write);
	}
	Ok((reads, writes))
}

/// Stage `i` reads pipe `i - 1` and writes pipe `i` unless its redirection
/// claimed that side first.
pub fn build(stage_words: Vec<Vec<String>>) -> Result<Pipeline> {
	let n = stage_words.len();
	if n == 0 {
		return Ok(Pipeline::default());
	}
	let pipe_count = n - 1;
	let (reads, writes) = make_pipes(pipe_count)?;
	let upstreams = iter::once(None).chain(reads.into_iter().map(Some));
	let downstreams = writes.into_iter().map(Some).chain(iter::once(None));

	let mut stages = Vec::with_capacity(n);
	for ((mut words, upstream), downstream) in stage_words.into_iter().zip(upstreams).zip(downstreams) {
		let spec = redirect::resolve(&mut words)?;
		if words.is_empty() {
			return Err(ShellError::EmptyCommand);
		}
		let mut stage = Stage::new(words);
		stage.upstream = spec.input.or(upstream);
		stage.downstream = spec.output.or(downstream);
		stages.push(stage);
	}
	debug!("built pipeline of {} stages with {} pipes", n, pipe_count);
	Ok(Pipeline { stages: stages, pipe_count: pipe_count })
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use std::fs::{self, File};
	use std::io::{Read, Write};

	fn stage_words(stages: &[&str]) -> Vec<Vec<String>> {
		stages.iter().map(|s| s.split_whitespace().map(str::to_owned).collect()).collect()
	}

	#[test]
	fn no_stages_is_a_no_op() {
		let pipeline = build(vec![]).unwrap();
		assert!(pipeline.is_empty());
		assert_eq!(pipeline.pipe_count, 0);
	}

	#[test]
	fn single_stage_gets_no_pipes() {
		let pipeline = build(stage_words(&["ls -l"])).unwrap();
		assert_eq!(pipeline.pipe_count, 0);
		let stage = &pipeline.stages[0];
		assert_eq!(stage.words, ["ls", "-l"]);
		assert!(stage.upstream.is_none());
		assert!(stage.downstream.is_none());
	}

	#[test]
	fn neighbours_share_a_pipe() {
		let mut pipeline = build(stage_words(&["a", "b", "c"])).unwrap();
		assert_eq!(pipeline.len(), 3);
		assert_eq!(pipeline.pipe_count, 2);
		assert!(pipeline.stages[0].upstream.is_none());
		assert!(pipeline.stages[2].downstream.is_none());

		for i in 0 .. 2 {
			let mut writer = File::from(pipeline.stages[i].downstream.take().unwrap());
			let mut reader = File::from(pipeline.stages[i + 1].upstream.take().unwrap());
			writer.write_all(format!("through {}", i).as_bytes()).unwrap();
			drop(writer);
			let mut got = String::new();
			reader.read_to_string(&mut got).unwrap();
			assert_eq!(got, format!("through {}", i));
		}
	}

	#[test]
	fn redirection_wins_over_pipe() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("out");
		let middle = format!("tr a b > {}", out.display());
		let mut pipeline = build(stage_words(&["echo a", middle.as_str(), "cat"])).unwrap();
		assert_eq!(pipeline.stages[1].words, ["tr", "a", "b"]);

		let mut file = File::from(pipeline.stages[1].downstream.take().unwrap());
		file.write_all(b"redirected").unwrap();
		drop(file);
		assert_eq!(fs::read_to_string(&out).unwrap(), "redirected");

		// The second pipe lost its only writer, so the last stage sees EOF.
		let mut reader = File::from(pipeline.stages[2].upstream.take().unwrap());
		let mut buf = Vec::new();
		assert_eq!(reader.read_to_end(&mut buf).unwrap(), 0);
	}

	#[test]
	fn bad_target_aborts_the_line() {
		let dir = tempfile::tempdir().unwrap();
		let missing = format!("cat < {}", dir.path().join("missing").display());
		let r = build(stage_words(&["echo a", missing.as_str()]));
		assert_matches!(r, Err(ShellError::FileOpen { .. }));
	}

	#[test]
	fn stage_without_command_is_rejected() {
		assert_matches!(build(stage_words(&["ls", "  ", "wc"])), Err(ShellError::EmptyCommand));
		let dir = tempfile::tempdir().unwrap();
		let only_redirect = format!("> {}", dir.path().join("f").display());
		assert_matches!(build(stage_words(&[only_redirect.as_str()])), Err(ShellError::EmptyCommand));
	}
}
