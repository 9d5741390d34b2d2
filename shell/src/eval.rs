use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};

use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::WaitStatus;
use nix::unistd::{self, ForkResult, Pid};

use crate::builtin;
use crate::error::{Result, ShellError};
use crate::global;
use crate::job::{self, WaitStatusExt};
use crate::parser;
use crate::pipeline;
use crate::types::{Pipeline, Stage};

fn child_exit_code(e: &ShellError) -> i32 {
	match *e {
		ShellError::Exec { source: Errno::ENOENT, .. } => 127,
		ShellError::Exec { .. } => 126,
		_ => 1,
	}
}

fn exec_failure(command: &str, source: Errno) -> ShellError {
	ShellError::Exec { command: command.to_owned(), source: source }
}

fn install(fd: Option<&OwnedFd>, target: libc::c_int) -> Result<()> {
	if let Some(fd) = fd {
		unistd::dup2(fd.as_raw_fd(), target).map_err(io::Error::from)?;
	}
	Ok(())
}

fn do_exec_stage(mut stage: Stage) -> Result<i32> {
	// The runtime ignores SIGPIPE in the shell; commands expect the default.
	unsafe {
		signal::signal(Signal::SIGPIPE, SigHandler::SigDfl).map_err(io::Error::from)?;
	}
	install(stage.downstream.as_ref(), libc::STDOUT_FILENO)?;
	install(stage.upstream.as_ref(), libc::STDIN_FILENO)?;
	stage.downstream = None;
	stage.upstream = None;

	if let Some(builtin) = builtin::match_builtin(stage.name()) {
		builtin(&stage.words)?;
		return Ok(0);
	}

	let argv = stage.words.iter()
		.map(|w| CString::new(w.as_bytes()))
		.collect::<std::result::Result<Vec<CString>, _>>()
		.map_err(|_| exec_failure(stage.name(), Errno::EINVAL))?;
	match unistd::execvp(&argv[0], &argv) {
		Ok(never) => match never {},
		Err(e) => Err(exec_failure(stage.name(), e)),
	}
}

fn exec_stage(stage: Stage) -> ! {
	let code = do_exec_stage(stage).unwrap_or_else(|e| {
		eprintln!("ish: {}", e);
		child_exit_code(&e)
	});
	unsafe { libc::_exit(code) }
}

pub fn launch(stage: Stage) -> Result<Pid> {
	match unsafe { unistd::fork() }.map_err(ShellError::Fork)? {
		ForkResult::Parent { child } => {
			debug!("forked {} as {}", stage.name(), child);
			drop(stage);
			Ok(child)
		},
		ForkResult::Child => exec_stage(stage),
	}
}

pub fn spawn_commands(pipeline: Pipeline, is_background: bool, jobs: &mut job::JobSet) -> Result<Option<WaitStatus>> {
	let mut pids = Vec::with_capacity(pipeline.len());
	for stage in pipeline.stages {
		pids.push(launch(stage)?);
	}
	wait_all(pids, is_background, jobs)
}

/// Every pid is waited even after a failed wait; the first failure is returned.
fn wait_all(mut pids: Vec<Pid>, is_background: bool, jobs: &mut job::JobSet) -> Result<Option<WaitStatus>> {
	let last = match pids.pop() {
		Some(pid) => pid,
		None => return Ok(None),
	};
	if is_background {
		jobs.push(last);
	}
	let mut first_error = None;
	for pid in pids {
		match job::wait_for(pid) {
			Ok(status) => debug!("{} finished: {:?}", pid, status),
			Err(e) => {
				warn!("waitpid {}: {}", pid, e);
				first_error.get_or_insert(e);
			},
		}
	}
	let status = if is_background { None } else {
		match job::wait_for(last) {
			Ok(status) => {
				debug!("{} finished: {:?}", last, status);
				Some(status)
			},
			Err(e) => {
				first_error.get_or_insert(e);
				None
			},
		}
	};
	match first_error {
		Some(e) => Err(io::Error::from(e).into()),
		None => Ok(status),
	}
}

fn run_in_place(pipeline: &Pipeline) -> Option<Result<()>> {
	if pipeline.len() != 1 {
		return None;
	}
	let stage = &pipeline.stages[0];
	if stage.upstream.is_some() || stage.downstream.is_some() {
		return None;
	}
	builtin::match_builtin(stage.name()).map(|func| func(&stage.words))
}

/// Returns the exit code of the last stage, or `None` if it was not waited for.
pub fn eval(state: &mut global::State, line: &str) -> Result<Option<i32>> {
	let parsed = parser::parse_line(line);
	let pipeline = pipeline::build(parsed.stages)?;
	if pipeline.is_empty() {
		return Ok(None);
	}
	if let Some(r) = run_in_place(&pipeline) {
		r?;
		state.last_status = 0;
		return Ok(Some(0));
	}
	info!("running {} stage(s){}", pipeline.len(), if parsed.is_background { " in background" } else { "" });
	let code = spawn_commands(pipeline, parsed.is_background, &mut state.jobs)?.map(|status| status.code());
	if let Some(code) = code {
		state.last_status = code;
	}
	Ok(code)
}
