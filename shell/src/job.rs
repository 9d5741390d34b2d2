use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

pub trait WaitStatusExt {
	fn code(self) -> i32;
	fn is_terminated(self) -> bool;
}

impl WaitStatusExt for WaitStatus {
	fn code(self) -> i32 {
		match self {
			WaitStatus::Exited(_, code) => code,
			WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
			_ => 0,
		}
	}

	fn is_terminated(self) -> bool {
		matches!(self, WaitStatus::Exited(..) | WaitStatus::Signaled(..))
	}
}

pub fn wait_for(pid: Pid) -> nix::Result<WaitStatus> {
	loop {
		match waitpid(pid, None) {
			Ok(status) if status.is_terminated() => return Ok(status),
			Ok(_) => continue,
			Err(Errno::EINTR) => continue,
			Err(e) => return Err(e),
		}
	}
}

/// Children the controller did not wait for because their line ended in `&`.
#[derive(Debug, Default)]
pub struct JobSet {
	pids: Vec<Pid>,
}

impl JobSet {
	pub fn new() -> JobSet {
		JobSet::default()
	}

	pub fn push(&mut self, pid: Pid) {
		debug!("[{}] running in background", pid);
		self.pids.push(pid);
	}

	pub fn is_empty(&self) -> bool {
		self.pids.is_empty()
	}

	pub fn reap(&mut self) -> Vec<(Pid, WaitStatus)> {
		let mut finished = vec![];
		self.pids.retain(|&pid| {
			match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
				Ok(status) if status.is_terminated() => {
					finished.push((pid, status));
					false
				},
				Ok(_) => true,
				Err(Errno::ECHILD) => false,
				Err(e) => {
					warn!("waitpid {}: {}", pid, e);
					true
				},
			}
		});
		finished
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::sys::signal::Signal;

	#[test]
	fn exit_codes() {
		let pid = Pid::from_raw(1);
		assert_eq!(WaitStatus::Exited(pid, 0).code(), 0);
		assert_eq!(WaitStatus::Exited(pid, 127).code(), 127);
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGKILL, false).code(), 137);
		assert!(!WaitStatus::StillAlive.is_terminated());
		assert!(WaitStatus::Signaled(pid, Signal::SIGTERM, true).is_terminated());
	}

	#[test]
	fn empty_set_reaps_nothing() {
		let mut jobs = JobSet::new();
		assert!(jobs.reap().is_empty());
		assert!(jobs.is_empty());
	}

	#[test]
	fn unknown_child_is_forgotten() {
		let mut jobs = JobSet::new();
		// Not our child, so waitpid reports ECHILD and the entry goes away.
		jobs.push(Pid::from_raw(1));
		assert!(jobs.reap().is_empty());
		assert!(jobs.is_empty());
	}
}
