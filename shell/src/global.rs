use crate::config::Config;
use crate::job;

pub struct State {
	pub config: Config,
	pub jobs: job::JobSet,
	pub last_status: i32,
}

impl State {
	pub fn new(config: Config) -> State {
		State { config: config, jobs: job::JobSet::new(), last_status: 0 }
	}
}
