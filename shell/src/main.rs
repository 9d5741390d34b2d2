use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};

use ish::config::Config;
use ish::input::LineReader;
use ish::job::WaitStatusExt;
use ish::{builtin, eval, global, prompt, Result, ShellError};

/// A small shell with pipes, redirection and background commands.
#[derive(FromArgs)]
struct Args {
	/// configuration file (default: ~/.config/ish/config.toml)
	#[argh(option)]
	config: Option<PathBuf>,
	/// log at debug level
	#[argh(switch, short = 'v')]
	verbose: bool,
	/// evaluate one line and exit with its status
	#[argh(option, short = 'c')]
	command: Option<String>,
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
	let level = if verbose { LevelFilter::Debug } else { config.level_filter()? };
	let log_config = simplelog::Config::default();
	let r = match config.log_file {
		Some(ref path) => {
			let file = fs::OpenOptions::new().create(true).append(true).open(path)
				.map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))?;
			WriteLogger::init(level, log_config, file)
		},
		None => TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto),
	};
	r.map_err(|e| ShellError::Config(e.to_string()))
}

fn print_prompt(state: &global::State) {
	let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("?"));
	let home = builtin::home_dir();
	let mut stdout = io::stdout();
	let _ = stdout.write_all(prompt::render(&state.config, &cwd, Some(&home)).as_bytes());
	let _ = stdout.flush();
}

fn report_finished_jobs(state: &mut global::State) {
	for (pid, status) in state.jobs.reap() {
		eprintln!("[{}] done {}", pid, status.code());
	}
}

// false when the controller has to stop
fn eval_line(state: &mut global::State, line: &str) -> bool {
	match eval::eval(state, line) {
		Ok(_) => true,
		Err(e) => {
			eprintln!("ish: {}", e);
			state.last_status = 1;
			!e.is_fatal()
		},
	}
}

fn repl(state: &mut global::State) -> i32 {
	let interactive = io::stdin().is_terminal();
	let stdin = io::stdin();
	let mut reader = LineReader::new(stdin.lock(), state.config.max_line_length);
	loop {
		report_finished_jobs(state);
		if interactive {
			print_prompt(state);
		}
		let line = match reader.read_line() {
			Ok(Some(line)) => line,
			Ok(None) => {
				if !state.jobs.is_empty() {
					info!("leaving background children running");
				}
				return 0;
			},
			Err(e @ ShellError::LineTooLong { .. }) => {
				eprintln!("ish: {}", e);
				continue;
			},
			Err(e) => {
				eprintln!("ish: {}", e);
				return 1;
			},
		};
		if line.trim().is_empty() {
			continue;
		}
		if !eval_line(state, &line) {
			return 1;
		}
	}
}

fn main() {
	let args: Args = argh::from_env();
	let config = match Config::load(args.config.as_deref()) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("ish: {}", e);
			process::exit(2);
		},
	};
	if let Err(e) = init_logging(&config, args.verbose) {
		eprintln!("ish: {}", e);
	}
	let mut state = global::State::new(config);
	let code = match args.command {
		Some(ref line) => {
			eval_line(&mut state, line);
			state.last_status
		},
		None => repl(&mut state),
	};
	process::exit(code)
}
