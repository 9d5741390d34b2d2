use std::fs;
use std::os::fd::OwnedFd;
use std::path::PathBuf;

use log::debug;

use crate::error::{Result, ShellError};
use crate::types::RedirectType;

#[derive(Debug, Default)]
pub struct RedirectionSpec {
	pub input: Option<OwnedFd>,
	pub output: Option<OwnedFd>,
}

#[cfg(test)]
impl RedirectionSpec {
	fn is_empty(&self) -> bool {
		self.input.is_none() && self.output.is_none()
	}
}

fn open_target(typ: RedirectType, path: &str) -> Result<OwnedFd> {
	let mut oopt = fs::OpenOptions::new();
	let _ = match typ {
		RedirectType::Input => oopt.read(true),
		RedirectType::Output => oopt.write(true).create(true).truncate(true),
		RedirectType::Append => oopt.append(true).create(true),
	};
	let file = oopt.open(path).map_err(|e| ShellError::FileOpen { path: PathBuf::from(path), source: e })?;
	Ok(file.into())
}

// Only the first operator counts; later ones go away with the truncated tail.
pub fn resolve(words: &mut Vec<String>) -> Result<RedirectionSpec> {
	let mut spec = RedirectionSpec::default();
	let found = words.iter().enumerate().find_map(|(i, w)| RedirectType::from_operator(w).map(|typ| (i, typ)));
	let (i, typ) = match found {
		Some(f) => f,
		None => return Ok(spec),
	};
	let target = match words.get(i + 1) {
		Some(t) => t.clone(),
		None => return Err(ShellError::InvalidRedirection(words[i].clone())),
	};
	debug!("redirect {:?} {} for {:?}", typ, target, &words[..i]);
	let fd = open_target(typ, &target)?;
	match typ {
		RedirectType::Input => spec.input = Some(fd),
		RedirectType::Output | RedirectType::Append => spec.output = Some(fd),
	}
	words.truncate(i);
	Ok(spec)
}
